//! One-pole (6 dB/oct) lowpass and highpass filters.
//!
//! The lowpass follows the difference equation
//!
//! ```text
//! y[n] = x[n] + c * (y[n-1] - x[n]),   c = exp(-2π f / fs)
//! ```
//!
//! and the highpass is its complement, `x[n] - lowpass(x)[n]`. Both are used
//! for output tone shaping and as band splitters in the late decay filters.
//!
//! A cutoff of 0 Hz makes the lowpass output silence and the highpass pass
//! the input unchanged.

use crate::flush_denormal;
use libm::expf;

fn coefficient(freq_hz: f32, sample_rate: f32) -> f32 {
    expf(-core::f32::consts::TAU * freq_hz.max(0.0) / sample_rate)
}

/// One-pole lowpass filter.
///
/// # Example
///
/// ```rust
/// use hallverb_core::OnePole;
///
/// let mut lp = OnePole::new(48000.0, 4000.0);
/// let filtered = lp.process(1.0);
/// assert!(filtered < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct OnePole {
    state: f32,
    coeff: f32,
    sample_rate: f32,
    freq: f32,
}

impl OnePole {
    /// Creates a lowpass at `freq_hz`.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        Self {
            state: 0.0,
            coeff: coefficient(freq_hz, sample_rate),
            sample_rate,
            freq: freq_hz,
        }
    }

    /// Sets the cutoff frequency in Hz.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.freq = freq_hz;
        self.coeff = coefficient(self.freq, self.sample_rate);
    }

    /// Returns the cutoff frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.freq
    }

    /// Processes one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = flush_denormal(input + self.coeff * (self.state - input));
        self.state
    }

    /// Zeroes the filter state.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }

    /// Updates the sample rate, keeping the cutoff in Hz.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.coeff = coefficient(self.freq, self.sample_rate);
    }
}

/// One-pole highpass filter, the complement of [`OnePole`].
#[derive(Debug, Clone)]
pub struct OnePoleHighpass {
    lowpass: OnePole,
}

impl OnePoleHighpass {
    /// Creates a highpass at `freq_hz`.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        Self {
            lowpass: OnePole::new(sample_rate, freq_hz),
        }
    }

    /// Sets the cutoff frequency in Hz.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.lowpass.set_frequency(freq_hz);
    }

    /// Returns the cutoff frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.lowpass.frequency()
    }

    /// Processes one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        input - self.lowpass.process(input)
    }

    /// Zeroes the filter state.
    pub fn reset(&mut self) {
        self.lowpass.reset();
    }

    /// Updates the sample rate, keeping the cutoff in Hz.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.lowpass.set_sample_rate(sample_rate);
    }
}
