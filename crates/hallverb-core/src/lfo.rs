//! Sine low-frequency oscillator.
//!
//! Phase-accumulator LFO driving delay-line modulation and the output
//! spin of the late reverb. The start phase is remembered so that
//! [`Lfo::reset`] returns the oscillator to a deterministic state.

use core::f32::consts::TAU;
use libm::{cosf, sinf};

/// Sine LFO producing values in `[-1.0, 1.0]`.
///
/// # Example
///
/// ```rust
/// use hallverb_core::Lfo;
///
/// let mut lfo = Lfo::new(44100.0, 0.9);
/// lfo.set_start_phase(0.25);
/// assert!((lfo.next() - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct Lfo {
    phase: f32,
    start_phase: f32,
    freq: f32,
    sample_rate: f32,
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new(48000.0, 1.0)
    }
}

impl Lfo {
    /// Creates an LFO at `freq_hz`, starting at phase 0.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        Self {
            phase: 0.0,
            start_phase: 0.0,
            freq: freq_hz,
            sample_rate,
        }
    }

    /// Sets the frequency in Hz. Negative values are treated as 0.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.freq = freq_hz.max(0.0);
    }

    /// Returns the frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.freq
    }

    /// Updates the sample rate, keeping the frequency in Hz.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Sets the phase (in cycles, 0.0 to 1.0) used at construction and on reset,
    /// and jumps to it.
    pub fn set_start_phase(&mut self, phase: f32) {
        self.start_phase = phase - libm::floorf(phase);
        self.phase = self.start_phase;
    }

    /// Returns the current phase in cycles.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Rewinds to the start phase.
    pub fn reset(&mut self) {
        self.phase = self.start_phase;
    }

    #[inline]
    fn advance(&mut self) {
        self.phase += self.freq / self.sample_rate;
        if self.phase >= 1.0 {
            self.phase -= libm::floorf(self.phase);
        }
    }

    /// Returns the current sine value and advances one sample.
    #[inline]
    pub fn next(&mut self) -> f32 {
        let value = sinf(self.phase * TAU);
        self.advance();
        value
    }

    /// Returns `(sin, cos)` of the current phase and advances one sample.
    #[inline]
    pub fn next_quadrature(&mut self) -> (f32, f32) {
        let angle = self.phase * TAU;
        let value = (sinf(angle), cosf(angle));
        self.advance();
        value
    }
}
