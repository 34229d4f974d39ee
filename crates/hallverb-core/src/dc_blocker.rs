//! DC blocking filter.
//!
//! First-order highpass `H(z) = (1 - z^-1) / (1 - R z^-1)` with
//! `R = 1 - 2π fc / fs`. Keeps offsets from accumulating inside the late
//! reverb feedback network.
//!
//! Reference: Julius O. Smith, "Introduction to Digital Filters with Audio
//! Applications", DC Blocker.

use crate::flush_denormal;
use core::f32::consts::PI;

/// First-order DC blocker.
///
/// ```rust
/// use hallverb_core::DcBlocker;
///
/// let mut blocker = DcBlocker::with_cutoff(44100.0, 2.5);
/// let mut y = 0.0;
/// for _ in 0..441000 {
///     y = blocker.process(0.25);
/// }
/// assert!(y.abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct DcBlocker {
    coeff: f32,
    cutoff_hz: f32,
    sample_rate: f32,
    x_prev: f32,
    y_prev: f32,
}

impl DcBlocker {
    const DEFAULT_CUTOFF_HZ: f32 = 7.0;

    /// Creates a blocker with a 7 Hz cutoff.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_cutoff(sample_rate, Self::DEFAULT_CUTOFF_HZ)
    }

    /// Creates a blocker with the given cutoff in Hz.
    pub fn with_cutoff(sample_rate: f32, cutoff_hz: f32) -> Self {
        Self {
            coeff: Self::calculate_coeff(cutoff_hz, sample_rate),
            cutoff_hz,
            sample_rate,
            x_prev: 0.0,
            y_prev: 0.0,
        }
    }

    /// Processes one sample: `y[n] = x[n] - x[n-1] + R * y[n-1]`.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = flush_denormal(input - self.x_prev + self.coeff * self.y_prev);
        self.x_prev = input;
        self.y_prev = output;
        output
    }

    /// Sets the cutoff frequency in Hz.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff_hz = cutoff_hz;
        self.coeff = Self::calculate_coeff(cutoff_hz, self.sample_rate);
    }

    /// Returns the cutoff frequency in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    /// Updates the sample rate, keeping the cutoff in Hz.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.coeff = Self::calculate_coeff(self.cutoff_hz, sample_rate);
    }

    /// Zeroes the filter state.
    pub fn reset(&mut self) {
        self.x_prev = 0.0;
        self.y_prev = 0.0;
    }

    fn calculate_coeff(cutoff_hz: f32, sample_rate: f32) -> f32 {
        (1.0 - 2.0 * PI * cutoff_hz / sample_rate).clamp(0.9, 0.99999)
    }
}
