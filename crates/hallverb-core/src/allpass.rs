//! Schroeder allpass section for reverb diffusion.
//!
//! Uses the canonical single-delay form:
//!
//! ```text
//! v[n] = x[n] + g * v[n - L]
//! y[n] = v[n - L] - g * v[n]
//! ```
//!
//! which has unit magnitude response for any `|g| < 1`. The delay length `L`
//! can change at runtime up to the capacity fixed at construction, which lets
//! room-size controls rescale diffusers without reallocating.

use crate::InterpolatedDelay;
use crate::flush_denormal;

/// Allpass diffuser with runtime-adjustable length.
///
/// # Example
///
/// ```rust
/// use hallverb_core::AllpassFilter;
///
/// let mut allpass = AllpassFilter::with_capacity(2048, 500);
/// allpass.set_feedback(0.6);
/// allpass.set_length(900);
///
/// let output = allpass.process(1.0);
/// assert!((output + 0.6).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    delay: InterpolatedDelay,
    length: usize,
    feedback: f32,
}

impl AllpassFilter {
    /// Creates an allpass whose length equals its capacity.
    pub fn new(length: usize) -> Self {
        Self::with_capacity(length, length)
    }

    /// Creates an allpass with room for `capacity` samples, initially `length` long.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn with_capacity(capacity: usize, length: usize) -> Self {
        Self {
            delay: InterpolatedDelay::new(capacity),
            length: length.clamp(1, capacity),
            feedback: 0.5,
        }
    }

    /// Sets the loop coefficient, clamped to `[-0.99, 0.99]`.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(-0.99, 0.99);
    }

    /// Returns the loop coefficient.
    #[inline]
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Sets the delay length in samples, clamped to `[1, capacity]`.
    pub fn set_length(&mut self, length: usize) {
        self.length = length.clamp(1, self.delay.capacity());
    }

    /// Returns the active delay length in samples.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Processes one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.delay.tap(self.length - 1);
        let v = flush_denormal(input + self.feedback * delayed);
        self.delay.write(v);
        delayed - self.feedback * v
    }

    /// Clears the internal state.
    pub fn clear(&mut self) {
        self.delay.clear();
    }

    /// Returns the maximum length in samples.
    pub fn capacity(&self) -> usize {
        self.delay.capacity()
    }
}
