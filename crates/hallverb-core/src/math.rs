//! Mathematical utility functions for DSP.
//!
//! Allocation-free helpers shared by the reverb engines and the
//! orchestration layer. All functions are `no_std` compatible.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Time Conversions
//!
//! - [`ms_to_samples`]
//!
//! # Reverb Helpers
//!
//! - [`rt60_gain`] - Per-pass loop gain for a target decay time
//! - [`flush_denormal`] - Subnormal protection for feedback paths

use libm::{expf, logf, powf};

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use hallverb_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Inputs at or below zero are floored to -200 dB.
///
/// # Example
/// ```rust
/// use hallverb_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Convert milliseconds to samples.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

/// Gain applied once per trip around a feedback loop of `delay_samples`
/// so that the loop energy falls by 60 dB after `rt60_secs`.
///
/// ```text
/// g = 10^(-3 * delay / (rt60 * fs))
/// ```
///
/// A non-positive `rt60_secs` returns 0.0 (no feedback).
///
/// # Example
/// ```rust
/// use hallverb_core::rt60_gain;
///
/// // A loop exactly one RT60 long must attenuate by 60 dB per trip.
/// let g = rt60_gain(48000.0, 1.0, 48000.0);
/// assert!((g - 0.001).abs() < 1e-6);
/// ```
#[inline]
pub fn rt60_gain(delay_samples: f32, rt60_secs: f32, sample_rate: f32) -> f32 {
    if rt60_secs <= 0.0 || sample_rate <= 0.0 {
        return 0.0;
    }
    powf(10.0, -3.0 * delay_samples / (rt60_secs * sample_rate))
}

/// Flush subnormal (denormalized) floats to zero.
///
/// Replaces values below 1e-20 with zero, well above the IEEE 754
/// subnormal range. Use in every feedback path that can decay toward zero.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Stereo width matrix.
///
/// `width = 1.0` leaves the pair untouched, `0.0` collapses to mono and
/// `-1.0` swaps the channels.
#[inline]
pub fn stereo_width(left: f32, right: f32, width: f32) -> (f32, f32) {
    let direct = 0.5 + width * 0.5;
    let cross = 0.5 - width * 0.5;
    (
        left * direct + right * cross,
        right * direct + left * cross,
    )
}
