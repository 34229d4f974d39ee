//! Hallverb Core - DSP primitives for the hall reverb
//!
//! Building blocks shared by the early-reflection and late-reverb engines,
//! designed for real-time use with zero allocation on the audio path.
//!
//! # Engine Contract
//!
//! - [`StereoEngine`] - configure / process-chunk / mute capability trait
//!
//! # Delay-Based Elements
//!
//! - [`InterpolatedDelay`] - Circular delay line with none/linear/cubic reads
//! - [`AllpassFilter`] - Schroeder allpass diffuser with adjustable length
//!
//! # Filters and Modulation
//!
//! - [`OnePole`] / [`OnePoleHighpass`] - 6 dB/oct tone shaping and band splits
//! - [`DcBlocker`] - First-order DC cut
//! - [`Lfo`] - Sine oscillator for delay modulation
//!
//! # Parameters
//!
//! - [`ParameterInfo`] and [`ParamDescriptor`] for runtime parameter discovery
//!
//! # no_std Support
//!
//! Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! hallverb-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod allpass;
pub mod dc_blocker;
pub mod delay;
pub mod engine;
pub mod lfo;
pub mod math;
pub mod one_pole;
pub mod param_info;

pub use allpass::AllpassFilter;
pub use dc_blocker::DcBlocker;
pub use delay::{InterpolatedDelay, Interpolation};
pub use engine::StereoEngine;
pub use lfo::Lfo;
pub use math::{
    db_to_linear, flush_denormal, linear_to_db, ms_to_samples, rt60_gain, stereo_width,
};
pub use one_pole::{OnePole, OnePoleHighpass};
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamScale, ParamUnit, ParameterInfo};
