//! Hallverb Effects - hall reverb engines and orchestration
//!
//! - [`EarlyReflections`] - multi-tap early-reflection engine
//! - [`LateReverb`] - 8-line modulated FDN with spin/wander output tap
//! - [`HallReverb`] - deferred-update gate, block chunker and mixer around
//!   any [`EarlyEngine`] / [`LateEngine`] pair
//! - [`HallParam`] - enum-keyed parameter table
//! - [`SharedParams`] - lock-free cross-thread parameter store
//!
//! ## Example
//!
//! ```rust
//! use hallverb_effects::{HallParam, HallReverb, SharedParams};
//!
//! let shared = SharedParams::new();
//! let mut hall = HallReverb::new(44100.0);
//!
//! // control thread
//! shared.set(HallParam::LateDecay, 3.0);
//!
//! // audio thread, once per block
//! hall.apply_shared(&shared);
//! let input = [0.0f32; 256];
//! let (mut l, mut r) = ([0.0f32; 256], [0.0f32; 256]);
//! hall.process(&input, &input, &mut l, &mut r);
//! assert_eq!(hall.param(HallParam::LateDecay), 3.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod adapter;
pub mod early;
pub mod hall;
pub mod late;
pub mod params;
pub mod shared;

/// Largest room factor the engines allocate delay memory for.
pub const MAX_ROOM_FACTOR: f32 = 4.0;

/// Longest predelay the late engine allocates for, in milliseconds.
pub const MAX_PREDELAY_MS: f32 = 500.0;

pub use adapter::{EarlyEngine, LateEngine};
pub use early::EarlyReflections;
pub use hall::{ChannelLayout, HallReverb, MAX_CHUNK};
pub use late::{LateReverb, LateSettings};
pub use params::{HallParam, UnknownParam};
pub use shared::SharedParams;
