//! Preset and parameter configuration for the hallverb reverb.
//!
//! - **Presets**: TOML files mapping parameter keys to values
//! - **Validation**: key resolution and clamping to the host ranges
//! - **Paths**: platform-specific user preset directory
//! - **Factory presets**: built-in halls that need no files
//!
//! # Example
//!
//! ```rust,no_run
//! use hallverb_config::{Preset, user_presets_dir};
//! use hallverb_effects::{HallParam, HallReverb};
//!
//! let preset = Preset::new("Big Room")
//!     .with_description("Long tail, late onset")
//!     .with_param(HallParam::LateDecay, 3.5)
//!     .with_param(HallParam::LatePredelay, 30.0);
//!
//! let mut hall = HallReverb::new(48000.0);
//! preset.apply_to(&mut hall).unwrap();
//!
//! preset.save(user_presets_dir().join("big_room.toml")).unwrap();
//! ```

mod error;
mod preset;

/// Platform-specific preset paths.
pub mod paths;

/// Parameter key resolution and range clamping.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::{ConfigError, Result};
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_presets, get_factory_preset, is_factory_preset,
};
pub use paths::{
    ensure_user_presets_dir, find_preset, list_user_presets, preset_name_from_path,
    user_config_dir, user_presets_dir,
};
pub use preset::Preset;
pub use validation::{clamp_param, parse_override, resolve_param, validate_param};
