//! Parameter validation for presets and command-line overrides.
//!
//! This is the parameter-hosting layer: keys are resolved to [`HallParam`]s,
//! values outside the documented host range are clamped with a warning, and
//! non-finite values are rejected. [`HallReverb`](hallverb_effects::HallReverb)
//! itself never clamps.

use hallverb_core::ParamDescriptor;
use hallverb_effects::HallParam;

use crate::error::{ConfigError, Result};

/// Resolves a preset or override key to a parameter.
///
/// Accepts the snake_case key (`late_room_size`) and the camelCase host key
/// (`lateRoomSize`).
pub fn resolve_param(key: &str) -> Result<HallParam> {
    key.trim()
        .parse::<HallParam>()
        .map_err(|_| ConfigError::UnknownParameter(key.to_string()))
}

/// Clamps `value` into the host range of `param`.
///
/// Logs a warning when the value had to be changed.
pub fn clamp_param(param: HallParam, value: f32) -> Result<f32> {
    if !value.is_finite() {
        return Err(ConfigError::invalid_value(param.key(), "not a finite number"));
    }
    let desc: ParamDescriptor = param.descriptor();
    let clamped = desc.clamp(value);
    if clamped != value {
        tracing::warn!(
            param = param.key(),
            value,
            clamped,
            min = desc.min,
            max = desc.max,
            "parameter out of range, clamped"
        );
    }
    Ok(clamped)
}

/// Resolves and clamps one key/value pair.
pub fn validate_param(key: &str, value: f32) -> Result<(HallParam, f32)> {
    let param = resolve_param(key)?;
    Ok((param, clamp_param(param, value)?))
}

/// Parses a `key=value` override such as `late_decay=2.5`.
pub fn parse_override(spec: &str) -> Result<(HallParam, f32)> {
    let Some((key, value)) = spec.split_once('=') else {
        return Err(ConfigError::invalid_value(spec, "expected key=value"));
    };
    let value: f32 = value
        .trim()
        .parse()
        .map_err(|e| ConfigError::invalid_value(key.trim(), format!("{e}")))?;
    validate_param(key, value)
}
