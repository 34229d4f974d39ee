//! Helpers shared by the rendering commands.

use anyhow::Context;
use hallverb_config::{Preset, parse_override};
use hallverb_effects::HallReverb;
use indicatif::{ProgressBar, ProgressStyle};

/// Build a reverb from an optional preset plus `key=value` overrides.
///
/// Overrides are applied after the preset.
pub fn build_hall(
    sample_rate: f32,
    preset: Option<&str>,
    overrides: &[String],
) -> anyhow::Result<HallReverb> {
    let mut hall = HallReverb::new(sample_rate);

    if let Some(name) = preset {
        let preset =
            Preset::resolve(name).with_context(|| format!("loading preset '{name}'"))?;
        let count = preset.apply_to(&mut hall)?;
        println!("Preset: {} ({count} parameters)", preset.name);
    }

    for spec in overrides {
        let (param, value) = parse_override(spec)?;
        hall.set_param(param, value);
        tracing::debug!(param = param.key(), value, "override");
    }

    Ok(hall)
}

pub fn progress_bar(total: usize) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );
    Ok(pb)
}

pub fn validate_bit_depth(bits: u16) -> anyhow::Result<u16> {
    match bits {
        16 | 24 | 32 => Ok(bits),
        other => anyhow::bail!("Unsupported bit depth: {other} (expected 16, 24 or 32)"),
    }
}
