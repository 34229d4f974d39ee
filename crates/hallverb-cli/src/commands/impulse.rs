//! Impulse response rendering command.

use std::path::PathBuf;

use clap::Args;
use hallverb_config::Preset;
use hallverb_core::linear_to_db;
use hallverb_io::{OfflineRenderer, WavSpec, write_wav_stereo};

use super::common::{build_hall, validate_bit_depth};

#[derive(Args)]
pub struct ImpulseArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Factory preset name, user preset name, or TOML file
    #[arg(short, long)]
    preset: Option<String>,

    /// Parameter override (e.g., "late_decay=3.5"), repeatable
    #[arg(long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Sample rate in Hz (defaults to the preset's, then 48000)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Length of the response in seconds
    #[arg(long, default_value_t = 4.0)]
    length: f32,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value_t = 32)]
    bit_depth: u16,
}

pub fn run(args: ImpulseArgs) -> anyhow::Result<()> {
    let bit_depth = validate_bit_depth(args.bit_depth)?;
    if !args.length.is_finite() || args.length <= 0.0 {
        anyhow::bail!("Length must be a finite number of seconds greater than zero");
    }

    let preset_rate = match &args.preset {
        Some(name) => Preset::resolve(name)?.sample_rate,
        None => None,
    };
    let sample_rate = args.sample_rate.or(preset_rate).unwrap_or(48000);
    if sample_rate == 0 {
        anyhow::bail!("Sample rate must be greater than zero");
    }

    let hall = build_hall(sample_rate as f32, args.preset.as_deref(), &args.params)?;
    let mut renderer = OfflineRenderer::new(hall);

    println!("Rendering {:.2}s impulse response at {sample_rate} Hz...", args.length);
    let response = renderer.impulse_response(sample_rate as f32, args.length)?;
    println!("  Peak: {:.1} dB", linear_to_db(response.peak()));

    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: bit_depth,
    };
    write_wav_stereo(&args.output, &response, spec)?;
    println!("Wrote {}", args.output.display());

    Ok(())
}
