//! File-based reverb processing command.

use std::path::PathBuf;

use clap::Args;
use hallverb_core::linear_to_db;
use hallverb_io::{DEFAULT_BLOCK_SIZE, OfflineRenderer, WavSpec, read_wav_stereo, write_wav_stereo};

use super::common::{build_hall, progress_bar, validate_bit_depth};

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file (mono or stereo)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file (always stereo)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Factory preset name, user preset name, or TOML file
    #[arg(short, long)]
    preset: Option<String>,

    /// Parameter override (e.g., "late_decay=3.5"), repeatable
    #[arg(long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Host block size
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Seconds of silence appended to capture the tail
    #[arg(long, default_value_t = 2.0)]
    tail: f32,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value_t = 32)]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let bit_depth = validate_bit_depth(args.bit_depth)?;
    if !args.tail.is_finite() || args.tail < 0.0 {
        anyhow::bail!("Tail must be a finite number of seconds, zero or more");
    }

    println!("Reading {}...", args.input.display());
    let (input, spec) = read_wav_stereo(&args.input)?;
    let sample_rate = spec.sample_rate as f32;
    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        input.len(),
        spec.channels,
        spec.sample_rate,
        input.len() as f32 / sample_rate
    );

    let hall = build_hall(sample_rate, args.preset.as_deref(), &args.params)?;
    let mut renderer = OfflineRenderer::new(hall)
        .with_block_size(args.block_size)
        .with_tail(args.tail)?;

    let pb = progress_bar(input.len())?;
    let output = renderer.render_with_progress(&input, sample_rate, |done, total| {
        pb.set_length(total as u64);
        pb.set_position(done as u64);
    })?;
    pb.finish_with_message("done");

    println!("\nPeak:");
    println!("  Input:  {:.1} dB", linear_to_db(input.peak()));
    println!("  Output: {:.1} dB", linear_to_db(output.peak()));

    let out_spec = WavSpec {
        channels: 2,
        sample_rate: spec.sample_rate,
        bits_per_sample: bit_depth,
    };
    println!("\nWriting {}...", args.output.display());
    write_wav_stereo(&args.output, &output, out_spec)?;
    println!("Done!");

    Ok(())
}
