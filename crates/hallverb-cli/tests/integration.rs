//! Integration tests for the `hallverb` binary.

use std::path::Path;
use std::process::{Command, Output};

use hallverb_io::{StereoSamples, WavSpec, read_wav_stereo, write_wav_stereo};
use tempfile::TempDir;

fn hallverb_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_hallverb"))
}

fn run(args: &[&str]) -> Output {
    hallverb_bin()
        .args(args)
        .output()
        .expect("failed to run hallverb")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write_click(path: &Path, frames: usize) {
    let mono: Vec<f32> = (0..frames).map(|i| if i == 0 { 0.9 } else { 0.0 }).collect();
    let spec = WavSpec {
        channels: 2,
        sample_rate: 48000,
        bits_per_sample: 32,
    };
    write_wav_stereo(path, &StereoSamples::from_mono(mono), spec).unwrap();
}

// ---------------------------------------------------------------------------
// help / version
// ---------------------------------------------------------------------------

#[test]
fn cli_help_lists_commands() {
    let output = run(&["--help"]);
    assert!(output.status.success());

    let text = stdout(&output);
    for command in ["process", "impulse", "params", "presets"] {
        assert!(text.contains(command), "help should mention '{command}'");
    }
}

#[test]
fn cli_version_works() {
    let output = run(&["--version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("hallverb"));
}

// ---------------------------------------------------------------------------
// params
// ---------------------------------------------------------------------------

#[test]
fn cli_params_lists_every_parameter() {
    let output = run(&["params"]);
    assert!(output.status.success());

    let text = stdout(&output);
    for key in ["dry_level", "late_decay", "late_room_size*", "late_predelay*", "early_room_size*", "late_wander"] {
        assert!(text.contains(key), "listing should contain '{key}'");
    }
}

#[test]
fn cli_params_detail_accepts_host_key() {
    let output = run(&["params", "latePredelay"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("late_predelay"));
    assert!(text.contains("next processed block"), "deferred parameters are flagged");
}

#[test]
fn cli_params_unknown_fails() {
    let output = run(&["params", "no_such_param"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("no_such_param"), "got: {}", stderr(&output));
}

// ---------------------------------------------------------------------------
// presets
// ---------------------------------------------------------------------------

#[test]
fn cli_presets_list_shows_factory() {
    let output = run(&["presets", "list"]);
    assert!(output.status.success());

    let text = stdout(&output);
    for name in ["Default", "Small Hall", "Concert Hall", "Cathedral"] {
        assert!(text.contains(name), "listing should contain '{name}'");
    }
}

#[test]
fn cli_presets_show_factory() {
    let output = run(&["presets", "show", "cathedral"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let text = stdout(&output);
    assert!(text.contains("Cathedral"));
    assert!(text.contains("late_predelay"));
}

#[test]
fn cli_presets_export_then_use_file() {
    let dir = TempDir::new().unwrap();
    let preset_path = dir.path().join("mine.toml");

    let output = run(&["presets", "export", "small_hall", preset_path.to_str().unwrap()]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(preset_path.exists());

    let output = run(&["presets", "show", preset_path.to_str().unwrap()]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Small Hall"));
}

#[test]
fn cli_presets_show_missing_fails() {
    let output = run(&["presets", "show", "definitely_not_a_preset"]);
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// process
// ---------------------------------------------------------------------------

#[test]
fn cli_process_renders_preset_with_tail() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");
    write_click(&input, 4800);

    let output = run(&[
        "process",
        input.to_str().unwrap(),
        output_path.to_str().unwrap(),
        "--preset",
        "concert_hall",
        "--param",
        "late_decay=2.5",
        "--tail",
        "0.5",
        "--bit-depth",
        "24",
    ]);
    assert!(output.status.success(), "process failed: {}", stderr(&output));

    let (wet, spec) = read_wav_stereo(&output_path).unwrap();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.bits_per_sample, 24);
    assert_eq!(spec.sample_rate, 48000);
    assert_eq!(wet.len(), 4800 + 24000);
    assert!(wet.peak() > 0.0);
}

#[test]
fn cli_process_out_of_range_override_is_clamped() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");
    write_click(&input, 480);

    let output = run(&[
        "process",
        input.to_str().unwrap(),
        output_path.to_str().unwrap(),
        "--param",
        "late_room_size=99",
        "--tail",
        "0",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stderr(&output).contains("clamped"), "got: {}", stderr(&output));
}

#[test]
fn cli_process_bad_override_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");
    write_click(&input, 480);

    let output = run(&[
        "process",
        input.to_str().unwrap(),
        output_path.to_str().unwrap(),
        "--param",
        "late_decay",
    ]);
    assert!(!output.status.success());
    assert!(!output_path.exists());
}

#[test]
fn cli_process_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(&[
        "process",
        dir.path().join("absent.wav").to_str().unwrap(),
        dir.path().join("out.wav").to_str().unwrap(),
    ]);
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// impulse
// ---------------------------------------------------------------------------

#[test]
fn cli_impulse_renders_requested_length() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ir.wav");

    let output = run(&[
        "impulse",
        path.to_str().unwrap(),
        "--sample-rate",
        "44100",
        "--length",
        "0.5",
        "--param",
        "dry_level=0",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));

    let (ir, spec) = read_wav_stereo(&path).unwrap();
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(ir.len(), 22050);
    assert_eq!(ir.left[0], 0.0, "no dry path");
    assert!(ir.left.iter().any(|s| s.abs() > 1e-6), "wet response present");
}

#[test]
fn cli_impulse_rejects_bad_bit_depth() {
    let dir = TempDir::new().unwrap();
    let output = run(&[
        "impulse",
        dir.path().join("ir.wav").to_str().unwrap(),
        "--bit-depth",
        "12",
    ]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("bit depth"));
}

#[test]
fn cli_process_rejects_infinite_tail() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");
    write_click(&input, 480);

    let output = run(&[
        "process",
        input.to_str().unwrap(),
        output_path.to_str().unwrap(),
        "--tail",
        "inf",
    ]);
    assert!(!output.status.success(), "infinite tail must fail");
    assert!(stderr(&output).contains("Tail"), "got: {}", stderr(&output));
    assert!(!output_path.exists());
}

#[test]
fn cli_impulse_rejects_infinite_length() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ir.wav");

    for length in ["inf", "1e30"] {
        let output = run(&["impulse", path.to_str().unwrap(), "--length", length]);
        assert!(!output.status.success(), "length {length} must fail");
    }
    assert!(!path.exists());
}
