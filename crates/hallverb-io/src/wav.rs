//! WAV file reading and writing.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample: 16 or 24 (integer) or 32 (float).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Two equal-length channel buffers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoSamples {
    /// Left channel.
    pub left: Vec<f32>,
    /// Right channel.
    pub right: Vec<f32>,
}

impl StereoSamples {
    /// Create stereo samples from left and right channels.
    pub fn new(left: Vec<f32>, right: Vec<f32>) -> Self {
        debug_assert_eq!(left.len(), right.len(), "channels must have same length");
        Self { left, right }
    }

    /// Duplicate a mono buffer into both channels.
    pub fn from_mono(mono: Vec<f32>) -> Self {
        Self {
            left: mono.clone(),
            right: mono,
        }
    }

    /// `len` samples of silence.
    pub fn silence(len: usize) -> Self {
        Self::new(vec![0.0; len], vec![0.0; len])
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// `true` if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Largest absolute sample over both channels.
    pub fn peak(&self) -> f32 {
        self.left
            .iter()
            .chain(&self.right)
            .fold(0.0f32, |m, s| m.max(s.abs()))
    }

    fn from_interleaved(interleaved: &[f32]) -> Self {
        let (left, right) = interleaved
            .chunks_exact(2)
            .map(|frame| (frame[0], frame[1]))
            .unzip();
        Self { left, right }
    }
}

fn check_bit_depth(bits: u16) -> Result<()> {
    match bits {
        16 | 24 | 32 => Ok(()),
        other => Err(Error::UnsupportedBitDepth(other)),
    }
}

/// Read a mono or stereo WAV file as stereo samples.
///
/// Mono files are duplicated to both channels. Any other channel count is
/// rejected.
pub fn read_wav_stereo<P: AsRef<Path>>(path: P) -> Result<(StereoSamples, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    if !matches!(spec.channels, 1 | 2) {
        return Err(Error::UnsupportedChannels(spec.channels));
    }

    let samples: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let stereo = if spec.channels == 1 {
        StereoSamples::from_mono(samples)
    } else {
        StereoSamples::from_interleaved(&samples)
    };

    tracing::debug!(
        frames = stereo.len(),
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        "read wav"
    );
    Ok((stereo, spec))
}

/// Write stereo samples to a WAV file.
///
/// The channel count in `spec` is ignored; the file is always stereo.
/// Integer depths clip to full scale.
pub fn write_wav_stereo<P: AsRef<Path>>(
    path: P,
    samples: &StereoSamples,
    spec: WavSpec,
) -> Result<()> {
    check_bit_depth(spec.bits_per_sample)?;
    let stereo_spec = WavSpec { channels: 2, ..spec };

    let mut writer = WavWriter::create(path, hound::WavSpec::from(stereo_spec))?;

    if spec.bits_per_sample == 32 {
        for (l, r) in samples.left.iter().zip(&samples.right) {
            writer.write_sample(*l)?;
            writer.write_sample(*r)?;
        }
    } else {
        let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
        let quantize = |x: f32| (x * max_val).round().clamp(-max_val, max_val - 1.0) as i32;
        for (l, r) in samples.left.iter().zip(&samples.right) {
            writer.write_sample(quantize(*l))?;
            writer.write_sample(quantize(*r))?;
        }
    }

    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sweep(len: usize) -> StereoSamples {
        let left: Vec<f32> = (0..len).map(|i| (i as f32 / 100.0).sin() * 0.9).collect();
        let right: Vec<f32> = (0..len).map(|i| (i as f32 / 70.0).cos() * 0.9).collect();
        StereoSamples::new(left, right)
    }

    #[test]
    fn test_stereo_roundtrip_f32() {
        let samples = sweep(1000);
        let spec = WavSpec::default();

        let file = NamedTempFile::new().unwrap();
        write_wav_stereo(file.path(), &samples, spec).unwrap();

        let (loaded, loaded_spec) = read_wav_stereo(file.path()).unwrap();
        assert_eq!(loaded_spec, spec);
        assert_eq!(loaded, samples, "32-bit float is lossless");
    }

    #[test]
    fn test_integer_depths_within_quantization() {
        for (bits, tolerance) in [(16, 1.0 / 32768.0), (24, 1.0 / 8_388_608.0)] {
            let samples = sweep(500);
            let spec = WavSpec { bits_per_sample: bits, ..WavSpec::default() };

            let file = NamedTempFile::new().unwrap();
            write_wav_stereo(file.path(), &samples, spec).unwrap();
            let (loaded, loaded_spec) = read_wav_stereo(file.path()).unwrap();

            assert_eq!(loaded_spec.bits_per_sample, bits);
            for (a, b) in samples.left.iter().zip(&loaded.left) {
                assert!((a - b).abs() <= tolerance, "{bits}-bit: {a} vs {b}");
            }
        }
    }

    #[test]
    fn test_integer_output_clips() {
        let samples = StereoSamples::new(vec![2.0, -2.0], vec![0.0, 0.0]);
        let spec = WavSpec { bits_per_sample: 16, ..WavSpec::default() };
        let file = NamedTempFile::new().unwrap();
        write_wav_stereo(file.path(), &samples, spec).unwrap();

        let (loaded, _) = read_wav_stereo(file.path()).unwrap();
        assert!((loaded.left[0] - 32767.0 / 32768.0).abs() < 1e-6);
        assert_eq!(loaded.left[1], -1.0);
    }

    #[test]
    fn test_read_mono_as_stereo() {
        let mono: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let file = NamedTempFile::new().unwrap();
        let mut writer = WavWriter::create(file.path(), spec).unwrap();
        for &s in &mono {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let (stereo, read_spec) = read_wav_stereo(file.path()).unwrap();
        assert_eq!(read_spec.channels, 1);
        assert_eq!(stereo.left, mono);
        assert_eq!(stereo.right, mono);
    }

    #[test]
    fn test_rejects_multichannel() {
        let spec = hound::WavSpec {
            channels: 4,
            sample_rate: 48000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let file = NamedTempFile::new().unwrap();
        let mut writer = WavWriter::create(file.path(), spec).unwrap();
        for _ in 0..16 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        assert!(matches!(read_wav_stereo(file.path()), Err(Error::UnsupportedChannels(4))));
    }

    #[test]
    fn test_rejects_unsupported_bit_depth() {
        let file = NamedTempFile::new().unwrap();
        let spec = WavSpec { bits_per_sample: 8, ..WavSpec::default() };
        let err = write_wav_stereo(file.path(), &StereoSamples::silence(4), spec).unwrap_err();
        assert!(matches!(err, Error::UnsupportedBitDepth(8)));
    }
}
