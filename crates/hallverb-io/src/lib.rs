//! Audio file I/O and offline rendering for the hallverb reverb.
//!
//! - **WAV file I/O**: [`read_wav_stereo`] and [`write_wav_stereo`]
//! - **Offline rendering**: [`OfflineRenderer`] drives a
//!   [`HallReverb`](hallverb_effects::HallReverb) the way a host does
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hallverb_effects::HallReverb;
//! use hallverb_io::{OfflineRenderer, read_wav_stereo, write_wav_stereo};
//!
//! let (input, spec) = read_wav_stereo("dry.wav")?;
//!
//! let hall = HallReverb::new(spec.sample_rate as f32);
//! let mut renderer = OfflineRenderer::new(hall).with_tail(2.0)?;
//! let output = renderer.render(&input, spec.sample_rate as f32)?;
//!
//! write_wav_stereo("wet.wav", &output, spec)?;
//! # Ok::<(), hallverb_io::Error>(())
//! ```

mod render;
mod wav;

pub use render::{DEFAULT_BLOCK_SIZE, MAX_RENDER_FRAMES, OfflineRenderer};
pub use wav::{StereoSamples, WavSpec, read_wav_stereo, write_wav_stereo};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The file has a channel count the reverb cannot take.
    #[error("unsupported channel count: {0} (expected 1 or 2)")]
    UnsupportedChannels(u16),

    /// A tail or render length is non-finite, negative or too long.
    #[error("invalid duration: {0} s")]
    InvalidDuration(f32),

    /// The requested output bit depth is not supported.
    #[error("unsupported bit depth: {0} (expected 16, 24 or 32)")]
    UnsupportedBitDepth(u16),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
