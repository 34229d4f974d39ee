//! Offline host driver for the hall reverb.

use hallverb_effects::HallReverb;

use crate::{Error, Result, StereoSamples};

/// Host block size used when none is configured.
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Longest render in frames, the most a WAV file can address.
pub const MAX_RENDER_FRAMES: usize = u32::MAX as usize;

/// Frame count for `secs` seconds, refusing non-finite, negative and
/// overlong durations.
fn duration_frames(secs: f32, sample_rate: f32) -> Result<usize> {
    let frames = (secs * sample_rate).round();
    if !frames.is_finite() || frames < 0.0 || frames > MAX_RENDER_FRAMES as f32 {
        return Err(Error::InvalidDuration(secs));
    }
    Ok((frames as usize).min(MAX_RENDER_FRAMES))
}

/// Runs a [`HallReverb`] over whole buffers the way a host would.
///
/// Each render sets the sample rate, mutes the reverb and then feeds the
/// input through [`HallReverb::process`] in blocks of `block_size` samples.
/// An optional tail of silence is appended so the decay is captured.
#[derive(Debug)]
pub struct OfflineRenderer {
    hall: HallReverb,
    block_size: usize,
    tail_secs: f32,
}

impl OfflineRenderer {
    /// Wrap a configured reverb.
    pub fn new(hall: HallReverb) -> Self {
        Self {
            hall,
            block_size: DEFAULT_BLOCK_SIZE,
            tail_secs: 0.0,
        }
    }

    /// Host block size in samples (at least 1).
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    /// Seconds of silence appended after the input.
    ///
    /// Fails unless `tail_secs` is finite and not negative.
    pub fn with_tail(mut self, tail_secs: f32) -> Result<Self> {
        if !tail_secs.is_finite() || tail_secs < 0.0 {
            return Err(Error::InvalidDuration(tail_secs));
        }
        self.tail_secs = tail_secs;
        Ok(self)
    }

    /// Host block size in samples.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// The wrapped reverb.
    pub fn hall(&self) -> &HallReverb {
        &self.hall
    }

    /// The wrapped reverb, for parameter changes between renders.
    pub fn hall_mut(&mut self) -> &mut HallReverb {
        &mut self.hall
    }

    /// Render `input` plus the configured tail.
    pub fn render(&mut self, input: &StereoSamples, sample_rate: f32) -> Result<StereoSamples> {
        self.render_with_progress(input, sample_rate, |_, _| {})
    }

    /// Render `input`, reporting `(frames_done, frames_total)` after each block.
    ///
    /// Fails with [`Error::InvalidDuration`] if input plus tail would exceed
    /// [`MAX_RENDER_FRAMES`].
    pub fn render_with_progress(
        &mut self,
        input: &StereoSamples,
        sample_rate: f32,
        mut progress: impl FnMut(usize, usize),
    ) -> Result<StereoSamples> {
        let tail = duration_frames(self.tail_secs, sample_rate)?;
        let total = input
            .len()
            .checked_add(tail)
            .filter(|&total| total <= MAX_RENDER_FRAMES)
            .ok_or(Error::InvalidDuration(self.tail_secs))?;

        tracing::info!(
            frames = input.len(),
            tail_frames = tail,
            sample_rate,
            block_size = self.block_size,
            "rendering"
        );

        self.hall.set_sample_rate(sample_rate);
        self.hall.mute();

        let mut dry = input.clone();
        dry.left.resize(total, 0.0);
        dry.right.resize(total, 0.0);
        let mut wet = StereoSamples::silence(total);

        let mut start = 0;
        while start < total {
            let end = (start + self.block_size).min(total);
            self.hall.process(
                &dry.left[start..end],
                &dry.right[start..end],
                &mut wet.left[start..end],
                &mut wet.right[start..end],
            );
            start = end;
            progress(start, total);
        }

        Ok(wet)
    }

    /// Stereo response to a unit impulse at sample 0, `length_secs` long.
    pub fn impulse_response(&mut self, sample_rate: f32, length_secs: f32) -> Result<StereoSamples> {
        let len = duration_frames(length_secs, sample_rate)?.max(1);
        let mut impulse = StereoSamples::silence(len);
        impulse.left[0] = 1.0;
        impulse.right[0] = 1.0;

        let tail = self.tail_secs;
        self.tail_secs = 0.0;
        let response = self.render(&impulse, sample_rate);
        self.tail_secs = tail;
        response
    }
}
