//! Circular-buffer delay line with fractional reads.
//!
//! [`InterpolatedDelay`] is the storage behind every time-based element in
//! the reverb: predelay, tapped early reflections, allpass diffusers and the
//! modulated feedback lines of the late network.
//!
//! # Read Convention
//!
//! `read(d)` returns the sample written `d` samples before the most recent
//! write. Reading before writing therefore yields a total delay of `d + 1`
//! samples, while writing first and then reading yields exactly `d`.
//!
//! ```rust
//! use hallverb_core::InterpolatedDelay;
//!
//! let mut line = InterpolatedDelay::new(16);
//! line.write(1.0);
//! line.write(0.0);
//! assert_eq!(line.read(1.0), 1.0);
//! ```

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Interpolation method for fractional delay reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    /// Truncate to the integer part.
    None,
    /// Two-point linear interpolation.
    #[default]
    Linear,
    /// Four-point cubic Lagrange interpolation. Use for modulated reads.
    Cubic,
}

/// Heap-allocated delay line with a fixed capacity.
///
/// The buffer is sized once at construction and never reallocates, so
/// reads, writes and [`clear`](Self::clear) are real-time safe.
#[derive(Debug, Clone)]
pub struct InterpolatedDelay {
    buffer: Vec<f32>,
    write_pos: usize,
    interpolation: Interpolation,
}

impl InterpolatedDelay {
    /// Creates a delay line holding `capacity` samples.
    ///
    /// The longest readable delay is `capacity - 1`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "delay capacity must be > 0");

        Self {
            buffer: vec![0.0; capacity],
            write_pos: 0,
            interpolation: Interpolation::Linear,
        }
    }

    /// Sets the interpolation method for fractional reads.
    pub fn set_interpolation(&mut self, interp: Interpolation) {
        self.interpolation = interp;
    }

    /// Returns the interpolation method.
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Reads the sample `delay_samples` before the last written one.
    ///
    /// Fractional delays are resolved with the configured
    /// [`Interpolation`]. Delays beyond the capacity are clamped. Cubic
    /// reads under one sample have no newer neighbour and fall back to
    /// linear.
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        debug_assert!(delay_samples >= 0.0);

        let len = self.buffer.len();
        let clamped = delay_samples.clamp(0.0, (len - 1) as f32);

        let whole = clamped as usize;
        let frac = clamped - whole as f32;

        // Index of the sample `whole` steps behind the most recent write.
        let newer = (self.write_pos + len - whole - 1) % len;

        match self.interpolation {
            Interpolation::None => self.buffer[newer],
            Interpolation::Linear => self.linear(newer, frac),
            Interpolation::Cubic if whole == 0 => self.linear(newer, frac),
            Interpolation::Cubic => {
                let ym1 = self.buffer[(newer + 1) % len];
                let y0 = self.buffer[newer];
                let y1 = self.buffer[(newer + len - 1) % len];
                let y2 = self.buffer[(newer + len - 2) % len];

                let t = frac;
                let c0 = y2 - y1 - ym1 + y0;
                let c1 = ym1 - y0 - c0;
                let c2 = y1 - ym1;

                ((c0 * t + c1) * t + c2) * t + y0
            }
        }
    }

    #[inline]
    fn linear(&self, newer: usize, frac: f32) -> f32 {
        let len = self.buffer.len();
        let a = self.buffer[newer];
        let b = self.buffer[(newer + len - 1) % len];
        a + (b - a) * frac
    }

    /// Reads an integer delay without interpolation.
    #[inline]
    pub fn tap(&self, delay_samples: usize) -> f32 {
        let len = self.buffer.len();
        let whole = delay_samples.min(len - 1);
        self.buffer[(self.write_pos + len - whole - 1) % len]
    }

    /// Writes a sample and advances the write head.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos += 1;
        if self.write_pos == self.buffer.len() {
            self.write_pos = 0;
        }
    }

    /// Zeroes the buffer and rewinds the write head.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Returns the buffer length in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}
