//! Capability trait shared by stateful stereo DSP engines.
//!
//! A [`StereoEngine`] is a block transform with internal state that carries
//! from one call to the next (delay lines, filter memory, oscillator phase).
//! An orchestration layer owns its engines and drives them through exactly
//! three operations: configure the sample rate, process a chunk, and mute.
//!
//! ## Contract
//!
//! - `process_replace` is called on consecutive chunks in time order. The
//!   engine must produce the same output for a signal regardless of how it
//!   is split into chunks.
//! - `process_replace` never allocates, blocks or fails.
//! - `mute` returns the engine to silence without touching its parameters.
//!   Zero input after `mute` must produce zero output.
//! - `set_sample_rate` may allocate and is never called from the audio
//!   thread while a chunk is in flight.

/// Stateful stereo block transform.
///
/// # Example
///
/// ```rust
/// use hallverb_core::StereoEngine;
///
/// struct Swap;
///
/// impl StereoEngine for Swap {
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///
///     fn process_replace(
///         &mut self,
///         in_l: &[f32],
///         in_r: &[f32],
///         out_l: &mut [f32],
///         out_r: &mut [f32],
///     ) {
///         out_l.copy_from_slice(in_r);
///         out_r.copy_from_slice(in_l);
///     }
///
///     fn mute(&mut self) {}
/// }
///
/// let mut swap = Swap;
/// let (mut l, mut r) = ([0.0; 2], [0.0; 2]);
/// swap.process_replace(&[1.0, 2.0], &[3.0, 4.0], &mut l, &mut r);
/// assert_eq!(l, [3.0, 4.0]);
/// ```
pub trait StereoEngine {
    /// Configures the engine for a new sample rate.
    ///
    /// Sizes internal memory and recalculates every rate-dependent
    /// coefficient. Called before the first chunk and on every host rate
    /// change.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Processes one chunk, replacing the contents of the output buffers.
    ///
    /// All four slices have the same length.
    fn process_replace(&mut self, in_l: &[f32], in_r: &[f32], out_l: &mut [f32], out_r: &mut [f32]);

    /// Clears all internal state to silence.
    fn mute(&mut self);

    /// Samples of algorithmic latency. Zero for reverbs.
    fn latency_samples(&self) -> usize {
        0
    }
}

impl<T: StereoEngine + ?Sized> StereoEngine for &mut T {
    fn set_sample_rate(&mut self, sample_rate: f32) {
        (**self).set_sample_rate(sample_rate);
    }

    fn process_replace(&mut self, in_l: &[f32], in_r: &[f32], out_l: &mut [f32], out_r: &mut [f32]) {
        (**self).process_replace(in_l, in_r, out_l, out_r);
    }

    fn mute(&mut self) {
        (**self).mute();
    }

    fn latency_samples(&self) -> usize {
        (**self).latency_samples()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Gain(f32, usize);

    impl StereoEngine for Gain {
        fn set_sample_rate(&mut self, _sample_rate: f32) {}

        fn process_replace(
            &mut self,
            in_l: &[f32],
            in_r: &[f32],
            out_l: &mut [f32],
            out_r: &mut [f32],
        ) {
            for (o, i) in out_l.iter_mut().zip(in_l) {
                *o = *i * self.0;
            }
            for (o, i) in out_r.iter_mut().zip(in_r) {
                *o = *i * self.0;
            }
        }

        fn mute(&mut self) {
            self.1 += 1;
        }
    }

    fn run<E: StereoEngine>(mut engine: E) -> [f32; 2] {
        let mut l = [0.0; 1];
        let mut r = [0.0; 1];
        engine.process_replace(&[1.0], &[-1.0], &mut l, &mut r);
        engine.mute();
        [l[0], r[0]]
    }

    #[test]
    fn test_forwarding_through_mut_ref() {
        let mut gain = Gain(0.5, 0);
        assert_eq!(run(&mut gain), [0.5, -0.5]);
        assert_eq!(gain.1, 1, "mute should reach the wrapped engine");
        assert_eq!((&mut gain).latency_samples(), 0);
    }
}
