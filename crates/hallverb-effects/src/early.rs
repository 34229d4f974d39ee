//! Early-reflection engine.
//!
//! Models the first, sparse echoes from nearby boundaries with a fixed
//! 18-tap pattern per channel. Signal flow, per channel:
//!
//! ```text
//! in ──┬──────────────(+)──► tapped line ──► Σ gain·tap ──► diffuser ─┐
//!      └─► cross delay ─┘ (opposite channel)                         │
//!                                   width matrix ◄──────────────────┘
//!                                        └──► HPF ──► LPF ──► out
//! ```
//!
//! Tap times are given in seconds at room factor 1.0 and scale linearly with
//! the room size. Delay memory is sized for [`MAX_ROOM_FACTOR`] when the
//! sample rate is set, so changing the room never allocates.

use hallverb_core::{
    AllpassFilter, InterpolatedDelay, OnePole, OnePoleHighpass, StereoEngine, stereo_width,
};

use crate::MAX_ROOM_FACTOR;
use crate::adapter::EarlyEngine;

const MIN_ROOM_FACTOR: f32 = 0.05;

const TAP_COUNT: usize = 18;

const TAP_DELAYS: [[f32; TAP_COUNT]; 2] = [
    [
        0.0043, 0.0215, 0.0225, 0.0268, 0.0270, 0.0298, 0.0458, 0.0485, 0.0572, 0.0587, 0.0595,
        0.0612, 0.0707, 0.0708, 0.0726, 0.0741, 0.0753, 0.0797,
    ],
    [
        0.0053, 0.0225, 0.0231, 0.0235, 0.0242, 0.0247, 0.0268, 0.0285, 0.0299, 0.0312, 0.0358,
        0.0402, 0.0522, 0.0543, 0.0558, 0.0577, 0.0601, 0.0656,
    ],
];

const TAP_GAINS: [[f32; TAP_COUNT]; 2] = [
    [
        0.841, 0.504, 0.491, 0.379, 0.380, 0.346, 0.289, 0.272, 0.192, 0.193, 0.217, 0.181, 0.180,
        0.181, 0.176, 0.142, 0.167, 0.134,
    ],
    [
        0.842, 0.506, 0.489, 0.382, 0.300, 0.346, 0.290, 0.271, 0.193, 0.192, 0.216, 0.181, 0.180,
        0.181, 0.176, 0.142, 0.167, 0.134,
    ],
];

const LONGEST_TAP_SECS: f32 = 0.0797;

const CROSS_DELAY_SECS: f32 = 0.0003;
const CROSS_GAIN: f32 = 0.4;

const DIFFUSER_SECS: [f32; 2] = [0.0047, 0.0053];
const DIFFUSER_FEEDBACK: f32 = 0.5;

fn to_samples(secs: f32, factor: f32, sample_rate: f32) -> usize {
    (libm::roundf(secs * factor * sample_rate) as usize).max(1)
}

#[derive(Debug, Clone)]
struct Channel {
    line: InterpolatedDelay,
    cross: InterpolatedDelay,
    taps: [usize; TAP_COUNT],
    diffuser: AllpassFilter,
    hpf: OnePoleHighpass,
    lpf: OnePole,
}

impl Channel {
    fn new(sample_rate: f32, side: usize, hpf_hz: f32, lpf_hz: f32) -> Self {
        let mut diffuser = AllpassFilter::with_capacity(
            to_samples(DIFFUSER_SECS[side], MAX_ROOM_FACTOR, sample_rate) + 1,
            1,
        );
        diffuser.set_feedback(DIFFUSER_FEEDBACK);

        Self {
            line: InterpolatedDelay::new(
                to_samples(LONGEST_TAP_SECS, MAX_ROOM_FACTOR, sample_rate) + 2,
            ),
            cross: InterpolatedDelay::new(
                to_samples(CROSS_DELAY_SECS, MAX_ROOM_FACTOR, sample_rate) + 2,
            ),
            taps: [1; TAP_COUNT],
            diffuser,
            hpf: OnePoleHighpass::new(sample_rate, hpf_hz),
            lpf: OnePole::new(sample_rate, lpf_hz),
        }
    }

    fn configure_room(&mut self, side: usize, factor: f32, sample_rate: f32) {
        for (tap, &secs) in self.taps.iter_mut().zip(&TAP_DELAYS[side]) {
            *tap = to_samples(secs, factor, sample_rate);
        }
        self.diffuser
            .set_length(to_samples(DIFFUSER_SECS[side], factor, sample_rate));
    }

    #[inline]
    fn reflect(&mut self, input: f32, gains: &[f32; TAP_COUNT]) -> f32 {
        self.line.write(input);
        let sum: f32 = self
            .taps
            .iter()
            .zip(gains)
            .map(|(&d, &g)| g * self.line.tap(d))
            .sum();
        self.diffuser.process(sum)
    }

    #[inline]
    fn shape(&mut self, x: f32) -> f32 {
        self.lpf.process(self.hpf.process(x))
    }

    fn clear(&mut self) {
        self.line.clear();
        self.cross.clear();
        self.diffuser.clear();
        self.hpf.reset();
        self.lpf.reset();
    }
}

/// Stereo early-reflection engine.
///
/// # Example
///
/// ```rust
/// use hallverb_core::StereoEngine;
/// use hallverb_effects::{EarlyEngine, EarlyReflections};
///
/// let mut early = EarlyReflections::new(44100.0);
/// early.set_room_size(1.0);
///
/// let input = [1.0; 64];
/// let (mut l, mut r) = ([0.0; 64], [0.0; 64]);
/// early.process_replace(&input, &input, &mut l, &mut r);
/// assert!(l.iter().all(|s| *s == 0.0), "no reflection inside the first tap");
/// ```
#[derive(Debug, Clone)]
pub struct EarlyReflections {
    channels: [Channel; 2],
    cross_len: usize,
    sample_rate: f32,
    room_size: f32,
    width: f32,
    hpf_hz: f32,
    lpf_hz: f32,
}

impl EarlyReflections {
    /// Creates the engine with room 0.5, full width, 4 Hz HPF and 16 kHz LPF.
    pub fn new(sample_rate: f32) -> Self {
        let mut early = Self {
            channels: [
                Channel::new(sample_rate, 0, 4.0, 16000.0),
                Channel::new(sample_rate, 1, 4.0, 16000.0),
            ],
            cross_len: 1,
            sample_rate,
            room_size: 0.5,
            width: 1.0,
            hpf_hz: 4.0,
            lpf_hz: 16000.0,
        };
        early.configure_room();
        early
    }

    /// Active room factor after clamping to the allocated range.
    pub fn room_size(&self) -> f32 {
        self.room_size
    }

    /// Delay of the earliest reflection in samples.
    pub fn first_tap_samples(&self) -> usize {
        self.channels
            .iter()
            .flat_map(|c| c.taps.iter())
            .copied()
            .min()
            .unwrap_or(1)
    }

    fn configure_room(&mut self) {
        let (factor, sr) = (self.room_size, self.sample_rate);
        for (side, channel) in self.channels.iter_mut().enumerate() {
            channel.configure_room(side, factor, sr);
        }
        self.cross_len = to_samples(CROSS_DELAY_SECS, factor, sr);
    }
}

impl StereoEngine for EarlyReflections {
    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.channels = [
            Channel::new(sample_rate, 0, self.hpf_hz, self.lpf_hz),
            Channel::new(sample_rate, 1, self.hpf_hz, self.lpf_hz),
        ];
        self.configure_room();
    }

    fn process_replace(&mut self, in_l: &[f32], in_r: &[f32], out_l: &mut [f32], out_r: &mut [f32]) {
        debug_assert_eq!(in_l.len(), out_l.len());
        debug_assert_eq!(in_r.len(), out_r.len());

        let [left, right] = &mut self.channels;
        for (((&xl, &xr), yl), yr) in in_l.iter().zip(in_r).zip(out_l.iter_mut()).zip(out_r.iter_mut()) {
            left.cross.write(xr);
            right.cross.write(xl);
            let fed_l = xl + CROSS_GAIN * left.cross.tap(self.cross_len);
            let fed_r = xr + CROSS_GAIN * right.cross.tap(self.cross_len);

            let el = left.reflect(fed_l, &TAP_GAINS[0]);
            let er = right.reflect(fed_r, &TAP_GAINS[1]);

            let (wl, wr) = stereo_width(el, er, self.width);
            *yl = left.shape(wl);
            *yr = right.shape(wr);
        }
    }

    fn mute(&mut self) {
        for channel in &mut self.channels {
            channel.clear();
        }
    }
}

impl EarlyEngine for EarlyReflections {
    fn set_output_hpf(&mut self, hz: f32) {
        self.hpf_hz = hz;
        for channel in &mut self.channels {
            channel.hpf.set_frequency(hz);
        }
    }

    fn set_output_lpf(&mut self, hz: f32) {
        self.lpf_hz = hz;
        for channel in &mut self.channels {
            channel.lpf.set_frequency(hz);
        }
    }

    fn set_room_size(&mut self, factor: f32) {
        self.room_size = factor.clamp(MIN_ROOM_FACTOR, MAX_ROOM_FACTOR);
        self.configure_room();
    }

    fn set_stereo_width(&mut self, width: f32) {
        self.width = width;
    }
}
