//! Late reverberation engine: an 8-line feedback delay network.
//!
//! ```text
//! in ─► predelay ─► DC cut ─► 4 × allpass diffuser ─┐  (per channel)
//!                                                   ▼ inject (even lines ← L, odd ← R)
//!        ┌──────────── Hadamard 8×8 / √8 ◄──────────┴────────────┐
//!        ▼                                                      │
//!   modulated line ─► allpass ─► 3-band decay ──────────────────┘
//!        │
//!        └─► signed output taps ─► spin tap ─► width ─► HPF ─► LPF ─► out
//! ```
//!
//! Line lengths are given at 44.1 kHz and room factor 1.0. Every delay is
//! allocated for [`MAX_ROOM_FACTOR`], [`MAX_PREDELAY_MS`] and the largest
//! wander when the sample rate is set, so no setter allocates.
//!
//! The three-band decay filter splits each line with two one-pole
//! lowpasses and applies an RT60-derived gain per band. Gains are scaled so
//! the filter's peak magnitude never exceeds the largest band gain, which
//! keeps the loop stable for any crossover and decay combination.

use core::f32::consts::{PI, TAU};

use hallverb_core::{
    AllpassFilter, DcBlocker, InterpolatedDelay, Interpolation, Lfo, OnePole, OnePoleHighpass,
    StereoEngine, flush_denormal, ms_to_samples, rt60_gain, stereo_width,
};

use crate::adapter::LateEngine;
use crate::{MAX_PREDELAY_MS, MAX_ROOM_FACTOR};

const REFERENCE_RATE: f32 = 44100.0;
const MIN_ROOM_FACTOR: f32 = 0.05;
const MIN_RT60: f32 = 0.01;

const LINE_COUNT: usize = 8;
const LINE_LENGTHS: [f32; LINE_COUNT] = [1123.0, 1367.0, 1579.0, 1801.0, 2053.0, 2273.0, 2521.0, 2767.0];
const LINE_ALLPASS_LENGTHS: [f32; LINE_COUNT] = [151.0, 173.0, 197.0, 223.0, 241.0, 263.0, 281.0, 307.0];
const DIFFUSER_LENGTHS: [[f32; 4]; 2] = [[142.0, 107.0, 379.0, 277.0], [149.0, 113.0, 389.0, 283.0]];

const OUTPUT_SIGNS: [[f32; LINE_COUNT]; 2] = [
    [1.0, -1.0, 1.0, 1.0, -1.0, 1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0],
];
const INPUT_GAIN: f32 = 0.5;
const OUTPUT_GAIN: f32 = 0.353_553_4;

const MOD_DEPTH_MS: f32 = 0.5;
const MAX_WANDER_MS: f32 = 100.0;
/// Largest relative pitch deviation the spin tap may introduce.
const SPIN_MAX_PITCH_DEV: f32 = 0.004;
const DC_CUT_HZ: f32 = 2.5;

const RESPONSE_POINTS: usize = 256;

fn scaled(length: f32, factor: f32, sample_rate: f32) -> usize {
    (libm::roundf(length * factor * sample_rate / REFERENCE_RATE) as usize).max(1)
}

fn pole(freq_hz: f32, sample_rate: f32) -> f32 {
    libm::expf(-TAU * freq_hz.max(0.0) / sample_rate)
}

/// Complex response of a one-pole lowpass with pole `c` at angular frequency `w`.
fn one_pole_response(c: f32, w: f32) -> (f32, f32) {
    if c >= 1.0 {
        return (0.0, 0.0);
    }
    let re_den = 1.0 - c * libm::cosf(w);
    let im_den = c * libm::sinf(w);
    let norm = (1.0 - c) / (re_den * re_den + im_den * im_den);
    (re_den * norm, -im_den * norm)
}

/// Peak magnitude of `g0·L_lo + g1·(L_hi − L_lo) + g2·(1 − L_hi)` over `[0, π]`.
fn peak_band_response(c_lo: f32, c_hi: f32, gains: &[f32; 3]) -> f32 {
    let [g_low, g_mid, g_high] = *gains;
    (0..=RESPONSE_POINTS)
        .map(|k| {
            let w = PI * k as f32 / RESPONSE_POINTS as f32;
            let (lo_re, lo_im) = one_pole_response(c_lo, w);
            let (hi_re, hi_im) = one_pole_response(c_hi, w);
            let re = (g_low - g_mid) * lo_re + (g_mid - g_high) * hi_re + g_high;
            let im = (g_low - g_mid) * lo_im + (g_mid - g_high) * hi_im;
            libm::sqrtf(re * re + im * im)
        })
        .fold(0.0, f32::max)
}

/// In-place 8-point Walsh-Hadamard transform, normalized to be orthonormal.
#[inline]
fn hadamard(x: &mut [f32; LINE_COUNT]) {
    let mut h = 1;
    while h < LINE_COUNT {
        for start in (0..LINE_COUNT).step_by(h * 2) {
            for j in start..start + h {
                let (a, b) = (x[j], x[j + h]);
                x[j] = a + b;
                x[j + h] = a - b;
            }
        }
        h *= 2;
    }
    for v in x.iter_mut() {
        *v *= OUTPUT_GAIN;
    }
}

/// User-facing settings of [`LateReverb`], kept across sample-rate changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LateSettings {
    /// Line allpass coefficient.
    pub ap_feedback: f32,
    /// Upper decay crossover (Hz).
    pub crossover_high: f32,
    /// Lower decay crossover (Hz).
    pub crossover_low: f32,
    /// Mid-band RT60 (s).
    pub decay: f32,
    /// RT60 multiplier above the upper crossover.
    pub decay_factor_high: f32,
    /// RT60 multiplier below the lower crossover.
    pub decay_factor_low: f32,
    /// Input diffuser coefficient.
    pub diffusion: f32,
    /// LFO 1 rate (Hz).
    pub lfo1_freq: f32,
    /// LFO 2 rate (Hz).
    pub lfo2_freq: f32,
    /// Modulation depth, 0 to 1.
    pub lfo_factor: f32,
    /// Output highpass (Hz).
    pub output_hpf: f32,
    /// Output lowpass (Hz).
    pub output_lpf: f32,
    /// Predelay (ms).
    pub predelay_ms: f32,
    /// Room size factor.
    pub room_size: f32,
    /// Spin rate (Hz).
    pub spin: f32,
    /// Spin tap blend.
    pub spin_factor: f32,
    /// Stereo width.
    pub width: f32,
    /// Spin tap wander (ms).
    pub wander_ms: f32,
}

impl Default for LateSettings {
    fn default() -> Self {
        Self {
            ap_feedback: 0.63,
            crossover_high: 3600.0,
            crossover_low: 500.0,
            decay: 0.4,
            decay_factor_high: 0.3,
            decay_factor_low: 1.3,
            diffusion: 0.82,
            lfo1_freq: 0.9,
            lfo2_freq: 1.3,
            lfo_factor: 0.31,
            output_hpf: 4.0,
            output_lpf: 16000.0,
            predelay_ms: 8.0,
            room_size: 0.5,
            spin: 2.4,
            spin_factor: 0.3,
            width: 1.0,
            wander_ms: 22.0,
        }
    }
}

#[derive(Debug, Clone)]
struct BandDecay {
    low: OnePole,
    high: OnePole,
    gains: [f32; 3],
}

impl BandDecay {
    #[inline]
    fn process(&mut self, x: f32) -> f32 {
        let below_low = self.low.process(x);
        let below_high = self.high.process(x);
        self.gains[0] * below_low
            + self.gains[1] * (below_high - below_low)
            + self.gains[2] * (x - below_high)
    }

    fn reset(&mut self) {
        self.low.reset();
        self.high.reset();
    }
}

#[derive(Debug, Clone)]
struct FdnLine {
    delay: InterpolatedDelay,
    length: usize,
    allpass: AllpassFilter,
    decay: BandDecay,
}

impl FdnLine {
    fn new(sample_rate: f32, index: usize, max_mod: usize) -> Self {
        // Linear reads keep the loop gain at or below the decay gain.
        Self {
            delay: InterpolatedDelay::new(
                scaled(LINE_LENGTHS[index], MAX_ROOM_FACTOR, sample_rate) + max_mod + 4,
            ),
            length: max_mod + 2,
            allpass: AllpassFilter::with_capacity(
                scaled(LINE_ALLPASS_LENGTHS[index], MAX_ROOM_FACTOR, sample_rate) + 1,
                1,
            ),
            decay: BandDecay {
                low: OnePole::new(sample_rate, 500.0),
                high: OnePole::new(sample_rate, 3600.0),
                gains: [0.0; 3],
            },
        }
    }

    /// Reads one sample `length + modulation` behind the next write.
    #[inline]
    fn read(&mut self, modulation: f32) -> f32 {
        let tapped = self.delay.read(self.length as f32 - 1.0 + modulation);
        self.decay.process(self.allpass.process(tapped))
    }

    #[inline]
    fn write(&mut self, x: f32) {
        self.delay.write(flush_denormal(x));
    }

    fn clear(&mut self) {
        self.delay.clear();
        self.allpass.clear();
        self.decay.reset();
    }
}

#[derive(Debug, Clone)]
struct InputChannel {
    predelay: InterpolatedDelay,
    dc: DcBlocker,
    diffusers: [AllpassFilter; 4],
}

impl InputChannel {
    fn new(sample_rate: f32, side: usize) -> Self {
        Self {
            predelay: InterpolatedDelay::new(
                ms_to_samples(MAX_PREDELAY_MS, sample_rate) as usize + 2,
            ),
            dc: DcBlocker::with_cutoff(sample_rate, DC_CUT_HZ),
            diffusers: core::array::from_fn(|k| {
                AllpassFilter::new(scaled(DIFFUSER_LENGTHS[side][k], 1.0, sample_rate))
            }),
        }
    }

    #[inline]
    fn process(&mut self, x: f32, predelay: usize) -> f32 {
        self.predelay.write(x);
        let mut y = self.dc.process(self.predelay.tap(predelay));
        for diffuser in &mut self.diffusers {
            y = diffuser.process(y);
        }
        y
    }

    fn clear(&mut self) {
        self.predelay.clear();
        self.dc.reset();
        for diffuser in &mut self.diffusers {
            diffuser.clear();
        }
    }
}

#[derive(Debug, Clone)]
struct OutputChannel {
    spin_line: InterpolatedDelay,
    hpf: OnePoleHighpass,
    lpf: OnePole,
}

impl OutputChannel {
    fn new(sample_rate: f32, settings: &LateSettings) -> Self {
        let mut spin_line =
            InterpolatedDelay::new(ms_to_samples(MAX_WANDER_MS, sample_rate) as usize + 4);
        spin_line.set_interpolation(Interpolation::Cubic);
        Self {
            spin_line,
            hpf: OnePoleHighpass::new(sample_rate, settings.output_hpf),
            lpf: OnePole::new(sample_rate, settings.output_lpf),
        }
    }

    #[inline]
    fn spin(&mut self, x: f32, delay: f32, blend: f32) -> f32 {
        self.spin_line.write(x);
        let tapped = self.spin_line.read(delay);
        x + blend * (tapped - x)
    }

    #[inline]
    fn shape(&mut self, x: f32) -> f32 {
        self.lpf.process(self.hpf.process(x))
    }

    fn clear(&mut self) {
        self.spin_line.clear();
        self.hpf.reset();
        self.lpf.reset();
    }
}

/// Stereo FDN late reverberation engine.
///
/// # Example
///
/// ```rust
/// use hallverb_core::StereoEngine;
/// use hallverb_effects::{LateEngine, LateReverb};
///
/// let mut late = LateReverb::new(48000.0);
/// late.set_decay(2.5);
/// late.set_predelay_ms(20.0);
///
/// let mut input = vec![0.0; 4800];
/// input[0] = 1.0;
/// let mut l = vec![0.0; 4800];
/// let mut r = vec![0.0; 4800];
/// late.process_replace(&input, &input, &mut l, &mut r);
///
/// assert!(l[..late.predelay_samples()].iter().all(|s| *s == 0.0));
/// assert!(l.iter().any(|s| *s != 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct LateReverb {
    settings: LateSettings,
    sample_rate: f32,
    inputs: [InputChannel; 2],
    lines: [FdnLine; LINE_COUNT],
    outputs: [OutputChannel; 2],
    lfo1: Lfo,
    lfo2: Lfo,
    spin_lfo: Lfo,
    max_mod: usize,
    mod_depth: f32,
    predelay_samples: usize,
    spin_base: f32,
    spin_excursion: f32,
}

impl LateReverb {
    /// Creates the engine with default settings.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_settings(sample_rate, LateSettings::default())
    }

    /// Creates the engine with explicit settings.
    pub fn with_settings(sample_rate: f32, settings: LateSettings) -> Self {
        let max_mod = libm::ceilf(ms_to_samples(MOD_DEPTH_MS, sample_rate)) as usize + 1;
        let mut lfo2 = Lfo::new(sample_rate, settings.lfo2_freq);
        lfo2.set_start_phase(0.25);

        let mut late = Self {
            settings,
            sample_rate,
            inputs: [InputChannel::new(sample_rate, 0), InputChannel::new(sample_rate, 1)],
            lines: core::array::from_fn(|k| FdnLine::new(sample_rate, k, max_mod)),
            outputs: [
                OutputChannel::new(sample_rate, &settings),
                OutputChannel::new(sample_rate, &settings),
            ],
            lfo1: Lfo::new(sample_rate, settings.lfo1_freq),
            lfo2,
            spin_lfo: Lfo::new(sample_rate, settings.spin),
            max_mod,
            mod_depth: 0.0,
            predelay_samples: 0,
            spin_base: 0.0,
            spin_excursion: 0.0,
        };
        late.configure_room();
        late.configure_predelay();
        late.configure_diffusion();
        late.configure_line_allpass();
        late.configure_modulation();
        late.configure_spin();
        late
    }

    /// Current settings.
    pub fn settings(&self) -> &LateSettings {
        &self.settings
    }

    /// Active predelay in samples.
    pub fn predelay_samples(&self) -> usize {
        self.predelay_samples
    }

    /// Length of the shortest feedback line in samples.
    pub fn shortest_line_samples(&self) -> usize {
        self.lines.iter().map(|l| l.length).min().unwrap_or(0)
    }

    fn configure_room(&mut self) {
        let factor = self
            .settings
            .room_size
            .clamp(MIN_ROOM_FACTOR, MAX_ROOM_FACTOR);
        let sr = self.sample_rate;
        let min_len = self.max_mod + 2;
        for (k, line) in self.lines.iter_mut().enumerate() {
            line.length = scaled(LINE_LENGTHS[k], factor, sr).max(min_len);
            line.allpass
                .set_length(scaled(LINE_ALLPASS_LENGTHS[k], factor, sr));
        }
        self.configure_decay();
    }

    fn configure_decay(&mut self) {
        let s = self.settings;
        let sr = self.sample_rate;
        let low_hz = s.crossover_low.min(s.crossover_high).max(0.0);
        let high_hz = s.crossover_high.max(low_hz);
        let (c_lo, c_hi) = (pole(low_hz, sr), pole(high_hz, sr));
        let rt60 = s.decay.max(MIN_RT60);

        for line in &mut self.lines {
            let len = line.length as f32;
            let gains = [
                rt60_gain(len, (rt60 * s.decay_factor_low).max(MIN_RT60), sr),
                rt60_gain(len, rt60, sr),
                rt60_gain(len, (rt60 * s.decay_factor_high).max(MIN_RT60), sr),
            ];
            let largest = gains[0].max(gains[1]).max(gains[2]);
            let peak = peak_band_response(c_lo, c_hi, &gains);
            let scale = if peak > largest { largest / peak } else { 1.0 };

            line.decay.low.set_frequency(low_hz);
            line.decay.high.set_frequency(high_hz);
            line.decay.gains = gains.map(|g| g * scale);
        }
    }

    fn configure_predelay(&mut self) {
        let capacity = self.inputs[0].predelay.capacity() - 1;
        let samples = libm::roundf(ms_to_samples(self.settings.predelay_ms.max(0.0), self.sample_rate));
        self.predelay_samples = (samples as usize).min(capacity);
    }

    fn configure_diffusion(&mut self) {
        for input in &mut self.inputs {
            for diffuser in &mut input.diffusers {
                diffuser.set_feedback(self.settings.diffusion);
            }
        }
    }

    fn configure_line_allpass(&mut self) {
        for line in &mut self.lines {
            line.allpass.set_feedback(self.settings.ap_feedback);
        }
    }

    fn configure_modulation(&mut self) {
        let depth = ms_to_samples(MOD_DEPTH_MS, self.sample_rate) * self.settings.lfo_factor.clamp(0.0, 1.0);
        self.mod_depth = depth.min(self.max_mod as f32 - 1.0);
        self.lfo1.set_frequency(self.settings.lfo1_freq);
        self.lfo2.set_frequency(self.settings.lfo2_freq);
    }

    fn configure_spin(&mut self) {
        let wander = ms_to_samples(
            self.settings.wander_ms.clamp(0.0, MAX_WANDER_MS),
            self.sample_rate,
        );
        self.spin_base = wander * 0.5;
        self.spin_excursion = if self.settings.spin > 0.0 {
            let pitch_limit = SPIN_MAX_PITCH_DEV * self.sample_rate / (TAU * self.settings.spin);
            self.spin_base.min(pitch_limit)
        } else {
            0.0
        };
        self.spin_lfo.set_frequency(self.settings.spin);
    }

    #[inline]
    fn tick(&mut self, xl: f32, xr: f32) -> (f32, f32) {
        let predelay = self.predelay_samples;
        let [in_l, in_r] = &mut self.inputs;
        let diffused = [in_l.process(xl, predelay), in_r.process(xr, predelay)];

        let m1 = self.lfo1.next() * self.mod_depth;
        let m2 = self.lfo2.next() * self.mod_depth;
        let modulation = [m1, m2, -m1, -m2];

        let mut taps = [0.0f32; LINE_COUNT];
        for (k, (line, tap)) in self.lines.iter_mut().zip(taps.iter_mut()).enumerate() {
            *tap = line.read(modulation[k % 4]);
        }

        let mut wet = [0.0f32; 2];
        for (side, acc) in wet.iter_mut().enumerate() {
            *acc = OUTPUT_SIGNS[side]
                .iter()
                .zip(&taps)
                .map(|(s, y)| s * y)
                .sum::<f32>()
                * OUTPUT_GAIN;
        }

        hadamard(&mut taps);
        for (k, (line, fed)) in self.lines.iter_mut().zip(taps).enumerate() {
            line.write(fed + INPUT_GAIN * diffused[k % 2]);
        }

        let (sin, cos) = self.spin_lfo.next_quadrature();
        let blend = self.settings.spin_factor.clamp(0.0, 1.0);
        let [out_l, out_r] = &mut self.outputs;
        let spun_l = out_l.spin(wet[0], self.spin_base + self.spin_excursion * sin, blend);
        let spun_r = out_r.spin(wet[1], self.spin_base + self.spin_excursion * cos, blend);

        let (wl, wr) = stereo_width(spun_l, spun_r, self.settings.width);
        (out_l.shape(wl), out_r.shape(wr))
    }
}

impl StereoEngine for LateReverb {
    fn set_sample_rate(&mut self, sample_rate: f32) {
        *self = Self::with_settings(sample_rate, self.settings);
    }

    fn process_replace(&mut self, in_l: &[f32], in_r: &[f32], out_l: &mut [f32], out_r: &mut [f32]) {
        debug_assert_eq!(in_l.len(), out_l.len());
        debug_assert_eq!(in_r.len(), out_r.len());

        for (((&xl, &xr), yl), yr) in in_l.iter().zip(in_r).zip(out_l.iter_mut()).zip(out_r.iter_mut()) {
            (*yl, *yr) = self.tick(xl, xr);
        }
    }

    fn mute(&mut self) {
        for input in &mut self.inputs {
            input.clear();
        }
        for line in &mut self.lines {
            line.clear();
        }
        for output in &mut self.outputs {
            output.clear();
        }
        self.lfo1.reset();
        self.lfo2.reset();
        self.spin_lfo.reset();
    }
}

impl LateEngine for LateReverb {
    fn set_ap_feedback(&mut self, feedback: f32) {
        self.settings.ap_feedback = feedback;
        self.configure_line_allpass();
    }

    fn set_crossover_high(&mut self, hz: f32) {
        self.settings.crossover_high = hz;
        self.configure_decay();
    }

    fn set_crossover_low(&mut self, hz: f32) {
        self.settings.crossover_low = hz;
        self.configure_decay();
    }

    fn set_decay(&mut self, rt60_secs: f32) {
        self.settings.decay = rt60_secs;
        self.configure_decay();
    }

    fn set_decay_factor_high(&mut self, factor: f32) {
        self.settings.decay_factor_high = factor;
        self.configure_decay();
    }

    fn set_decay_factor_low(&mut self, factor: f32) {
        self.settings.decay_factor_low = factor;
        self.configure_decay();
    }

    fn set_diffusion(&mut self, diffusion: f32) {
        self.settings.diffusion = diffusion;
        self.configure_diffusion();
    }

    fn set_lfo1_freq(&mut self, hz: f32) {
        self.settings.lfo1_freq = hz;
        self.configure_modulation();
    }

    fn set_lfo2_freq(&mut self, hz: f32) {
        self.settings.lfo2_freq = hz;
        self.configure_modulation();
    }

    fn set_lfo_factor(&mut self, factor: f32) {
        self.settings.lfo_factor = factor;
        self.configure_modulation();
    }

    fn set_output_hpf(&mut self, hz: f32) {
        self.settings.output_hpf = hz;
        for output in &mut self.outputs {
            output.hpf.set_frequency(hz);
        }
    }

    fn set_output_lpf(&mut self, hz: f32) {
        self.settings.output_lpf = hz;
        for output in &mut self.outputs {
            output.lpf.set_frequency(hz);
        }
    }

    fn set_predelay_ms(&mut self, ms: f32) {
        self.settings.predelay_ms = ms;
        self.configure_predelay();
    }

    fn set_room_size(&mut self, factor: f32) {
        self.settings.room_size = factor;
        self.configure_room();
    }

    fn set_spin(&mut self, hz: f32) {
        self.settings.spin = hz;
        self.configure_spin();
    }

    fn set_spin_factor(&mut self, factor: f32) {
        self.settings.spin_factor = factor;
    }

    fn set_stereo_width(&mut self, width: f32) {
        self.settings.width = width;
    }

    fn set_wander_ms(&mut self, ms: f32) {
        self.settings.wander_ms = ms;
        self.configure_spin();
    }
}
