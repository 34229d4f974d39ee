//! Hall reverb orchestration: parameter store, deferred-update gate, block
//! chunker and router/mixer around one early and one late engine.
//!
//! ```text
//!            ┌──────────────► × dry_level ─────────────────────────┐
//!            │                                                     ▼
//! dry ───────┼─► early ─┬───► × early_level ──────────────────────► Σ ──► out
//!            │          │                                          ▲
//!            │          └─► × early_send_level ─┐                  │
//!            │                                  ▼                  │
//!            └─────────────────────────────────► Σ ─► late ─► × late_level
//! ```
//!
//! Room sizes and predelay are deferred: their setters only store the value
//! and raise a dirty flag. The gate applies dirty values once at the entry of
//! each processing call, before any chunk runs. Every other setter reaches
//! its engine immediately.
//!
//! Blocks are split into chunks of at most `CHUNK` samples that run through
//! eight preallocated scratch buffers, so processing never allocates. The
//! engines are sample-sequential, so the chunk size is not observable in
//! the output.

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use hallverb_core::{ParamDescriptor, ParameterInfo, StereoEngine};

use crate::adapter::{EarlyEngine, LateEngine};
use crate::early::EarlyReflections;
use crate::late::LateReverb;
use crate::params::HallParam;
use crate::shared::SharedParams;

/// Default largest chunk handed to the engines in one call.
pub const MAX_CHUNK: usize = 512;

/// Host channel configurations accepted by [`HallReverb::process_channels`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    /// One input duplicated to both sides, two outputs.
    MonoToStereo,
    /// Two inputs, two outputs.
    Stereo,
}

impl ChannelLayout {
    /// Layout for the given channel counts, or `None` if unsupported.
    pub fn from_counts(inputs: usize, outputs: usize) -> Option<Self> {
        match (inputs, outputs) {
            (1, 2) => Some(Self::MonoToStereo),
            (2, 2) => Some(Self::Stereo),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct DeferredFlags {
    early_room: bool,
    late_room: bool,
    predelay: bool,
}

impl DeferredFlags {
    const ALL_DIRTY: Self = Self {
        early_room: true,
        late_room: true,
        predelay: true,
    };
}

struct Scratch<const C: usize> {
    dry_l: [f32; C],
    dry_r: [f32; C],
    early_l: [f32; C],
    early_r: [f32; C],
    late_in_l: [f32; C],
    late_in_r: [f32; C],
    late_l: [f32; C],
    late_r: [f32; C],
}

impl<const C: usize> Scratch<C> {
    fn boxed() -> Box<Self> {
        Box::new(Self {
            dry_l: [0.0; C],
            dry_r: [0.0; C],
            early_l: [0.0; C],
            early_r: [0.0; C],
            late_in_l: [0.0; C],
            late_in_r: [0.0; C],
            late_l: [0.0; C],
            late_r: [0.0; C],
        })
    }
}

/// Stereo hall reverb built from an early-reflection and a late FDN engine.
///
/// The engines are generic so the orchestration can run against any
/// [`EarlyEngine`] / [`LateEngine`] pair; `CHUNK` is the largest slice the
/// engines ever see.
///
/// # Example
///
/// ```rust
/// use hallverb_effects::{HallParam, HallReverb};
///
/// let mut hall = HallReverb::new(48000.0);
/// hall.set_late_decay(2.2);
/// hall.set_param(HallParam::LateRoomSize, 1.8);
///
/// let input = vec![0.25; 1000];
/// let mut left = vec![0.0; 1000];
/// let mut right = vec![0.0; 1000];
/// hall.process(&input, &input, &mut left, &mut right);
///
/// assert!((left[0] - 0.2).abs() < 1e-6, "dry level 0.8 × 0.25 before any reflection");
/// ```
pub struct HallReverb<E = EarlyReflections, L = LateReverb, const CHUNK: usize = MAX_CHUNK> {
    early: E,
    late: L,
    values: [f32; HallParam::COUNT],
    dirty: DeferredFlags,
    scratch: Box<Scratch<CHUNK>>,
    sample_rate: f32,
}

impl HallReverb {
    /// Creates a hall reverb with the built-in engines and default parameters.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_engines(
            EarlyReflections::new(sample_rate),
            LateReverb::new(sample_rate),
            sample_rate,
        )
    }
}

impl<E: EarlyEngine, L: LateEngine, const CHUNK: usize> HallReverb<E, L, CHUNK> {
    /// Wraps the given engines.
    ///
    /// Both engines get `sample_rate`, immediate parameters are pushed with
    /// their defaults and the deferred ones are marked dirty, so the first
    /// processing call configures room sizes and predelay.
    pub fn with_engines(early: E, late: L, sample_rate: f32) -> Self {
        assert!(CHUNK > 0, "chunk size must be non-zero");

        let mut hall = Self {
            early,
            late,
            values: HallParam::ALL.map(HallParam::default_value),
            dirty: DeferredFlags::ALL_DIRTY,
            scratch: Scratch::boxed(),
            sample_rate,
        };
        hall.configure_engines();
        hall
    }

    /// Early-reflection engine.
    pub fn early(&self) -> &E {
        &self.early
    }

    /// Late reverb engine.
    pub fn late(&self) -> &L {
        &self.late
    }

    /// Current sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Largest slice handed to the engines per call.
    pub const fn chunk_size(&self) -> usize {
        CHUNK
    }

    /// Changes the sample rate of both engines and re-pushes every parameter.
    ///
    /// Deferred parameters are marked dirty again and take effect on the next
    /// processing call.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        #[cfg(feature = "std")]
        tracing::info!(sample_rate, "hall reverb sample rate changed");

        self.sample_rate = sample_rate;
        self.dirty = DeferredFlags::ALL_DIRTY;
        self.configure_engines();
    }

    fn configure_engines(&mut self) {
        self.early.set_sample_rate(self.sample_rate);
        self.late.set_sample_rate(self.sample_rate);
        for param in HallParam::ALL {
            if !param.is_deferred() {
                self.push(param);
            }
        }
    }

    /// Clears engine state to silence. Parameters and dirty flags are kept.
    pub fn mute(&mut self) {
        self.early.mute();
        self.late.mute();
    }

    /// `true` if a deferred parameter is waiting for the next processing call.
    pub fn has_pending_reconfiguration(&self) -> bool {
        self.dirty.early_room || self.dirty.late_room || self.dirty.predelay
    }

    fn apply_deferred(&mut self) {
        if self.dirty.early_room {
            self.dirty.early_room = false;
            self.early
                .set_room_size(self.values[HallParam::EarlyRoomSize.index()]);
        }
        if self.dirty.late_room {
            self.dirty.late_room = false;
            self.late
                .set_room_size(self.values[HallParam::LateRoomSize.index()]);
        }
        if self.dirty.predelay {
            self.dirty.predelay = false;
            self.late
                .set_predelay_ms(self.values[HallParam::LatePredelay.index()]);
        }
    }

    /// Processes one stereo block from separate input and output buffers.
    ///
    /// # Panics
    ///
    /// Panics if the four buffers differ in length.
    pub fn process(&mut self, in_l: &[f32], in_r: &[f32], out_l: &mut [f32], out_r: &mut [f32]) {
        let len = in_l.len();
        assert!(
            in_r.len() == len && out_l.len() == len && out_r.len() == len,
            "stereo buffers must share one length"
        );

        self.process_chunked(Some((in_l, in_r)), out_l, out_r);
    }

    /// Processes one stereo block whose input and output share storage.
    ///
    /// # Panics
    ///
    /// Panics if `left` and `right` differ in length.
    pub fn process_in_place(&mut self, left: &mut [f32], right: &mut [f32]) {
        let len = left.len();
        assert_eq!(right.len(), len, "stereo buffers must share one length");

        self.process_chunked(None, left, right);
    }

    /// Gate, then walk the block in `CHUNK`-sized pieces.
    ///
    /// With no separate input the dry signal is read from the output
    /// buffers, copied to scratch before that chunk is overwritten.
    fn process_chunked(
        &mut self,
        input: Option<(&[f32], &[f32])>,
        out_l: &mut [f32],
        out_r: &mut [f32],
    ) {
        self.apply_deferred();

        let len = out_l.len();
        let mut offset = 0;
        while offset < len {
            let n = CHUNK.min(len - offset);
            let range = offset..offset + n;
            let (dry_l, dry_r) = match input {
                Some((in_l, in_r)) => (&in_l[range.clone()], &in_r[range.clone()]),
                None => (&out_l[range.clone()], &out_r[range.clone()]),
            };
            self.scratch.dry_l[..n].copy_from_slice(dry_l);
            self.scratch.dry_r[..n].copy_from_slice(dry_r);
            self.render_chunk(n);
            self.mix_chunk(n, &mut out_l[range.clone()], &mut out_r[range]);
            offset += n;
        }
    }

    /// Processes a host block described by channel slices.
    ///
    /// Mono input is duplicated to both sides.
    ///
    /// # Panics
    ///
    /// Panics on any layout other than 1-in/2-out or 2-in/2-out.
    pub fn process_channels(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]]) {
        let layout = ChannelLayout::from_counts(inputs.len(), outputs.len());
        let [out_l, out_r] = outputs else {
            panic!(
                "unsupported channel layout: {} in, {} out",
                inputs.len(),
                outputs.len()
            );
        };
        match (layout, inputs) {
            (Some(ChannelLayout::MonoToStereo), [mono]) => self.process(mono, mono, out_l, out_r),
            (Some(ChannelLayout::Stereo), [left, right]) => self.process(left, right, out_l, out_r),
            _ => panic!(
                "unsupported channel layout: {} in, 2 out",
                inputs.len()
            ),
        }
    }

    fn render_chunk(&mut self, n: usize) {
        let s = &mut *self.scratch;
        self.early
            .process_replace(&s.dry_l[..n], &s.dry_r[..n], &mut s.early_l[..n], &mut s.early_r[..n]);

        let send = self.values[HallParam::EarlySendLevel.index()];
        for i in 0..n {
            s.late_in_l[i] = send * s.early_l[i] + s.dry_l[i];
            s.late_in_r[i] = send * s.early_r[i] + s.dry_r[i];
        }

        self.late.process_replace(
            &s.late_in_l[..n],
            &s.late_in_r[..n],
            &mut s.late_l[..n],
            &mut s.late_r[..n],
        );
    }

    fn mix_chunk(&self, n: usize, out_l: &mut [f32], out_r: &mut [f32]) {
        let s = &*self.scratch;
        let dry = self.values[HallParam::DryLevel.index()];
        let early = self.values[HallParam::EarlyLevel.index()];
        let late = self.values[HallParam::LateLevel.index()];

        for i in 0..n {
            out_l[i] = dry * s.dry_l[i] + early * s.early_l[i] + late * s.late_l[i];
            out_r[i] = dry * s.dry_r[i] + early * s.early_r[i] + late * s.late_r[i];
        }
    }

    /// Stored value of a parameter.
    #[inline]
    pub fn param(&self, param: HallParam) -> f32 {
        self.values[param.index()]
    }

    /// Stores a parameter and routes it: deferred parameters raise their
    /// dirty flag, all others reach the engine immediately. No clamping.
    pub fn set_param(&mut self, param: HallParam, value: f32) {
        match param {
            HallParam::DryLevel => self.set_dry_level(value),
            HallParam::EarlyLevel => self.set_early_level(value),
            HallParam::EarlySendLevel => self.set_early_send_level(value),
            HallParam::LateLevel => self.set_late_level(value),
            HallParam::EarlyOutputHpf => self.set_early_output_hpf(value),
            HallParam::EarlyOutputLpf => self.set_early_output_lpf(value),
            HallParam::EarlyRoomSize => self.set_early_room_size(value),
            HallParam::EarlyStereoWidth => self.set_early_stereo_width(value),
            HallParam::LateApFeedback => self.set_late_ap_feedback(value),
            HallParam::LateCrossoverHigh => self.set_late_crossover_high(value),
            HallParam::LateCrossoverLow => self.set_late_crossover_low(value),
            HallParam::LateDecay => self.set_late_decay(value),
            HallParam::LateDecayFactorHigh => self.set_late_decay_factor_high(value),
            HallParam::LateDecayFactorLow => self.set_late_decay_factor_low(value),
            HallParam::LateDiffusion => self.set_late_diffusion(value),
            HallParam::LateLfo1Freq => self.set_late_lfo1_freq(value),
            HallParam::LateLfo2Freq => self.set_late_lfo2_freq(value),
            HallParam::LateLfoFactor => self.set_late_lfo_factor(value),
            HallParam::LateOutputHpf => self.set_late_output_hpf(value),
            HallParam::LateOutputLpf => self.set_late_output_lpf(value),
            HallParam::LatePredelay => self.set_late_predelay(value),
            HallParam::LateRoomSize => self.set_late_room_size(value),
            HallParam::LateSpin => self.set_late_spin(value),
            HallParam::LateSpinFactor => self.set_late_spin_factor(value),
            HallParam::LateStereoWidth => self.set_late_stereo_width(value),
            HallParam::LateWander => self.set_late_wander(value),
        }
    }

    /// Forwards pending changes from a [`SharedParams`] store.
    ///
    /// Call from the audio thread before [`process`](Self::process).
    pub fn apply_shared(&mut self, shared: &SharedParams) {
        for param in HallParam::ALL {
            if let Some(value) = shared.take(param) {
                self.set_param(param, value);
            }
        }
    }

    /// Pushes the stored value of an immediate parameter to its engine.
    fn push(&mut self, param: HallParam) {
        let v = self.values[param.index()];
        match param {
            HallParam::DryLevel
            | HallParam::EarlyLevel
            | HallParam::EarlySendLevel
            | HallParam::LateLevel
            | HallParam::EarlyRoomSize
            | HallParam::LateRoomSize
            | HallParam::LatePredelay => {}
            HallParam::EarlyOutputHpf => self.early.set_output_hpf(v),
            HallParam::EarlyOutputLpf => self.early.set_output_lpf(v),
            HallParam::EarlyStereoWidth => self.early.set_stereo_width(v),
            HallParam::LateApFeedback => self.late.set_ap_feedback(v),
            HallParam::LateCrossoverHigh => self.late.set_crossover_high(v),
            HallParam::LateCrossoverLow => self.late.set_crossover_low(v),
            HallParam::LateDecay => self.late.set_decay(v),
            HallParam::LateDecayFactorHigh => self.late.set_decay_factor_high(v),
            HallParam::LateDecayFactorLow => self.late.set_decay_factor_low(v),
            HallParam::LateDiffusion => self.late.set_diffusion(v),
            HallParam::LateLfo1Freq => self.late.set_lfo1_freq(v),
            HallParam::LateLfo2Freq => self.late.set_lfo2_freq(v),
            HallParam::LateLfoFactor => self.late.set_lfo_factor(v),
            HallParam::LateOutputHpf => self.late.set_output_hpf(v),
            HallParam::LateOutputLpf => self.late.set_output_lpf(v),
            HallParam::LateSpin => self.late.set_spin(v),
            HallParam::LateSpinFactor => self.late.set_spin_factor(v),
            HallParam::LateStereoWidth => self.late.set_stereo_width(v),
            HallParam::LateWander => self.late.set_wander_ms(v),
        }
    }

    #[inline]
    fn store_and_push(&mut self, param: HallParam, value: f32) {
        self.values[param.index()] = value;
        self.push(param);
    }

    /// Gain of the dry signal in the output.
    pub fn set_dry_level(&mut self, level: f32) {
        self.values[HallParam::DryLevel.index()] = level;
    }

    /// Gain of the early reflections in the output.
    pub fn set_early_level(&mut self, level: f32) {
        self.values[HallParam::EarlyLevel.index()] = level;
    }

    /// Gain of the early reflections fed into the late engine.
    pub fn set_early_send_level(&mut self, level: f32) {
        self.values[HallParam::EarlySendLevel.index()] = level;
    }

    /// Gain of the late reverb in the output.
    pub fn set_late_level(&mut self, level: f32) {
        self.values[HallParam::LateLevel.index()] = level;
    }

    /// Early output highpass cutoff in Hz.
    pub fn set_early_output_hpf(&mut self, hz: f32) {
        self.store_and_push(HallParam::EarlyOutputHpf, hz);
    }

    /// Early output lowpass cutoff in Hz.
    pub fn set_early_output_lpf(&mut self, hz: f32) {
        self.store_and_push(HallParam::EarlyOutputLpf, hz);
    }

    /// Deferred until the next processing call.
    pub fn set_early_room_size(&mut self, factor: f32) {
        self.values[HallParam::EarlyRoomSize.index()] = factor;
        self.dirty.early_room = true;
    }

    /// Early stereo width, -1 to 1.
    pub fn set_early_stereo_width(&mut self, width: f32) {
        self.store_and_push(HallParam::EarlyStereoWidth, width);
    }

    /// Coefficient of the allpass inside each late line.
    pub fn set_late_ap_feedback(&mut self, feedback: f32) {
        self.store_and_push(HallParam::LateApFeedback, feedback);
    }

    /// Upper decay crossover in Hz.
    pub fn set_late_crossover_high(&mut self, hz: f32) {
        self.store_and_push(HallParam::LateCrossoverHigh, hz);
    }

    /// Lower decay crossover in Hz.
    pub fn set_late_crossover_low(&mut self, hz: f32) {
        self.store_and_push(HallParam::LateCrossoverLow, hz);
    }

    /// Mid-band RT60 in seconds.
    pub fn set_late_decay(&mut self, rt60_secs: f32) {
        self.store_and_push(HallParam::LateDecay, rt60_secs);
    }

    /// RT60 multiplier above the upper crossover.
    pub fn set_late_decay_factor_high(&mut self, factor: f32) {
        self.store_and_push(HallParam::LateDecayFactorHigh, factor);
    }

    /// RT60 multiplier below the lower crossover.
    pub fn set_late_decay_factor_low(&mut self, factor: f32) {
        self.store_and_push(HallParam::LateDecayFactorLow, factor);
    }

    /// Late input diffuser coefficient.
    pub fn set_late_diffusion(&mut self, diffusion: f32) {
        self.store_and_push(HallParam::LateDiffusion, diffusion);
    }

    /// First modulation LFO rate in Hz.
    pub fn set_late_lfo1_freq(&mut self, hz: f32) {
        self.store_and_push(HallParam::LateLfo1Freq, hz);
    }

    /// Second modulation LFO rate in Hz.
    pub fn set_late_lfo2_freq(&mut self, hz: f32) {
        self.store_and_push(HallParam::LateLfo2Freq, hz);
    }

    /// Modulation depth, 0 to 1.
    pub fn set_late_lfo_factor(&mut self, factor: f32) {
        self.store_and_push(HallParam::LateLfoFactor, factor);
    }

    /// Late output highpass cutoff in Hz.
    pub fn set_late_output_hpf(&mut self, hz: f32) {
        self.store_and_push(HallParam::LateOutputHpf, hz);
    }

    /// Late output lowpass cutoff in Hz.
    pub fn set_late_output_lpf(&mut self, hz: f32) {
        self.store_and_push(HallParam::LateOutputLpf, hz);
    }

    /// Predelay in milliseconds. Deferred until the next processing call.
    pub fn set_late_predelay(&mut self, ms: f32) {
        self.values[HallParam::LatePredelay.index()] = ms;
        self.dirty.predelay = true;
    }

    /// Deferred until the next processing call.
    pub fn set_late_room_size(&mut self, factor: f32) {
        self.values[HallParam::LateRoomSize.index()] = factor;
        self.dirty.late_room = true;
    }

    /// Spin LFO rate in Hz.
    pub fn set_late_spin(&mut self, hz: f32) {
        self.store_and_push(HallParam::LateSpin, hz);
    }

    /// Blend of the spin tap, 0 to 1.
    pub fn set_late_spin_factor(&mut self, factor: f32) {
        self.store_and_push(HallParam::LateSpinFactor, factor);
    }

    /// Late stereo width, -1 to 1.
    pub fn set_late_stereo_width(&mut self, width: f32) {
        self.store_and_push(HallParam::LateStereoWidth, width);
    }

    /// Spin tap wander in milliseconds.
    pub fn set_late_wander(&mut self, ms: f32) {
        self.store_and_push(HallParam::LateWander, ms);
    }
}

impl<E: EarlyEngine, L: LateEngine, const CHUNK: usize> ParameterInfo for HallReverb<E, L, CHUNK> {
    fn param_count(&self) -> usize {
        HallParam::COUNT
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        HallParam::from_index(index).map(HallParam::descriptor)
    }

    fn get_param(&self, index: usize) -> f32 {
        HallParam::from_index(index).map_or(0.0, |p| self.param(p))
    }

    fn set_param(&mut self, index: usize, value: f32) {
        if let Some(param) = HallParam::from_index(index) {
            Self::set_param(self, param, value);
        }
    }
}

impl<E: core::fmt::Debug, L: core::fmt::Debug, const CHUNK: usize> core::fmt::Debug
    for HallReverb<E, L, CHUNK>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HallReverb")
            .field("early", &self.early)
            .field("late", &self.late)
            .field("values", &self.values)
            .field("dirty", &self.dirty)
            .field("sample_rate", &self.sample_rate)
            .finish_non_exhaustive()
    }
}
