//! Enum-keyed parameter table for the hall reverb.
//!
//! Every user-facing control is a [`HallParam`] variant. The variant carries
//! its stable index, [`ParamId`], preset key, host key and descriptor, so
//! dispatch is an exhaustive `match` instead of a chain of string compares.
//!
//! Ids are `1500 + index` and never change.

use core::fmt;
use core::str::FromStr;

use hallverb_core::{ParamDescriptor, ParamFlags, ParamId, ParamScale, ParamUnit};

const BASE_ID: u32 = 1500;

/// One controllable parameter of [`HallReverb`](crate::HallReverb).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HallParam {
    /// Gain of the unprocessed input in the output mix.
    DryLevel,
    /// Gain of the early reflections in the output mix.
    EarlyLevel,
    /// Amount of early reflections fed into the late stage.
    EarlySendLevel,
    /// Gain of the late reverb in the output mix.
    LateLevel,
    /// Early output highpass cutoff (Hz).
    EarlyOutputHpf,
    /// Early output lowpass cutoff (Hz).
    EarlyOutputLpf,
    /// Early reflection room size factor. Deferred.
    EarlyRoomSize,
    /// Early reflection stereo width.
    EarlyStereoWidth,
    /// Feedback of the allpass in each late delay line.
    LateApFeedback,
    /// Upper crossover of the late decay filter (Hz).
    LateCrossoverHigh,
    /// Lower crossover of the late decay filter (Hz).
    LateCrossoverLow,
    /// Late mid-band RT60 (s).
    LateDecay,
    /// RT60 multiplier above the upper crossover.
    LateDecayFactorHigh,
    /// RT60 multiplier below the lower crossover.
    LateDecayFactorLow,
    /// Input diffusion coefficient.
    LateDiffusion,
    /// Delay modulation LFO 1 rate (Hz).
    LateLfo1Freq,
    /// Delay modulation LFO 2 rate (Hz).
    LateLfo2Freq,
    /// Delay modulation depth.
    LateLfoFactor,
    /// Late output highpass cutoff (Hz).
    LateOutputHpf,
    /// Late output lowpass cutoff (Hz).
    LateOutputLpf,
    /// Gap before the late reverb starts (ms). Deferred.
    LatePredelay,
    /// Late reverb room size factor. Deferred.
    LateRoomSize,
    /// Output spin rate (Hz).
    LateSpin,
    /// Blend of the spin tap into the late output.
    LateSpinFactor,
    /// Late reverb stereo width.
    LateStereoWidth,
    /// Spin tap wander (ms).
    LateWander,
}

/// Error returned when a string names no [`HallParam`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownParam;

impl fmt::Display for UnknownParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown hall reverb parameter")
    }
}

impl HallParam {
    /// Number of parameters.
    pub const COUNT: usize = 26;

    /// All parameters in index order.
    pub const ALL: [HallParam; Self::COUNT] = [
        Self::DryLevel,
        Self::EarlyLevel,
        Self::EarlySendLevel,
        Self::LateLevel,
        Self::EarlyOutputHpf,
        Self::EarlyOutputLpf,
        Self::EarlyRoomSize,
        Self::EarlyStereoWidth,
        Self::LateApFeedback,
        Self::LateCrossoverHigh,
        Self::LateCrossoverLow,
        Self::LateDecay,
        Self::LateDecayFactorHigh,
        Self::LateDecayFactorLow,
        Self::LateDiffusion,
        Self::LateLfo1Freq,
        Self::LateLfo2Freq,
        Self::LateLfoFactor,
        Self::LateOutputHpf,
        Self::LateOutputLpf,
        Self::LatePredelay,
        Self::LateRoomSize,
        Self::LateSpin,
        Self::LateSpinFactor,
        Self::LateStereoWidth,
        Self::LateWander,
    ];

    /// Stable zero-based index.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parameter at `index`, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Stable numeric id.
    pub const fn id(self) -> ParamId {
        ParamId(BASE_ID + self as u32)
    }

    /// `true` for parameters applied only at the start of a processing call.
    pub const fn is_deferred(self) -> bool {
        matches!(
            self,
            Self::EarlyRoomSize | Self::LateRoomSize | Self::LatePredelay
        )
    }

    /// Snake-case key used in preset files.
    pub const fn key(self) -> &'static str {
        match self {
            Self::DryLevel => "dry_level",
            Self::EarlyLevel => "early_level",
            Self::EarlySendLevel => "early_send_level",
            Self::LateLevel => "late_level",
            Self::EarlyOutputHpf => "early_output_hpf",
            Self::EarlyOutputLpf => "early_output_lpf",
            Self::EarlyRoomSize => "early_room_size",
            Self::EarlyStereoWidth => "early_stereo_width",
            Self::LateApFeedback => "late_ap_feedback",
            Self::LateCrossoverHigh => "late_crossover_high",
            Self::LateCrossoverLow => "late_crossover_low",
            Self::LateDecay => "late_decay",
            Self::LateDecayFactorHigh => "late_decay_factor_high",
            Self::LateDecayFactorLow => "late_decay_factor_low",
            Self::LateDiffusion => "late_diffusion",
            Self::LateLfo1Freq => "late_lfo1_freq",
            Self::LateLfo2Freq => "late_lfo2_freq",
            Self::LateLfoFactor => "late_lfo_factor",
            Self::LateOutputHpf => "late_output_hpf",
            Self::LateOutputLpf => "late_output_lpf",
            Self::LatePredelay => "late_predelay",
            Self::LateRoomSize => "late_room_size",
            Self::LateSpin => "late_spin",
            Self::LateSpinFactor => "late_spin_factor",
            Self::LateStereoWidth => "late_stereo_width",
            Self::LateWander => "late_wander",
        }
    }

    /// camelCase key used by plugin hosts and saved sessions.
    pub const fn host_key(self) -> &'static str {
        match self {
            Self::DryLevel => "dryLevel",
            Self::EarlyLevel => "earlyLevel",
            Self::EarlySendLevel => "earlySendLevel",
            Self::LateLevel => "lateLevel",
            Self::EarlyOutputHpf => "earlyOutputHPF",
            Self::EarlyOutputLpf => "earlyOutputLPF",
            Self::EarlyRoomSize => "earlyRoomSize",
            Self::EarlyStereoWidth => "earlyStereoWidth",
            Self::LateApFeedback => "lateApFeedback",
            Self::LateCrossoverHigh => "lateCrossOverFreqHigh",
            Self::LateCrossoverLow => "lateCrossOverFreqLow",
            Self::LateDecay => "lateDecay",
            Self::LateDecayFactorHigh => "lateDecayFactorHigh",
            Self::LateDecayFactorLow => "lateDecayFactorLow",
            Self::LateDiffusion => "lateDiffusion",
            Self::LateLfo1Freq => "lateLFO1Freq",
            Self::LateLfo2Freq => "lateLFO2Freq",
            Self::LateLfoFactor => "lateLFOFactor",
            Self::LateOutputHpf => "lateOutputHPF",
            Self::LateOutputLpf => "lateOutputLPF",
            Self::LatePredelay => "latePredelay",
            Self::LateRoomSize => "lateRoomSize",
            Self::LateSpin => "lateSpin",
            Self::LateSpinFactor => "lateSpinFactor",
            Self::LateStereoWidth => "lateStereoWidth",
            Self::LateWander => "lateWander",
        }
    }

    /// Value at construction.
    pub fn default_value(self) -> f32 {
        self.descriptor().default
    }

    /// Full descriptor: range, step, unit, default and ids.
    pub fn descriptor(self) -> ParamDescriptor {
        let desc = match self {
            Self::DryLevel => ParamDescriptor::level("Dry Level", "Dry", 0.8),
            Self::EarlyLevel => ParamDescriptor::level("Early Level", "Early", 0.1),
            Self::EarlySendLevel => ParamDescriptor::level("Early Send Level", "E.Send", 0.2),
            Self::LateLevel => ParamDescriptor::level("Late Level", "Late", 0.2),
            Self::EarlyOutputHpf => {
                ParamDescriptor::frequency("Early Output HPF", "E.HPF", 4.0).with_group("early")
            }
            Self::EarlyOutputLpf => {
                ParamDescriptor::frequency("Early Output LPF", "E.LPF", 16000.0).with_group("early")
            }
            Self::EarlyRoomSize => room_size("Early Room Size", "E.Room").with_group("early"),
            Self::EarlyStereoWidth => bipolar("Early Stereo Width", "E.Width", 1.0).with_group("early"),
            Self::LateApFeedback => bipolar("Late AP Feedback", "L.APFb", 0.63).with_group("late"),
            Self::LateCrossoverHigh => {
                ParamDescriptor::frequency("Late Crossover High", "L.XHigh", 3600.0).with_group("late")
            }
            Self::LateCrossoverLow => {
                ParamDescriptor::frequency("Late Crossover Low", "L.XLow", 500.0).with_group("late")
            }
            Self::LateDecay => ParamDescriptor::range(
                "Late Decay",
                "L.Decay",
                ParamUnit::Seconds,
                0.1,
                30.0,
                0.4,
                0.01,
            )
            .with_scale(ParamScale::Logarithmic)
            .with_group("late"),
            Self::LateDecayFactorHigh => {
                decay_factor("Late Decay Factor High", "L.DfHigh", 0.3).with_group("late")
            }
            Self::LateDecayFactorLow => {
                decay_factor("Late Decay Factor Low", "L.DfLow", 1.3).with_group("late")
            }
            Self::LateDiffusion => bipolar("Late Diffusion", "L.Diff", 0.82).with_group("late"),
            Self::LateLfo1Freq => lfo_rate("Late LFO1 Freq", "L.LFO1", 0.9).with_group("late"),
            Self::LateLfo2Freq => lfo_rate("Late LFO2 Freq", "L.LFO2", 1.3).with_group("late"),
            Self::LateLfoFactor => {
                ParamDescriptor::level("Late LFO Factor", "L.LFOAmt", 0.31).with_group("late")
            }
            Self::LateOutputHpf => {
                ParamDescriptor::frequency("Late Output HPF", "L.HPF", 4.0).with_group("late")
            }
            Self::LateOutputLpf => {
                ParamDescriptor::frequency("Late Output LPF", "L.LPF", 16000.0).with_group("late")
            }
            Self::LatePredelay => {
                ParamDescriptor::time_ms("Late Predelay", "L.PreDly", 0.0, 200.0, 8.0)
                    .with_group("late")
            }
            Self::LateRoomSize => room_size("Late Room Size", "L.Room").with_group("late"),
            Self::LateSpin => {
                ParamDescriptor::range("Late Spin", "L.Spin", ParamUnit::Hertz, 0.0, 50.0, 2.4, 0.1)
                    .with_group("late")
            }
            Self::LateSpinFactor => {
                ParamDescriptor::level("Late Spin Factor", "L.SpinAm", 0.3).with_group("late")
            }
            Self::LateStereoWidth => bipolar("Late Stereo Width", "L.Width", 1.0).with_group("late"),
            Self::LateWander => {
                ParamDescriptor::time_ms("Late Wander", "L.Wander", 0.0, 100.0, 22.0)
                    .with_step(1.0)
                    .with_group("late")
            }
        };

        let desc = desc.with_id(self.id(), self.key());
        if self.is_deferred() {
            desc.with_flags(ParamFlags::AUTOMATABLE.union(ParamFlags::DEFERRED))
        } else {
            desc
        }
    }
}

fn room_size(name: &'static str, short: &'static str) -> ParamDescriptor {
    ParamDescriptor::range(name, short, ParamUnit::None, 0.4, 3.6, 0.5, 0.1)
}

fn bipolar(name: &'static str, short: &'static str, default: f32) -> ParamDescriptor {
    ParamDescriptor::range(name, short, ParamUnit::None, -1.0, 1.0, default, 0.01)
}

fn decay_factor(name: &'static str, short: &'static str, default: f32) -> ParamDescriptor {
    ParamDescriptor::range(name, short, ParamUnit::None, 0.1, 5.0, default, 0.1)
}

fn lfo_rate(name: &'static str, short: &'static str, default: f32) -> ParamDescriptor {
    ParamDescriptor::range(name, short, ParamUnit::Hertz, 0.0, 5.0, default, 0.1)
}

impl fmt::Display for HallParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for HallParam {
    type Err = UnknownParam;

    /// Accepts the snake-case preset key or the camelCase host key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.key() == s || p.host_key() == s)
            .ok_or(UnknownParam)
    }
}
