//! Engine adapter contracts consumed by [`HallReverb`](crate::HallReverb).
//!
//! The orchestration core only sequences these operations. It never
//! interprets their numeric meaning, which lets it be tested against
//! deterministic stand-in engines.
//!
//! Every setter except `set_room_size` and `set_predelay_ms` must be safe to
//! call between any two chunks. Those two may reshape delay memory and are
//! only called by the core at the start of a processing call.

use hallverb_core::StereoEngine;

/// Configuration surface of the early-reflection stage.
pub trait EarlyEngine: StereoEngine {
    /// Output highpass cutoff in Hz.
    fn set_output_hpf(&mut self, hz: f32);
    /// Output lowpass cutoff in Hz.
    fn set_output_lpf(&mut self, hz: f32);
    /// Room size factor scaling every reflection time.
    fn set_room_size(&mut self, factor: f32);
    /// Stereo width, -1 (swapped) through 0 (mono) to 1 (unchanged).
    fn set_stereo_width(&mut self, width: f32);
}

/// Configuration surface of the late FDN stage.
pub trait LateEngine: StereoEngine {
    /// Coefficient of the allpass inside each delay line.
    fn set_ap_feedback(&mut self, feedback: f32);
    /// Upper crossover of the decay filter in Hz.
    fn set_crossover_high(&mut self, hz: f32);
    /// Lower crossover of the decay filter in Hz.
    fn set_crossover_low(&mut self, hz: f32);
    /// Mid-band RT60 in seconds.
    fn set_decay(&mut self, rt60_secs: f32);
    /// RT60 multiplier above the upper crossover.
    fn set_decay_factor_high(&mut self, factor: f32);
    /// RT60 multiplier below the lower crossover.
    fn set_decay_factor_low(&mut self, factor: f32);
    /// Input diffuser coefficient.
    fn set_diffusion(&mut self, diffusion: f32);
    /// Rate of the first delay modulation LFO in Hz.
    fn set_lfo1_freq(&mut self, hz: f32);
    /// Rate of the second delay modulation LFO in Hz.
    fn set_lfo2_freq(&mut self, hz: f32);
    /// Delay modulation depth, 0 to 1.
    fn set_lfo_factor(&mut self, factor: f32);
    /// Output highpass cutoff in Hz.
    fn set_output_hpf(&mut self, hz: f32);
    /// Output lowpass cutoff in Hz.
    fn set_output_lpf(&mut self, hz: f32);
    /// Gap before the late reverb starts, in milliseconds.
    fn set_predelay_ms(&mut self, ms: f32);
    /// Room size factor scaling every delay line.
    fn set_room_size(&mut self, factor: f32);
    /// Spin LFO rate in Hz.
    fn set_spin(&mut self, hz: f32);
    /// Blend of the spin tap, 0 to 1.
    fn set_spin_factor(&mut self, factor: f32);
    /// Stereo width, -1 through 1.
    fn set_stereo_width(&mut self, width: f32);
    /// Spin tap wander in milliseconds.
    fn set_wander_ms(&mut self, ms: f32);
}
