//! Lock-free parameter store shared between a control thread and the audio thread.
//!
//! ```text
//! control thread ──► SharedParams::set(param, v)     value, then pending = true
//!                              │
//! audio thread   ◄── HallReverb::apply_shared(&p)    swap pending, forward value
//! ```
//!
//! Values are `f32` bit patterns in `AtomicU32`s. The audio side only swaps
//! flags and loads values: no locks, no allocation.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::HallParam;

/// One atomic slot per [`HallParam`], each with a pending-change flag.
#[derive(Debug)]
pub struct SharedParams {
    values: [AtomicU32; HallParam::COUNT],
    pending: [AtomicBool; HallParam::COUNT],
}

impl SharedParams {
    /// Creates a store holding every default, with nothing pending.
    pub fn new() -> Self {
        Self {
            values: core::array::from_fn(|i| {
                let default = HallParam::ALL[i].default_value();
                AtomicU32::new(default.to_bits())
            }),
            pending: core::array::from_fn(|_| AtomicBool::new(false)),
        }
    }

    /// Stores a value and marks it pending (control thread).
    #[inline]
    pub fn set(&self, param: HallParam, value: f32) {
        let i = param.index();
        self.values[i].store(value.to_bits(), Ordering::Release);
        self.pending[i].store(true, Ordering::Release);
    }

    /// Latest stored value.
    #[inline]
    pub fn get(&self, param: HallParam) -> f32 {
        f32::from_bits(self.values[param.index()].load(Ordering::Acquire))
    }

    /// Clears the pending flag and returns the value if a change was waiting.
    #[inline]
    pub fn take(&self, param: HallParam) -> Option<f32> {
        let i = param.index();
        if self.pending[i].swap(false, Ordering::AcqRel) {
            Some(f32::from_bits(self.values[i].load(Ordering::Acquire)))
        } else {
            None
        }
    }

    /// `true` if any parameter has an unapplied change.
    pub fn has_pending(&self) -> bool {
        self.pending.iter().any(|p| p.load(Ordering::Acquire))
    }
}

impl Default for SharedParams {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_defaults_and_nothing_pending() {
        let shared = SharedParams::new();
        for param in HallParam::ALL {
            assert_eq!(shared.get(param), param.default_value(), "{param}");
        }
        assert!(!shared.has_pending());
    }

    #[test]
    fn test_take_consumes_once() {
        let shared = SharedParams::new();
        shared.set(HallParam::LateDecay, 2.0);
        shared.set(HallParam::LateDecay, 3.5);

        assert!(shared.has_pending());
        assert_eq!(shared.take(HallParam::LateDecay), Some(3.5), "last write wins");
        assert_eq!(shared.take(HallParam::LateDecay), None);
        assert_eq!(shared.get(HallParam::LateDecay), 3.5);
        assert!(!shared.has_pending());
    }

    #[test]
    fn test_preserves_exact_bits() {
        let shared = SharedParams::new();
        shared.set(HallParam::DryLevel, -0.0);
        assert_eq!(shared.take(HallParam::DryLevel).map(f32::to_bits), Some((-0.0f32).to_bits()));
    }
}
