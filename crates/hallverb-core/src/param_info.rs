//! Parameter introspection for hosts, presets and command-line tooling.
//!
//! [`ParameterInfo`] lets a processor describe its parameters at runtime so
//! that preset files, CLI listings and host automation can be generated from
//! one table instead of being hand-maintained in each front end.
//!
//! # Example
//!
//! ```rust
//! use hallverb_core::{ParameterInfo, ParamDescriptor, ParamId};
//!
//! struct Trim {
//!     level: f32,
//! }
//!
//! impl ParameterInfo for Trim {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::level("Level", "Level", 0.8)
//!                 .with_id(ParamId(10), "trim_level")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         if index == 0 { self.level } else { 0.0 }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if index == 0 { self.level = value; }
//!     }
//! }
//!
//! let trim = Trim { level: 0.8 };
//! assert_eq!(trim.find_param_by_name("level"), Some(0));
//! ```
//!
//! This module is `no_std` compatible and never allocates.

/// Mapping between a plain value and normalized `[0.0, 1.0]`.
///
/// - **Linear**: `(value - min) / (max - min)`
/// - **Logarithmic**: `ln(value / min) / ln(max / min)`, requires `min > 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamScale {
    /// Equal resolution across the range.
    #[default]
    Linear,
    /// More resolution at low values.
    Logarithmic,
}

/// Stable parameter identifier.
///
/// Once assigned, an id never changes for a given parameter. Automation
/// data and saved sessions refer to parameters by this number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(pub u32);

/// Parameter capability flags.
///
/// ```rust
/// use hallverb_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::DEFERRED);
/// assert!(flags.contains(ParamFlags::DEFERRED));
/// assert!(!flags.contains(ParamFlags::READ_ONLY));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Host can automate this parameter.
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter has discrete steps.
    pub const STEPPED: Self = Self(1 << 1);
    /// Parameter is display only.
    pub const READ_ONLY: Self = Self(1 << 2);
    /// New values are latched and applied at the start of the next block.
    pub const DEFERRED: Self = Self(1 << 3);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Runtime parameter discovery.
///
/// Indices are zero-based and stable for the lifetime of the processor.
/// Implementations decide whether [`set_param`](Self::set_param) clamps;
/// callers that need range enforcement use [`ParamDescriptor::clamp`].
pub trait ParameterInfo {
    /// Number of parameters. Valid indices are `0..param_count()`.
    fn param_count(&self) -> usize;

    /// Descriptor for `index`, or `None` when out of range.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current value of `index`. Out-of-range indices return `0.0`.
    fn get_param(&self, index: usize) -> f32;

    /// Sets the value of `index`. Out-of-range indices are ignored.
    fn set_param(&mut self, index: usize, value: f32);

    /// Finds a parameter by display name, short name or string id
    /// (ASCII case-insensitive).
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|desc| {
                desc.name.eq_ignore_ascii_case(name)
                    || desc.short_name.eq_ignore_ascii_case(name)
                    || desc.string_id.eq_ignore_ascii_case(name)
            })
        })
    }

    /// Stable id of `index`.
    fn param_id(&self, index: usize) -> Option<ParamId> {
        self.param_info(index).map(|d| d.id)
    }

    /// Finds a parameter index by its stable id. O(n), not for the audio path.
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }
}

/// Metadata for a single parameter.
///
/// ```rust
/// use hallverb_core::{ParamDescriptor, ParamId, ParamUnit};
///
/// let predelay = ParamDescriptor::time_ms("Late Predelay", "Predelay", 0.0, 200.0, 8.0)
///     .with_id(ParamId(1513), "late_predelay");
/// assert_eq!(predelay.unit, ParamUnit::Milliseconds);
/// assert_eq!(predelay.clamp(500.0), 200.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full display name.
    pub name: &'static str,
    /// Short name for narrow displays, 8 characters or fewer.
    pub short_name: &'static str,
    /// Unit used for formatting.
    pub unit: ParamUnit,
    /// Lowest accepted value.
    pub min: f32,
    /// Highest accepted value.
    pub max: f32,
    /// Value at construction.
    pub default: f32,
    /// Recommended increment.
    pub step: f32,
    /// Stable numeric id. `ParamId(0)` means unassigned.
    pub id: ParamId,
    /// Stable textual id used in preset files.
    pub string_id: &'static str,
    /// Normalization curve.
    pub scale: ParamScale,
    /// Capability flags.
    pub flags: ParamFlags,
    /// Group name for tree displays. Empty means top level.
    pub group: &'static str,
}

impl ParamDescriptor {
    /// Generic descriptor over `[min, max]`.
    pub const fn range(
        name: &'static str,
        short_name: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
        step: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit,
            min,
            max,
            default,
            step,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE,
            group: "",
        }
    }

    /// Linear gain in `[0, 1]` with 0.01 steps.
    pub const fn level(name: &'static str, short_name: &'static str, default: f32) -> Self {
        Self::range(name, short_name, ParamUnit::None, 0.0, 1.0, default, 0.01)
    }

    /// Frequency in Hz over `[0, 16000]` with 1 Hz steps.
    pub const fn frequency(name: &'static str, short_name: &'static str, default: f32) -> Self {
        Self::range(name, short_name, ParamUnit::Hertz, 0.0, 16000.0, default, 1.0)
    }

    /// Time in milliseconds.
    pub const fn time_ms(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::range(name, short_name, ParamUnit::Milliseconds, min, max, default, 0.1)
    }

    /// Sets the stable numeric and textual ids.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Sets the recommended step.
    pub const fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Sets the normalization scale.
    pub const fn with_scale(mut self, scale: ParamScale) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the capability flags.
    pub const fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the group name.
    pub const fn with_group(mut self, group: &'static str) -> Self {
        self.group = group;
        self
    }

    /// Returns `true` if `value` lies within `[min, max]`.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Clamps `value` to `[min, max]`.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Converts a plain value to `[0.0, 1.0]`.
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        match self.scale {
            ParamScale::Linear => (value - self.min) / range,
            ParamScale::Logarithmic => {
                if self.min <= 0.0 || value <= 0.0 {
                    return 0.0;
                }
                libm::logf(value / self.min) / libm::logf(self.max / self.min)
            }
        }
    }

    /// Converts a normalized value back to the plain range.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        match self.scale {
            ParamScale::Linear => self.min + normalized * (self.max - self.min),
            ParamScale::Logarithmic => {
                if self.min <= 0.0 {
                    return self.min;
                }
                self.min * libm::powf(self.max / self.min, normalized)
            }
        }
    }
}

/// Display unit of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Hertz.
    Hertz,
    /// Milliseconds.
    Milliseconds,
    /// Seconds.
    Seconds,
    /// Dimensionless.
    None,
}

impl ParamUnit {
    /// Suffix appended to formatted values.
    ///
    /// ```rust
    /// use hallverb_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Hertz.suffix(), " Hz");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Hertz => " Hz",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Seconds => " s",
            ParamUnit::None => "",
        }
    }
}
