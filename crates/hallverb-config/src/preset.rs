//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use hallverb_effects::{EarlyEngine, HallParam, HallReverb, LateEngine};

use crate::error::{ConfigError, Result};
use crate::factory_presets::get_factory_preset;
use crate::paths::find_preset;
use crate::validation::{clamp_param, resolve_param};

/// A named set of hall reverb parameter values.
///
/// Parameters missing from a preset keep whatever value the reverb already
/// has, so a preset may describe only the controls it cares about.
///
/// # TOML Format
///
/// ```toml
/// name = "Concert Hall"
/// description = "Large, warm hall"
/// sample_rate = 48000
///
/// [params]
/// late_decay = 2.8
/// late_room_size = 2.2
/// late_predelay = 24.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sample rate hint for generated signals such as impulse renders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,

    /// Parameter values keyed by parameter key.
    #[serde(default)]
    pub params: BTreeMap<String, f32>,
}

impl Preset {
    /// Create a new empty preset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: None,
            params: BTreeMap::new(),
        }
    }

    /// Create a preset holding every parameter's current value.
    pub fn capture<E: EarlyEngine, L: LateEngine, const C: usize>(
        name: impl Into<String>,
        hall: &HallReverb<E, L, C>,
    ) -> Self {
        let mut preset = Self::new(name);
        for param in HallParam::ALL {
            preset.set(param, hall.param(param));
        }
        preset
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate hint.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    /// Add a parameter value.
    pub fn with_param(mut self, param: HallParam, value: f32) -> Self {
        self.set(param, value);
        self
    }

    /// Set a parameter value.
    pub fn set(&mut self, param: HallParam, value: f32) {
        self.params.insert(param.key().to_string(), value);
    }

    /// Value stored for a parameter, if any.
    pub fn get(&self, param: HallParam) -> Option<f32> {
        self.params.get(param.key()).copied()
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let preset = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), name = %preset.name, "loaded preset");
        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Resolve a preset by factory name, file path or user preset name.
    pub fn resolve(name_or_path: &str) -> Result<Self> {
        if let Some(preset) = get_factory_preset(name_or_path) {
            return Ok(preset);
        }
        match find_preset(name_or_path) {
            Some(path) => Self::load(path),
            None => Err(ConfigError::PresetNotFound(name_or_path.to_string())),
        }
    }

    /// Save the preset to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Resolve every key and clamp every value into its host range.
    ///
    /// Fails on the first unknown key or non-finite value.
    pub fn validated(&self) -> Result<Vec<(HallParam, f32)>> {
        self.params
            .iter()
            .map(|(key, &value)| {
                let param = resolve_param(key)?;
                Ok((param, clamp_param(param, value)?))
            })
            .collect()
    }

    /// Validate the preset and set every listed parameter on `hall`.
    ///
    /// Nothing is applied if validation fails. Returns the number of
    /// parameters set.
    pub fn apply_to<E: EarlyEngine, L: LateEngine, const C: usize>(
        &self,
        hall: &mut HallReverb<E, L, C>,
    ) -> Result<usize> {
        let values = self.validated()?;
        for &(param, value) in &values {
            hall.set_param(param, value);
        }
        tracing::debug!(preset = %self.name, count = values.len(), "applied preset");
        Ok(values.len())
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
