//! Factory presets compiled into the library.

use crate::Preset;

/// Names of the factory presets, in display order.
pub static FACTORY_PRESET_NAMES: &[&str] = &["default", "small_hall", "concert_hall", "cathedral"];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("default", DEFAULT_PRESET),
    ("small_hall", SMALL_HALL_PRESET),
    ("concert_hall", CONCERT_HALL_PRESET),
    ("cathedral", CATHEDRAL_PRESET),
];

/// Every parameter at its default value.
const DEFAULT_PRESET: &str = r#"
name = "Default"
description = "Medium hall with every control at its default"

[params]
dry_level = 0.8
early_level = 0.1
early_send_level = 0.2
late_level = 0.2
early_output_hpf = 4.0
early_output_lpf = 16000.0
early_room_size = 0.5
early_stereo_width = 1.0
late_ap_feedback = 0.63
late_crossover_high = 3600.0
late_crossover_low = 500.0
late_decay = 0.4
late_decay_factor_high = 0.3
late_decay_factor_low = 1.3
late_diffusion = 0.82
late_lfo1_freq = 0.9
late_lfo2_freq = 1.3
late_lfo_factor = 0.31
late_output_hpf = 4.0
late_output_lpf = 16000.0
late_predelay = 8.0
late_room_size = 0.5
late_spin = 2.4
late_spin_factor = 0.3
late_stereo_width = 1.0
late_wander = 22.0
"#;

const SMALL_HALL_PRESET: &str = r#"
name = "Small Hall"
description = "Tight recital room with bright early reflections"

[params]
dry_level = 0.85
early_level = 0.25
early_send_level = 0.3
late_level = 0.18
early_room_size = 0.6
late_room_size = 0.7
late_decay = 1.1
late_decay_factor_high = 0.5
late_predelay = 6.0
late_diffusion = 0.75
late_output_lpf = 12000.0
"#;

const CONCERT_HALL_PRESET: &str = r#"
name = "Concert Hall"
description = "Large, warm hall"

[params]
dry_level = 0.75
early_level = 0.15
early_send_level = 0.25
late_level = 0.3
early_room_size = 1.6
late_room_size = 2.2
late_decay = 2.8
late_decay_factor_low = 1.4
late_decay_factor_high = 0.35
late_crossover_low = 350.0
late_crossover_high = 3000.0
late_predelay = 24.0
late_output_lpf = 9000.0
late_wander = 30.0
"#;

const CATHEDRAL_PRESET: &str = r#"
name = "Cathedral"
description = "Vast stone space with a long, dark tail"

[params]
dry_level = 0.6
early_level = 0.1
early_send_level = 0.35
late_level = 0.45
early_room_size = 3.0
late_room_size = 3.6
late_decay = 7.5
late_decay_factor_low = 1.6
late_decay_factor_high = 0.25
late_crossover_low = 250.0
late_crossover_high = 2500.0
late_diffusion = 0.9
late_lfo_factor = 0.5
late_predelay = 60.0
late_output_lpf = 6500.0
late_spin = 1.2
late_wander = 45.0
"#;

/// All factory presets, in display order.
///
/// Entries that fail to parse are skipped, which the unit tests rule out.
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Factory preset by name (`small_hall`) or display name (`Small Hall`).
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    let wanted = name.trim().to_lowercase().replace([' ', '-'], "_");
    FACTORY_PRESETS_TOML
        .iter()
        .find(|(id, _)| *id == wanted)
        .and_then(|(_, toml)| Preset::from_toml(toml).ok())
}

/// `true` if `name` refers to a factory preset.
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}
