//! Crosshair configuration
//!
//! `CrosshairConfig` is the single source of truth for what the overlay
//! draws. It lives on the UI thread; the hotkey listener never touches it.
//! Serialization tolerates missing fields by falling back to the documented
//! defaults field-by-field, so old profile documents keep loading.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Valid range for `arm_length` (pixels)
pub const ARM_LENGTH_RANGE: std::ops::RangeInclusive<u16> = 1..=30;

/// Valid range for `arm_thickness` (pixels)
pub const ARM_THICKNESS_RANGE: std::ops::RangeInclusive<u16> = 1..=10;

/// Valid range for `gap` (pixels)
pub const GAP_RANGE: std::ops::RangeInclusive<u16> = 0..=20;

/// The key that toggles overlay visibility. Fixed set; each variant maps to
/// exactly one evdev key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleKey {
    F9,
    F10,
    F11,
    F12,
    Insert,
    C,
}

impl ToggleKey {
    /// All selectable keys, in dropdown display order
    pub const ALL: [ToggleKey; 6] = [
        ToggleKey::F9,
        ToggleKey::F10,
        ToggleKey::F11,
        ToggleKey::F12,
        ToggleKey::Insert,
        ToggleKey::C,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ToggleKey::F9 => "F9",
            ToggleKey::F10 => "F10",
            ToggleKey::F11 => "F11",
            ToggleKey::F12 => "F12",
            ToggleKey::Insert => "Insert",
            ToggleKey::C => "C",
        }
    }

    pub fn to_evdev_key(self) -> evdev::KeyCode {
        match self {
            ToggleKey::F9 => evdev::KeyCode::KEY_F9,
            ToggleKey::F10 => evdev::KeyCode::KEY_F10,
            ToggleKey::F11 => evdev::KeyCode::KEY_F11,
            ToggleKey::F12 => evdev::KeyCode::KEY_F12,
            ToggleKey::Insert => evdev::KeyCode::KEY_INSERT,
            ToggleKey::C => evdev::KeyCode::KEY_C,
        }
    }
}

/// Complete set of crosshair parameters. Copied by value into and out of
/// profiles; the live instance is owned by the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrosshairConfig {
    #[serde(default = "default_color")]
    pub color: Rgb,
    #[serde(default = "default_arm_length")]
    pub arm_length: u16,
    #[serde(default = "default_arm_thickness")]
    pub arm_thickness: u16,
    #[serde(default = "default_gap")]
    pub gap: u16,
    #[serde(default = "default_toggle_key")]
    pub toggle_key: ToggleKey,
    #[serde(default)]
    pub offset_x: i32,
    #[serde(default)]
    pub offset_y: i32,
}

// Default value functions
fn default_color() -> Rgb {
    Rgb::WHITE
}

fn default_arm_length() -> u16 {
    12
}

fn default_arm_thickness() -> u16 {
    2
}

fn default_gap() -> u16 {
    4
}

fn default_toggle_key() -> ToggleKey {
    ToggleKey::F12
}

impl Default for CrosshairConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            arm_length: default_arm_length(),
            arm_thickness: default_arm_thickness(),
            gap: default_gap(),
            toggle_key: default_toggle_key(),
            offset_x: 0,
            offset_y: 0,
        }
    }
}

impl CrosshairConfig {
    /// Force all numeric fields into their declared ranges. The panel's
    /// widgets already clamp at the input; this guards snapshots loaded
    /// from disk, where any value may appear.
    pub fn clamp_to_limits(&mut self) {
        self.arm_length = self
            .arm_length
            .clamp(*ARM_LENGTH_RANGE.start(), *ARM_LENGTH_RANGE.end());
        self.arm_thickness = self
            .arm_thickness
            .clamp(*ARM_THICKNESS_RANGE.start(), *ARM_THICKNESS_RANGE.end());
        self.gap = self.gap.clamp(*GAP_RANGE.start(), *GAP_RANGE.end());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = CrosshairConfig::default();
        assert_eq!(config.color, Rgb::WHITE);
        assert_eq!(config.arm_length, 12);
        assert_eq!(config.arm_thickness, 2);
        assert_eq!(config.gap, 4);
        assert_eq!(config.toggle_key, ToggleKey::F12);
        assert_eq!((config.offset_x, config.offset_y), (0, 0));
    }

    #[test]
    fn test_clamp_to_limits() {
        let mut config = CrosshairConfig {
            arm_length: 500,
            arm_thickness: 0,
            gap: 99,
            ..CrosshairConfig::default()
        };
        config.clamp_to_limits();
        assert_eq!(config.arm_length, 30);
        assert_eq!(config.arm_thickness, 1);
        assert_eq!(config.gap, 20);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        // An old or hand-edited profile entry carrying only two fields
        let config: CrosshairConfig =
            serde_json::from_str(r##"{"color": "#67FF26", "gap": 7}"##).unwrap();
        assert_eq!(config.color, Rgb::new(0x67, 0xFF, 0x26));
        assert_eq!(config.gap, 7);
        assert_eq!(config.arm_length, 12);
        assert_eq!(config.toggle_key, ToggleKey::F12);
    }

    #[test]
    fn test_toggle_keys_map_to_evdev_key_codes() {
        assert_eq!(ToggleKey::F9.to_evdev_key(), evdev::KeyCode::KEY_F9);
        assert_eq!(ToggleKey::F12.to_evdev_key(), evdev::KeyCode::KEY_F12);
        assert_eq!(ToggleKey::Insert.to_evdev_key(), evdev::KeyCode::KEY_INSERT);
        assert_eq!(
            ToggleKey::C.to_evdev_key().code(),
            evdev::KeyCode::KEY_C.code()
        );
    }

    #[test]
    fn test_toggle_key_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ToggleKey::Insert).unwrap(),
            "\"insert\""
        );
        assert_eq!(
            serde_json::from_str::<ToggleKey>("\"f9\"").unwrap(),
            ToggleKey::F9
        );
    }
}
