//! GUI-specific constants for layout, status colors and intervals

use egui;

/// Settings panel window dimensions
pub const WINDOW_WIDTH: f32 = 440.0;
pub const WINDOW_HEIGHT: f32 = 680.0;
pub const WINDOW_MIN_WIDTH: f32 = 380.0;
pub const WINDOW_MIN_HEIGHT: f32 = 520.0;

/// Layout spacing
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;

/// Status colors
pub const STATUS_OK: egui::Color32 = egui::Color32::from_rgb(0, 200, 0);
pub const STATUS_ERROR: egui::Color32 = egui::Color32::from_rgb(200, 0, 0);

/// How often the panel wakes up to drain the hotkey channel and pump
/// overlay events
pub const POLL_INTERVAL_MS: u64 = 50;

/// How long the "Test" action keeps the overlay visible
pub const TEST_DURATION_SECS: u64 = 2;
