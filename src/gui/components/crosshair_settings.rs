//! Color and shape controls for the crosshair

use eframe::egui;

use crate::color::Rgb;
use crate::config::{ARM_LENGTH_RANGE, ARM_THICKNESS_RANGE, CrosshairConfig, GAP_RANGE};
use crate::gui::constants::*;

/// State for the crosshair settings UI
pub struct CrosshairSettingsState {
    /// Text buffer for the hex field; may hold a partial edit that does not
    /// parse yet
    color_hex: String,
}

impl CrosshairSettingsState {
    pub fn new(config: &CrosshairConfig) -> Self {
        Self {
            color_hex: config.color.to_hex(),
        }
    }

    /// Re-sync the hex buffer after the config changed outside this
    /// component (profile load)
    pub fn sync_from(&mut self, config: &CrosshairConfig) {
        self.color_hex = config.color.to_hex();
    }
}

/// Renders color and shape controls, returns true if the config changed
pub fn ui(ui: &mut egui::Ui, config: &mut CrosshairConfig, state: &mut CrosshairSettingsState) -> bool {
    let mut changed = false;

    ui.group(|ui| {
        ui.label(egui::RichText::new("Color").strong());
        ui.add_space(ITEM_SPACING);

        ui.horizontal(|ui| {
            ui.label("Hex:");
            let text_edit = egui::TextEdit::singleline(&mut state.color_hex)
                .char_limit(7)
                .desired_width(100.0);
            if ui.add(text_edit).changed() {
                // Invalid or partial input is ignored until it parses
                if let Ok(color) = Rgb::from_hex(&state.color_hex) {
                    config.color = color;
                    changed = true;
                }
            }

            let mut picker_color = to_color32(config.color);
            if ui.color_edit_button_srgba(&mut picker_color).changed() {
                config.color = from_color32(picker_color);
                state.color_hex = config.color.to_hex();
                changed = true;
            }
        });
    });

    ui.add_space(SECTION_SPACING);

    ui.group(|ui| {
        ui.label(egui::RichText::new("Crosshair Shape").strong());
        ui.add_space(ITEM_SPACING);

        ui.horizontal(|ui| {
            ui.label("Arm length:");
            if ui
                .add(egui::Slider::new(&mut config.arm_length, ARM_LENGTH_RANGE).suffix(" px"))
                .changed()
            {
                changed = true;
            }
        });

        ui.horizontal(|ui| {
            ui.label("Thickness:");
            if ui
                .add(egui::Slider::new(&mut config.arm_thickness, ARM_THICKNESS_RANGE).suffix(" px"))
                .changed()
            {
                changed = true;
            }
        });

        ui.horizontal(|ui| {
            ui.label("Gap:");
            if ui
                .add(egui::Slider::new(&mut config.gap, GAP_RANGE).suffix(" px"))
                .changed()
            {
                changed = true;
            }
        });
    });

    changed
}

fn to_color32(color: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(color.r, color.g, color.b)
}

fn from_color32(color: egui::Color32) -> Rgb {
    Rgb::new(color.r(), color.g(), color.b())
}
