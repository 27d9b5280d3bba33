//! Pixel-offset nudge pad

use eframe::egui;

use crate::config::CrosshairConfig;
use crate::gui::constants::*;

/// Renders the offset pad, returns true if the offset changed
pub fn ui(ui: &mut egui::Ui, config: &mut CrosshairConfig) -> bool {
    let mut changed = false;

    ui.group(|ui| {
        ui.label(egui::RichText::new("Offset (px)").strong());
        ui.add_space(ITEM_SPACING);

        egui::Grid::new("offset_pad").show(ui, |ui| {
            ui.label("");
            if ui.button("  Up  ").clicked() {
                config.offset_y -= 1;
                changed = true;
            }
            ui.label("");
            ui.end_row();

            if ui.button(" Left ").clicked() {
                config.offset_x -= 1;
                changed = true;
            }
            ui.label(format!("X: {}, Y: {}", config.offset_x, config.offset_y));
            if ui.button("Right").clicked() {
                config.offset_x += 1;
                changed = true;
            }
            ui.end_row();

            ui.label("");
            if ui.button(" Down ").clicked() {
                config.offset_y += 1;
                changed = true;
            }
            ui.label("");
            ui.end_row();
        });

        ui.add_space(ITEM_SPACING / 2.0);
        if ui.button("Reset position").clicked() && (config.offset_x, config.offset_y) != (0, 0) {
            config.offset_x = 0;
            config.offset_y = 0;
            changed = true;
        }
    });

    changed
}
