//! Toggle-key selection component

use eframe::egui;

use crate::config::{CrosshairConfig, ToggleKey};
use crate::gui::constants::*;

/// Renders the hotkey dropdown, returns true if the key changed (the caller
/// rebinds the dispatcher)
pub fn ui(ui: &mut egui::Ui, config: &mut CrosshairConfig, hotkeys_available: bool) -> bool {
    let mut changed = false;

    ui.group(|ui| {
        ui.label(egui::RichText::new("Toggle Hotkey").strong());
        ui.add_space(ITEM_SPACING);

        ui.horizontal(|ui| {
            ui.label("Key:");
            egui::ComboBox::from_id_salt("toggle_key")
                .selected_text(config.toggle_key.label())
                .show_ui(ui, |ui| {
                    for key in ToggleKey::ALL {
                        if ui
                            .selectable_value(&mut config.toggle_key, key, key.label())
                            .changed()
                        {
                            changed = true;
                        }
                    }
                });
        });

        if !hotkeys_available {
            ui.add_space(ITEM_SPACING / 2.0);
            ui.colored_label(
                STATUS_ERROR,
                "Global hotkey unavailable - use the toggle button below",
            );
        }
    });

    changed
}
