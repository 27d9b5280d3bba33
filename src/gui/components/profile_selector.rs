//! Profile list and save/load/delete controls

use eframe::egui;

use crate::gui::constants::*;
use crate::profiles::ProfileStore;

/// What the panel should do with the store after this frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileAction {
    None,
    Save(String),
    Load(String),
    Delete(String),
}

pub struct ProfileSelectorState {
    save_name: String,
    selected: Option<String>,
    show_delete_confirm: bool,
}

impl ProfileSelectorState {
    pub fn new(store: &ProfileStore) -> Self {
        Self {
            save_name: store.next_default_name(),
            selected: None,
            show_delete_confirm: false,
        }
    }

    /// Called by the panel after a successful save or delete so the
    /// suggested name stays fresh and stale selections are dropped
    pub fn refresh_after_change(&mut self, store: &ProfileStore) {
        self.save_name = store.next_default_name();
        if let Some(selected) = &self.selected {
            if !store.list().contains(&selected.as_str()) {
                self.selected = None;
            }
        }
    }
}

pub fn ui(ui: &mut egui::Ui, store: &ProfileStore, state: &mut ProfileSelectorState) -> ProfileAction {
    let mut action = ProfileAction::None;

    ui.group(|ui| {
        ui.label(egui::RichText::new("Profiles").strong());
        ui.add_space(ITEM_SPACING);

        egui::ScrollArea::vertical()
            .id_salt("profile_list")
            .max_height(120.0)
            .show(ui, |ui| {
                for name in store.list() {
                    let is_selected = state.selected.as_deref() == Some(name);
                    let response = ui.selectable_label(is_selected, name);
                    if response.clicked() {
                        state.selected = Some(name.to_string());
                    }
                    if response.double_clicked() {
                        action = ProfileAction::Load(name.to_string());
                    }
                }
            });

        ui.add_space(ITEM_SPACING);

        ui.horizontal(|ui| {
            let has_selection = state.selected.is_some();
            if ui
                .add_enabled(has_selection, egui::Button::new("Load"))
                .clicked()
            {
                if let Some(selected) = &state.selected {
                    action = ProfileAction::Load(selected.clone());
                }
            }
            if ui
                .add_enabled(has_selection, egui::Button::new("Delete"))
                .clicked()
            {
                state.show_delete_confirm = true;
            }
        });

        ui.add_space(ITEM_SPACING);

        ui.horizontal(|ui| {
            ui.label("Save as:");
            ui.add(
                egui::TextEdit::singleline(&mut state.save_name).desired_width(140.0),
            );
            let name_ok = !state.save_name.trim().is_empty();
            if ui.add_enabled(name_ok, egui::Button::new("Save")).clicked() {
                action = ProfileAction::Save(state.save_name.trim().to_string());
            }
        });
    });

    if state.show_delete_confirm {
        if let Some(confirmed) = delete_confirm_dialog(ui.ctx(), state) {
            state.show_delete_confirm = false;
            if confirmed {
                if let Some(selected) = &state.selected {
                    action = ProfileAction::Delete(selected.clone());
                }
            }
        }
    }

    action
}

/// Returns Some(confirmed) once the user answered, None while open
fn delete_confirm_dialog(ctx: &egui::Context, state: &mut ProfileSelectorState) -> Option<bool> {
    let name = state.selected.clone()?;
    let mut answer = None;

    egui::Window::new("Confirm Delete")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!("Delete profile '{name}'?"));
            ui.colored_label(STATUS_ERROR, "This cannot be undone!");

            ui.add_space(ITEM_SPACING);

            ui.horizontal(|ui| {
                if ui.button("Delete").clicked() {
                    answer = Some(true);
                }
                if ui.button("Cancel").clicked() {
                    answer = Some(false);
                }
            });
        });

    answer
}
