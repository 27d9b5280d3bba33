//! Settings panel implemented with egui/eframe
//!
//! The panel owns every piece of mutable state: the live config, the
//! overlay window, the profile store and the hotkey dispatcher handle. Each
//! frame it drains the hotkey channel and pumps overlay X11 events, so all
//! toggles and repaints execute on this thread.

pub mod components;
pub mod constants;

use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use eframe::{CreationContext, NativeOptions, egui};
use tracing::{error, info, warn};

use crate::config::CrosshairConfig;
use crate::hotkeys::{self, HotkeyDispatcher, ToggleRequested};
use crate::overlay::OverlayWindow;
use crate::profiles::{DEFAULT_PROFILE_NAME, ProfileError, ProfileStore};
use components::crosshair_settings::{self, CrosshairSettingsState};
use components::profile_selector::{self, ProfileAction, ProfileSelectorState};
use components::{hotkey_settings, position_controls};
use constants::*;

struct StatusMessage {
    text: String,
    color: egui::Color32,
}

struct PanelApp {
    config: CrosshairConfig,
    overlay: OverlayWindow,
    store: ProfileStore,
    dispatcher: Option<HotkeyDispatcher>,
    hotkey_rx: Receiver<ToggleRequested>,
    status_message: Option<StatusMessage>,
    /// Deadline of a pending "Test" hide; replaced, never stacked
    test_hide_at: Option<Instant>,
    crosshair_state: CrosshairSettingsState,
    profile_state: ProfileSelectorState,
}

impl PanelApp {
    fn new(
        _cc: &CreationContext<'_>,
        config: CrosshairConfig,
        overlay: OverlayWindow,
        store: ProfileStore,
        dispatcher: Option<HotkeyDispatcher>,
        hotkey_rx: Receiver<ToggleRequested>,
        startup_status: Option<StatusMessage>,
    ) -> Self {
        info!("Initializing settings panel");
        let crosshair_state = CrosshairSettingsState::new(&config);
        let profile_state = ProfileSelectorState::new(&store);
        Self {
            config,
            overlay,
            store,
            dispatcher,
            hotkey_rx,
            status_message: startup_status,
            test_hide_at: None,
            crosshair_state,
            profile_state,
        }
    }

    fn set_status(&mut self, text: impl Into<String>, color: egui::Color32) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            color,
        });
    }

    /// Flip overlay visibility on this thread. Any toggle supersedes a
    /// pending test hide.
    fn toggle_overlay(&mut self) {
        self.test_hide_at = None;
        if let Err(err) = self.overlay.toggle() {
            error!(error = ?err, "Failed to toggle overlay");
            self.set_status(format!("Overlay error: {err}"), STATUS_ERROR);
        }
    }

    /// Drain toggle requests posted by the hotkey listener threads
    fn process_hotkey_requests(&mut self) {
        while let Ok(ToggleRequested) = self.hotkey_rx.try_recv() {
            info!("Toggle requested via hotkey");
            self.toggle_overlay();
        }
    }

    /// Hide the overlay once a scheduled test period has elapsed
    fn process_test_deadline(&mut self) {
        if self.test_hide_at.is_some_and(|at| Instant::now() >= at) {
            self.test_hide_at = None;
            if let Err(err) = self.overlay.hide() {
                error!(error = ?err, "Failed to hide overlay after test");
                self.set_status(format!("Overlay error: {err}"), STATUS_ERROR);
            }
        }
    }

    fn refresh_overlay(&mut self) {
        if let Err(err) = self.overlay.refresh(&self.config) {
            error!(error = ?err, "Failed to refresh overlay");
            self.set_status(format!("Overlay error: {err}"), STATUS_ERROR);
        }
    }

    fn rebind_hotkey(&mut self) {
        if let Some(dispatcher) = &self.dispatcher {
            dispatcher.rebind(self.config.toggle_key);
        } else {
            warn!(key = self.config.toggle_key.label(), "Hotkey unavailable, key change stored only");
        }
    }

    fn apply_profile_action(&mut self, action: ProfileAction) {
        match action {
            ProfileAction::None => {}
            ProfileAction::Save(name) => match self.store.save(&name, self.config) {
                Ok(()) => {
                    self.profile_state.refresh_after_change(&self.store);
                    self.set_status(format!("Saved profile '{name}'"), STATUS_OK);
                }
                Err(err) => {
                    error!(error = %err, profile = %name, "Failed to save profile");
                    self.set_status(format!("Save failed: {err}"), STATUS_ERROR);
                }
            },
            ProfileAction::Load(name) => match self.store.load(&name) {
                Ok(snapshot) => {
                    self.config = snapshot;
                    self.crosshair_state.sync_from(&self.config);
                    self.refresh_overlay();
                    self.rebind_hotkey();
                    self.set_status(format!("Loaded profile '{name}'"), STATUS_OK);
                }
                Err(err) => {
                    error!(error = %err, profile = %name, "Failed to load profile");
                    self.set_status(format!("Load failed: {err}"), STATUS_ERROR);
                }
            },
            ProfileAction::Delete(name) => match self.store.delete(&name) {
                Ok(()) => {
                    self.profile_state.refresh_after_change(&self.store);
                    self.set_status(format!("Deleted profile '{name}'"), STATUS_OK);
                }
                Err(err) => {
                    error!(error = %err, profile = %name, "Failed to delete profile");
                    self.set_status(format!("Delete failed: {err}"), STATUS_ERROR);
                }
            },
        }
    }
}

impl eframe::App for PanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_hotkey_requests();
        if let Err(err) = self.overlay.pump_events() {
            error!(error = ?err, "Failed to pump overlay events");
        }
        self.process_test_deadline();

        let mut needs_refresh = false;
        let mut key_changed = false;
        let mut profile_action = ProfileAction::None;

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(ITEM_SPACING);
                ui.heading("Crosshair Designer");
                ui.add_space(SECTION_SPACING);

                needs_refresh |=
                    crosshair_settings::ui(ui, &mut self.config, &mut self.crosshair_state);
                ui.add_space(SECTION_SPACING);

                key_changed = hotkey_settings::ui(
                    ui,
                    &mut self.config,
                    self.dispatcher.is_some(),
                );
                ui.add_space(SECTION_SPACING);

                ui.horizontal(|ui| {
                    let toggle_label = if self.overlay.is_visible() {
                        "Hide overlay"
                    } else {
                        "Show overlay"
                    };
                    if ui.button(toggle_label).clicked() {
                        self.toggle_overlay();
                    }
                    if ui.button(format!("Test ({TEST_DURATION_SECS} s)")).clicked() {
                        if let Err(err) = self.overlay.show() {
                            error!(error = ?err, "Failed to show overlay for test");
                            self.set_status(format!("Overlay error: {err}"), STATUS_ERROR);
                        } else {
                            self.test_hide_at =
                                Some(Instant::now() + Duration::from_secs(TEST_DURATION_SECS));
                        }
                    }
                });
                ui.add_space(SECTION_SPACING);

                needs_refresh |= position_controls::ui(ui, &mut self.config);
                ui.add_space(SECTION_SPACING);

                profile_action = profile_selector::ui(ui, &self.store, &mut self.profile_state);

                if let Some(message) = &self.status_message {
                    ui.add_space(SECTION_SPACING);
                    ui.separator();
                    ui.colored_label(message.color, &message.text);
                }
            });
        });

        if needs_refresh {
            self.refresh_overlay();
        }
        if key_changed {
            self.rebind_hotkey();
        }
        self.apply_profile_action(profile_action);

        // Keep polling the hotkey channel while idle
        ctx.request_repaint_after(Duration::from_millis(POLL_INTERVAL_MS));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(dispatcher) = &self.dispatcher {
            dispatcher.stop();
        }
        info!("Settings panel exiting");
    }
}

pub fn run_gui() -> Result<()> {
    // Persistence trouble must not take the overlay down; a failed open
    // degrades to an in-memory store and a one-shot status message.
    let (store, diagnostic) = ProfileStore::open_default();
    let mut startup_status = diagnostic.map(|err| StatusMessage {
        text: match err {
            ProfileError::Parse(_) => format!("Profile document was reset: {err}"),
            err => format!("Profiles won't be saved: {err}"),
        },
        color: STATUS_ERROR,
    });

    // Start from the default profile's snapshot when present
    let config = store
        .load(DEFAULT_PROFILE_NAME)
        .unwrap_or_else(|_| CrosshairConfig::default());

    let overlay = OverlayWindow::new(&config)?;

    let (hotkey_tx, hotkey_rx) = mpsc::channel();
    let dispatcher = if hotkeys::check_permissions() {
        match HotkeyDispatcher::spawn(hotkey_tx, config.toggle_key) {
            Ok(dispatcher) => {
                info!(
                    listeners = dispatcher.listener_count(),
                    key = config.toggle_key.label(),
                    "Hotkey dispatcher running"
                );
                Some(dispatcher)
            }
            Err(err) => {
                error!(error = %err, "Failed to start hotkey listener");
                hotkeys::print_permission_error();
                startup_status.get_or_insert(StatusMessage {
                    text: format!("Hotkey unavailable: {err}"),
                    color: STATUS_ERROR,
                });
                None
            }
        }
    } else {
        hotkeys::print_permission_error();
        startup_status.get_or_insert(StatusMessage {
            text: "Hotkey unavailable: no access to /dev/input".to_string(),
            color: STATUS_ERROR,
        });
        None
    };

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_title("Crosshair Designer"),
        ..Default::default()
    };

    eframe::run_native(
        "Crosshair Designer",
        options,
        Box::new(move |cc| {
            Ok(Box::new(PanelApp::new(
                cc,
                config,
                overlay,
                store,
                dispatcher,
                hotkey_rx,
                startup_status,
            )))
        }),
    )
    .map_err(|err| anyhow!("Failed to launch settings panel: {err}"))
}
