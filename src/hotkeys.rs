//! Global toggle hotkey
//!
//! Listens for the configured key on every keyboard under /dev/input, so the
//! toggle works no matter which window has focus. Listener threads never
//! touch configuration or windows; their only external effect is posting
//! [`ToggleRequested`] onto the channel the settings panel drains on the UI
//! thread. Rebinding swaps an atomic key code shared with the listeners, so
//! there is no instant with zero or two active bindings.

use anyhow::{Context, Result};
use evdev::{Device, EventSummary, KeyCode};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::sync::mpsc::Sender;
use std::thread;
use tracing::{debug, error, info, warn};

use crate::config::ToggleKey;
use crate::constants::{input, permissions};

/// Message posted to the UI thread on a matching key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleRequested;

/// State shared between the dispatcher handle and its listener threads
struct Binding {
    /// evdev key code currently bound
    target: AtomicU16,
    stop: AtomicBool,
}

impl Binding {
    fn new(key: ToggleKey) -> Self {
        Self {
            target: AtomicU16::new(key.to_evdev_key().code()),
            stop: AtomicBool::new(false),
        }
    }

    /// Whether this key event should produce a toggle. Presses only; key
    /// repeats while held must not re-toggle.
    fn matches(&self, key_code: u16, value: i32) -> bool {
        !self.stop.load(Ordering::SeqCst)
            && value == input::KEY_PRESS
            && key_code == self.target.load(Ordering::SeqCst)
    }
}

/// Handle owning the background listeners for the global toggle key
pub struct HotkeyDispatcher {
    binding: Arc<Binding>,
    handles: Vec<thread::JoinHandle<()>>,
}

impl HotkeyDispatcher {
    /// Scan for keyboards and start one listener thread per device, bound
    /// to `key`. Fails if no keyboard is accessible; the caller treats that
    /// as non-fatal and keeps the manual toggle working.
    pub fn spawn(sender: Sender<ToggleRequested>, key: ToggleKey) -> Result<Self> {
        let devices = find_all_keyboard_devices()?;
        let binding = Arc::new(Binding::new(key));
        let mut handles = Vec::new();

        for device in devices {
            let sender = sender.clone();
            let binding = Arc::clone(&binding);
            let handle = thread::spawn(move || {
                info!(device = ?device.name(), "Hotkey listener started");
                if let Err(e) = listen(device, sender, binding) {
                    error!(error = %e, "Hotkey listener error");
                }
            });
            handles.push(handle);
        }

        info!(key = key.label(), "Hotkey support enabled");
        Ok(Self { binding, handles })
    }

    /// Atomically retarget all listeners to `new_key`. The old key stops
    /// matching and the new one starts matching in the same store.
    pub fn rebind(&self, new_key: ToggleKey) {
        self.binding
            .target
            .store(new_key.to_evdev_key().code(), Ordering::SeqCst);
        info!(key = new_key.label(), "Hotkey rebound");
    }

    /// Tell listeners to wind down. Safe to call repeatedly; devices are
    /// not grabbed, so process exit releases them regardless.
    pub fn stop(&self) {
        if !self.binding.stop.swap(true, Ordering::SeqCst) {
            info!("Hotkey dispatcher stopped");
        }
    }

    pub fn listener_count(&self) -> usize {
        self.handles.len()
    }
}

impl Drop for HotkeyDispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Find all input devices that look like keyboards (support the Enter key)
fn find_all_keyboard_devices() -> Result<Vec<Device>> {
    info!(path = %permissions::DEV_INPUT, "Scanning for keyboard devices...");

    let mut devices = Vec::new();

    for entry in std::fs::read_dir(permissions::DEV_INPUT).context(format!(
        "Failed to read {} - are you in the '{}' group?",
        permissions::DEV_INPUT,
        permissions::INPUT_GROUP
    ))? {
        let entry = entry?;
        let path = entry.path();

        if let Ok(device) = Device::open(&path) {
            if let Some(keys) = device.supported_keys() {
                if keys.contains(KeyCode::KEY_ENTER) {
                    info!(device_path = %path.display(), name = ?device.name(), "Found keyboard device");
                    devices.push(device);
                }
            }
        }
    }

    if devices.is_empty() {
        anyhow::bail!(
            "No keyboard device found. Ensure you're in '{}' group:\n\
             {}\n\
             Then log out and back in.",
            permissions::INPUT_GROUP,
            permissions::ADD_TO_INPUT_GROUP
        )
    }

    info!(count = devices.len(), "Listening on keyboard device(s)");

    Ok(devices)
}

/// Blocking event loop for a single device
fn listen(mut device: Device, sender: Sender<ToggleRequested>, binding: Arc<Binding>) -> Result<()> {
    loop {
        if binding.stop.load(Ordering::SeqCst) {
            return Ok(());
        }

        // Blocks until the device produces events
        let events = device.fetch_events().context("Failed to fetch events")?;

        for event in events {
            if let EventSummary::Key(_, key, value) = event.destructure() {
                debug!(key = ?key, value, "Key event");

                if binding.matches(key.code(), value) {
                    info!(key = ?key, "Toggle hotkey pressed");
                    sender
                        .send(ToggleRequested)
                        .context("Failed to send toggle request")?;
                }
            }
        }
    }
}

/// Check if hotkeys are available (user has input group permissions)
pub fn check_permissions() -> bool {
    std::fs::read_dir(permissions::DEV_INPUT).is_ok()
}

/// Log a helpful message when input device access is missing
pub fn print_permission_error() {
    error!(path = %permissions::DEV_INPUT, "Cannot access input devices");
    error!(group = %permissions::INPUT_GROUP, "Global hotkey requires group membership");
    error!(command = %permissions::ADD_TO_INPUT_GROUP, "Add user to input group");
    error!("  Then log out and back in");
    warn!(continuing = true, "Continuing without hotkey support; use the panel toggle button");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(key: ToggleKey) -> u16 {
        key.to_evdev_key().code()
    }

    #[test]
    fn test_bound_key_press_matches_once_per_press() {
        let binding = Binding::new(ToggleKey::F12);
        assert!(binding.matches(code(ToggleKey::F12), input::KEY_PRESS));
        // Repeat and release while held must not toggle again
        assert!(!binding.matches(code(ToggleKey::F12), input::KEY_REPEAT));
        assert!(!binding.matches(code(ToggleKey::F12), input::KEY_RELEASE));
    }

    #[test]
    fn test_unbound_key_does_not_match() {
        let binding = Binding::new(ToggleKey::F12);
        assert!(!binding.matches(code(ToggleKey::Insert), input::KEY_PRESS));
    }

    #[test]
    fn test_rebind_swaps_exactly_one_binding() {
        let binding = Binding::new(ToggleKey::F9);
        assert!(binding.matches(code(ToggleKey::F9), input::KEY_PRESS));

        binding
            .target
            .store(code(ToggleKey::F10), Ordering::SeqCst);

        // After rebind A -> B: A no longer toggles, B toggles
        assert!(!binding.matches(code(ToggleKey::F9), input::KEY_PRESS));
        assert!(binding.matches(code(ToggleKey::F10), input::KEY_PRESS));
    }

    #[test]
    fn test_stopped_binding_never_matches() {
        let binding = Binding::new(ToggleKey::C);
        binding.stop.store(true, Ordering::SeqCst);
        assert!(!binding.matches(code(ToggleKey::C), input::KEY_PRESS));
    }

    #[test]
    fn test_every_toggle_key_has_distinct_code() {
        let codes: Vec<u16> = ToggleKey::ALL.iter().map(|k| code(*k)).collect();
        let mut deduped = codes.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(codes.len(), deduped.len());
    }
}
