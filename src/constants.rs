//! Application-wide constants
//!
//! This module contains the magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// X11 protocol and rendering constants
pub mod x11 {
    /// ARGB color depth (32-bit: 8 bits each for Alpha, Red, Green, Blue)
    pub const ARGB_DEPTH: u8 = 32;

    /// Override redirect flag for unmanaged windows
    pub const OVERRIDE_REDIRECT: u32 = 1;

    /// WM_CLASS property value (instance and class, NUL separated)
    pub const WM_CLASS: &[u8] = b"reticle\0reticle\0";
}

/// Input event constants (from evdev)
pub mod input {
    /// Key press event value
    pub const KEY_PRESS: i32 = 1;

    /// Key release event value
    pub const KEY_RELEASE: i32 = 0;

    /// Key repeat event value
    pub const KEY_REPEAT: i32 = 2;
}

/// On-disk configuration locations
pub mod config {
    /// Directory under the user config dir holding our files
    pub const APP_DIR: &str = "reticle";

    /// Profile document filename
    pub const PROFILES_FILENAME: &str = "profiles.json";
}

/// Hotkey listener permissions
pub mod permissions {
    /// Device directory scanned for keyboards
    pub const DEV_INPUT: &str = "/dev/input";

    /// Group granting read access to /dev/input
    pub const INPUT_GROUP: &str = "input";

    /// Command shown to the user when access is denied
    pub const ADD_TO_INPUT_GROUP: &str = "sudo usermod -aG input $USER";
}
