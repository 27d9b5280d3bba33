//! Settings panel components, one file per control group

pub mod crosshair_settings;
pub mod hotkey_settings;
pub mod position_controls;
pub mod profile_selector;
