//! Named profile store
//!
//! Profiles are complete `CrosshairConfig` snapshots keyed by name and
//! persisted as a single JSON object in the user config dir. The store owns
//! the on-disk document exclusively and is only touched from the UI thread;
//! every mutation rewrites the whole document through a temp-file-then-rename
//! so a crash mid-write never corrupts it.

use std::fs;
use std::path::PathBuf;

use serde_json::Map;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::CrosshairConfig;
use crate::constants::config as config_paths;

/// Name of the profile seeded on first run
pub const DEFAULT_PROFILE_NAME: &str = "default";

/// Prefix used by [`ProfileStore::next_default_name`]
const AUTO_NAME_PREFIX: &str = "crosshair_";

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile not found: {0}")]
    NotFound(String),

    #[error("profile name must not be empty")]
    EmptyName,

    #[error("I/O error on profile document: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed profile document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-disk mapping from profile name to configuration snapshot.
///
/// Insertion order is preserved and doubles as display order.
pub struct ProfileStore {
    /// `None` when persistence is unavailable and the store runs in memory
    path: Option<PathBuf>,
    profiles: Vec<(String, CrosshairConfig)>,
}

impl ProfileStore {
    /// Default document location: `<config dir>/reticle/profiles.json`
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(config_paths::APP_DIR);
        path.push(config_paths::PROFILES_FILENAME);
        path
    }

    /// Open the store at the default location, degrading to an in-memory
    /// store when the document cannot be opened. See
    /// [`ProfileStore::open_or_in_memory`].
    pub fn open_default() -> (Self, Option<ProfileError>) {
        Self::open_or_in_memory(Self::default_path())
    }

    /// Open at `path`, falling back to an in-memory store on a hard I/O
    /// failure (unreadable document, unwritable directory). The fallback
    /// store supports the full profile surface; edits just don't survive
    /// the process. The failure comes back as the diagnostic for the
    /// caller to surface once.
    pub fn open_or_in_memory(path: PathBuf) -> (Self, Option<ProfileError>) {
        match Self::open(path) {
            Ok(opened) => opened,
            Err(err) => {
                error!(error = %err, "Profile persistence unavailable, continuing in memory");
                (Self::in_memory(), Some(err))
            }
        }
    }

    fn in_memory() -> Self {
        Self {
            path: None,
            profiles: vec![(DEFAULT_PROFILE_NAME.to_string(), CrosshairConfig::default())],
        }
    }

    /// Load the document at `path`, seeding a single default profile if the
    /// document is absent or empty.
    ///
    /// A malformed document is treated as empty and reseeded so the
    /// application stays usable; the parse failure is logged and returned as
    /// a diagnostic for the caller to surface once. Hard I/O errors
    /// (unreadable file, unwritable directory) fail the open.
    pub fn open(path: PathBuf) -> Result<(Self, Option<ProfileError>), ProfileError> {
        let mut diagnostic = None;

        let profiles = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => Vec::new(),
            Ok(contents) => match parse_document(&contents) {
                Ok(profiles) => profiles,
                Err(err) => {
                    error!(path = %path.display(), error = %err, "Profile document is malformed, reseeding with defaults");
                    diagnostic = Some(err);
                    Vec::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Profile document not found, creating default");
                Vec::new()
            }
            Err(err) => return Err(err.into()),
        };

        let mut store = Self {
            path: Some(path),
            profiles,
        };
        if store.profiles.is_empty() {
            store
                .profiles
                .push((DEFAULT_PROFILE_NAME.to_string(), CrosshairConfig::default()));
            store.persist()?;
            info!(profile = DEFAULT_PROFILE_NAME, "Seeded default profile");
        } else {
            info!(count = store.profiles.len(), "Loaded profile document");
        }

        Ok((store, diagnostic))
    }

    /// Profile names in display order
    pub fn list(&self) -> Vec<&str> {
        self.profiles.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Insert or overwrite the named profile and persist immediately
    pub fn save(&mut self, name: &str, snapshot: CrosshairConfig) -> Result<(), ProfileError> {
        if name.trim().is_empty() {
            return Err(ProfileError::EmptyName);
        }
        match self.profiles.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = snapshot,
            None => self.profiles.push((name.to_string(), snapshot)),
        }
        self.persist()?;
        info!(profile = name, "Saved profile");
        Ok(())
    }

    /// Copy of the named snapshot, clamped back into valid ranges in case
    /// the document was edited by hand
    pub fn load(&self, name: &str) -> Result<CrosshairConfig, ProfileError> {
        let mut snapshot = self
            .profiles
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, config)| *config)
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))?;
        snapshot.clamp_to_limits();
        Ok(snapshot)
    }

    /// Remove the named profile and persist immediately
    pub fn delete(&mut self, name: &str) -> Result<(), ProfileError> {
        let index = self
            .profiles
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))?;
        self.profiles.remove(index);
        self.persist()?;
        info!(profile = name, "Deleted profile");
        Ok(())
    }

    /// Smallest-numbered `crosshair_N` (N >= 1) not already in use
    pub fn next_default_name(&self) -> String {
        let mut n = 1u32;
        loop {
            let candidate = format!("{AUTO_NAME_PREFIX}{n}");
            if !self.profiles.iter().any(|(name, _)| *name == candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Rewrite the whole document: serialize, write next to the target,
    /// rename over it
    fn persist(&self) -> Result<(), ProfileError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut document = Map::new();
        for (name, config) in &self.profiles {
            document.insert(name.clone(), serde_json::to_value(config)?);
        }
        let contents = serde_json::to_string_pretty(&document)?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, contents)?;
        if let Err(err) = fs::rename(&tmp_path, path) {
            // Don't leave the temp file behind on a failed rename
            if let Err(cleanup_err) = fs::remove_file(&tmp_path) {
                warn!(path = %tmp_path.display(), error = %cleanup_err, "Failed to remove stale temp file");
            }
            return Err(err.into());
        }
        Ok(())
    }
}

fn parse_document(contents: &str) -> Result<Vec<(String, CrosshairConfig)>, ProfileError> {
    let document: Map<String, serde_json::Value> = serde_json::from_str(contents)?;
    let mut profiles = Vec::with_capacity(document.len());
    for (name, value) in document {
        profiles.push((name, serde_json::from_value(value)?));
    }
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::config::ToggleKey;
    use tempfile::TempDir;

    fn open_in(dir: &TempDir) -> ProfileStore {
        let (store, diagnostic) = ProfileStore::open(dir.path().join("profiles.json")).unwrap();
        assert!(diagnostic.is_none());
        store
    }

    #[test]
    fn test_first_run_seeds_default_profile() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir);
        assert_eq!(store.list(), vec![DEFAULT_PROFILE_NAME]);
        assert_eq!(
            store.load(DEFAULT_PROFILE_NAME).unwrap(),
            CrosshairConfig::default()
        );
        // Seed was persisted, not just held in memory
        assert!(dir.path().join("profiles.json").exists());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut store = open_in(&dir);
        let snapshot = CrosshairConfig {
            color: Rgb::new(0x67, 0xFF, 0x26),
            arm_length: 7,
            arm_thickness: 3,
            gap: 9,
            toggle_key: ToggleKey::Insert,
            offset_x: -4,
            offset_y: 11,
        };
        store.save("crosshair_1", snapshot).unwrap();
        assert_eq!(store.load("crosshair_1").unwrap(), snapshot);

        // Survives a reopen from disk
        let reopened = open_in(&dir);
        assert_eq!(reopened.load("crosshair_1").unwrap(), snapshot);
        assert_eq!(reopened.list(), vec![DEFAULT_PROFILE_NAME, "crosshair_1"]);
    }

    #[test]
    fn test_save_overwrites_existing_name() {
        let dir = TempDir::new().unwrap();
        let mut store = open_in(&dir);
        let mut snapshot = CrosshairConfig::default();
        snapshot.gap = 1;
        store.save("mine", snapshot).unwrap();
        snapshot.gap = 2;
        store.save("mine", snapshot).unwrap();
        assert_eq!(store.load("mine").unwrap().gap, 2);
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn test_delete_removes_profile() {
        let dir = TempDir::new().unwrap();
        let mut store = open_in(&dir);
        let mut snapshot = CrosshairConfig::default();
        snapshot.color = Rgb::new(0x67, 0xFF, 0x26);
        store.save("crosshair_1", snapshot).unwrap();

        store.delete("crosshair_1").unwrap();
        assert!(!store.list().contains(&"crosshair_1"));
        assert!(matches!(
            store.load("crosshair_1"),
            Err(ProfileError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_missing_profile_fails() {
        let dir = TempDir::new().unwrap();
        let mut store = open_in(&dir);
        assert!(matches!(
            store.delete("no-such"),
            Err(ProfileError::NotFound(_))
        ));
    }

    #[test]
    fn test_save_rejects_empty_name() {
        let dir = TempDir::new().unwrap();
        let mut store = open_in(&dir);
        assert!(matches!(
            store.save("  ", CrosshairConfig::default()),
            Err(ProfileError::EmptyName)
        ));
    }

    #[test]
    fn test_next_default_name_skips_used_numbers() {
        let dir = TempDir::new().unwrap();
        let mut store = open_in(&dir);
        assert_eq!(store.next_default_name(), "crosshair_1");
        store.save("crosshair_1", CrosshairConfig::default()).unwrap();
        store.save("crosshair_3", CrosshairConfig::default()).unwrap();
        let next = store.next_default_name();
        assert_eq!(next, "crosshair_2");
        assert!(!store.list().contains(&next.as_str()));
    }

    #[test]
    fn test_malformed_document_reseeds_and_reports() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profiles.json");
        fs::write(&path, "{not json").unwrap();

        let (store, diagnostic) = ProfileStore::open(path).unwrap();
        assert!(matches!(diagnostic, Some(ProfileError::Parse(_))));
        assert_eq!(store.list(), vec![DEFAULT_PROFILE_NAME]);
    }

    #[test]
    fn test_partial_entries_fall_back_per_field() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profiles.json");
        fs::write(&path, r##"{"old": {"color": "#FF0000"}}"##).unwrap();

        let (store, diagnostic) = ProfileStore::open(path).unwrap();
        assert!(diagnostic.is_none());
        let config = store.load("old").unwrap();
        assert_eq!(config.color, Rgb::new(0xFF, 0, 0));
        assert_eq!(config.arm_length, CrosshairConfig::default().arm_length);
    }

    #[test]
    fn test_out_of_range_values_clamped_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profiles.json");
        fs::write(&path, r##"{"wild": {"arm_length": 9999, "gap": 50}}"##).unwrap();

        let (store, _) = ProfileStore::open(path).unwrap();
        let config = store.load("wild").unwrap();
        assert_eq!(config.arm_length, 30);
        assert_eq!(config.gap, 20);
    }

    #[test]
    fn test_unopenable_document_degrades_to_in_memory() {
        let dir = TempDir::new().unwrap();
        // A regular file where a parent directory should be, so both the
        // read and the seed write fail hard
        fs::write(dir.path().join("blocked"), "").unwrap();
        let path = dir.path().join("blocked").join("profiles.json");

        let (mut store, diagnostic) = ProfileStore::open_or_in_memory(path);
        assert!(matches!(diagnostic, Some(ProfileError::Io(_))));

        // Degraded store still supports the full profile surface
        assert_eq!(store.list(), vec![DEFAULT_PROFILE_NAME]);
        let mut snapshot = CrosshairConfig::default();
        snapshot.gap = 7;
        store.save("crosshair_1", snapshot).unwrap();
        assert_eq!(store.load("crosshair_1").unwrap().gap, 7);
        store.delete("crosshair_1").unwrap();
        assert_eq!(store.list(), vec![DEFAULT_PROFILE_NAME]);
    }

    #[test]
    fn test_document_is_name_keyed_json_object() {
        let dir = TempDir::new().unwrap();
        let mut store = open_in(&dir);
        let mut snapshot = CrosshairConfig::default();
        snapshot.color = Rgb::new(0x12, 0x34, 0x56);
        store.save("alpha", snapshot).unwrap();

        let raw = fs::read_to_string(dir.path().join("profiles.json")).unwrap();
        let document: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(document["alpha"]["color"], "#123456");
        assert_eq!(document["alpha"]["toggle_key"], "f12");
        assert!(document[DEFAULT_PROFILE_NAME].is_object());
    }
}
