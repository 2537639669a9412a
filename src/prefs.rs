use crate::error::PreferenceError;
use crate::letter::SpeedFactor;
use chrono::Utc;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

pub const SPEED_KEY: &str = "letter:flow:speed";

pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Reads the stored speed factor, falling back to the default when the value
/// is missing or not a number.
pub fn load_speed(store: &dyn PreferenceStore) -> SpeedFactor {
    match store.get(SPEED_KEY) {
        Some(raw) => SpeedFactor::parse(&raw).unwrap_or_else(|| {
            debug!(raw = %raw, "ignoring invalid stored speed");
            SpeedFactor::default()
        }),
        None => SpeedFactor::default(),
    }
}

pub fn store_speed(store: &mut dyn PreferenceStore, speed: SpeedFactor) {
    if let Err(e) = store.set(SPEED_KEY, &speed.value().to_string()) {
        warn!(error = %e, "could not persist speed preference");
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferenceFile {
    /// RFC 3339 UTC timestamp of the last write
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    values: BTreeMap<String, String>,
}

/// Preferences kept as a small JSON document in the user's data directory.
pub struct JsonPreferences {
    path: Option<PathBuf>,
    file: PreferenceFile,
}

fn preferences_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "wishletter").map(|dirs| dirs.data_local_dir().join("preferences.json"))
}

impl JsonPreferences {
    pub fn open_default() -> Self {
        match preferences_path() {
            Some(path) => Self::open(path),
            None => Self {
                path: None,
                file: PreferenceFile::default(),
            },
        }
    }

    /// Opens the file at `path`; an unreadable or corrupt file starts empty.
    pub fn open(path: PathBuf) -> Self {
        let file = if path.exists() {
            fs::read_to_string(&path)
                .map_err(PreferenceError::from)
                .and_then(|raw| serde_json::from_str(&raw).map_err(PreferenceError::from))
                .unwrap_or_else(|e| {
                    warn!(error = %e, path = %path.display(), "discarding unreadable preferences");
                    PreferenceFile::default()
                })
        } else {
            PreferenceFile::default()
        };

        Self {
            path: Some(path),
            file,
        }
    }

    fn save(&self) -> Result<(), PreferenceError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        // create the data directory if it doesn't exist yet
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.file)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl PreferenceStore for JsonPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.file.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.file.values.insert(key.to_string(), value.to_string());
        self.file.updated_at = Some(Utc::now().to_rfc3339());
        self.save()
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryPreferences {
    pub values: BTreeMap<String, String>,
}

#[cfg(test)]
impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_invalid_speed_uses_default() {
        let mut store = MemoryPreferences::default();
        assert_eq!(load_speed(&store), SpeedFactor::default());

        store.values.insert(SPEED_KEY.into(), "quick".into());
        assert_eq!(load_speed(&store), SpeedFactor::default());

        store.values.insert(SPEED_KEY.into(), "inf".into());
        assert_eq!(load_speed(&store), SpeedFactor::default());

        store.values.insert(SPEED_KEY.into(), "1.25".into());
        assert_eq!(load_speed(&store).value(), 1.25);

        store.values.insert(SPEED_KEY.into(), "0.2".into());
        assert_eq!(load_speed(&store).value(), SpeedFactor::MIN);
    }

    #[test]
    fn json_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let mut store = JsonPreferences::open(path.clone());
        store_speed(&mut store, SpeedFactor::new(1.1));

        let reopened = JsonPreferences::open(path.clone());
        assert_eq!(load_speed(&reopened).value(), 1.1);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("updated_at"));
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonPreferences::open(path);
        assert_eq!(store.get(SPEED_KEY), None);
        assert_eq!(load_speed(&store), SpeedFactor::default());
    }
}
