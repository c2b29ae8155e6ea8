//! Key-value persistence slots.
//!
//! The whole storage is one JSON object of `key -> text`. Stores built on top
//! of a [`Slot`] own one or more well-known keys and always exchange whole
//! values with it.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::{debug, info};

use crate::config::AppConfig;
use crate::errors::AppError;

pub trait Slot: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove(&self, key: &str) -> Result<(), AppError>;
}

pub type SharedSlot = Arc<dyn Slot>;

/// Storage kept in a single JSON file on disk.
pub struct FileSlot {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSlot {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, AppError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(err.into()),
        };
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&text).map_err(|err| {
            AppError::DecodeError(format!("{}: {}", self.path.display(), err))
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        let text = serde_json::to_string_pretty(entries)
            .map_err(|err| AppError::InternalServerError(err.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn modify<F>(&self, f: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| AppError::InternalServerError("Storage lock poisoned".to_string()))?;
        let mut entries = self.read_all()?;
        f(&mut entries);
        self.write_all(&entries)
    }
}

impl Slot for FileSlot {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| AppError::InternalServerError("Storage lock poisoned".to_string()))?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        debug!("Writing slot '{}' ({} bytes)", key, value.len());
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.modify(|entries| {
            entries.remove(key);
        })
    }
}

/// In-process storage, lost on drop.
#[derive(Default)]
pub struct MemorySlot {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, AppError> {
        self.entries
            .lock()
            .map_err(|_| AppError::InternalServerError("Storage lock poisoned".to_string()))
    }
}

impl Slot for MemorySlot {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

pub fn open_slot(config: &AppConfig) -> Result<SharedSlot, AppError> {
    if let Some(parent) = config.data_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    info!("Using data file {}", config.data_file.display());
    Ok(Arc::new(FileSlot::new(&config.data_file)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::new(dir.path().join("ems.json"));
        assert_eq!(slot.get("employees").unwrap(), None);
    }

    #[test]
    fn file_slot_keeps_other_keys_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::new(dir.path().join("ems.json"));

        slot.set("username", "Admin").unwrap();
        slot.set("employees", "[]").unwrap();
        slot.remove("username").unwrap();

        let reopened = FileSlot::new(slot.path());
        assert_eq!(reopened.get("username").unwrap(), None);
        assert_eq!(reopened.get("employees").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn corrupt_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ems.json");
        fs::write(&path, "{not json").unwrap();

        let err = FileSlot::new(&path).get("employees").unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn open_slot_creates_the_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            data_file: dir.path().join("nested").join("ems.json"),
            ..AppConfig::default()
        };

        let slot = open_slot(&config).unwrap();
        slot.set("username", "Ann").unwrap();
        assert!(dir.path().join("nested").is_dir());
    }
}
