//! File-backed state store

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use lapse_core::{StateStore, WritePolicy};
use lapse_domain::{LapseError, Result};
use serde_json::Value;

use crate::errors::InfraError;

/// Stores each key as `<dir>/<key>.json`
///
/// Every write goes straight to disk through a temp file and a rename, so a
/// crash mid-write leaves the previous file intact. Debouncing is layered on
/// top by [`super::DebouncedStore`].
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    ///
    /// # Errors
    /// Returns `LapseError::Persistence` for keys that are empty or contain
    /// anything other than ASCII letters, digits, `_` and `-`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(LapseError::Persistence(format!("invalid storage key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl StateStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key)?;
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(InfraError::from(err).into()),
        };

        let value = serde_json::from_str(&contents).map_err(|err| {
            LapseError::Persistence(format!("{} is not valid JSON: {err}", path.display()))
        })?;
        Ok(Some(value))
    }

    fn save(&self, key: &str, payload: &Value, policy: WritePolicy) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(InfraError::from)?;

        let bytes = serde_json::to_vec_pretty(payload).map_err(InfraError::from)?;
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, bytes).map_err(InfraError::from)?;
        fs::rename(&tmp, &path).map_err(InfraError::from)?;

        tracing::debug!(key, ?policy, path = %path.display(), "state written");
        Ok(())
    }
}
