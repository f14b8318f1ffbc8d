//! Durable "remember me" flag.
//!
//! The flag survives restarts in a small JSON file and is only ever written
//! by an explicit user opt-in or opt-out. Session logic reads it at startup
//! but never clears it.

use crate::errors::{ClientError, ClientResult};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::warn;

pub struct PersistFlag {
    path: PathBuf,
}

impl PersistFlag {
    pub fn new(path: PathBuf) -> Self {
        PersistFlag { path }
    }

    /// Reads the stored flag. A missing or unreadable file counts as opted out.
    pub fn load(&self) -> bool {
        match fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str::<bool>(raw.trim()) {
                Ok(enabled) => enabled,
                Err(err) => {
                    warn!("persist flag file {:?} holds invalid JSON: {}", self.path, err);
                    false
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => false,
            Err(err) => {
                warn!("unable to read persist flag {:?}: {}", self.path, err);
                false
            }
        }
    }

    /// Stores the user's choice, creating parent directories as needed.
    pub fn set(&self, enabled: bool) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| ClientError::storage(err.to_string()))?;
        }

        let encoded = serde_json::to_string(&enabled)
            .map_err(|err| ClientError::storage(err.to_string()))?;
        fs::write(&self.path, encoded).map_err(|err| ClientError::storage(err.to_string()))
    }
}
