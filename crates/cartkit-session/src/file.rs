//! # File Session Store
//!
//! One `<key>.json` file per session slot inside a directory.
//!
//! ## Write Path
//! ```text
//! put("cart_1", value)
//!      │
//!      ├── create_dir_all(dir)
//!      ├── NamedTempFile in dir ◄── write + flush
//!      └── persist → dir/cart_1.json   (rename: readers see old or new, never half)
//! ```
//!
//! Keys become file names, so they are restricted to `[A-Za-z0-9_-]`.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{SessionError, SessionResult};
use crate::store::SessionStore;

/// Directory-backed session store.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// Uses `dir` for session files. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Opens the store in the platform data directory.
    pub fn open_default() -> SessionResult<Self> {
        let dir = Self::default_dir().ok_or_else(|| {
            SessionError::Backend("could not determine a data directory".to_string())
        })?;
        Ok(Self::new(dir))
    }

    /// `<data dir>/cartkit/sessions`, if the platform has a home directory.
    pub fn default_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "cartkit", "cartkit")
            .map(|dirs| dirs.data_dir().join("sessions"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> SessionResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn validate_key(key: &str) -> SessionResult<()> {
    let reason = if key.is_empty() {
        "must not be empty"
    } else if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        "only letters, digits, '-' and '_' are allowed"
    } else {
        return Ok(());
    };

    Err(SessionError::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    })
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> SessionResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, key: &str, value: String) -> SessionResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| SessionError::Io(e.error))?;

        debug!(path = %path.display(), bytes = value.len(), "Session file written");
        Ok(())
    }

    fn delete(&mut self, key: &str) -> SessionResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "Session file removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
