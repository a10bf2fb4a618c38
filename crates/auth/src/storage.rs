//! Durable session snapshot storage.
//!
//! The session store persists one named snapshot and rehydrates it on
//! startup. Storage is injected so hosts can choose a location and tests
//! can run against memory.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AuthTokens, Permission, User};

/// The serialized form of the session, exactly as persisted.
///
/// Field names mirror the storage entry written by earlier clients
/// (`isAuthenticated` kept as-is) so existing snapshots remain readable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub tokens: Option<AuthTokens>,
    #[serde(rename = "isAuthenticated")]
    pub is_authenticated: bool,
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Reads and writes the single persisted session snapshot.
pub trait SessionStorage: Send + Sync {
    /// Load the last persisted snapshot, or `None` if nothing was persisted.
    fn load(&self) -> Result<Option<SessionSnapshot>, StorageError>;

    /// Replace the persisted snapshot.
    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// File-backed storage
// ─────────────────────────────────────────────────────────────────────────────

const STORAGE_FILE: &str = "auth-storage.json";

/// JSON-file snapshot storage under the platform data directory.
#[derive(Debug)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at the conventional per-user location
    /// (`<data dir>/pharmadesk/auth-storage.json`).
    ///
    /// `None` when the platform exposes no data directory.
    pub fn default_location() -> Option<Self> {
        let dir = dirs::data_dir()?.join("pharmadesk");
        Some(Self::new(dir.join(STORAGE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<SessionSnapshot>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory storage
// ─────────────────────────────────────────────────────────────────────────────

/// Volatile snapshot storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemorySessionStorage {
    inner: Mutex<Option<SessionSnapshot>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for InMemorySessionStorage {
    fn load(&self) -> Result<Option<SessionSnapshot>, StorageError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(inner.clone())
    }

    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *inner = Some(snapshot.clone());
        Ok(())
    }
}
