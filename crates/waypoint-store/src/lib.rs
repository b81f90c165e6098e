#![forbid(unsafe_code)]
//! Waypoint persistence.
//!
//! The whole dataset lives in one JSON file. [`DocumentStore`] is the seam
//! the server mutates through; [`LocalFsDocumentStore`] is the durable
//! implementation (backup-before-write, then atomic replace) and
//! [`InMemoryDocumentStore`] the test double. Uploaded images are a separate
//! concern handled by [`AssetStore`].

mod assets;

pub use assets::{
    sanitize_filename, AssetError, AssetErrorCode, AssetStore, ImageAsset, StoredAsset,
    MAX_IMAGE_BYTES,
};

use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};
use waypoint_model::Document;

pub const CRATE_NAME: &str = "waypoint-store";

pub const BACKUP_PREFIX: &str = "backup-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorCode {
    NotFound,
    Corrupt,
    Persistence,
    Io,
}

impl StoreErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Corrupt => "corrupt_data",
            Self::Persistence => "persistence_error",
            Self::Io => "io_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for StoreError {}

/// Load/save seam for the single document, injectable so tests run against
/// an in-memory fake instead of the filesystem.
pub trait DocumentStore: Send + Sync {
    fn load(&self) -> Result<Document, StoreError>;
    fn save(&self, document: &Document) -> Result<(), StoreError>;
}

pub struct LocalFsDocumentStore {
    data_file: PathBuf,
}

impl LocalFsDocumentStore {
    #[must_use]
    pub fn new(data_file: PathBuf) -> Self {
        Self { data_file }
    }

    #[must_use]
    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Seeds an empty document when none exists yet. Startup-only; `load`
    /// still reports `NotFound` if the file disappears afterwards.
    pub fn ensure_initialized(&self) -> Result<(), StoreError> {
        if self.data_file.exists() {
            return Ok(());
        }
        if let Some(parent) = self.data_file.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::new(StoreErrorCode::Persistence, e.to_string()))?;
        }
        self.write_atomic(&Document::new())
    }

    fn backup_path(&self, millis: u64) -> PathBuf {
        let dir = self.data_file.parent().unwrap_or_else(|| Path::new("."));
        dir.join(format!("{BACKUP_PREFIX}{millis}.json"))
    }

    fn write_atomic(&self, document: &Document) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|e| StoreError::new(StoreErrorCode::Persistence, e.to_string()))?;
        let tmp = self.data_file.with_extension("json.tmp");
        fs::write(&tmp, &bytes)
            .map_err(|e| StoreError::new(StoreErrorCode::Persistence, e.to_string()))?;
        fs::rename(&tmp, &self.data_file)
            .map_err(|e| StoreError::new(StoreErrorCode::Persistence, e.to_string()))
    }
}

impl DocumentStore for LocalFsDocumentStore {
    fn load(&self) -> Result<Document, StoreError> {
        let raw = match fs::read_to_string(&self.data_file) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::new(
                    StoreErrorCode::NotFound,
                    "data file not found",
                ))
            }
            Err(e) => return Err(StoreError::new(StoreErrorCode::Io, e.to_string())),
        };
        serde_json::from_str(&raw).map_err(|e| {
            StoreError::new(
                StoreErrorCode::Corrupt,
                format!("data file is not a valid document: {e}"),
            )
        })
    }

    /// Backup first, then replace. A failed backup leaves the primary file
    /// untouched; the replace itself goes through a temp file and rename.
    fn save(&self, document: &Document) -> Result<(), StoreError> {
        if self.data_file.exists() {
            let backup = self.backup_path(unix_millis());
            fs::copy(&self.data_file, &backup).map_err(|e| {
                StoreError::new(
                    StoreErrorCode::Persistence,
                    format!("backup before write failed: {e}"),
                )
            })?;
        }
        self.write_atomic(document)
    }
}

/// Mutex-guarded fake with a failure toggle, for tests that need a
/// document store without touching the filesystem.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    document: Mutex<Option<Document>>,
    saves: AtomicU64,
    fail_saves: AtomicBool,
}

impl InMemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_document(document: Document) -> Self {
        Self {
            document: Mutex::new(Some(document)),
            saves: AtomicU64::new(0),
            fail_saves: AtomicBool::new(false),
        }
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::Relaxed);
    }

    #[must_use]
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<Document> {
        self.document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn load(&self) -> Result<Document, StoreError> {
        self.document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| StoreError::new(StoreErrorCode::NotFound, "data file not found"))
    }

    fn save(&self, document: &Document) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::Relaxed) {
            return Err(StoreError::new(
                StoreErrorCode::Persistence,
                "simulated write failure",
            ));
        }
        *self
            .document
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(document.clone());
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

pub(crate) fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
