//! Shared application state.
//!
//! One `CoreState` per process, wrapped in `Arc` and shared by every request
//! handler. Connections are opened per operation; initialization (directory
//! layout + schema migration) happens exactly once, and concurrent callers
//! share the single in-flight initialization instead of racing it.

use std::path::{Path, PathBuf};

use tokio::sync::OnceCell;

use crate::config;
use crate::db::{self, DatabaseError};
use crate::ingest::{FileStore, ImportError};

/// Transport-agnostic application state.
pub struct CoreState {
    /// Root data directory (`~/DigTrack` in production, a tempdir in tests).
    pub data_dir: PathBuf,
    db_path: PathBuf,
    file_store: FileStore,
    /// Guards one-time startup work. `get_or_try_init` hands every
    /// concurrent caller the same in-flight future, so the migration runner
    /// can never be entered twice.
    ready: OnceCell<()>,
}

impl CoreState {
    /// State rooted at the user's data directory.
    pub fn new() -> Result<Self, CoreError> {
        Self::with_root(&config::app_data_dir())
    }

    /// State rooted at an explicit directory (tests use a tempdir).
    pub fn with_root(root: &Path) -> Result<Self, CoreError> {
        std::fs::create_dir_all(root).map_err(ImportError::Io)?;
        Ok(Self {
            data_dir: root.to_path_buf(),
            db_path: root.join("digtrack.db"),
            file_store: FileStore::new(root.join("files"))?,
            ready: OnceCell::new(),
        })
    }

    /// Run one-time startup work: open the database and apply migrations.
    ///
    /// Safe to call from every handler; after the first success it is a
    /// cheap no-op, and concurrent first calls are de-duplicated by the
    /// `OnceCell` rather than by a mutable "already running" flag.
    pub async fn ensure_ready(&self) -> Result<(), CoreError> {
        self.ready
            .get_or_try_init(|| async {
                let db_path = self.db_path.clone();
                let conn = tokio::task::spawn_blocking(move || db::open_database(&db_path))
                    .await
                    .map_err(|e| CoreError::Init(e.to_string()))??;
                drop(conn);
                tracing::info!(data_dir = %self.data_dir.display(), "Core state ready");
                Ok::<(), CoreError>(())
            })
            .await?;
        Ok(())
    }

    /// Open a database connection. Most handlers call this once per request.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        Ok(db::open_database(&self.db_path)?)
    }

    pub fn files(&self) -> &FileStore {
        &self.file_store
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

/// Errors from CoreState operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("File store error: {0}")]
    Files(#[from] ImportError),

    #[error("Initialization failed: {0}")]
    Init(String),
}
