use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::ImportError;

/// A stored upload, addressed by content hash.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub file_name: String,
    pub url: String,
    pub content_hash: String,
}

/// Content-addressed file store under one root directory.
///
/// Files are named `<sha256>.<ext>`, so the same bytes always land on the
/// same path and re-uploads are free. Callers get back opaque `/files/...`
/// URLs (the stand-in for the external blob store's public URLs), which the
/// API serves statically from the root.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ImportError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write bytes into the store and return their address.
    ///
    /// The write is staged through a temp file in the same directory and
    /// persisted with a rename, so a crash never leaves a half-written file
    /// at the final name.
    pub fn store(&self, bytes: &[u8], extension: &str) -> Result<StoredFile, ImportError> {
        let hash = content_hash(bytes);
        let file_name = format!("{hash}.{extension}");
        let final_path = self.root.join(&file_name);

        if !final_path.exists() {
            let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
            std::io::Write::write_all(&mut tmp, bytes)?;
            tmp.persist(&final_path).map_err(|e| ImportError::Io(e.error))?;
            tracing::debug!(file = %file_name, size = bytes.len(), "Stored upload");
        }

        Ok(StoredFile {
            url: format!("/files/{file_name}"),
            file_name,
            content_hash: hash,
        })
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// Read a stored file back by name.
    pub fn read(&self, file_name: &str) -> Result<Vec<u8>, ImportError> {
        Ok(std::fs::read(self.path_for(file_name))?)
    }

    /// Remove a stored file. Missing files are not an error: the row is the
    /// source of truth, the blob is cache-like.
    pub fn remove(&self, file_name: &str) -> Result<(), ImportError> {
        match std::fs::remove_file(self.path_for(file_name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// SHA-256 of the file contents, hex-encoded.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
