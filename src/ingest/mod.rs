//! Upload plumbing shared by prints and photos.
//!
//! Uploads are sniffed by magic bytes, hashed, and written into a
//! content-addressed store that hands back opaque URLs. Nothing above this
//! layer touches the filesystem directly.

pub mod exif;
pub mod format;
pub mod store;

pub use format::{detect_format, DetectedFormat, MAX_UPLOAD_SIZE};
pub use store::{content_hash, FileStore, StoredFile};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("File too large: {size} bytes (limit {max})")]
    FileTooLarge { size: u64, max: u64 },
}
