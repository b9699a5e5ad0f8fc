use serde::{Deserialize, Serialize};

use crate::models::enums::PrintKind;

/// Upload size ceiling. Large enough for E-size blueprint scans.
pub const MAX_UPLOAD_SIZE: u64 = 100 * 1024 * 1024; // 100MB

/// File formats we accept for prints and photos.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DetectedFormat {
    Pdf,
    Jpeg,
    Png,
    Tiff,
    Heic,
    Unknown,
}

impl DetectedFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Tiff => "image/tiff",
            Self::Heic => "image/heic",
            Self::Unknown => "application/octet-stream",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Tiff => "tif",
            Self::Heic => "heic",
            Self::Unknown => "bin",
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Jpeg | Self::Png | Self::Tiff | Self::Heic)
    }

    /// What kind of print this format can back, if any.
    pub fn print_kind(&self) -> Option<PrintKind> {
        match self {
            Self::Pdf => Some(PrintKind::Pdf),
            f if f.is_image() => Some(PrintKind::Image),
            _ => None,
        }
    }
}

/// Detect file format from magic bytes (NOT file extensions or the
/// client-sent content type). Magic bytes don't lie — both can.
pub fn detect_format(bytes: &[u8]) -> DetectedFormat {
    match bytes {
        // PDF: starts with %PDF
        [0x25, 0x50, 0x44, 0x46, ..] => DetectedFormat::Pdf,
        // JPEG: starts with FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => DetectedFormat::Jpeg,
        // PNG: starts with 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47, ..] => DetectedFormat::Png,
        // TIFF: little-endian (49 49 2A 00) or big-endian (4D 4D 00 2A)
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => DetectedFormat::Tiff,
        // HEIC/HEIF: "ftyp" at offset 4
        _ if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" => DetectedFormat::Heic,
        _ => DetectedFormat::Unknown,
    }
}
