//! Uploaded-image storage, independent of the JSON document.
//!
//! Files are tracked only by directory listing; nothing cross-checks the
//! document for references to them.

use crate::unix_millis;
use serde::Serialize;
use std::ffi::OsStr;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AssetErrorCode {
    NotFound,
    InvalidType,
    TooLarge,
    Io,
}

impl AssetErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidType => "invalid_type",
            Self::TooLarge => "too_large",
            Self::Io => "io_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetError {
    pub code: AssetErrorCode,
    pub message: String,
}

impl AssetError {
    #[must_use]
    pub fn new(code: AssetErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for AssetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AssetError {}

/// A stored upload as reported by the gallery listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageAsset {
    pub filename: String,
    pub path: String,
    #[serde(rename = "uploadTimestamp")]
    pub upload_timestamp: u64,
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredAsset {
    pub filename: String,
    pub path: String,
    pub size: usize,
}

pub struct AssetStore {
    root: PathBuf,
    public_prefix: String,
    max_bytes: usize,
}

impl AssetStore {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            public_prefix: "/images".to_string(),
            max_bytes: MAX_IMAGE_BYTES,
        }
    }

    #[must_use]
    pub fn with_public_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.public_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ensure_directory(&self) -> Result<(), AssetError> {
        fs::create_dir_all(&self.root).map_err(|e| AssetError::new(AssetErrorCode::Io, e.to_string()))
    }

    pub fn store(
        &self,
        bytes: &[u8],
        original_filename: &str,
        mime_type: &str,
    ) -> Result<StoredAsset, AssetError> {
        if !mime_type.starts_with("image/") {
            return Err(AssetError::new(
                AssetErrorCode::InvalidType,
                "Only image files are allowed",
            ));
        }
        if bytes.len() > self.max_bytes {
            return Err(AssetError::new(
                AssetErrorCode::TooLarge,
                format!("file exceeds the {} byte upload limit", self.max_bytes),
            ));
        }
        self.ensure_directory()?;
        let filename = format!("{}-{}", unix_millis(), sanitize_filename(original_filename));
        fs::write(self.root.join(&filename), bytes)
            .map_err(|e| AssetError::new(AssetErrorCode::Io, e.to_string()))?;
        Ok(StoredAsset {
            path: format!("{}/{filename}", self.public_prefix),
            filename,
            size: bytes.len(),
        })
    }

    /// Image files in the asset directory, newest first by the timestamp
    /// prefix baked into each filename.
    pub fn list(&self) -> Result<Vec<ImageAsset>, AssetError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AssetError::new(AssetErrorCode::Io, e.to_string())),
        };
        let mut assets = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| AssetError::new(AssetErrorCode::Io, e.to_string()))?;
            let Ok(filename) = entry.file_name().into_string() else {
                continue;
            };
            if !has_image_extension(&filename) {
                continue;
            }
            assets.push(ImageAsset {
                path: format!("{}/{filename}", self.public_prefix),
                upload_timestamp: timestamp_prefix(&filename),
                filename,
            });
        }
        assets.sort_by(|a, b| b.upload_timestamp.cmp(&a.upload_timestamp));
        Ok(assets)
    }

    pub fn delete(&self, filename: &str) -> Result<(), AssetError> {
        if !is_plain_filename(filename) {
            return Err(AssetError::new(AssetErrorCode::NotFound, "Image not found"));
        }
        match fs::remove_file(self.root.join(filename)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(AssetError::new(AssetErrorCode::NotFound, "Image not found"))
            }
            Err(e) => Err(AssetError::new(AssetErrorCode::Io, e.to_string())),
        }
    }
}

/// Keeps only the final path component and collapses whitespace runs to a
/// single hyphen, matching what clients expect in returned paths.
#[must_use]
pub fn sanitize_filename(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original)
        .trim();
    let mut out = String::with_capacity(base.len());
    let mut in_whitespace = false;
    for ch in base.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push('-');
                in_whitespace = true;
            }
        } else {
            out.push(ch);
            in_whitespace = false;
        }
    }
    if out.is_empty() {
        "upload".to_string()
    } else {
        out
    }
}

fn is_plain_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains('/')
        && !filename.contains('\\')
        && !filename.contains("..")
}

fn has_image_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

fn timestamp_prefix(filename: &str) -> u64 {
    filename
        .split('-')
        .next()
        .and_then(|prefix| prefix.parse::<u64>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_collapses_whitespace_runs() {
        assert_eq!(sanitize_filename("my photo.jpg"), "my-photo.jpg");
        assert_eq!(sanitize_filename("a  \t b.png"), "a-b.png");
        assert_eq!(sanitize_filename("../../etc/passwd thing.png"), "passwd-thing.png");
        assert_eq!(sanitize_filename("   "), "upload");
    }

    #[test]
    fn extension_filter_is_case_insensitive() {
        assert!(has_image_extension("x.JPG"));
        assert!(has_image_extension("x.webp"));
        assert!(!has_image_extension("x.txt"));
        assert!(!has_image_extension("noextension"));
    }

    #[test]
    fn timestamp_prefix_parses_leading_digits() {
        assert_eq!(timestamp_prefix("1722470400000-photo.jpg"), 1_722_470_400_000);
        assert_eq!(timestamp_prefix("photo.jpg"), 0);
    }
}
