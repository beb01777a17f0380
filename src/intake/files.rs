// src/intake/files.rs
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

/// One user-chosen file, carried unchanged into the multipart payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub media_type: String,
}

/// `None` means the picker was never used; `Some(vec![])` is an explicit empty pick.
pub type SelectedFiles = Option<Vec<SelectedFile>>;

impl SelectedFile {
    pub fn new(
        file_name: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
            media_type: media_type.into(),
        }
    }

    /// Read a file from disk, guessing the media type from its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("no usable file name in {}", path.display()))?
            .to_string();
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let media_type = media_type_for(&file_name);
        Ok(Self {
            file_name,
            bytes,
            media_type,
        })
    }
}

/// Media type guessed from the file extension; unknown extensions fall back
/// to `application/octet-stream`.
pub fn media_type_for(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .to_string()
}
