// src/download.rs
//! Where a successful generation ends up: the "save as" step of the intake flow.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Name every downloaded archive is saved under, whatever the server suggests.
pub const DOWNLOAD_FILE_NAME: &str = "evia_run.zip";

/// Response body plus the file name it should be saved as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn archive(bytes: Vec<u8>) -> Self {
        Self {
            file_name: DOWNLOAD_FILE_NAME.to_string(),
            bytes,
        }
    }
}

/// Takes ownership of the artifact; the buffer is gone once `save` returns.
pub trait ArtifactSink: Send + Sync {
    /// Persist the artifact and report where it went.
    fn save(&self, artifact: Artifact) -> Result<PathBuf>;
}

/// Writes artifacts into a directory, replacing any previous file of the same name.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArtifactSink for DirectorySink {
    fn save(&self, artifact: Artifact) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;
        let path = self.dir.join(&artifact.file_name);
        let tmp = path.with_extension("part");
        let placed = write_synced(&tmp, &artifact.bytes).and_then(|()| {
            fs::rename(&tmp, &path).with_context(|| format!("renaming into {}", path.display()))
        });
        if let Err(e) = placed {
            // No half-written `.part` survives a failed save.
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        Ok(path)
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut f = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    f.write_all(bytes)
        .with_context(|| format!("writing {}", path.display()))?;
    f.sync_all()
        .with_context(|| format!("syncing {}", path.display()))?;
    Ok(())
}
