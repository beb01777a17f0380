// src/generator/package.rs
//! Writing stage files into the run directory and zipping them up.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::stages::StageOutput;

/// Name of the final human-readable document inside a run.
pub const FINAL_DOCUMENT: &str = "S6_final.md";

/// `S<tag>.md` + `S<tag>.json` for every stage.
pub fn persist_outputs(outputs: &[StageOutput], run_dir: &Path) -> Result<()> {
    for out in outputs {
        let tag = out.tag();
        let md = run_dir.join(format!("S{tag}.md"));
        fs::write(&md, &out.markdown).with_context(|| format!("writing {}", md.display()))?;

        let json = run_dir.join(format!("S{tag}.json"));
        let body = serde_json::to_string_pretty(&out.data)?;
        fs::write(&json, body).with_context(|| format!("writing {}", json.display()))?;
    }
    Ok(())
}

pub fn write_final_document(run_dir: &Path, title: &str, body: &str) -> Result<PathBuf> {
    let path = run_dir.join(FINAL_DOCUMENT);
    fs::write(&path, format!("# {title}\n\n{body}"))
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Deflate every regular file of `run_dir` (except archives) into `<run_id>.zip`.
pub fn package_outputs(run_id: &str, run_dir: &Path) -> Result<PathBuf> {
    let zip_path = run_dir.join(format!("{run_id}.zip"));

    let mut entries: Vec<PathBuf> = fs::read_dir(run_dir)
        .with_context(|| format!("listing {}", run_dir.display()))?
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().and_then(|s| s.to_str()) != Some("zip"))
        .collect();
    entries.sort();

    let file = File::create(&zip_path).with_context(|| format!("creating {}", zip_path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for path in &entries {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        zip.start_file(name, options)
            .with_context(|| format!("zip entry {name}"))?;
        zip.write_all(&data)?;
    }
    zip.finish().context("finishing zip")?;
    Ok(zip_path)
}
