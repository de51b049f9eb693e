//! Persists rendered release notes to disk.
use chrono::Local;
use log::*;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use crate::error::{ReleaseError, Result};

/// Directory (relative to the repository root) holding draft notes.
pub const DOCS_TEMP_DIR: &str = "docs/temp";
/// Directory (relative to the repository root) of published notes.
pub const DOCS_RELEASE_NOTES_DIR: &str = "docs/content/release-notes";

/// Write notes to a fresh file in the system temp directory and keep it.
pub fn write_to_temp_file(notes: &str) -> Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix("relnotes")
        .suffix(".md")
        .tempfile()?;

    file.write_all(notes.as_bytes())?;

    let (_, path) = file.keep().map_err(|e| ReleaseError::from(e.error))?;

    debug!("wrote release notes to {}", path.display());

    Ok(path)
}

/// File name of the draft notes for `tag`.
pub fn docs_temp_filename(root: &Path, tag: &str) -> PathBuf {
    root.join(DOCS_TEMP_DIR).join(format!("{tag}-relnotes.md"))
}

/// Write draft notes for `tag` under `docs/temp`.
pub fn write_to_docs_temp(root: &Path, tag: &str, notes: &str) -> Result<PathBuf> {
    let path = docs_temp_filename(root, tag);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&path, notes)?;
    info!("wrote draft release notes: {}", path.display());

    Ok(path)
}

fn front_matter(title: &str) -> String {
    format!(
        "---\ndate: {}\ntitle: {}\n---\n\n",
        Local::now().format("%Y-%m-%d"),
        title
    )
}

/// Copy draft notes from `source` into the permanent release notes
/// directory, prefixed with front matter carrying today's date and `title`.
pub fn write_to_docs(root: &Path, title: &str, source: &Path) -> Result<PathBuf> {
    let file_name = source.file_name().ok_or_else(|| {
        ReleaseError::invalid_config(format!(
            "release notes source has no file name: {}",
            source.display()
        ))
    })?;

    let content_dir = root.join(DOCS_RELEASE_NOTES_DIR);
    fs::create_dir_all(&content_dir)?;

    let notes = fs::read_to_string(source)?;
    let target = content_dir.join(file_name);

    fs::write(&target, format!("{}{}", front_matter(title), notes))?;
    info!("wrote release notes: {}", target.display());

    Ok(target)
}
