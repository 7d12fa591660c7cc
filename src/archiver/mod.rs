//! Zip packaging of a job directory
//!
//! The job directory's contents become the archive root (no wrapping
//! directory), so unpacking yields `index.html` plus the mirrored asset
//! tree directly. The returned future resolves only after the archive file
//! is finished and flushed; callers may read it immediately.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Recursively collect every file under `dir`.
fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
    {
        let path = entry
            .with_context(|| format!("Failed to read entry in {}", dir.display()))?
            .path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

/// Synchronous archive build, run on the blocking pool.
fn create_zip_sync(input_dir: &Path, out_path: &Path) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let file = File::create(out_path)
        .with_context(|| format!("Failed to create archive {}", out_path.display()))?;
    let mut zip = ZipWriter::new(file);

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9));

    let mut files = Vec::new();
    collect_files(input_dir, &mut files)?;

    for path in files {
        let name = path
            .strip_prefix(input_dir)
            .context("Archived file escaped the input directory")?
            .to_string_lossy()
            .replace('\\', "/");

        // A file listed during the walk may vanish before we read it;
        // tolerate that the way a streaming archiver tolerates ENOENT
        // warnings, and fail on anything else.
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("Skipping vanished file during archiving: {}", path.display());
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        zip.start_file(name.as_str(), options)
            .with_context(|| format!("Failed to start zip entry {name}"))?;
        zip.write_all(&bytes)
            .with_context(|| format!("Failed to write zip entry {name}"))?;
    }

    let mut file = zip.finish().context("Failed to finalize zip archive")?;
    file.flush().context("Failed to flush zip archive")?;

    Ok(())
}

/// Package `input_dir`'s contents into a zip file at `out_path`.
///
/// Uses maximum deflate compression. Errors from the walk, the entry
/// writes, or finalization propagate; only files that vanish mid-archive
/// are tolerated.
pub async fn create_zip_from_dir(input_dir: &Path, out_path: &Path) -> Result<()> {
    let input_dir = input_dir.to_path_buf();
    let out_path = out_path.to_path_buf();

    tokio::task::spawn_blocking(move || create_zip_sync(&input_dir, &out_path))
        .await
        .context("Archive task panicked")?
}
