//! Orchestrator-side helpers: fulfilling a manifest on disk and reading a
//! cache entry back through its adapter.
//!
//! Directory naming, creation of the entry directory, eviction and locking
//! stay with the caller.

use crate::adapter::{CacheAdapter, LoadedKernel};
use crate::error::{StoreError, StoreResult};
use crate::manifest::{ExecutableHandle, FileContent, Manifest};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Serializes a backend executable to a file.
pub trait ExecutableExporter {
    fn export(&self, executable: &ExecutableHandle, dest: &Path) -> io::Result<()>;
}

impl<F> ExecutableExporter for F
where
    F: Fn(&ExecutableHandle, &Path) -> io::Result<()>,
{
    fn export(&self, executable: &ExecutableHandle, dest: &Path) -> io::Result<()> {
        self(executable, dest)
    }
}

/// What [`write_manifest`] put on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Text and binary files written directly.
    pub written: Vec<PathBuf>,
    /// Files produced by the exporter.
    pub exported: Vec<PathBuf>,
    /// Bytes written directly (exported files are not counted).
    pub bytes_written: u64,
}

/// Returns why `path` is not a safe manifest entry path, if it is not.
fn entry_path_error(path: &str) -> Option<&'static str> {
    if path.is_empty() {
        return Some("path cannot be empty");
    }
    if path.starts_with('/') || path.starts_with('\\') {
        return Some("path must be relative");
    }
    if path.len() >= 2 && path.chars().nth(1) == Some(':') {
        return Some("path must not contain a drive letter");
    }
    if path.contains('\\') {
        return Some("path must use forward slashes only");
    }
    if path.split('/').any(|segment| segment == "..") {
        return Some("path must not contain '..'");
    }
    None
}

/// Writes every entry of `manifest` under `cache_dir`.
///
/// Entry paths and exporter availability are checked before anything is
/// written. Executable entries are handed to `exporter`.
pub fn write_manifest(
    cache_dir: &Path,
    manifest: &Manifest,
    exporter: Option<&dyn ExecutableExporter>,
) -> StoreResult<WriteSummary> {
    for (path, entry) in manifest {
        if let Some(reason) = entry_path_error(path) {
            return Err(StoreError::UnsafePath {
                path: path.clone(),
                reason: reason.to_string(),
            });
        }
        if entry.is_executable() && exporter.is_none() {
            return Err(StoreError::MissingExporter { path: path.clone() });
        }
    }

    let mut summary = WriteSummary::default();
    for (path, entry) in manifest {
        let dest = cache_dir.join(path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let bytes: &[u8] = match &entry.content {
            FileContent::Text(text) => text.as_bytes(),
            FileContent::Binary(bytes) => bytes,
            FileContent::Executable(handle) => {
                if let Some(exporter) = exporter {
                    exporter
                        .export(handle, &dest)
                        .map_err(|source| StoreError::Export {
                            path: dest.clone(),
                            source,
                        })?;
                    summary.exported.push(dest);
                }
                continue;
            }
        };

        fs::write(&dest, bytes).map_err(|source| StoreError::Write {
            path: dest.clone(),
            source,
        })?;
        summary.bytes_written += bytes.len() as u64;
        summary.written.push(dest);
    }

    log::debug!(
        "Cache entry written: {} ({} files, {} exported, {} bytes)",
        cache_dir.display(),
        summary.written.len(),
        summary.exported.len(),
        summary.bytes_written
    );

    Ok(summary)
}

/// Loads a cache entry, checking required files before a full load.
///
/// Returns `None` on a cache miss.
pub fn load_cached(adapter: &dyn CacheAdapter, cache_dir: &Path) -> Option<LoadedKernel> {
    if !adapter.validate(cache_dir) {
        log::debug!(
            "Cache miss ({}): required files missing in {}",
            adapter.backend_name(),
            cache_dir.display()
        );
        return None;
    }

    let loaded = adapter.load(cache_dir);
    match &loaded {
        Some(kernel) => log::debug!(
            "Cache hit ({}): {}",
            adapter.backend_name(),
            kernel.kernel_lib_path.display()
        ),
        None => log::debug!(
            "Cache miss ({}): load failed for {}",
            adapter.backend_name(),
            cache_dir.display()
        ),
    }
    loaded
}
