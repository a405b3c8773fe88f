//! Best-effort file reads shared by the backend adapters.
//!
//! Every failure (missing file, permission denied, invalid UTF-8) is reported
//! as `None`. Any of them means the artifact cannot be used from the cache.

use std::fs;
use std::path::Path;

/// Base name of the device kernel source file.
pub const DEVICE_KERNEL_STEM: &str = "device_kernel";
/// Base name of the host wrapper source file.
pub const HOST_KERNEL_STEM: &str = "host_kernel";

/// Reads a UTF-8 text file, or `None` if it cannot be read.
pub fn read_text(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            log::trace!("Cache text read skipped: {} ({})", path.display(), e);
            None
        }
    }
}

/// Reads a binary file, or `None` if it cannot be read.
pub fn read_binary(path: &Path) -> Option<Vec<u8>> {
    match fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            log::trace!("Cache binary read skipped: {} ({})", path.display(), e);
            None
        }
    }
}

/// Device and host sources found in a cache directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConventionalSources {
    pub device_kernel_source: Option<String>,
    pub host_kernel_source: Option<String>,
}

/// Loads `device_kernel.<ext>` and `host_kernel.<ext>` from `cache_path`.
///
/// Missing or unreadable files are left as `None`.
pub fn load_conventional_sources(cache_path: &Path, ext: &str) -> ConventionalSources {
    ConventionalSources {
        device_kernel_source: read_text(&cache_path.join(source_file_name(DEVICE_KERNEL_STEM, ext))),
        host_kernel_source: read_text(&cache_path.join(source_file_name(HOST_KERNEL_STEM, ext))),
    }
}

/// Joins a stem and an extension into a file name.
pub fn source_file_name(stem: &str, ext: &str) -> String {
    format!("{}.{}", stem, ext)
}
