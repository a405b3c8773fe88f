//! Cache adapter for the TVM FFI execution backend.

use super::common::{device_source_entry, host_source_entry};
use super::DEVICE_KERNEL_CU;
use crate::adapter::{existing, CacheAdapter, LoadedKernel};
use crate::io::load_conventional_sources;
use crate::kernel::CompiledKernel;
use crate::manifest::{self, FileManifestEntry, Manifest};
use std::path::Path;

/// Exported executable library.
pub const EXECUTABLE_SO: &str = "executable.so";

/// Caches device/host sources and the compiled executable.
///
/// The executable is an in-memory object; its entry is returned unserialized
/// and the orchestrator exports it to `executable.so`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TvmFfiAdapter;

impl CacheAdapter for TvmFfiAdapter {
    fn backend_name(&self) -> &'static str {
        "tvm_ffi"
    }

    fn manifest(&self, kernel: &CompiledKernel) -> Manifest {
        let executable = kernel.adapter.executable.clone().map(|handle| {
            FileManifestEntry::executable(EXECUTABLE_SO, handle)
                .with_description("Compiled executable library")
        });

        let mut files = Manifest::new();
        for entry in [
            device_source_entry(kernel, DEVICE_KERNEL_CU, "Device kernel source code"),
            host_source_entry(kernel),
            executable,
        ]
        .into_iter()
        .flatten()
        {
            manifest::insert(&mut files, entry);
        }
        files
    }

    fn load(&self, cache_path: &Path) -> Option<LoadedKernel> {
        let sources = load_conventional_sources(cache_path, "cu");
        let executable = existing(cache_path, EXECUTABLE_SO)?;
        Some(LoadedKernel::new(executable).with_sources(sources))
    }

    fn required_files(&self) -> Vec<&'static str> {
        vec![EXECUTABLE_SO]
    }
}
