//! Cache adapter for the NVRTC execution backend.

use super::common::{device_source_entry, host_source_entry, library_entry};
use super::DEVICE_KERNEL_CU;
use crate::adapter::{existing, CacheAdapter, LoadedKernel};
use crate::io::{load_conventional_sources, read_binary};
use crate::kernel::CompiledKernel;
use crate::manifest::{self, FileManifestEntry, Manifest};
use std::path::Path;

/// Compiled CUBIN.
pub const KERNEL_CUBIN: &str = "kernel.cubin";
/// Python wrapper generated next to the CUBIN.
pub const KERNEL_PY: &str = "kernel.py";

/// Caches device/host sources, the compiled CUBIN, and its Python wrapper.
#[derive(Debug, Clone, Copy, Default)]
pub struct NvrtcAdapter;

impl NvrtcAdapter {
    /// The Python wrapper sits beside `<name>.cubin` as `<name>.py`.
    fn python_wrapper_entry(lib_path: &Path) -> Option<FileManifestEntry> {
        if lib_path.extension()? != "cubin" {
            return None;
        }
        let bytes = read_binary(&lib_path.with_extension("py"))?;
        Some(
            FileManifestEntry::binary(KERNEL_PY, bytes)
                .required(false)
                .with_description("Python wrapper code"),
        )
    }
}

impl CacheAdapter for NvrtcAdapter {
    fn backend_name(&self) -> &'static str {
        "nvrtc"
    }

    fn manifest(&self, kernel: &CompiledKernel) -> Manifest {
        let lib_path = kernel.adapter.lib_path.as_deref();

        let mut files = Manifest::new();
        for entry in [
            device_source_entry(kernel, DEVICE_KERNEL_CU, "Device kernel source code"),
            host_source_entry(kernel),
            library_entry(lib_path, KERNEL_CUBIN, "Compiled CUBIN"),
            lib_path.and_then(Self::python_wrapper_entry),
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
        let cubin = existing(cache_path, KERNEL_CUBIN)?;

        let mut loaded = LoadedKernel::new(cubin).with_sources(sources);
        loaded.python_wrapper_path = existing(cache_path, KERNEL_PY);
        Some(loaded)
    }

    fn required_files(&self) -> Vec<&'static str> {
        vec![KERNEL_CUBIN]
    }
}
