//! Cache adapter for the Cython execution backend.

use super::common::{device_source_entry, host_source_entry, library_entry};
use super::{DEVICE_KERNEL_CU, KERNEL_LIB_SO};
use crate::adapter::{existing, CacheAdapter, LoadedKernel};
use crate::io::load_conventional_sources;
use crate::kernel::CompiledKernel;
use crate::manifest::{self, Manifest};
use std::path::Path;

/// Caches device/host sources and the compiled shared library.
#[derive(Debug, Clone, Copy, Default)]
pub struct CythonAdapter;

impl CacheAdapter for CythonAdapter {
    fn backend_name(&self) -> &'static str {
        "cython"
    }

    fn manifest(&self, kernel: &CompiledKernel) -> Manifest {
        let mut files = Manifest::new();
        for entry in [
            device_source_entry(kernel, DEVICE_KERNEL_CU, "Device kernel source code"),
            host_source_entry(kernel),
            library_entry(
                kernel.adapter.lib_path.as_deref(),
                KERNEL_LIB_SO,
                "Compiled shared library",
            ),
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
        let lib = existing(cache_path, KERNEL_LIB_SO)?;
        Some(LoadedKernel::new(lib).with_sources(sources))
    }

    fn required_files(&self) -> Vec<&'static str> {
        vec![KERNEL_LIB_SO]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::KernelAdapterInfo;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_manifest_entries() {
        let build = TempDir::new().unwrap();
        let lib = build.path().join("libkernel.so");
        fs::write(&lib, b"\x7fELF").unwrap();

        let kernel = CompiledKernel::new(
            KernelAdapterInfo::default()
                .with_lib_path(&lib)
                .with_host_source("PyObject* call();"),
        )
        .with_kernel_source("__global__ void k() {}");
        let files = CythonAdapter.manifest(&kernel);

        assert_eq!(
            files.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["device_kernel.cu", "host_kernel.cu", "kernel_lib.so"]
        );
        assert!(files["kernel_lib.so"].required);
        assert_eq!(files["kernel_lib.so"].content.as_bytes(), Some(&b"\x7fELF"[..]));
        assert_eq!(
            files["device_kernel.cu"].description.as_deref(),
            Some("Device kernel source code")
        );
    }

    #[test]
    fn test_manifest_keeps_empty_device_source() {
        let kernel = CompiledKernel::new(KernelAdapterInfo::default()).with_kernel_source("");
        let files = CythonAdapter.manifest(&kernel);
        assert_eq!(files["device_kernel.cu"].content.as_bytes(), Some(&b""[..]));
    }

    #[test]
    fn test_load() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("host_kernel.cu"), "host").unwrap();
        assert!(CythonAdapter.load(tmp.path()).is_none());

        fs::write(tmp.path().join("kernel_lib.so"), "so").unwrap();
        let loaded = CythonAdapter.load(tmp.path()).unwrap();
        assert_eq!(loaded.kernel_lib_path, tmp.path().join("kernel_lib.so"));
        assert_eq!(loaded.host_kernel_source.as_deref(), Some("host"));
        assert_eq!(loaded.device_kernel_source, None);
        assert_eq!(loaded.python_wrapper_path, None);
    }
}
