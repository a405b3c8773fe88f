//! Cache adapter for the Torch execution backend.
//!
//! Torch kernels target several platforms (CUDA, Metal, CPU), so the device
//! source extension is resolved from the kernel's target descriptor at save
//! time. Loading cannot know which target wrote the entry and probes the
//! extensions in [`DEVICE_EXTENSION_PROBE_ORDER`], accepting the first match.

use super::common::{device_source_entry, host_source_entry, library_entry};
use super::{HOST_KERNEL_CU, KERNEL_LIB_SO};
use crate::adapter::{existing, CacheAdapter, LoadedKernel};
use crate::io::{read_text, source_file_name, DEVICE_KERNEL_STEM};
use crate::kernel::CompiledKernel;
use crate::manifest::{self, Manifest};
use std::path::Path;

/// Extensions tried, in order, when loading the device source.
pub const DEVICE_EXTENSION_PROBE_ORDER: [&str; 4] = ["cu", "metal", "cpp", "c"];

/// Resolves the device source extension for a target descriptor.
///
/// `metal` targets take precedence over `cuda`; any other target (HIP, CPU,
/// LLVM) is C++. Kernels without a target are treated as CUDA.
pub fn device_extension(target: Option<&str>) -> &'static str {
    let Some(target) = target else {
        return "cu";
    };
    let target = target.to_lowercase();
    if target.contains("metal") {
        "metal"
    } else if target.contains("cuda") {
        "cu"
    } else {
        "cpp"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TorchAdapter;

impl CacheAdapter for TorchAdapter {
    fn backend_name(&self) -> &'static str {
        "torch"
    }

    fn manifest(&self, kernel: &CompiledKernel) -> Manifest {
        let ext = device_extension(kernel.adapter.target.as_deref());
        let device_file = source_file_name(DEVICE_KERNEL_STEM, ext);
        let description = format!("Device kernel source code ({})", ext);

        let mut files = Manifest::new();
        for entry in [
            device_source_entry(kernel, &device_file, &description),
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
        let device_kernel_source = DEVICE_EXTENSION_PROBE_ORDER
            .iter()
            .find_map(|ext| read_text(&cache_path.join(source_file_name(DEVICE_KERNEL_STEM, ext))));
        let host_kernel_source = read_text(&cache_path.join(HOST_KERNEL_CU));

        let lib = existing(cache_path, KERNEL_LIB_SO)?;
        let mut loaded = LoadedKernel::new(lib);
        loaded.device_kernel_source = device_kernel_source;
        loaded.host_kernel_source = host_kernel_source;
        Some(loaded)
    }

    fn required_files(&self) -> Vec<&'static str> {
        vec![KERNEL_LIB_SO]
    }
}
