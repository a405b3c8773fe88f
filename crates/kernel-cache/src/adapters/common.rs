//! Manifest entries shared by several adapters.

use super::HOST_KERNEL_CU;
use crate::io::read_binary;
use crate::kernel::CompiledKernel;
use crate::manifest::FileManifestEntry;
use std::path::Path;

/// Optional device source entry, present whenever the kernel kept its source.
pub(super) fn device_source_entry(
    kernel: &CompiledKernel,
    file_name: &str,
    description: &str,
) -> Option<FileManifestEntry> {
    kernel.kernel_source.as_ref().map(|source| {
        FileManifestEntry::text(file_name, source.as_str())
            .required(false)
            .with_description(description)
    })
}

/// Optional host source entry, present when the host source is non-empty.
pub(super) fn host_source_entry(kernel: &CompiledKernel) -> Option<FileManifestEntry> {
    kernel.adapter.non_empty_host_source().map(|source| {
        FileManifestEntry::text(HOST_KERNEL_CU, source)
            .required(false)
            .with_description("Host wrapper source code")
    })
}

/// Required binary entry read from `lib_path`.
///
/// Omitted when the path is unset or unreadable.
pub(super) fn library_entry(
    lib_path: Option<&Path>,
    file_name: &str,
    description: &str,
) -> Option<FileManifestEntry> {
    let bytes = read_binary(lib_path?)?;
    Some(FileManifestEntry::binary(file_name, bytes).with_description(description))
}
