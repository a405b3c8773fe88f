//! Cache adapter for the CuTeDSL execution backend.
//!
//! The only backend with two hard artifacts: the generated Python module and
//! the C++ launcher library.

use super::common::library_entry;
use crate::adapter::{existing, CacheAdapter, LoadedKernel};
use crate::io::read_text;
use crate::kernel::CompiledKernel;
use crate::manifest::{self, FileManifestEntry, Manifest};
use std::path::Path;

/// Generated Python kernel module.
pub const KERNEL_PY: &str = "kernel.py";
/// C++ launcher library.
pub const LAUNCHER_LIB_SO: &str = "launcher_lib.so";
/// C++ launcher source, kept for debugging.
pub const LAUNCHER_CPP: &str = "launcher.cpp";

#[derive(Debug, Clone, Copy, Default)]
pub struct CuteDslAdapter;

impl CacheAdapter for CuteDslAdapter {
    fn backend_name(&self) -> &'static str {
        "cutedsl"
    }

    fn manifest(&self, kernel: &CompiledKernel) -> Manifest {
        let info = &kernel.adapter;

        let module = info.non_empty_host_source().map(|source| {
            FileManifestEntry::text(KERNEL_PY, source).with_description("Python kernel module")
        });
        let launcher_source = info
            .launcher_source
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|source| {
                FileManifestEntry::text(LAUNCHER_CPP, source)
                    .required(false)
                    .with_description("C++ launcher source code (debugging)")
            });

        let mut files = Manifest::new();
        for entry in [
            module,
            library_entry(
                info.launcher_lib_path.as_deref(),
                LAUNCHER_LIB_SO,
                "C++ launcher library",
            ),
            launcher_source,
        ]
        .into_iter()
        .flatten()
        {
            manifest::insert(&mut files, entry);
        }
        files
    }

    fn load(&self, cache_path: &Path) -> Option<LoadedKernel> {
        let module = existing(cache_path, KERNEL_PY)?;
        let launcher_lib = existing(cache_path, LAUNCHER_LIB_SO)?;

        let mut loaded = LoadedKernel::new(module);
        loaded.launcher_lib_path = Some(launcher_lib);
        loaded.launcher_cpp_code = read_text(&cache_path.join(LAUNCHER_CPP));
        // Device and host code live inside the generated module.
        loaded.device_kernel_source = Some(String::new());
        loaded.host_kernel_source = Some(String::new());
        Some(loaded)
    }

    fn required_files(&self) -> Vec<&'static str> {
        vec![KERNEL_PY, LAUNCHER_LIB_SO]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::KernelAdapterInfo;
    use crate::manifest::WriteMode;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_manifest_two_required_artifacts() {
        let build = TempDir::new().unwrap();
        let launcher = build.path().join("launcher_abc.so");
        fs::write(&launcher, b"launcher").unwrap();

        let kernel = CompiledKernel::new(
            KernelAdapterInfo::default()
                .with_host_source("import cutlass")
                .with_launcher_lib_path(&launcher)
                .with_launcher_source("extern \"C\" int launch();"),
        )
        .with_kernel_source("ignored by cutedsl");
        let files = CuteDslAdapter.manifest(&kernel);

        assert_eq!(
            files.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["kernel.py", "launcher.cpp", "launcher_lib.so"]
        );
        assert!(files["kernel.py"].required);
        assert_eq!(files["kernel.py"].mode, WriteMode::Text);
        assert!(files["launcher_lib.so"].required);
        assert_eq!(files["launcher_lib.so"].mode, WriteMode::Binary);
        assert!(!files["launcher.cpp"].required);
    }

    #[test]
    fn test_manifest_missing_launcher_library() {
        let kernel = CompiledKernel::new(
            KernelAdapterInfo::default()
                .with_host_source("import cutlass")
                .with_launcher_lib_path("/nonexistent/launcher.so"),
        );
        let files = CuteDslAdapter.manifest(&kernel);
        assert_eq!(files.keys().collect::<Vec<_>>(), vec!["kernel.py"]);
    }

    #[test]
    fn test_load_needs_both_artifacts() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("kernel.py"), "import cutlass").unwrap();
        fs::write(tmp.path().join("launcher.cpp"), "cpp").unwrap();
        assert!(CuteDslAdapter.load(tmp.path()).is_none());

        fs::remove_file(tmp.path().join("kernel.py")).unwrap();
        fs::write(tmp.path().join("launcher_lib.so"), "so").unwrap();
        assert!(CuteDslAdapter.load(tmp.path()).is_none());
    }

    #[test]
    fn test_load_reports_embedded_sources_as_empty() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("kernel.py"), "import cutlass").unwrap();
        fs::write(tmp.path().join("launcher_lib.so"), "so").unwrap();

        let loaded = CuteDslAdapter.load(tmp.path()).unwrap();
        assert_eq!(loaded.kernel_lib_path, tmp.path().join("kernel.py"));
        assert_eq!(loaded.launcher_lib_path, Some(tmp.path().join("launcher_lib.so")));
        assert_eq!(loaded.launcher_cpp_code, None);
        assert_eq!(loaded.device_kernel_source.as_deref(), Some(""));
        assert_eq!(loaded.host_kernel_source.as_deref(), Some(""));
    }

    #[test]
    fn test_load_reads_launcher_source() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("kernel.py"), "m").unwrap();
        fs::write(tmp.path().join("launcher_lib.so"), "so").unwrap();
        fs::write(tmp.path().join("launcher.cpp"), "int launch();").unwrap();

        let loaded = CuteDslAdapter.load(tmp.path()).unwrap();
        assert_eq!(loaded.launcher_cpp_code.as_deref(), Some("int launch();"));
    }
}
