//! The cache adapter contract every backend implements.

use crate::io::ConventionalSources;
use crate::kernel::CompiledKernel;
use crate::manifest::Manifest;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Strategy that decides how one backend's kernels are cached.
///
/// Adapters are stateless. The registry constructs a fresh instance on every
/// lookup.
pub trait CacheAdapter: Send + Sync {
    /// Backend name this adapter is registered under (e.g. `"nvrtc"`).
    fn backend_name(&self) -> &'static str;

    /// Returns every file that should be persisted for `kernel`.
    ///
    /// Missing optional kernel attributes omit the corresponding entry.
    fn manifest(&self, kernel: &CompiledKernel) -> Manifest;

    /// Reconstructs a loadable kernel from `cache_path`.
    ///
    /// Returns `None` iff a required artifact is missing. Optional artifacts
    /// that are missing are left out of the result.
    fn load(&self, cache_path: &Path) -> Option<LoadedKernel>;

    /// Files whose presence certifies `cache_path` as a reloadable entry.
    fn required_files(&self) -> Vec<&'static str>;

    /// Returns true iff every required file exists under `cache_path`.
    ///
    /// Existence only; content is never inspected.
    fn validate(&self, cache_path: &Path) -> bool {
        self.required_files()
            .iter()
            .all(|file| cache_path.join(file).exists())
    }
}

/// Kernel data recovered from a cache directory.
///
/// Serializes to an object keyed by field name; absent optional values are
/// omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedKernel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_kernel_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_kernel_source: Option<String>,
    /// The primary compiled artifact (cubin, shared library, executable, or
    /// generated module).
    pub kernel_lib_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python_wrapper_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launcher_lib_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launcher_cpp_code: Option<String>,
}

impl LoadedKernel {
    /// Creates a result with only the primary artifact set.
    pub fn new(kernel_lib_path: impl Into<PathBuf>) -> Self {
        Self {
            device_kernel_source: None,
            host_kernel_source: None,
            kernel_lib_path: kernel_lib_path.into(),
            python_wrapper_path: None,
            launcher_lib_path: None,
            launcher_cpp_code: None,
        }
    }

    /// Fills the device and host sources.
    pub fn with_sources(mut self, sources: ConventionalSources) -> Self {
        self.device_kernel_source = sources.device_kernel_source;
        self.host_kernel_source = sources.host_kernel_source;
        self
    }

    /// All on-disk artifact paths referenced by this result.
    pub fn artifact_paths(&self) -> Vec<&Path> {
        let mut paths = vec![self.kernel_lib_path.as_path()];
        paths.extend(self.python_wrapper_path.as_deref());
        paths.extend(self.launcher_lib_path.as_deref());
        paths
    }
}

/// Returns `cache_path/file` if it exists.
pub(crate) fn existing(cache_path: &Path, file: &str) -> Option<PathBuf> {
    let path = cache_path.join(file);
    path.exists().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::FileManifestEntry;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    struct TwoFileAdapter;

    impl CacheAdapter for TwoFileAdapter {
        fn backend_name(&self) -> &'static str {
            "two_file"
        }

        fn manifest(&self, _kernel: &CompiledKernel) -> Manifest {
            let mut files = Manifest::new();
            crate::manifest::insert(&mut files, FileManifestEntry::text("a.txt", "a"));
            files
        }

        fn load(&self, cache_path: &Path) -> Option<LoadedKernel> {
            existing(cache_path, "a.txt").map(LoadedKernel::new)
        }

        fn required_files(&self) -> Vec<&'static str> {
            vec!["a.txt", "b.bin"]
        }
    }

    struct PermissiveAdapter;

    impl CacheAdapter for PermissiveAdapter {
        fn backend_name(&self) -> &'static str {
            "permissive"
        }

        fn manifest(&self, _kernel: &CompiledKernel) -> Manifest {
            Manifest::new()
        }

        fn load(&self, _cache_path: &Path) -> Option<LoadedKernel> {
            None
        }

        fn required_files(&self) -> Vec<&'static str> {
            vec!["never_written"]
        }

        fn validate(&self, _cache_path: &Path) -> bool {
            true
        }
    }

    #[test]
    fn test_default_validate_requires_all_files() {
        let tmp = TempDir::new().unwrap();
        let adapter = TwoFileAdapter;
        assert!(!adapter.validate(tmp.path()));

        fs::write(tmp.path().join("a.txt"), "a").unwrap();
        assert!(!adapter.validate(tmp.path()));

        fs::write(tmp.path().join("b.bin"), b"").unwrap();
        assert!(adapter.validate(tmp.path()));
    }

    #[test]
    fn test_validate_is_overridable_through_trait_object() {
        let adapter: Box<dyn CacheAdapter> = Box::new(PermissiveAdapter);
        assert!(adapter.validate(Path::new("/nonexistent/kernel-cache")));
    }

    #[test]
    fn test_loaded_kernel_serializes_present_keys_only() {
        let loaded = LoadedKernel::new("/cache/kernel.cubin").with_sources(ConventionalSources {
            device_kernel_source: Some("dev".to_string()),
            host_kernel_source: None,
        });

        let json = serde_json::to_value(&loaded).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "device_kernel_source": "dev",
                "kernel_lib_path": "/cache/kernel.cubin",
            })
        );

        let back: LoadedKernel = serde_json::from_value(json).unwrap();
        assert_eq!(back, loaded);
    }

    #[test]
    fn test_artifact_paths() {
        let mut loaded = LoadedKernel::new("/c/kernel.py");
        loaded.launcher_lib_path = Some(PathBuf::from("/c/launcher_lib.so"));
        assert_eq!(
            loaded.artifact_paths(),
            vec![Path::new("/c/kernel.py"), Path::new("/c/launcher_lib.so")]
        );
    }
}
