//! The compiled-kernel view consumed by cache adapters.
//!
//! Backends expose different capabilities: some carry a host wrapper source,
//! some a compiled library on disk, some an in-memory executable. Every
//! capability is an optional field here, and adapters read only the fields
//! their backend defines.

use crate::manifest::ExecutableHandle;
use std::path::PathBuf;

/// A compiled kernel handed to [`crate::CacheAdapter::manifest`].
#[derive(Debug, Clone, Default)]
pub struct CompiledKernel {
    /// Raw device kernel source, if the compiler kept it.
    pub kernel_source: Option<String>,
    /// Backend-specific adapter information.
    pub adapter: KernelAdapterInfo,
}

impl CompiledKernel {
    /// Creates a kernel with the given adapter information and no device source.
    pub fn new(adapter: KernelAdapterInfo) -> Self {
        Self {
            kernel_source: None,
            adapter,
        }
    }

    /// Sets the device kernel source.
    pub fn with_kernel_source(mut self, source: impl Into<String>) -> Self {
        self.kernel_source = Some(source.into());
        self
    }
}

/// Per-backend capabilities of a compiled kernel.
#[derive(Debug, Clone, Default)]
pub struct KernelAdapterInfo {
    /// Host wrapper source. For CuTeDSL this is the generated Python module.
    pub host_source: Option<String>,
    /// Target or platform descriptor, e.g. `"cuda -arch=sm_90"` or `"metal"`.
    pub target: Option<String>,
    /// Compiled library on disk (cubin or shared object).
    pub lib_path: Option<PathBuf>,
    /// CuTeDSL launcher shared library.
    pub launcher_lib_path: Option<PathBuf>,
    /// CuTeDSL launcher C++ source.
    pub launcher_source: Option<String>,
    /// In-memory executable (TVM-FFI).
    pub executable: Option<ExecutableHandle>,
}

impl KernelAdapterInfo {
    pub fn with_host_source(mut self, source: impl Into<String>) -> Self {
        self.host_source = Some(source.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.lib_path = Some(path.into());
        self
    }

    pub fn with_launcher_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.launcher_lib_path = Some(path.into());
        self
    }

    pub fn with_launcher_source(mut self, source: impl Into<String>) -> Self {
        self.launcher_source = Some(source.into());
        self
    }

    pub fn with_executable(mut self, executable: ExecutableHandle) -> Self {
        self.executable = Some(executable);
        self
    }

    /// Host source, treating an empty string as absent.
    pub(crate) fn non_empty_host_source(&self) -> Option<&str> {
        self.host_source.as_deref().filter(|s| !s.is_empty())
    }
}
