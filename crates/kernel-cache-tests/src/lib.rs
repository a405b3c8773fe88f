//! Kernel Cache Integration Test Infrastructure
//!
//! Fixtures shared by the integration tests:
//!
//! - Compiled kernels for every built-in backend, with their build artifacts
//!   written to a scratch directory
//! - A fake in-memory executable and the exporter that writes it
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p kernel-cache-tests
//! ```

use anyhow::{bail, Context, Result};
use kernel_cache::{CompiledKernel, ExecutableHandle, KernelAdapterInfo};
use std::fs;
use std::io;
use std::path::Path;

/// Every built-in backend name, in discovery order.
pub const BUILTIN_BACKENDS: [&str; 6] = ["tvm_ffi", "nvrtc", "cutedsl", "cython", "torch", "legacy"];

/// Every file name any built-in adapter reads or writes.
pub const ALL_CACHE_FILES: [&str; 11] = [
    "device_kernel.cu",
    "device_kernel.metal",
    "device_kernel.cpp",
    "device_kernel.c",
    "host_kernel.cu",
    "executable.so",
    "kernel.cubin",
    "kernel.py",
    "kernel_lib.so",
    "launcher_lib.so",
    "launcher.cpp",
];

pub const DEVICE_SOURCE: &str = "extern \"C\" __global__ void add(float* a) { a[threadIdx.x] += 1.0f; }";
pub const HOST_SOURCE: &str = "int call(void** args) { return launch(args); }";

/// Stand-in for a TVM runtime module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeExecutable(pub Vec<u8>);

/// Exporter for [`FakeExecutable`] handles.
pub fn export_fake_executable(handle: &ExecutableHandle, dest: &Path) -> io::Result<()> {
    let executable = handle
        .downcast_ref::<FakeExecutable>()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "unexpected executable type"))?;
    fs::write(dest, &executable.0)
}

/// Builds a fully populated compiled kernel for `backend`.
///
/// Build artifacts (libraries, wrappers) are written into `build_dir`.
pub fn kernel_for(backend: &str, build_dir: &Path) -> Result<CompiledKernel> {
    let write = |name: &str, bytes: &[u8]| -> Result<std::path::PathBuf> {
        let path = build_dir.join(name);
        fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    };

    let info = KernelAdapterInfo::default().with_host_source(HOST_SOURCE);
    let kernel = match backend {
        "tvm_ffi" => CompiledKernel::new(
            info.with_executable(ExecutableHandle::new(FakeExecutable(b"tvm-module".to_vec()))),
        )
        .with_kernel_source(DEVICE_SOURCE),
        "nvrtc" => {
            let cubin = write("add_kernel.cubin", b"\x7fCUBIN")?;
            write("add_kernel.py", b"from cuda import cuda\n")?;
            CompiledKernel::new(info.with_lib_path(cubin)).with_kernel_source(DEVICE_SOURCE)
        }
        "cutedsl" => {
            let launcher = write("launcher_add.so", b"\x7fELF-launcher")?;
            CompiledKernel::new(
                KernelAdapterInfo::default()
                    .with_host_source("import cutlass.cute as cute\n")
                    .with_launcher_lib_path(launcher)
                    .with_launcher_source("extern \"C\" int launch(void** args);"),
            )
        }
        "cython" => {
            let lib = write("add_cython.so", b"\x7fELF-cython")?;
            CompiledKernel::new(info.with_lib_path(lib)).with_kernel_source(DEVICE_SOURCE)
        }
        "torch" => {
            let lib = write("add_torch.so", b"\x7fELF-torch")?;
            CompiledKernel::new(info.with_lib_path(lib).with_target("cuda -arch=sm_90"))
                .with_kernel_source(DEVICE_SOURCE)
        }
        "legacy" => CompiledKernel::new(info).with_kernel_source(DEVICE_SOURCE),
        other => bail!("no fixture for backend '{}'", other),
    };
    Ok(kernel)
}

/// Creates empty files named `names` in `dir`.
pub fn touch_files(dir: &Path, names: &[&str]) -> Result<()> {
    for name in names {
        fs::write(dir.join(name), b"").with_context(|| format!("touching {}", name))?;
    }
    Ok(())
}
