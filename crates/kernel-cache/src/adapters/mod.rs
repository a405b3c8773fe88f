//! Built-in cache adapters, one per execution backend.
//!
//! Each backend except `legacy` sits behind a cargo feature of the same name.
//! A disabled feature stands in for a missing native dependency, and default
//! discovery skips that backend.
//!
//! File names written here are part of the on-disk compatibility contract.

#[cfg(any(
    feature = "tvm-ffi",
    feature = "nvrtc",
    feature = "cutedsl",
    feature = "cython",
    feature = "torch"
))]
mod common;
#[cfg(feature = "cutedsl")]
mod cutedsl;
#[cfg(feature = "cython")]
mod cython;
mod legacy;
#[cfg(feature = "nvrtc")]
mod nvrtc;
#[cfg(feature = "torch")]
mod torch;
#[cfg(feature = "tvm-ffi")]
mod tvm_ffi;

#[cfg(feature = "cutedsl")]
pub use cutedsl::CuteDslAdapter;
#[cfg(feature = "cython")]
pub use cython::CythonAdapter;
pub use legacy::LegacyAdapter;
#[cfg(feature = "nvrtc")]
pub use nvrtc::NvrtcAdapter;
#[cfg(feature = "torch")]
pub use torch::{device_extension, TorchAdapter, DEVICE_EXTENSION_PROBE_ORDER};
#[cfg(feature = "tvm-ffi")]
pub use tvm_ffi::TvmFfiAdapter;

/// Device kernel source written by CUDA-flavored backends.
pub const DEVICE_KERNEL_CU: &str = "device_kernel.cu";
/// Host wrapper source.
pub const HOST_KERNEL_CU: &str = "host_kernel.cu";
/// Compiled shared library (Cython, Torch).
pub const KERNEL_LIB_SO: &str = "kernel_lib.so";
