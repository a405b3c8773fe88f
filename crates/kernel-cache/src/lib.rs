//! Kernel Artifact Cache Adapters
//!
//! This crate decides, per compilation backend, which files make up a compiled
//! kernel's cache entry, and how to rebuild a loadable kernel from a cache
//! directory without recompiling.
//!
//! # Overview
//!
//! - **Manifest**: [`CacheAdapter::manifest`] lists the files to persist for a
//!   [`CompiledKernel`], each described by a [`FileManifestEntry`].
//! - **Load**: [`CacheAdapter::load`] returns a [`LoadedKernel`], or `None`
//!   when a required artifact is missing.
//! - **Validate**: [`CacheAdapter::validate`] is an existence-only check of
//!   [`CacheAdapter::required_files`].
//! - **Registry**: [`AdapterRegistry`] maps backend names (`tvm_ffi`, `nvrtc`,
//!   `cutedsl`, `cython`, `torch`, `legacy`) to adapters, discovering the
//!   built-in ones lazily.
//!
//! # Example
//!
//! ```
//! use kernel_cache::{AdapterRegistry, CompiledKernel, KernelAdapterInfo};
//!
//! let mut registry = AdapterRegistry::new();
//! let adapter = registry.get("torch").unwrap();
//!
//! let kernel = CompiledKernel::new(KernelAdapterInfo::default().with_target("metal"))
//!     .with_kernel_source("kernel void add() {}");
//! let manifest = adapter.manifest(&kernel);
//!
//! assert!(manifest.contains_key("device_kernel.metal"));
//! assert_eq!(adapter.required_files(), vec!["kernel_lib.so"]);
//! ```
//!
//! # Modules
//!
//! - [`adapter`]: The adapter trait and load result
//! - [`adapters`]: Built-in backend adapters
//! - [`config`]: Discovery configuration
//! - [`io`]: Best-effort read helpers
//! - [`manifest`]: File-manifest records
//! - [`registry`]: Backend name to adapter registry
//! - [`store`]: Writing manifests and loading entries for the orchestrator

pub mod adapter;
pub mod adapters;
pub mod config;
pub mod error;
pub mod io;
pub mod kernel;
pub mod manifest;
pub mod registry;
pub mod store;

pub use adapter::{CacheAdapter, LoadedKernel};
pub use config::{DiscoveryConfig, DISABLED_BACKENDS_ENV};
pub use error::{ProbeError, RegistryError, StoreError, StoreResult};
pub use kernel::{CompiledKernel, KernelAdapterInfo};
pub use manifest::{ExecutableHandle, FileContent, FileManifestEntry, Manifest, WriteMode};
pub use registry::{
    construct, default_known_backends, global_registry, AdapterFactory, AdapterRegistry,
    KnownBackend, Probe,
};
pub use store::{load_cached, write_manifest, ExecutableExporter, WriteSummary};
