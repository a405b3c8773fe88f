//! Registry mapping backend names to cache adapter constructors.
//!
//! A registry starts empty. Adapters are added explicitly with
//! [`AdapterRegistry::register`] or implicitly the first time a lookup misses
//! (or the table is enumerated while empty). Implicit discovery walks a fixed
//! list of known backends and probes each one independently; a failed probe
//! leaves only that backend out.
//!
//! Mutation takes `&mut self`. The process-wide instance returned by
//! [`global_registry`] sits behind a mutex and is meant to be populated during
//! startup.

use crate::adapter::CacheAdapter;
use crate::adapters::LegacyAdapter;
use crate::config::DiscoveryConfig;
use crate::error::{ProbeError, RegistryError};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

#[cfg(feature = "cutedsl")]
use crate::adapters::CuteDslAdapter;
#[cfg(feature = "cython")]
use crate::adapters::CythonAdapter;
#[cfg(feature = "nvrtc")]
use crate::adapters::NvrtcAdapter;
#[cfg(feature = "torch")]
use crate::adapters::TorchAdapter;
#[cfg(feature = "tvm-ffi")]
use crate::adapters::TvmFfiAdapter;

/// Constructs a fresh adapter instance.
pub type AdapterFactory = fn() -> Box<dyn CacheAdapter>;

/// Checks whether a backend can be used and returns its constructor.
pub type Probe = fn(&DiscoveryConfig) -> Result<AdapterFactory, ProbeError>;

/// Constructor for any adapter with a `Default` impl.
pub fn construct<A: CacheAdapter + Default + 'static>() -> Box<dyn CacheAdapter> {
    Box::new(A::default())
}

/// A backend default discovery knows how to probe.
#[derive(Clone, Copy)]
pub struct KnownBackend {
    pub name: &'static str,
    pub probe: Probe,
}

impl KnownBackend {
    pub const fn new(name: &'static str, probe: Probe) -> Self {
        Self { name, probe }
    }
}

impl fmt::Debug for KnownBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnownBackend").field("name", &self.name).finish()
    }
}

#[cfg(feature = "tvm-ffi")]
const TVM_FFI: Option<AdapterFactory> = Some(construct::<TvmFfiAdapter> as AdapterFactory);
#[cfg(not(feature = "tvm-ffi"))]
const TVM_FFI: Option<AdapterFactory> = None;

#[cfg(feature = "nvrtc")]
const NVRTC: Option<AdapterFactory> = Some(construct::<NvrtcAdapter> as AdapterFactory);
#[cfg(not(feature = "nvrtc"))]
const NVRTC: Option<AdapterFactory> = None;

#[cfg(feature = "cutedsl")]
const CUTEDSL: Option<AdapterFactory> = Some(construct::<CuteDslAdapter> as AdapterFactory);
#[cfg(not(feature = "cutedsl"))]
const CUTEDSL: Option<AdapterFactory> = None;

#[cfg(feature = "cython")]
const CYTHON: Option<AdapterFactory> = Some(construct::<CythonAdapter> as AdapterFactory);
#[cfg(not(feature = "cython"))]
const CYTHON: Option<AdapterFactory> = None;

#[cfg(feature = "torch")]
const TORCH: Option<AdapterFactory> = Some(construct::<TorchAdapter> as AdapterFactory);
#[cfg(not(feature = "torch"))]
const TORCH: Option<AdapterFactory> = None;

fn gate(
    config: &DiscoveryConfig,
    backend: &str,
    factory: Option<AdapterFactory>,
) -> Result<AdapterFactory, ProbeError> {
    if config.is_disabled(backend) {
        return Err(ProbeError::Disabled {
            backend: backend.to_string(),
        });
    }
    factory.ok_or_else(|| ProbeError::NotCompiled {
        backend: backend.to_string(),
    })
}

fn probe_tvm_ffi(config: &DiscoveryConfig) -> Result<AdapterFactory, ProbeError> {
    gate(config, "tvm_ffi", TVM_FFI)
}

fn probe_nvrtc(config: &DiscoveryConfig) -> Result<AdapterFactory, ProbeError> {
    gate(config, "nvrtc", NVRTC)
}

fn probe_cutedsl(config: &DiscoveryConfig) -> Result<AdapterFactory, ProbeError> {
    gate(config, "cutedsl", CUTEDSL)
}

fn probe_cython(config: &DiscoveryConfig) -> Result<AdapterFactory, ProbeError> {
    gate(config, "cython", CYTHON)
}

fn probe_torch(config: &DiscoveryConfig) -> Result<AdapterFactory, ProbeError> {
    gate(config, "torch", TORCH)
}

fn probe_legacy(config: &DiscoveryConfig) -> Result<AdapterFactory, ProbeError> {
    gate(config, "legacy", Some(construct::<LegacyAdapter> as AdapterFactory))
}

/// The built-in backends, in discovery order.
pub fn default_known_backends() -> Vec<KnownBackend> {
    vec![
        KnownBackend::new("tvm_ffi", probe_tvm_ffi),
        KnownBackend::new("nvrtc", probe_nvrtc),
        KnownBackend::new("cutedsl", probe_cutedsl),
        KnownBackend::new("cython", probe_cython),
        KnownBackend::new("torch", probe_torch),
        KnownBackend::new("legacy", probe_legacy),
    ]
}

/// Registry of cache adapters indexed by backend name.
pub struct AdapterRegistry {
    /// Constructors indexed by backend name.
    adapters: BTreeMap<String, AdapterFactory>,
    /// Backends probed by default discovery.
    known_backends: Vec<KnownBackend>,
    config: DiscoveryConfig,
    /// Set once default discovery has run.
    discovered: bool,
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("adapters", &self.adapters.keys().collect::<Vec<_>>())
            .field("known_backends", &self.known_backends)
            .field("config", &self.config)
            .field("discovered", &self.discovered)
            .finish()
    }
}

impl AdapterRegistry {
    /// Creates an empty registry over the built-in backends.
    pub fn new() -> Self {
        Self::with_config(DiscoveryConfig::default())
    }

    /// Creates an empty registry over the built-in backends with `config`.
    pub fn with_config(config: DiscoveryConfig) -> Self {
        Self::with_known_backends(default_known_backends(), config)
    }

    /// Creates an empty registry whose discovery probes `known_backends`.
    pub fn with_known_backends(known_backends: Vec<KnownBackend>, config: DiscoveryConfig) -> Self {
        Self {
            adapters: BTreeMap::new(),
            known_backends,
            config,
            discovered: false,
        }
    }

    /// Registers an adapter constructor for a backend.
    pub fn register(
        &mut self,
        backend_name: impl Into<String>,
        factory: AdapterFactory,
    ) -> Result<(), RegistryError> {
        let backend_name = backend_name.into();
        if self.adapters.contains_key(&backend_name) {
            return Err(RegistryError::AlreadyRegistered(backend_name));
        }
        self.adapters.insert(backend_name, factory);
        Ok(())
    }

    /// Returns a fresh adapter for `backend_name`.
    ///
    /// Runs default discovery if the name is unknown.
    pub fn get(&mut self, backend_name: &str) -> Result<Box<dyn CacheAdapter>, RegistryError> {
        if !self.adapters.contains_key(backend_name) {
            self.discover();
        }

        match self.adapters.get(backend_name) {
            Some(factory) => Ok(factory()),
            None => Err(RegistryError::NotFound {
                name: backend_name.to_string(),
                available: self.adapters.keys().cloned().collect(),
            }),
        }
    }

    /// Returns true if an adapter is registered for `backend_name`.
    pub fn has(&mut self, backend_name: &str) -> bool {
        if self.adapters.is_empty() {
            self.discover();
        }
        self.adapters.contains_key(backend_name)
    }

    /// Lists registered backend names in sorted order.
    pub fn list_names(&mut self) -> Vec<String> {
        if self.adapters.is_empty() {
            self.discover();
        }
        self.adapters.keys().cloned().collect()
    }

    /// Runs default discovery if it has not run yet.
    ///
    /// Returns the probe failures of this run; backends that failed are left
    /// out. Names already registered explicitly are kept as they are.
    pub fn discover(&mut self) -> Vec<ProbeError> {
        if self.discovered {
            return Vec::new();
        }
        self.discovered = true;

        let mut skipped = Vec::new();
        for backend in &self.known_backends {
            match (backend.probe)(&self.config) {
                Ok(factory) => {
                    if self.adapters.contains_key(backend.name) {
                        log::debug!("Cache adapter '{}' already registered, keeping it", backend.name);
                        continue;
                    }
                    log::debug!("Registered cache adapter '{}'", backend.name);
                    self.adapters.insert(backend.name.to_string(), factory);
                }
                Err(e) => {
                    log::debug!("Skipping cache adapter '{}': {}", backend.name, e);
                    skipped.push(e);
                }
            }
        }
        skipped
    }

    /// Returns true once default discovery has run.
    pub fn is_discovered(&self) -> bool {
        self.discovered
    }

    /// Returns the number of registered adapters.
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Returns true if no adapters are registered.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

static GLOBAL_REGISTRY: LazyLock<Mutex<AdapterRegistry>> =
    LazyLock::new(|| Mutex::new(AdapterRegistry::with_config(DiscoveryConfig::from_env())));

/// Locks the process-wide registry.
///
/// Configured from the environment on first use (see
/// [`crate::config::DISABLED_BACKENDS_ENV`]).
pub fn global_registry() -> MutexGuard<'static, AdapterRegistry> {
    GLOBAL_REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}
