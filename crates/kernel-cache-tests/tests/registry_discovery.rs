//! Registry lookup and lazy discovery tests.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p kernel-cache-tests --test registry_discovery
//! ```

use kernel_cache::adapters::{LegacyAdapter, NvrtcAdapter};
use kernel_cache::{
    construct, AdapterFactory, AdapterRegistry, DiscoveryConfig, KnownBackend, ProbeError,
    RegistryError,
};
use kernel_cache_tests::BUILTIN_BACKENDS;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};

// ============================================================================
// Built-in backends
// ============================================================================

#[test]
fn every_builtin_backend_resolves_to_its_adapter() {
    let mut registry = AdapterRegistry::new();
    for name in BUILTIN_BACKENDS {
        let adapter = registry.get(name).unwrap();
        assert_eq!(adapter.backend_name(), name);
    }
}

#[test]
fn required_files_match_backend_table() {
    let mut registry = AdapterRegistry::new();
    let expected: [(&str, Vec<&str>); 6] = [
        ("tvm_ffi", vec!["executable.so"]),
        ("nvrtc", vec!["kernel.cubin"]),
        ("cutedsl", vec!["kernel.py", "launcher_lib.so"]),
        ("cython", vec!["kernel_lib.so"]),
        ("torch", vec!["kernel_lib.so"]),
        ("legacy", vec![]),
    ];
    for (name, files) in expected {
        assert_eq!(registry.get(name).unwrap().required_files(), files, "backend {}", name);
    }
}

#[test]
fn list_names_is_sorted_and_complete() {
    let mut registry = AdapterRegistry::new();
    let mut expected: Vec<String> = BUILTIN_BACKENDS.iter().map(|s| s.to_string()).collect();
    expected.sort();
    assert_eq!(registry.list_names(), expected);
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut registry = AdapterRegistry::new();
    registry.register("nvrtc", construct::<NvrtcAdapter>).unwrap();

    let err = registry.register("nvrtc", construct::<LegacyAdapter>).unwrap_err();
    assert_eq!(err, RegistryError::AlreadyRegistered("nvrtc".to_string()));
    assert_eq!(err.to_string(), "Cache adapter already registered for backend: nvrtc");
}

#[test]
fn unknown_backend_reports_known_names() {
    let mut registry = AdapterRegistry::new();
    match registry.get("ctypes") {
        Err(RegistryError::NotFound { name, available }) => {
            assert_eq!(name, "ctypes");
            assert_eq!(available.len(), BUILTIN_BACKENDS.len());
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(adapter) => panic!("unexpected adapter: {}", adapter.backend_name()),
    }
}

// ============================================================================
// Discovery with unavailable backends
// ============================================================================

static PROBE_CALLS: AtomicUsize = AtomicUsize::new(0);

fn counting_probe(_config: &DiscoveryConfig) -> Result<AdapterFactory, ProbeError> {
    PROBE_CALLS.fetch_add(1, Ordering::SeqCst);
    Ok(construct::<LegacyAdapter>)
}

fn missing_native_probe(_config: &DiscoveryConfig) -> Result<AdapterFactory, ProbeError> {
    Err(ProbeError::Unavailable {
        backend: "nvrtc".to_string(),
        reason: "libnvrtc.so not found".to_string(),
    })
}

#[test]
fn discovery_runs_once_and_tolerates_failed_probes() {
    let mut registry = AdapterRegistry::with_known_backends(
        vec![
            KnownBackend::new("nvrtc", missing_native_probe),
            KnownBackend::new("counted", counting_probe),
        ],
        DiscoveryConfig::new(),
    );

    assert!(!registry.has("nvrtc"));
    assert!(registry.has("counted"));
    assert_eq!(registry.list_names(), vec!["counted".to_string()]);
    assert!(registry.get("nvrtc").is_err());
    assert!(registry.get("counted").is_ok());

    assert_eq!(PROBE_CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn all_probes_failing_yields_empty_table() {
    let mut registry = AdapterRegistry::with_known_backends(
        vec![KnownBackend::new("nvrtc", missing_native_probe)],
        DiscoveryConfig::new(),
    );

    assert!(registry.list_names().is_empty());
    assert!(!registry.has("nvrtc"));
    assert!(registry.is_discovered());
}

#[test]
fn configured_backends_are_omitted() {
    let config = DiscoveryConfig::from_disabled_list("torch, cutedsl");
    let mut registry = AdapterRegistry::with_config(config);

    let names = registry.list_names();
    assert_eq!(names, vec!["cython", "legacy", "nvrtc", "tvm_ffi"]);
    assert!(!registry.has("torch"));
    assert!(matches!(
        registry.get("cutedsl"),
        Err(RegistryError::NotFound { .. })
    ));
}
