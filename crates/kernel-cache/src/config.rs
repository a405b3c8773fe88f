//! Configuration for default adapter discovery.

use std::collections::BTreeSet;

/// Environment variable listing backends to leave out of discovery.
///
/// Comma-separated, e.g. `KERNEL_CACHE_DISABLED_BACKENDS=torch,cutedsl`.
pub const DISABLED_BACKENDS_ENV: &str = "KERNEL_CACHE_DISABLED_BACKENDS";

/// Controls which known backends default discovery may register.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryConfig {
    disabled_backends: BTreeSet<String>,
}

impl DiscoveryConfig {
    /// Creates a configuration with every backend enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the configuration from [`DISABLED_BACKENDS_ENV`].
    pub fn from_env() -> Self {
        match std::env::var(DISABLED_BACKENDS_ENV) {
            Ok(value) => Self::from_disabled_list(&value),
            Err(_) => Self::default(),
        }
    }

    /// Parses a comma-separated list of disabled backend names.
    pub fn from_disabled_list(list: &str) -> Self {
        let disabled_backends = list
            .split(',')
            .map(|name| name.trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();
        Self { disabled_backends }
    }

    /// Disables a backend.
    pub fn disable(mut self, backend: impl Into<String>) -> Self {
        self.disabled_backends.insert(backend.into().to_lowercase());
        self
    }

    /// Returns true if discovery should skip `backend`.
    pub fn is_disabled(&self, backend: &str) -> bool {
        self.disabled_backends.contains(backend)
    }

    /// Disabled backend names, sorted.
    pub fn disabled_backends(&self) -> impl Iterator<Item = &str> {
        self.disabled_backends.iter().map(|s| s.as_str())
    }
}
