//! Error types for adapter registration, discovery, and manifest writing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by [`crate::AdapterRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A cache adapter is already registered under this backend name.
    #[error("Cache adapter already registered for backend: {0}")]
    AlreadyRegistered(String),

    /// No adapter is registered for the backend, even after discovery.
    #[error("No cache adapter registered for backend: {name}. Available backends: [{}]", .available.join(", "))]
    NotFound {
        name: String,
        available: Vec<String>,
    },
}

/// Reasons a known backend is left out of default discovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The adapter was compiled out (its cargo feature is disabled).
    #[error("adapter for backend '{backend}' was not compiled in")]
    NotCompiled { backend: String },

    /// The backend was disabled through [`crate::DiscoveryConfig`].
    #[error("backend '{backend}' is disabled by configuration")]
    Disabled { backend: String },

    /// The backend's native dependency is unavailable.
    #[error("backend '{backend}' is unavailable: {reason}")]
    Unavailable { backend: String, reason: String },
}

/// Errors raised while fulfilling a manifest on disk.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Manifest entry path escapes the cache directory or is malformed.
    #[error("Unsafe manifest entry path '{path}': {reason}")]
    UnsafePath { path: String, reason: String },

    /// An executable entry was found but no exporter was supplied.
    #[error("Manifest entry '{path}' holds an executable handle but no exporter was provided")]
    MissingExporter { path: String },

    /// The exporter failed to serialize an executable handle.
    #[error("Failed to export executable to {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a text or binary entry failed.
    #[error("Failed to write cache file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
