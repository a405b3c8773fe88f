//! File-manifest records describing what a cache entry should contain.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Mapping from relative path to the record describing that file.
pub type Manifest = BTreeMap<String, FileManifestEntry>;

/// How a manifest entry is opened for writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Text mode (`"w"`).
    Text,
    /// Binary mode (`"wb"`).
    Binary,
}

impl WriteMode {
    /// Returns the file-open mode string for this write mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteMode::Text => "w",
            WriteMode::Binary => "wb",
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An in-memory compiled executable whose on-disk form is backend specific.
///
/// The adapter layer never serializes this value. The orchestrator downcasts it
/// to the backend's executable type inside its export function.
#[derive(Clone)]
pub struct ExecutableHandle(Arc<dyn Any + Send + Sync>);

impl ExecutableHandle {
    /// Wraps a backend executable object.
    pub fn new<T: Any + Send + Sync>(executable: T) -> Self {
        Self(Arc::new(executable))
    }

    /// Returns the wrapped executable if it is of type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Returns true if both handles refer to the same executable object.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ExecutableHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExecutableHandle(..)")
    }
}

/// Content of a manifest entry.
#[derive(Debug, Clone)]
pub enum FileContent {
    /// Source text.
    Text(String),
    /// Raw bytes (compiled binaries, shared libraries).
    Binary(Vec<u8>),
    /// Opaque executable pending export by the orchestrator.
    Executable(ExecutableHandle),
}

impl FileContent {
    /// Returns the raw bytes for directly writable content.
    ///
    /// Executable handles have no byte form and return `None`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FileContent::Text(text) => Some(text.as_bytes()),
            FileContent::Binary(bytes) => Some(bytes),
            FileContent::Executable(_) => None,
        }
    }
}

/// One file to persist for a compiled kernel.
#[derive(Debug, Clone)]
pub struct FileManifestEntry {
    /// Path relative to the cache directory.
    pub path: String,
    /// What to write.
    pub content: FileContent,
    /// Text or binary write mode.
    pub mode: WriteMode,
    /// Whether absence of this file at load time invalidates the cache entry.
    pub required: bool,
    /// Human-readable purpose of the file.
    pub description: Option<String>,
}

impl FileManifestEntry {
    /// Creates a text entry. Entries are required unless marked otherwise.
    pub fn text(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: FileContent::Text(content.into()),
            mode: WriteMode::Text,
            required: true,
            description: None,
        }
    }

    /// Creates a binary entry.
    pub fn binary(path: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            content: FileContent::Binary(content),
            mode: WriteMode::Binary,
            required: true,
            description: None,
        }
    }

    /// Creates an entry whose content must be exported by the orchestrator.
    pub fn executable(path: impl Into<String>, handle: ExecutableHandle) -> Self {
        Self {
            path: path.into(),
            content: FileContent::Executable(handle),
            mode: WriteMode::Binary,
            required: true,
            description: None,
        }
    }

    /// Sets whether the file is required for the cache entry to be valid.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns true if the content is an executable handle that needs export.
    pub fn is_executable(&self) -> bool {
        matches!(self.content, FileContent::Executable(_))
    }
}

/// Inserts an entry keyed by its own path.
pub(crate) fn insert(manifest: &mut Manifest, entry: FileManifestEntry) {
    manifest.insert(entry.path.clone(), entry);
}
