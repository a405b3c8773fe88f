//! No-op adapter for backends whose persistence is still handled entirely by
//! the orchestrator.

use crate::adapter::{CacheAdapter, LoadedKernel};
use crate::kernel::CompiledKernel;
use crate::manifest::Manifest;
use std::path::Path;

/// Persists nothing and never loads. `validate` always succeeds so the
/// orchestrator's own checks decide validity.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyAdapter;

impl CacheAdapter for LegacyAdapter {
    fn backend_name(&self) -> &'static str {
        "legacy"
    }

    fn manifest(&self, _kernel: &CompiledKernel) -> Manifest {
        Manifest::new()
    }

    fn load(&self, _cache_path: &Path) -> Option<LoadedKernel> {
        None
    }

    fn required_files(&self) -> Vec<&'static str> {
        Vec::new()
    }

    fn validate(&self, _cache_path: &Path) -> bool {
        true
    }
}
