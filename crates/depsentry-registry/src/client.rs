use async_trait::async_trait;
use depsentry_core::Dependency;

use crate::error::Result;
use crate::patch::PatchFormatter;

/// Result of resolving a patched/latest version against a registry.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryLookup {
    Npm {
        version: String,
        integrity: String,
        tarball: String,
    },
    Go {
        version: String,
        module_hash: Option<String>,
        gomod_hash: Option<String>,
    },
    PyPi {
        version: String,
    },
}

impl RegistryLookup {
    pub fn version(&self) -> &str {
        match self {
            RegistryLookup::Npm { version, .. } => version,
            RegistryLookup::Go { version, .. } => version,
            RegistryLookup::PyPi { version } => version,
        }
    }
}

/// A per-ecosystem registry client: resolves a concrete version (patched or
/// `latest`) and can hand back the degenerate "no patch available" formatter
/// for this ecosystem.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Resolve `patched_version` against the registry. When `use_latest` is
    /// true the ecosystem's `latest` endpoint is queried instead (§4.G:
    /// "latest-only" signal when a non-SEMVER fixed value was seen).
    async fn send_recv(
        &self,
        dep: &Dependency,
        patched_version: &str,
        use_latest: bool,
    ) -> Result<RegistryLookup>;

    /// Degenerate formatter used when no patched version exists for `dep`.
    fn no_patch_available_formatter(&self, dep: &Dependency) -> Box<dyn PatchFormatter>;

    /// Ecosystem-specific locator/formatter for a successful lookup (§4.C).
    fn patch_formatter(&self, dep: &Dependency, lookup: &RegistryLookup) -> Box<dyn PatchFormatter>;
}
