//! # depsentry-registry
//!
//! Per-ecosystem package-registry cache (§4.B) and the patch
//! locator/formatter family (§4.C) that produces ecosystem-specific
//! suggestion diffs for npm, Go modules and PyPI.

pub mod cache;
pub mod client;
pub mod error;
pub mod go;
pub mod npm;
pub mod patch;
pub mod pypi;
pub mod wire;

pub use cache::RegistryCache;
pub use client::{RegistryClient, RegistryLookup};
pub use error::{RegistryError, Result};
pub use go::{GoPatchFormatter, GoRegistryClient};
pub use npm::{NpmPatchFormatter, NpmRegistryClient};
pub use patch::{NoPatchAvailableFormatter, PatchFormatter, PkgRegistryErrorFormatter, NO_PATCH_AVAILABLE_TEXT};
pub use pypi::{PyPiPatchFormatter, PyPiRegistryClient};
