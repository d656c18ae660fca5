//! # depsentry-github
//!
//! GitHub REST client restricted to the engine's capability surface, the
//! magic-marker status-comment grammar, the patch-locator inline comment
//! placement, and the two concrete PR presentation handlers that drive the
//! GitHub writes for the vulncheck and trusty evaluators.

pub mod capability;
pub mod client;
pub mod error;
pub mod handler;
pub mod locator;
pub mod marker;
pub mod render;
pub mod wire;

pub use capability::GitHubProvider;
pub use client::GitHubClient;
pub use error::{GitHubError, Result};
pub use handler::{
    TrustyFindingEntry, TrustyPresentationHandler, TrustyPresentationHandlerFactory,
    VulnerableEntry, VulncheckPresentationHandler, VulncheckPresentationHandlerFactory,
    COMMIT_STATUS_CONTEXT, DISMISSAL_MESSAGE,
};
pub use marker::StatusMarker;
