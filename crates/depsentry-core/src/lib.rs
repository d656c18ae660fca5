//! # depsentry-core
//!
//! Shared data model for the depsentry pull-request dependency policy engine.
//!
//! This crate has no network I/O of its own; it only defines the types that
//! flow between the OSV client, the registry cache, the trust-score client,
//! the rule-type engine and the GitHub presentation layer. Keeping it
//! dependency-free (beyond serde/semver) lets every other crate in the
//! workspace depend on it without pulling in an HTTP stack.

pub mod dependency;
pub mod error;
pub mod pull_request;
pub mod rule;
pub mod trusty;
pub mod vulnerability;

pub use dependency::{normalise_go_version, normalise_pypi_name, ContextualDependency, Dependency, Ecosystem};
pub use error::{CoreError, Result};
pub use pull_request::PullRequest;
pub use rule::{
    Action, EcosystemDefaults, Ingested, IngestedObject, PrDependencies, RegistryEndpoint,
    RuleConfig, RuleType, RuleTypeContext, RuleTypeDef, RuleTypeEval, RuleTypeScope,
    TrustyEcosystemConfig, VulncheckEcosystemConfig,
};
pub use trusty::{ProvenanceInfo, ScoreComponent, TrustyAlternative, TrustyReport};
pub use vulnerability::{RangeType, Vulnerability};

/// Crate version, exposed for user-agent strings the way `bazbom-core::VERSION` is.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
