//! # depsentry-eval
//!
//! Evaluator dispatch plus the two evaluators this workspace implements
//! natively: vulncheck and trusty. `jq`, `rego` and `homoglyphs` are
//! dispatched to but not implemented here.

pub mod capability;
pub mod dispatch;
pub mod error;
pub mod presentation;
pub mod trusty;
pub mod vulncheck;

pub use capability::{ProviderCapabilities, ProviderCapability};
pub use dispatch::{resolve_engine, EvaluatorEngine};
pub use error::{EvalError, Result};
pub use presentation::{
    PresentationHandlerFactory, PresentationOutcome, PrPresentationHandler, TrackedTrustyFinding,
    TrackedVulnerability,
};
pub use trusty::TrustyEvaluator;
pub use vulncheck::VulncheckEvaluator;
