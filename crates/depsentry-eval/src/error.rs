use thiserror::Error;

/// Evaluator dispatch and execution errors.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("rule type is missing its eval block")]
    MissingEval,

    #[error("unsupported rule type engine: {0:?}")]
    UnsupportedEngine(String),

    #[error("provider does not implement {0} trait")]
    CapabilityMissing(&'static str),

    #[error("rule config failed schema validation: {0}")]
    ConfigInvalid(String),

    #[error("vulnerability database query failed: {0}")]
    VulnDbFailed(#[from] depsentry_osv::OsvError),

    #[error("trust-score query failed: {0}")]
    TrustyFailed(#[from] depsentry_trusty::TrustyError),

    #[error("registry lookup failed: {0}")]
    RegistryFailed(#[from] depsentry_registry::RegistryError),

    #[error("PR presentation failed: {0}")]
    PresentationFailed(String),
}

pub type Result<T> = std::result::Result<T, EvalError>;
