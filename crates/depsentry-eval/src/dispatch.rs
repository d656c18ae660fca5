use depsentry_core::RuleTypeEval;

use crate::capability::{ProviderCapabilities, ProviderCapability};
use crate::error::{EvalError, Result};

/// The evaluator engine a rule type's `eval.type` selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluatorEngine {
    Jq,
    Rego,
    Vulncheck,
    Trusty,
    Homoglyphs,
}

impl EvaluatorEngine {
    fn required_capability(self) -> Option<ProviderCapability> {
        match self {
            EvaluatorEngine::Vulncheck | EvaluatorEngine::Trusty => {
                Some(ProviderCapability::GitHub)
            }
            EvaluatorEngine::Homoglyphs => Some(ProviderCapability::Git),
            EvaluatorEngine::Jq | EvaluatorEngine::Rego => None,
        }
    }
}

/// Selects the evaluator engine named by `eval.type` and checks that
/// `provider` satisfies whatever capability it requires. Missing `eval`
/// itself is a separate error surfaced by the rule-type registry, not here.
pub fn resolve_engine(
    eval: &RuleTypeEval,
    provider: &dyn ProviderCapabilities,
) -> Result<EvaluatorEngine> {
    let engine = match eval.eval_type.as_str() {
        "jq" => EvaluatorEngine::Jq,
        "rego" => EvaluatorEngine::Rego,
        "vulncheck" => EvaluatorEngine::Vulncheck,
        "trusty" => EvaluatorEngine::Trusty,
        "homoglyphs" => EvaluatorEngine::Homoglyphs,
        other => return Err(EvalError::UnsupportedEngine(other.to_string())),
    };

    if let Some(capability) = engine.required_capability() {
        if !provider.supports(capability) {
            return Err(EvalError::CapabilityMissing(capability.name()));
        }
    }

    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeProvider {
        github: bool,
    }

    impl ProviderCapabilities for FakeProvider {
        fn supports(&self, capability: ProviderCapability) -> bool {
            match capability {
                ProviderCapability::GitHub => self.github,
                ProviderCapability::Git => false,
            }
        }
    }

    fn eval(eval_type: &str) -> RuleTypeEval {
        RuleTypeEval {
            eval_type: eval_type.to_string(),
            extra: Default::default(),
        }
    }

    #[test]
    fn resolves_vulncheck_with_github_capability() {
        let provider = FakeProvider { github: true };
        let engine = resolve_engine(&eval("vulncheck"), &provider).unwrap();
        assert_eq!(engine, EvaluatorEngine::Vulncheck);
    }

    #[test]
    fn vulncheck_without_github_capability_errors() {
        let provider = FakeProvider { github: false };
        assert!(matches!(
            resolve_engine(&eval("vulncheck"), &provider),
            Err(EvalError::CapabilityMissing("GitHub"))
        ));
    }

    #[test]
    fn unknown_engine_errors() {
        let provider = FakeProvider { github: true };
        assert!(matches!(
            resolve_engine(&eval("cobra"), &provider),
            Err(EvalError::UnsupportedEngine(_))
        ));
    }

    #[test]
    fn jq_requires_no_capability() {
        let provider = FakeProvider { github: false };
        assert_eq!(
            resolve_engine(&eval("jq"), &provider).unwrap(),
            EvaluatorEngine::Jq
        );
    }
}
