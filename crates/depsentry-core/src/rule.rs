use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dependency::ContextualDependency;
use crate::pull_request::PullRequest;

/// How firmly a rule asserts its verdict on a PR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ProfileOnly,
    Summary,
    Comment,
    ReviewPr,
    CommitStatus,
}

impl Default for Action {
    fn default() -> Self {
        Action::ReviewPr
    }
}

/// Vulncheck per-ecosystem OSV/registry endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VulncheckEcosystemConfig {
    pub name: String,
    #[serde(default = "default_db_type")]
    pub db_type: String,
    pub db_endpoint: String,
    pub package_repository: RegistryEndpoint,
    #[serde(default)]
    pub sum_repository: Option<RegistryEndpoint>,
}

fn default_db_type() -> String {
    "osv".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryEndpoint {
    pub url: String,
}

impl VulncheckEcosystemConfig {
    pub fn default_npm() -> Self {
        Self {
            name: "npm".to_string(),
            db_type: default_db_type(),
            db_endpoint: "https://api.osv.dev/v1/query".to_string(),
            package_repository: RegistryEndpoint {
                url: "https://registry.npmjs.org".to_string(),
            },
            sum_repository: None,
        }
    }

    pub fn default_pypi() -> Self {
        Self {
            name: "pypi".to_string(),
            db_type: default_db_type(),
            db_endpoint: "https://api.osv.dev/v1/query".to_string(),
            package_repository: RegistryEndpoint {
                url: "https://pypi.org/pypi".to_string(),
            },
            sum_repository: None,
        }
    }

    pub fn default_go() -> Self {
        Self {
            name: "go".to_string(),
            db_type: default_db_type(),
            db_endpoint: "https://api.osv.dev/v1/query".to_string(),
            package_repository: RegistryEndpoint {
                url: "https://proxy.golang.org".to_string(),
            },
            sum_repository: Some(RegistryEndpoint {
                url: "https://sum.golang.org".to_string(),
            }),
        }
    }
}

/// Trusty per-ecosystem score thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustyEcosystemConfig {
    pub name: String,
    pub score: f64,
    pub provenance: f64,
    pub activity: f64,
    pub allow_malicious: bool,
    pub allow_deprecated: bool,
}

impl TrustyEcosystemConfig {
    fn default_for(name: &str) -> Self {
        Self {
            name: name.to_string(),
            score: 5.0,
            provenance: 5.0,
            activity: 5.0,
            allow_malicious: false,
            allow_deprecated: false,
        }
    }

    pub fn default_npm() -> Self {
        Self::default_for("npm")
    }

    pub fn default_pypi() -> Self {
        Self::default_for("pypi")
    }

    pub fn default_go() -> Self {
        Self::default_for("go")
    }
}

/// Per-ecosystem config types that carry a canonical npm/pypi/go default
/// set, used when a rule's `ecosystem_config` is empty (§4.G: "empty map
/// yields defaults").
pub trait EcosystemDefaults: Sized {
    fn canonical_defaults() -> Vec<Self>;
}

impl EcosystemDefaults for VulncheckEcosystemConfig {
    fn canonical_defaults() -> Vec<Self> {
        vec![Self::default_npm(), Self::default_pypi(), Self::default_go()]
    }
}

impl EcosystemDefaults for TrustyEcosystemConfig {
    fn canonical_defaults() -> Vec<Self> {
        vec![Self::default_npm(), Self::default_pypi(), Self::default_go()]
    }
}

/// Rule-instance configuration: one action plus a list of per-ecosystem
/// configs. `T` is `VulncheckEcosystemConfig` or `TrustyEcosystemConfigEntry`
/// depending on which evaluator owns the rule type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig<T> {
    #[serde(default)]
    pub action: Action,
    #[serde(default)]
    pub ecosystem_config: Vec<T>,
}

impl<T: EcosystemDefaults + Clone> RuleConfig<T> {
    /// Finds the ecosystem config named `key`. An empty `ecosystem_config`
    /// falls back to the canonical npm/pypi/go defaults rather than finding
    /// nothing (§4.G: "empty map yields defaults").
    pub fn find_ecosystem<F>(&self, key: &str, name_of: F) -> Option<T>
    where
        F: for<'a> Fn(&'a T) -> &'a str,
    {
        if self.ecosystem_config.is_empty() {
            T::canonical_defaults().into_iter().find(|c| name_of(c) == key)
        } else {
            self.ecosystem_config.iter().find(|c| name_of(c) == key).cloned()
        }
    }
}

/// Where a rule type applies: a specific project or a whole organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTypeScope {
    Project(String),
    Organization(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTypeContext {
    pub provider: String,
    #[serde(flatten)]
    pub scope: RuleTypeScope,
}

/// The evaluator engine a rule type dispatches to, plus whatever
/// evaluator-specific fields it carries (opaque to the registry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTypeEval {
    #[serde(rename = "type")]
    pub eval_type: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTypeDef {
    pub in_entity: String,
    pub rule_schema: Value,
    #[serde(default)]
    pub param_schema: Option<Value>,
    pub eval: RuleTypeEval,
}

/// Immutable rule-type descriptor, created at registration and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleType {
    pub name: String,
    pub context: RuleTypeContext,
    pub def: RuleTypeDef,
}

impl RuleType {
    /// `PROVIDER/project/PROJECT/NAME` or `PROVIDER/org/ORG/NAME`.
    pub fn identifier(&self) -> String {
        let (kind, scope_name) = match &self.context.scope {
            RuleTypeScope::Project(p) => ("project", p.as_str()),
            RuleTypeScope::Organization(o) => ("org", o.as_str()),
        };
        format!(
            "{}/{}/{}/{}",
            self.context.provider, kind, scope_name, self.name
        )
    }
}

/// The set of PR dependencies an external ingester hands the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrDependencies {
    pub dependencies: Vec<ContextualDependency>,
}

/// What an evaluator actually receives: the ingested object must be a
/// [`PrDependencies`]; any other shape is a dispatch error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IngestedObject {
    PrDependencies(PrDependencies),
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingested {
    pub pull_request: PullRequest,
    pub object: IngestedObject,
}
