use std::path::Path;

use anyhow::{Context, Result};
use depsentry_core::{Action, EcosystemDefaults, TrustyEcosystemConfig, VulncheckEcosystemConfig};
use serde::{Deserialize, Serialize};

/// The engine an [`EngineConfig`] document drives. Mirrors `eval.type` on a
/// registered rule type, but the CLI takes it directly so `evaluate` doesn't
/// need a rule-type document on the happy path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Engine {
    Vulncheck,
    Trusty,
}

/// Top-level YAML document read by `depsentry evaluate`: which engine to
/// run, the action it should take, its per-ecosystem configs, and where to
/// find the GitHub token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub engine: Engine,

    #[serde(default)]
    pub action: Action,

    /// Name of the environment variable holding the GitHub token.
    #[serde(default)]
    pub github_token_env: Option<String>,

    #[serde(default)]
    pub vulncheck_ecosystems: Vec<VulncheckEcosystemConfig>,

    #[serde(default)]
    pub trusty_ecosystems: Vec<TrustyEcosystemConfig>,
}

impl EngineConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: EngineConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.apply_ecosystem_defaults();
        Ok(config)
    }

    /// An empty ecosystem list for the configured engine is filled in with
    /// the canonical npm/pypi/go defaults (§4.G: "empty map yields
    /// defaults"), rather than being treated as a configuration error.
    pub fn apply_ecosystem_defaults(&mut self) {
        match self.engine {
            Engine::Vulncheck if self.vulncheck_ecosystems.is_empty() => {
                self.vulncheck_ecosystems = VulncheckEcosystemConfig::canonical_defaults();
            }
            Engine::Trusty if self.trusty_ecosystems.is_empty() => {
                self.trusty_ecosystems = TrustyEcosystemConfig::canonical_defaults();
            }
            _ => {}
        }
    }

    /// Resolves the GitHub token from the configured environment variable,
    /// defaulting to `GITHUB_TOKEN` when none is named.
    pub fn github_token(&self) -> Result<String> {
        let var = self.github_token_env.as_deref().unwrap_or("GITHUB_TOKEN");
        std::env::var(var).with_context(|| format!("environment variable {var} not set"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_vulncheck_ecosystems_fill_in_canonical_defaults() {
        let mut config = EngineConfig {
            engine: Engine::Vulncheck,
            action: Action::default(),
            github_token_env: None,
            vulncheck_ecosystems: Vec::new(),
            trusty_ecosystems: Vec::new(),
        };
        config.apply_ecosystem_defaults();

        let names: Vec<_> = config
            .vulncheck_ecosystems
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["npm", "pypi", "go"]);
        assert!(config.trusty_ecosystems.is_empty());
    }

    #[test]
    fn empty_trusty_ecosystems_fill_in_canonical_defaults() {
        let mut config = EngineConfig {
            engine: Engine::Trusty,
            action: Action::default(),
            github_token_env: None,
            vulncheck_ecosystems: Vec::new(),
            trusty_ecosystems: Vec::new(),
        };
        config.apply_ecosystem_defaults();

        let names: Vec<_> = config
            .trusty_ecosystems
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["npm", "pypi", "go"]);
        assert!(config.vulncheck_ecosystems.is_empty());
    }

    #[test]
    fn non_empty_ecosystems_are_left_untouched() {
        let custom = vec![TrustyEcosystemConfig::default_npm()];
        let mut config = EngineConfig {
            engine: Engine::Trusty,
            action: Action::default(),
            github_token_env: None,
            vulncheck_ecosystems: Vec::new(),
            trusty_ecosystems: custom.clone(),
        };
        config.apply_ecosystem_defaults();
        assert_eq!(config.trusty_ecosystems, custom);
    }

    #[test]
    fn github_token_defaults_to_github_token_var() {
        let config = EngineConfig {
            engine: Engine::Trusty,
            action: Action::default(),
            github_token_env: None,
            vulncheck_ecosystems: Vec::new(),
            trusty_ecosystems: vec![TrustyEcosystemConfig::default_npm()],
        };
        std::env::remove_var("GITHUB_TOKEN");
        assert!(config.github_token().is_err());
    }
}
