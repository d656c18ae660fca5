//! Command-line entry point for the PR dependency policy engine: runs a
//! vulncheck or trusty evaluation against an already-ingested PR dependency
//! set, or validates a rule-type document against a candidate instance.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use depsentry_core::{Ingested, RuleConfig, RuleTypeEval};
use depsentry_eval::{resolve_engine, EvaluatorEngine, TrustyEvaluator, VulncheckEvaluator};
use depsentry_github::{
    GitHubClient, GitHubProvider, TrustyPresentationHandlerFactory, VulncheckPresentationHandlerFactory,
};
use depsentry_ruletype::{parse_rule_type, RuleTypeRegistry};
use tracing_subscriber::EnvFilter;

mod config;

use config::{Engine, EngineConfig};

#[derive(Parser, Debug)]
#[command(name = "depsentry")]
#[command(about = "PR dependency policy engine: vulnerability and trust-score checks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a vulncheck or trusty evaluation against an ingested PR dependency set.
    Evaluate {
        /// Path to the engine config YAML document.
        #[arg(long)]
        config: PathBuf,

        /// Path to the ingested PR + dependencies JSON document.
        #[arg(long)]
        ingested: PathBuf,
    },

    /// Validate a rule-type document and a candidate instance against it.
    ValidateRuletype {
        /// Path to the rule-type document (YAML or JSON).
        #[arg(long)]
        rule_type: PathBuf,

        /// Path to the candidate instance definition (JSON).
        #[arg(long)]
        definition: PathBuf,

        /// Path to the candidate instance params (JSON), if the rule type has a param schema.
        #[arg(long)]
        params: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Evaluate { config, ingested } => evaluate(config, ingested).await,
        Command::ValidateRuletype {
            rule_type,
            definition,
            params,
        } => validate_ruletype(rule_type, definition, params),
    }
}

async fn evaluate(config_path: PathBuf, ingested_path: PathBuf) -> Result<()> {
    let config = EngineConfig::from_file(&config_path)?;
    let ingested: Ingested = serde_json::from_str(
        &std::fs::read_to_string(&ingested_path)
            .with_context(|| format!("failed to read ingested document {}", ingested_path.display()))?,
    )
    .with_context(|| format!("failed to parse ingested document {}", ingested_path.display()))?;

    let eval_type = match config.engine {
        Engine::Vulncheck => "vulncheck",
        Engine::Trusty => "trusty",
    };
    let eval = RuleTypeEval {
        eval_type: eval_type.to_string(),
        extra: Default::default(),
    };
    let provider = GitHubProvider;
    let engine = resolve_engine(&eval, &provider)?;

    let token = config.github_token()?;
    let client = Arc::new(GitHubClient::new(token));

    let tracked = match engine {
        EvaluatorEngine::Vulncheck => {
            let rule_config = RuleConfig {
                action: config.action,
                ecosystem_config: config.vulncheck_ecosystems.clone(),
            };
            let factory = VulncheckPresentationHandlerFactory::new(client);
            VulncheckEvaluator::new()
                .evaluate(&rule_config, &ingested, &factory)
                .await?
        }
        EvaluatorEngine::Trusty => {
            let rule_config = RuleConfig {
                action: config.action,
                ecosystem_config: config.trusty_ecosystems.clone(),
            };
            let factory = TrustyPresentationHandlerFactory::new(client);
            TrustyEvaluator::new()
                .evaluate(&rule_config, &ingested, &factory)
                .await?
        }
        other => anyhow::bail!("engine config names an unsupported evaluator: {other:?}"),
    };

    match tracked {
        Some(names) => {
            println!("findings tracked for: {}", names.join(", "));
            std::process::exit(1);
        }
        None => {
            println!("no findings");
        }
    }

    Ok(())
}

fn validate_ruletype(
    rule_type_path: PathBuf,
    definition_path: PathBuf,
    params_path: Option<PathBuf>,
) -> Result<()> {
    let document = std::fs::read_to_string(&rule_type_path)
        .with_context(|| format!("failed to read rule-type document {}", rule_type_path.display()))?;
    let rule_type = parse_rule_type(&document)?;
    let identifier = rule_type.identifier();

    let mut registry = RuleTypeRegistry::new();
    registry.register(rule_type)?;

    let definition: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(&definition_path)
            .with_context(|| format!("failed to read definition {}", definition_path.display()))?,
    )?;
    let params = params_path
        .map(|path| -> Result<serde_json::Value> {
            Ok(serde_json::from_str(&std::fs::read_to_string(&path)?)?)
        })
        .transpose()?;

    registry.accept_instance(&identifier, &definition, params.as_ref())?;
    println!("{identifier}: instance accepted");

    Ok(())
}
