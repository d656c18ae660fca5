use thiserror::Error;

/// Rule-type parsing, compilation and validation errors (§7 `ConfigInvalid`).
#[derive(Debug, Error)]
pub enum RuleTypeError {
    #[error("failed to parse rule-type document: {0}")]
    Parse(String),

    #[error("rule type {0:?} is missing its in_entity")]
    MissingEntity(String),

    #[error("rule type {0:?} is missing rule_schema")]
    MissingRuleSchema(String),

    #[error("rule type {0:?} is missing its eval block")]
    MissingEval(String),

    #[error("failed to compile JSON schema: {0}")]
    SchemaCompile(String),

    #[error("rule definition failed schema validation: {0}")]
    DefinitionInvalid(String),

    #[error("rule params failed schema validation: {0}")]
    ParamsInvalid(String),

    #[error("rule type {0:?} requires params but none were supplied")]
    MissingParams(String),

    #[error("unknown rule type: {0:?}")]
    UnknownRuleType(String),
}

pub type Result<T> = std::result::Result<T, RuleTypeError>;
