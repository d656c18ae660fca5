use depsentry_core::RuleType;
use serde_json::Value;

use crate::error::{Result, RuleTypeError};

/// Parses a rule-type document, which may be YAML or JSON. YAML is
/// transcoded to JSON first (§6 "Rule-type document"), then decoded into the
/// typed descriptor.
pub fn parse_rule_type(document: &str) -> Result<RuleType> {
    let value: Value = if looks_like_json(document) {
        serde_json::from_str(document).map_err(|e| RuleTypeError::Parse(e.to_string()))?
    } else {
        let yaml_value: serde_yaml::Value =
            serde_yaml::from_str(document).map_err(|e| RuleTypeError::Parse(e.to_string()))?;
        serde_json::to_value(yaml_value).map_err(|e| RuleTypeError::Parse(e.to_string()))?
    };

    serde_json::from_value(value).map_err(|e| RuleTypeError::Parse(e.to_string()))
}

fn looks_like_json(document: &str) -> bool {
    document.trim_start().starts_with('{')
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML_DOC: &str = r#"
name: vulncheck
context:
  provider: github
  project: acme/widgets
def:
  in_entity: pull_request
  rule_schema:
    type: object
  eval:
    type: vulncheck
"#;

    #[test]
    fn parses_yaml_document() {
        let rule_type = parse_rule_type(YAML_DOC).unwrap();
        assert_eq!(rule_type.name, "vulncheck");
        assert_eq!(rule_type.def.eval.eval_type, "vulncheck");
    }

    #[test]
    fn parses_json_document() {
        let json = serde_json::json!({
            "name": "trusty",
            "context": {"provider": "github", "organization": "acme"},
            "def": {
                "in_entity": "pull_request",
                "rule_schema": {"type": "object"},
                "eval": {"type": "trusty"}
            }
        })
        .to_string();

        let rule_type = parse_rule_type(&json).unwrap();
        assert_eq!(rule_type.name, "trusty");
    }

    #[test]
    fn rejects_malformed_document() {
        assert!(parse_rule_type("name: [unterminated").is_err());
    }
}
