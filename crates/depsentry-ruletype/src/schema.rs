use jsonschema::Validator;
use serde_json::Value;

use crate::error::{Result, RuleTypeError};

/// A compiled, reusable JSON-Schema validator for either `rule_schema` or
/// `param_schema`.
pub struct CompiledSchema {
    validator: Validator,
}

impl CompiledSchema {
    pub fn compile(schema: &Value) -> Result<Self> {
        let validator =
            jsonschema::validator_for(schema).map_err(|e| RuleTypeError::SchemaCompile(e.to_string()))?;
        Ok(Self { validator })
    }

    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }

    pub fn validate(&self, instance: &Value) -> std::result::Result<(), String> {
        if self.validator.is_valid(instance) {
            return Ok(());
        }
        let messages: Vec<String> = self
            .validator
            .iter_errors(instance)
            .map(|e| e.to_string())
            .collect();
        Err(messages.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_and_validates_object_schema() {
        let schema = serde_json::json!({
            "type": "object",
            "required": ["action"],
            "properties": {"action": {"type": "string"}}
        });
        let compiled = CompiledSchema::compile(&schema).unwrap();

        assert!(compiled.is_valid(&serde_json::json!({"action": "review_pr"})));
        assert!(!compiled.is_valid(&serde_json::json!({})));
    }
}
