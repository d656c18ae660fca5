use std::collections::HashMap;

use depsentry_core::RuleType;
use serde_json::Value;

use crate::error::{Result, RuleTypeError};
use crate::schema::CompiledSchema;

/// A validated rule type plus its compiled schemas, ready for instance
/// acceptance checks.
struct RegisteredRuleType {
    rule_type: RuleType,
    rule_schema: CompiledSchema,
    param_schema: Option<CompiledSchema>,
}

/// Holds registered rule types, keyed by [`RuleType::identifier`]. Mirrors
/// §3's "RuleType is created by registration, never mutated, retired on
/// deletion" lifecycle.
#[derive(Default)]
pub struct RuleTypeRegistry {
    entries: HashMap<String, RegisteredRuleType>,
}

impl RuleTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and compiles a rule type, then stores it. Invalidates on (a)
    /// missing `in_entity`, (b) missing `rule_schema`, (c) missing `eval`
    /// block.
    pub fn register(&mut self, rule_type: RuleType) -> Result<()> {
        let id = rule_type.identifier();

        if rule_type.def.in_entity.trim().is_empty() {
            return Err(RuleTypeError::MissingEntity(id));
        }
        if is_empty_schema(&rule_type.def.rule_schema) {
            return Err(RuleTypeError::MissingRuleSchema(id));
        }
        if rule_type.def.eval.eval_type.trim().is_empty() {
            return Err(RuleTypeError::MissingEval(id));
        }

        let rule_schema = CompiledSchema::compile(&rule_type.def.rule_schema)?;
        let param_schema = rule_type
            .def
            .param_schema
            .as_ref()
            .map(CompiledSchema::compile)
            .transpose()?;

        tracing::info!(rule_type = %id, "registered rule type");

        self.entries.insert(
            id,
            RegisteredRuleType {
                rule_type,
                rule_schema,
                param_schema,
            },
        );
        Ok(())
    }

    pub fn get(&self, identifier: &str) -> Option<&RuleType> {
        self.entries.get(identifier).map(|e| &e.rule_type)
    }

    pub fn retire(&mut self, identifier: &str) -> Option<RuleType> {
        self.entries.remove(identifier).map(|e| e.rule_type)
    }

    /// Accepts a rule instance iff its `definition` validates against
    /// `rule_schema` and its `params` validate against `param_schema` when
    /// present. Absent params with no `param_schema` is valid; absent params
    /// with `param_schema` present is an error.
    pub fn accept_instance(
        &self,
        identifier: &str,
        definition: &Value,
        params: Option<&Value>,
    ) -> Result<()> {
        let entry = self
            .entries
            .get(identifier)
            .ok_or_else(|| RuleTypeError::UnknownRuleType(identifier.to_string()))?;

        entry
            .rule_schema
            .validate(definition)
            .map_err(RuleTypeError::DefinitionInvalid)?;

        match (&entry.param_schema, params) {
            (None, _) => Ok(()),
            (Some(_), None) => Err(RuleTypeError::MissingParams(identifier.to_string())),
            (Some(schema), Some(params)) => {
                schema.validate(params).map_err(RuleTypeError::ParamsInvalid)
            }
        }
    }
}

fn is_empty_schema(schema: &Value) -> bool {
    match schema {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
