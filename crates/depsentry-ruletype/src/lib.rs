//! # depsentry-ruletype
//!
//! Rule-type parsing, JSON-Schema compilation and registry (§4.E): turns a
//! YAML or JSON rule-type document into a validated, immutable [`depsentry_core::RuleType`]
//! and checks whether rule instances conform to it.

pub mod error;
pub mod parser;
pub mod registry;
pub mod schema;

pub use error::{Result, RuleTypeError};
pub use parser::parse_rule_type;
pub use registry::RuleTypeRegistry;
pub use schema::CompiledSchema;
