//! Wire shape for the trusty `report(ctx, Dependency) -> Reply` call (§6).

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct TrustyReplyWire {
    pub package_name: String,
    pub package_type: String,
    pub package_version: String,
    #[serde(default)]
    pub trusty_url: String,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub activity_score: Option<f64>,
    #[serde(default)]
    pub provenance_score: Option<f64>,
    /// Free-form labeled score breakdown; keys are mapped to display labels
    /// by the fixed table in `lib.rs`.
    #[serde(default)]
    pub description: HashMap<String, f64>,
    #[serde(default)]
    pub alternatives: Vec<AlternativeWire>,
    #[serde(default)]
    pub provenance: ProvenanceWire,
    #[serde(default)]
    pub malicious: Option<MaliciousWire>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlternativeWire {
    pub package_name: String,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvenanceWire {
    #[serde(default)]
    pub historical: Option<bool>,
    #[serde(default)]
    pub sigstore: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaliciousWire {
    pub summary: String,
    pub details: String,
}
