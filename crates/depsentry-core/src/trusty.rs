use serde::{Deserialize, Serialize};

/// Normalized trust-score report for one dependency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustyReport {
    pub package_name: String,
    pub package_type: String,
    pub package_version: String,
    pub trusty_url: String,
    pub is_deprecated: bool,
    pub is_archived: bool,
    pub score: Option<f64>,
    pub activity_score: Option<f64>,
    pub provenance_score: Option<f64>,
    pub score_components: Vec<ScoreComponent>,
    pub alternatives: Vec<TrustyAlternative>,
    pub provenance: ProvenanceInfo,
    pub malicious: Option<MaliciousInfo>,
}

/// A single labeled contributor to the overall trust score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustyAlternative {
    pub package_name: String,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceInfo {
    pub historical: Option<bool>,
    pub sigstore: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaliciousInfo {
    pub summary: String,
    pub details: String,
}
