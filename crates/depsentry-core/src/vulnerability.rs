use serde::{Deserialize, Serialize};

/// The kind of version range OSV used to describe the affected span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeType {
    Semver,
    Git,
    /// Any other OSV range type (`ECOSYSTEM`, …), carried verbatim.
    Other(String),
}

impl RangeType {
    pub fn from_osv(s: &str) -> Self {
        match s {
            "SEMVER" => RangeType::Semver,
            "GIT" => RangeType::Git,
            other => RangeType::Other(other.to_string()),
        }
    }
}

/// A single "this affected-range pair matters" record, already flattened
/// from OSV's nested `affected[].ranges[].events[]` shape by selecting the
/// applicable `(introduced, fixed)` pair for the dependency's current
/// version (see the OSV client's selection rule).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,
    pub summary: Option<String>,
    pub details: Option<String>,
    pub introduced: Option<String>,
    pub fixed: Option<String>,
    pub range_type: RangeType,
}
