//! Serde shapes for the npm / Go proxy / PyPI registry wire formats (§6).

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct NpmPackageResponse {
    pub name: String,
    pub version: String,
    pub dist: NpmDist,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NpmDist {
    pub integrity: String,
    pub tarball: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoVersionInfo {
    #[serde(rename = "Version")]
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PyPiResponse {
    pub info: PyPiInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PyPiInfo {
    pub name: String,
    pub version: String,
}
