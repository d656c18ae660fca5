use async_trait::async_trait;
use depsentry_core::Dependency;
use reqwest::Client;
use tracing::debug;

use crate::client::{RegistryClient, RegistryLookup};
use crate::error::{RegistryError, Result};
use crate::patch::PatchFormatter;
use crate::wire::GoVersionInfo;

/// Go module proxy + sum database client.
pub struct GoRegistryClient {
    client: Client,
    proxy_url: String,
    sum_url: Option<String>,
}

impl GoRegistryClient {
    pub fn new(proxy_url: impl Into<String>, sum_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            proxy_url: proxy_url.into(),
            sum_url,
        }
    }

    /// `GET {sum_url}/lookup/{name}@{version}`, returning the module and
    /// `go.mod` hashes parsed from lines 2-3 of the plaintext response.
    async fn lookup_sum(&self, name: &str, version: &str) -> Result<(String, String)> {
        let sum_url = self
            .sum_url
            .as_deref()
            .ok_or_else(|| RegistryError::UnknownEcosystem("go sum repository not configured".to_string()))?;
        let url = format!("{}/lookup/{}@{}", sum_url, name, version);
        debug!(%url, "querying go sum database");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::UnexpectedStatus(status.as_u16(), body));
        }

        let text = response.text().await?;
        let lines: Vec<&str> = text.lines().collect();
        if lines.len() < 3 {
            return Err(RegistryError::UnexpectedStatus(200, text));
        }

        for line in &lines[1..3] {
            let mut parts = line.split_whitespace();
            let line_name = parts.next().unwrap_or_default();
            let line_version = parts.next().unwrap_or_default();
            if line_name != name || !line_version.starts_with(version) {
                return Err(RegistryError::SumMismatch {
                    wanted: format!("{name}@{version}"),
                    got: format!("{line_name}@{line_version}"),
                });
            }
        }

        let module_hash = lines[1].split_whitespace().nth(2).unwrap_or_default().to_string();
        let gomod_hash = lines[2].split_whitespace().nth(2).unwrap_or_default().to_string();
        Ok((module_hash, gomod_hash))
    }
}

#[async_trait]
impl RegistryClient for GoRegistryClient {
    async fn send_recv(
        &self,
        dep: &Dependency,
        patched_version: &str,
        use_latest: bool,
    ) -> Result<RegistryLookup> {
        let url = if use_latest {
            format!("{}/{}/@latest", self.proxy_url, dep.name)
        } else {
            format!("{}/{}/@v/{}.info", self.proxy_url, dep.name, patched_version)
        };
        debug!(%url, "querying go module proxy");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status.as_u16() == 404 {
            return Err(RegistryError::PackageNotFound(dep.name.clone()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::UnexpectedStatus(status.as_u16(), body));
        }

        let info: GoVersionInfo = response.json().await?;

        let (module_hash, gomod_hash) = match self.lookup_sum(&dep.name, &info.version).await {
            Ok((m, g)) => (Some(m), Some(g)),
            Err(_) => (None, None),
        };

        Ok(RegistryLookup::Go {
            version: info.version,
            module_hash,
            gomod_hash,
        })
    }

    fn no_patch_available_formatter(&self, dep: &Dependency) -> Box<dyn PatchFormatter> {
        Box::new(crate::patch::NoPatchAvailableFormatter::new(dep.clone()))
    }

    fn patch_formatter(&self, dep: &Dependency, lookup: &RegistryLookup) -> Box<dyn PatchFormatter> {
        match lookup {
            RegistryLookup::Go { version, .. } => Box::new(GoPatchFormatter::new(
                dep.name.clone(),
                dep.version.clone(),
                Some(version.clone()),
            )),
            _ => self.no_patch_available_formatter(dep),
        }
    }
}

/// Go modules patch locator/formatter (§4.C): matches
/// `contains(line, NAME) ∧ contains(line, OLD_VERSION)`, rewrites to a
/// single `NAME NEW_VERSION` line.
pub struct GoPatchFormatter {
    name: String,
    old_version: String,
    new_version: Option<String>,
}

impl GoPatchFormatter {
    pub fn new(name: impl Into<String>, old_version: impl Into<String>, new_version: Option<String>) -> Self {
        Self {
            name: name.into(),
            old_version: old_version.into(),
            new_version,
        }
    }
}

impl PatchFormatter for GoPatchFormatter {
    fn line_has_dependency(&self, line: &str, _next_line: Option<&str>) -> bool {
        line.contains(&self.name) && line.contains(&self.old_version)
    }

    fn indented_string(&self, indent: &str, _old_line: &str, old_dep: &Dependency) -> String {
        match &self.new_version {
            Some(v) => format!("{indent}{name} {version}", indent = indent, name = old_dep.name, version = v),
            None => crate::patch::NO_PATCH_AVAILABLE_TEXT.to_string(),
        }
    }

    fn has_patched_version(&self) -> bool {
        self.new_version.is_some()
    }

    fn get_patched_version(&self) -> String {
        self.new_version.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depsentry_core::Ecosystem;

    #[test]
    fn locates_line_by_name_and_old_version() {
        let formatter = GoPatchFormatter::new("example.com/mod", "v1.0.0", Some("v1.2.0".to_string()));
        assert!(formatter.line_has_dependency("    example.com/mod v1.0.0 h1:abc=", None));
        assert!(!formatter.line_has_dependency("    example.com/other v1.0.0", None));
        assert!(!formatter.line_has_dependency("    example.com/mod v2.0.0", None));
    }

    #[test]
    fn renders_single_line_suggestion() {
        let formatter = GoPatchFormatter::new("example.com/mod", "v1.0.0", Some("v1.2.0".to_string()));
        let dep = Dependency::new(Ecosystem::Go, "example.com/mod", "v1.0.0");
        let rendered = formatter.indented_string("\t", "", &dep);
        assert_eq!(rendered, "\texample.com/mod v1.2.0");
    }
}
