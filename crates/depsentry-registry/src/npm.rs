use async_trait::async_trait;
use depsentry_core::Dependency;
use reqwest::Client;
use tracing::debug;

use crate::client::{RegistryClient, RegistryLookup};
use crate::error::{RegistryError, Result};
use crate::patch::PatchFormatter;
use crate::wire::NpmPackageResponse;

/// npm registry client: `GET {url}/{name}/{latest|version}`.
pub struct NpmRegistryClient {
    client: Client,
    base_url: String,
}

impl NpmRegistryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl RegistryClient for NpmRegistryClient {
    async fn send_recv(
        &self,
        dep: &Dependency,
        patched_version: &str,
        use_latest: bool,
    ) -> Result<RegistryLookup> {
        let segment = if use_latest { "latest" } else { patched_version };
        let url = format!("{}/{}/{}", self.base_url, dep.name, segment);
        debug!(%url, "querying npm registry");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status.as_u16() == 404 {
            return Err(RegistryError::PackageNotFound(dep.name.clone()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::UnexpectedStatus(status.as_u16(), body));
        }

        let info: NpmPackageResponse = response.json().await?;
        Ok(RegistryLookup::Npm {
            version: info.version,
            integrity: info.dist.integrity,
            tarball: info.dist.tarball,
        })
    }

    fn no_patch_available_formatter(&self, dep: &Dependency) -> Box<dyn PatchFormatter> {
        Box::new(crate::patch::NoPatchAvailableFormatter::new(dep.clone()))
    }

    fn patch_formatter(&self, dep: &Dependency, lookup: &RegistryLookup) -> Box<dyn PatchFormatter> {
        match lookup {
            RegistryLookup::Npm {
                version,
                integrity,
                tarball,
            } => Box::new(NpmPatchFormatter::new(
                dep.name.clone(),
                dep.version.clone(),
                version.clone(),
                tarball.clone(),
                integrity.clone(),
            )),
            _ => self.no_patch_available_formatter(dep),
        }
    }
}

/// npm patch locator/formatter (§4.C): keys on the manifest line
/// `"NAME": {` *and* the `"version": "OLD_VERSION"` line that follows it
/// (a name alone can recur at several resolved versions in nested
/// `dependencies` blocks), then rewrites the three-line
/// `version`/`resolved`/`integrity` block, preserving indent.
pub struct NpmPatchFormatter {
    name: String,
    old_version: String,
    new_version: Option<(String, String, String)>, // (version, tarball, integrity)
}

impl NpmPatchFormatter {
    pub fn new(
        name: impl Into<String>,
        old_version: impl Into<String>,
        version: String,
        tarball: String,
        integrity: String,
    ) -> Self {
        Self {
            name: name.into(),
            old_version: old_version.into(),
            new_version: Some((version, tarball, integrity)),
        }
    }
}

impl PatchFormatter for NpmPatchFormatter {
    fn line_has_dependency(&self, line: &str, next_line: Option<&str>) -> bool {
        line.contains(&format!("\"{}\": {{", self.name))
            && next_line.is_some_and(|next| {
                next.contains(&format!("\"version\": \"{}\"", self.old_version))
            })
    }

    fn indented_string(&self, indent: &str, _old_line: &str, old_dep: &Dependency) -> String {
        let Some((version, tarball, integrity)) = &self.new_version else {
            return crate::patch::NO_PATCH_AVAILABLE_TEXT.to_string();
        };
        format!(
            "{indent}\"{name}\": {{\n{indent}  \"version\": \"{version}\",\n{indent}  \"resolved\": \"{tarball}\",\n{indent}  \"integrity\": \"{integrity}\"\n{indent}}}",
            indent = indent,
            name = old_dep.name,
            version = version,
            tarball = tarball,
            integrity = integrity,
        )
    }

    fn has_patched_version(&self) -> bool {
        self.new_version.is_some()
    }

    fn get_patched_version(&self) -> String {
        self.new_version
            .as_ref()
            .map(|(v, _, _)| v.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depsentry_core::Ecosystem;

    fn test_formatter() -> NpmPatchFormatter {
        NpmPatchFormatter::new(
            "mongodb",
            "0.5.0",
            "0.6.0".to_string(),
            "https://registry.npmjs.org/mongodb/-/mongodb-0.6.0.tgz".to_string(),
            "sha512-abc".to_string(),
        )
    }

    #[test]
    fn locates_dependency_block_start_by_name_and_old_version() {
        let formatter = test_formatter();
        assert!(formatter.line_has_dependency("    \"mongodb\": {", Some("      \"version\": \"0.5.0\"")));
        assert!(!formatter.line_has_dependency("    \"mongoose\": {", Some("      \"version\": \"0.5.0\"")));
    }

    #[test]
    fn name_match_at_a_different_resolved_version_is_not_located() {
        let formatter = test_formatter();
        assert!(!formatter.line_has_dependency("    \"mongodb\": {", Some("      \"version\": \"1.2.0\"")));
        assert!(!formatter.line_has_dependency("    \"mongodb\": {", None));
    }

    #[test]
    fn renders_three_line_suggestion_preserving_indent() {
        let formatter = test_formatter();
        let dep = Dependency::new(Ecosystem::Npm, "mongodb", "0.5.0");
        let rendered = formatter.indented_string("    ", "    \"mongodb\": {", &dep);
        assert!(rendered.contains("\"version\": \"0.6.0\""));
        assert!(rendered.starts_with("    \"mongodb\": {"));
    }
}
