use async_trait::async_trait;
use depsentry_core::{normalise_pypi_name, Dependency};
use reqwest::Client;
use tracing::debug;

use crate::client::{RegistryClient, RegistryLookup};
use crate::error::{RegistryError, Result};
use crate::patch::PatchFormatter;
use crate::wire::PyPiResponse;

const VERSION_OPERATORS: &[&str] = &["==", "<=", ">=", "~=", "!=", "<", ">"];

/// PyPI registry client: `GET {url}/{name}/json` or `…/{name}/{version}/json`.
pub struct PyPiRegistryClient {
    client: Client,
    base_url: String,
}

impl PyPiRegistryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl RegistryClient for PyPiRegistryClient {
    async fn send_recv(
        &self,
        dep: &Dependency,
        patched_version: &str,
        use_latest: bool,
    ) -> Result<RegistryLookup> {
        let name = normalise_pypi_name(&dep.name);
        let url = if use_latest {
            format!("{}/{}/json", self.base_url, name)
        } else {
            format!("{}/{}/{}/json", self.base_url, name, patched_version)
        };
        debug!(%url, "querying PyPI registry");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status.as_u16() == 404 {
            return Err(RegistryError::PackageNotFound(dep.name.clone()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::UnexpectedStatus(status.as_u16(), body));
        }

        let info: PyPiResponse = response.json().await?;
        Ok(RegistryLookup::PyPi {
            version: info.info.version,
        })
    }

    fn no_patch_available_formatter(&self, dep: &Dependency) -> Box<dyn PatchFormatter> {
        Box::new(crate::patch::NoPatchAvailableFormatter::new(dep.clone()))
    }

    fn patch_formatter(&self, dep: &Dependency, lookup: &RegistryLookup) -> Box<dyn PatchFormatter> {
        match lookup {
            RegistryLookup::PyPi { version } => {
                Box::new(PyPiPatchFormatter::new(dep.name.clone(), Some(version.clone())))
            }
            _ => self.no_patch_available_formatter(dep),
        }
    }
}

/// Finds the first version-operator in `line`, returning its byte offset.
fn find_operator(line: &str) -> Option<usize> {
    VERSION_OPERATORS
        .iter()
        .filter_map(|op| line.find(op))
        .min()
}

/// PyPI patch locator/formatter (§4.C): the name token runs from the start
/// of the line up to the first version operator; the suggestion replaces
/// every occurrence of the old version substring in the line.
pub struct PyPiPatchFormatter {
    name: String,
    new_version: Option<String>,
}

impl PyPiPatchFormatter {
    pub fn new(name: impl Into<String>, new_version: Option<String>) -> Self {
        Self {
            name: normalise_pypi_name(&name.into()),
            new_version,
        }
    }
}

impl PatchFormatter for PyPiPatchFormatter {
    fn line_has_dependency(&self, line: &str, _next_line: Option<&str>) -> bool {
        let trimmed = line.trim_start();
        let name_part = match find_operator(trimmed) {
            Some(idx) => &trimmed[..idx],
            None => trimmed,
        };
        normalise_pypi_name(name_part.trim()) == self.name
    }

    fn indented_string(&self, _indent: &str, old_line: &str, old_dep: &Dependency) -> String {
        match &self.new_version {
            Some(v) => old_line.replace(&old_dep.version, v),
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
    fn locates_name_up_to_operator() {
        let formatter = PyPiPatchFormatter::new("requests", Some("2.31.0".to_string()));
        assert!(formatter.line_has_dependency("requests==2.28.0", None));
        assert!(formatter.line_has_dependency("Requests >= 2.28.0", None));
        assert!(!formatter.line_has_dependency("requests-toolbelt==1.0.0", None));
    }

    #[test]
    fn replaces_all_version_occurrences() {
        let formatter = PyPiPatchFormatter::new("requests", Some("2.31.0".to_string()));
        let dep = Dependency::new(Ecosystem::PyPi, "requests", "2.28.0");
        let rendered =
            formatter.indented_string("", "requests==2.28.0  # pinned at 2.28.0", &dep);
        assert_eq!(rendered, "requests==2.31.0  # pinned at 2.31.0");
    }
}
