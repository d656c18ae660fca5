use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Package ecosystem a [`Dependency`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ecosystem {
    Npm,
    Go,
    PyPi,
}

impl Ecosystem {
    /// String form used in the OSV query body (`"npm"`, `"Go"`, `"PyPI"`).
    pub fn osv_name(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::Go => "Go",
            Ecosystem::PyPi => "PyPI",
        }
    }

    /// Lowercase config-key form used to look up per-ecosystem config
    /// (`npm`, `go`, `pypi`).
    pub fn config_key(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::Go => "go",
            Ecosystem::PyPi => "pypi",
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "npm" => Ok(Ecosystem::Npm),
            "go" => Ok(Ecosystem::Go),
            "pypi" => Ok(Ecosystem::PyPi),
            other => Err(CoreError::UnknownEcosystem(other.to_string())),
        }
    }
}

/// A single dependency as it appears in a manifest, identified by ecosystem,
/// name and version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub ecosystem: Ecosystem,
    pub name: String,
    pub version: String,
}

impl Dependency {
    pub fn new(ecosystem: Ecosystem, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            ecosystem,
            name: name.into(),
            version: version.into(),
        }
    }

    /// Returns the name/version pair normalised for the dependency's
    /// ecosystem, leaving `self` untouched.
    ///
    /// PyPI names are case-folded and runs of `-`, `_`, `.` collapsed to a
    /// single `-`. Go versions gain a `v` prefix if missing. npm is
    /// normalisation-free.
    pub fn normalised(&self) -> Dependency {
        match self.ecosystem {
            Ecosystem::PyPi => Dependency {
                ecosystem: self.ecosystem,
                name: normalise_pypi_name(&self.name),
                version: self.version.clone(),
            },
            Ecosystem::Go => Dependency {
                ecosystem: self.ecosystem,
                name: self.name.clone(),
                version: normalise_go_version(&self.version),
            },
            Ecosystem::Npm => self.clone(),
        }
    }
}

/// PyPI name normalisation: case-fold, collapse runs of `[-_.]+` to `-`.
///
/// Idempotent: `normalise_pypi_name(normalise_pypi_name(x)) == normalise_pypi_name(x)`.
pub fn normalise_pypi_name(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut in_run = false;
    for c in lower.chars() {
        if c == '-' || c == '_' || c == '.' {
            if !in_run {
                out.push('-');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Go module version normalisation: prefix with `v` if absent.
pub fn normalise_go_version(version: &str) -> String {
    if version.starts_with('v') {
        version.to_string()
    } else {
        format!("v{}", version)
    }
}

/// A [`Dependency`] in the context of the manifest file it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextualDependency {
    pub dependency: Dependency,

    /// Manifest file name, e.g. `package-lock.json`.
    pub name: String,

    /// URL of the GitHub-hosted unified-diff fragment touching this dependency.
    pub patch_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pypi_normalisation_matches_spec_example() {
        assert_eq!(normalise_pypi_name("Foo_Bar.baz"), "foo-bar-baz");
    }

    #[test]
    fn pypi_normalisation_is_idempotent() {
        let cases = ["Foo_Bar.baz", "already-normal", "A..B__C", "---leading"];
        for c in cases {
            let once = normalise_pypi_name(c);
            let twice = normalise_pypi_name(&once);
            assert_eq!(once, twice, "not idempotent for {c}");
        }
    }

    #[test]
    fn go_version_gets_v_prefix() {
        assert_eq!(normalise_go_version("1.2.3"), "v1.2.3");
        assert_eq!(normalise_go_version("v1.2.3"), "v1.2.3");
    }

    #[test]
    fn ecosystem_osv_name_matches_wire_form() {
        assert_eq!(Ecosystem::Npm.osv_name(), "npm");
        assert_eq!(Ecosystem::Go.osv_name(), "Go");
        assert_eq!(Ecosystem::PyPi.osv_name(), "PyPI");
    }

    #[test]
    fn ecosystem_parse_unknown_errors() {
        assert!(Ecosystem::parse("cargo").is_err());
    }
}
