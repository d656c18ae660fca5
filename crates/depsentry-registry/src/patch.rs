use depsentry_core::Dependency;

/// Sentinel text rendered when no patched version exists (§4.C, §8 scenario 3).
pub const NO_PATCH_AVAILABLE_TEXT: &str =
    "Vulnerability found, but no patched version exists yet.";

/// Patch-locator/formatter capability (§4.C): recognise the line in a patch
/// fragment that names the vulnerable dependency, and render the suggested
/// replacement.
pub trait PatchFormatter: Send + Sync {
    /// Does this patch-file line name the vulnerable dependency? `next_line`
    /// is the line immediately following `line`, when one exists — formats
    /// that split a dependency's name and version across adjacent lines
    /// (npm's lockfile blocks) need it to avoid matching the wrong block.
    fn line_has_dependency(&self, line: &str, next_line: Option<&str>) -> bool;

    /// Rendered replacement (suggestion body), given the indent captured at
    /// the matched line and the original line text.
    fn indented_string(&self, indent: &str, old_line: &str, old_dep: &Dependency) -> String;

    /// True iff a concrete patched version is known.
    fn has_patched_version(&self) -> bool;

    /// That version, or empty string when unknown.
    fn get_patched_version(&self) -> String;
}

/// Degenerate formatter used when no patched version exists for a
/// dependency. Carries only the dependency; never locates a line, always
/// renders the fixed sentinel text.
pub struct NoPatchAvailableFormatter {
    dep: Dependency,
}

impl NoPatchAvailableFormatter {
    pub fn new(dep: Dependency) -> Self {
        Self { dep }
    }
}

impl PatchFormatter for NoPatchAvailableFormatter {
    fn line_has_dependency(&self, line: &str, _next_line: Option<&str>) -> bool {
        line.contains(&self.dep.name)
    }

    fn indented_string(&self, _indent: &str, _old_line: &str, _old_dep: &Dependency) -> String {
        NO_PATCH_AVAILABLE_TEXT.to_string()
    }

    fn has_patched_version(&self) -> bool {
        false
    }

    fn get_patched_version(&self) -> String {
        String::new()
    }
}

/// Degenerate formatter used when the registry lookup itself failed.
/// Carries the dependency and the error message; renders a "registry info
/// not found" comment (§7 `RegistryLookupFailed`).
pub struct PkgRegistryErrorFormatter {
    dep: Dependency,
    message: String,
}

impl PkgRegistryErrorFormatter {
    pub fn new(dep: Dependency, message: impl Into<String>) -> Self {
        Self {
            dep,
            message: message.into(),
        }
    }
}

impl PatchFormatter for PkgRegistryErrorFormatter {
    fn line_has_dependency(&self, line: &str, _next_line: Option<&str>) -> bool {
        line.contains(&self.dep.name)
    }

    fn indented_string(&self, _indent: &str, _old_line: &str, _old_dep: &Dependency) -> String {
        format!(
            "Vulnerability found, but registry info for {} could not be retrieved: {}",
            self.dep.name, self.message
        )
    }

    fn has_patched_version(&self) -> bool {
        false
    }

    fn get_patched_version(&self) -> String {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depsentry_core::Ecosystem;

    #[test]
    fn no_patch_formatter_renders_fixed_sentinel() {
        let dep = Dependency::new(Ecosystem::Npm, "mongodb", "0.5.0");
        let formatter = NoPatchAvailableFormatter::new(dep.clone());
        assert!(!formatter.has_patched_version());
        assert_eq!(
            formatter.indented_string("", "", &dep),
            NO_PATCH_AVAILABLE_TEXT
        );
    }

    #[test]
    fn registry_error_formatter_embeds_message() {
        let dep = Dependency::new(Ecosystem::Go, "example.com/mod", "v1.0.0");
        let formatter = PkgRegistryErrorFormatter::new(dep.clone(), "connection refused");
        assert!(formatter.indented_string("", "", &dep).contains("connection refused"));
    }
}
