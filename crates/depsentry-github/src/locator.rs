use depsentry_core::Dependency;
use depsentry_registry::PatchFormatter;

use crate::wire::DraftReviewCommentWire;

/// Single pass over a fetched patch fragment, using the formatter's
/// `line_has_dependency` predicate to find the line naming the vulnerable
/// dependency.
///
/// Returns `None` when no line matches — callers must not invent a
/// mis-located comment.
pub fn locate_and_render(
    manifest_path: &str,
    patch_body: &str,
    dep: &Dependency,
    formatter: &dyn PatchFormatter,
) -> Option<DraftReviewCommentWire> {
    let lines: Vec<&str> = patch_body.lines().collect();
    for (idx, line) in lines.iter().enumerate() {
        let line = *line;
        let next_line = lines.get(idx + 1).copied();
        if formatter.line_has_dependency(line, next_line) {
            let indent: String = line.chars().take_while(|c| c.is_whitespace()).collect();
            let body = if formatter.has_patched_version() {
                format!(
                    "```suggestion\n{}\n```",
                    formatter.indented_string(&indent, line, dep)
                )
            } else {
                formatter.indented_string(&indent, line, dep)
            };

            return Some(DraftReviewCommentWire {
                path: manifest_path.to_string(),
                line: (idx + 1) as u32,
                body,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use depsentry_core::Ecosystem;
    use depsentry_registry::{NoPatchAvailableFormatter, NpmPatchFormatter};

    #[test]
    fn locates_matching_line_and_renders_suggestion() {
        let dep = Dependency::new(Ecosystem::Npm, "mongodb", "0.5.0");
        let formatter = NpmPatchFormatter::new(
            "mongodb",
            "0.5.0",
            "0.6.0".to_string(),
            "https://registry.npmjs.org/mongodb/-/mongodb-0.6.0.tgz".to_string(),
            "sha512-abc".to_string(),
        );
        let patch_body = "{\n  \"dependencies\": {\n    \"mongodb\": {\n      \"version\": \"0.5.0\"\n    }\n  }\n}\n";

        let comment = locate_and_render("package-lock.json", patch_body, &dep, &formatter).unwrap();
        assert_eq!(comment.path, "package-lock.json");
        assert!(comment.body.starts_with("```suggestion\n"));
        assert!(comment.body.contains("\"version\": \"0.6.0\""));
    }

    #[test]
    fn no_match_returns_none_instead_of_misplaced_comment() {
        let dep = Dependency::new(Ecosystem::Npm, "mongodb", "0.5.0");
        let formatter = NoPatchAvailableFormatter::new(dep.clone());
        let comment = locate_and_render("package-lock.json", "no mention here\n", &dep, &formatter);
        assert!(comment.is_none());
    }

    #[test]
    fn no_patch_formatter_renders_sentinel_without_suggestion_fence() {
        let dep = Dependency::new(Ecosystem::Npm, "mongodb", "0.5.0");
        let formatter = NoPatchAvailableFormatter::new(dep.clone());
        let patch_body = "    \"mongodb\": {\n      \"version\": \"0.5.0\"\n";
        let comment = locate_and_render("package-lock.json", patch_body, &dep, &formatter).unwrap();
        assert!(!comment.body.starts_with("```suggestion"));
    }

    #[test]
    fn does_not_locate_name_resolved_at_a_different_version() {
        let dep = Dependency::new(Ecosystem::Npm, "mongodb", "0.5.0");
        let formatter = NpmPatchFormatter::new(
            "mongodb",
            "0.5.0",
            "0.6.0".to_string(),
            "https://registry.npmjs.org/mongodb/-/mongodb-0.6.0.tgz".to_string(),
            "sha512-abc".to_string(),
        );
        let patch_body = "{\n  \"dependencies\": {\n    \"mongodb\": {\n      \"version\": \"1.2.0\"\n    }\n  }\n}\n";

        let comment = locate_and_render("package-lock.json", patch_body, &dep, &formatter);
        assert!(comment.is_none());
    }
}
