use depsentry_core::{TrustyReport, Vulnerability};
use depsentry_registry::PatchFormatter;

use crate::handler::{TrustyFindingEntry, VulnerableEntry};
use crate::marker::StatusMarker;

pub const NO_VULS_FOUND_TEXT: &str = "no vulnerable dependencies found";
pub const VULNS_FOUND_TEXT_SHORT: &str = "vulnerable dependencies found";

/// Renders the review body: a title line with a ✅/⚠️ symbol, a summary
/// blockquote, and (when deps are tracked) a
/// dependency table and a per-vuln table.
pub fn render_review_body(entries: &[VulnerableEntry]) -> String {
    let mut body = String::new();

    if entries.is_empty() {
        body.push_str("## ✅ Dependency vulnerability scan\n\n> ");
        body.push_str(NO_VULS_FOUND_TEXT);
        return body;
    }

    let patch_count = entries
        .iter()
        .filter(|e| e.formatter.has_patched_version())
        .count();
    let vuln_count: usize = entries.iter().map(|e| e.vulns.len()).sum();

    body.push_str("## ⚠️ Dependency vulnerability scan\n\n");
    body.push_str(&format!(
        "> 🐛 {} vulnerable package(s), {} vulnerability finding(s), 🔧 {} with an available patch\n\n",
        entries.len(),
        vuln_count,
        patch_count
    ));

    body.push_str("| Name | Version | #Vulns | #Fixes | Patch |\n");
    body.push_str("|---|---|---|---|---|\n");
    for entry in entries {
        body.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            entry.dep.dependency.name,
            entry.dep.dependency.version,
            entry.vulns.len(),
            entry.vulns.iter().filter(|v| v.fixed.is_some()).count(),
            if entry.formatter.has_patched_version() {
                entry.formatter.get_patched_version()
            } else {
                "none".to_string()
            },
        ));
    }

    body.push_str("\n### Vulnerabilities\n\n");
    body.push_str("| Ecosystem | Name | Version | ID | Summary | Introduced | Fixed |\n");
    body.push_str("|---|---|---|---|---|---|---|\n");
    for entry in entries {
        for vuln in &entry.vulns {
            body.push_str(&render_vuln_row(entry, vuln));
        }
    }

    body
}

fn render_vuln_row(entry: &VulnerableEntry, vuln: &Vulnerability) -> String {
    format!(
        "| {} | {} | {} | {} | {} | {} | {} |\n",
        entry.dep.dependency.ecosystem.config_key(),
        entry.dep.dependency.name,
        entry.dep.dependency.version,
        vuln.id,
        vuln.summary.as_deref().unwrap_or(""),
        vuln.introduced.as_deref().unwrap_or(""),
        vuln.fixed.as_deref().unwrap_or(""),
    )
}

/// Renders the full status-comment body: the marker line, then a rendered
/// summary.
pub fn render_status_comment(marker: &StatusMarker, entries: &[VulnerableEntry]) -> String {
    format!("{}\n\n{}", marker.render(), render_review_body(entries))
}

/// Short commit-status description.
pub fn commit_status_description(has_findings: bool) -> &'static str {
    if has_findings {
        VULNS_FOUND_TEXT_SHORT
    } else {
        NO_VULS_FOUND_TEXT
    }
}

/// Renders the trusty evaluator's single HTML summary comment: no review,
/// no commit status, ever.
pub fn render_trusty_summary(findings: &[TrustyFindingEntry]) -> String {
    if findings.is_empty() {
        return "## ✅ Dependency trust-score scan\n\n> no low-trust dependencies found".to_string();
    }

    let mut body = String::from("## ⚠️ Dependency trust-score scan\n\n");
    body.push_str("| Name | Version | Score | Reasons |\n");
    body.push_str("|---|---|---|---|\n");
    for finding in findings {
        body.push_str(&render_trusty_row(&finding.dep.dependency.name, &finding.report, &finding.reasons));
    }
    body
}

fn render_trusty_row(name: &str, report: &TrustyReport, reasons: &[String]) -> String {
    format!(
        "| {} | {} | {} | {} |\n",
        name,
        report.package_version,
        report
            .score
            .map(|s| s.to_string())
            .unwrap_or_else(|| "n/a".to_string()),
        reasons.join("; "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_review_body_carries_no_vulns_text() {
        let body = render_review_body(&[]);
        assert!(body.contains(NO_VULS_FOUND_TEXT));
    }

    #[test]
    fn commit_status_description_matches_findings() {
        assert_eq!(commit_status_description(false), NO_VULS_FOUND_TEXT);
        assert_eq!(commit_status_description(true), VULNS_FOUND_TEXT_SHORT);
    }

    #[test]
    fn empty_trusty_summary_is_clean() {
        let body = render_trusty_summary(&[]);
        assert!(body.contains("no low-trust dependencies found"));
    }
}
