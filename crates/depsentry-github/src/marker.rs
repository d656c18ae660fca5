use regex::Regex;
use std::sync::OnceLock;

/// The engine's status-comment marker grammar: first line of the comment is
/// `<!-- minder: pr-status-body: {"ContentSha":"…","ReviewID":"…"} -->`.
/// `ReviewID` is carried as a JSON string of digits, not a bare number.
const MARKER_PREFIX: &str = "<!-- minder: pr-status-body: ";
const MARKER_SUFFIX: &str = " -->";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMarker {
    pub content_sha: String,
    pub review_id: u64,
}

fn marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<!-- minder: pr-status-body: (\{.*?\}) -->"#).expect("marker regex is valid")
    })
}

impl StatusMarker {
    /// Parses the marker from the first line of an engine-owned status
    /// comment. Returns `None` if the line doesn't match the grammar.
    pub fn parse(body: &str) -> Option<Self> {
        let first_line = body.lines().next()?;
        let captures = marker_regex().captures(first_line)?;
        let value: serde_json::Value = serde_json::from_str(&captures[1]).ok()?;

        let content_sha = value.get("ContentSha")?.as_str()?.to_string();
        let review_id = value
            .get("ReviewID")?
            .as_str()
            .and_then(|s| s.parse::<u64>().ok())?;

        Some(Self {
            content_sha,
            review_id,
        })
    }

    /// Renders the marker line verbatim, matching the wire grammar exactly.
    pub fn render(&self) -> String {
        let json = serde_json::json!({
            "ContentSha": self.content_sha,
            "ReviewID": self.review_id.to_string(),
        });
        format!("{MARKER_PREFIX}{json}{MARKER_SUFFIX}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_marker() {
        let marker = StatusMarker {
            content_sha: "27d6810bdeadbeef81d1".to_string(),
            review_id: 987654321,
        };
        let rendered = marker.render();
        let parsed = StatusMarker::parse(&rendered).unwrap();
        assert_eq!(marker, parsed);
    }

    #[test]
    fn parses_marker_as_first_line_of_larger_body() {
        let body = format!(
            "{}\n\n## Vulnerability scan results\n\nno vulnerable dependencies found",
            StatusMarker {
                content_sha: "abc123".to_string(),
                review_id: 0,
            }
            .render()
        );
        let parsed = StatusMarker::parse(&body).unwrap();
        assert_eq!(parsed.content_sha, "abc123");
        assert_eq!(parsed.review_id, 0);
    }

    #[test]
    fn non_marker_body_parses_to_none() {
        assert!(StatusMarker::parse("just a regular comment").is_none());
    }

    #[test]
    fn parses_literal_spec_example() {
        let body = r#"<!-- minder: pr-status-body: {"ContentSha":"27d6810bdeadbeef81d2","ReviewID":"987654321"} -->"#;
        let parsed = StatusMarker::parse(body).unwrap();
        assert_eq!(parsed.content_sha, "27d6810bdeadbeef81d2");
        assert_eq!(parsed.review_id, 987654321);
    }
}
