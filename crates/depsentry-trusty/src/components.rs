//! §4.D: builds `score_components` from the free-form `description` map
//! using a fixed label mapping, with special handling for `typosquatting`.

use depsentry_core::ScoreComponent;
use std::collections::HashMap;

/// Substituted in place of a `typosquatting` component whose raw value is
/// at or below the warning threshold, rather than dropping the signal
/// entirely.
const TYPOSQUATTING_WARNING_VALUE: f64 = 0.0;

fn label_for(key: &str) -> Option<&'static str> {
    match key {
        "activity" => Some("Package activity"),
        "activity_repo" => Some("Repository activity"),
        "activity_user" => Some("User activity"),
        "provenance_type" => Some("Provenance"),
        _ => None,
    }
}

fn title_case(key: &str) -> String {
    key.split(['_', '-'])
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn build_score_components(description: &HashMap<String, f64>) -> Vec<ScoreComponent> {
    let mut components: Vec<ScoreComponent> = Vec::with_capacity(description.len());

    for (key, value) in description {
        if key == "typosquatting" {
            if *value > 5.0 {
                components.push(ScoreComponent {
                    label: "Typosquatting".to_string(),
                    value: *value,
                });
            } else {
                components.push(ScoreComponent {
                    label: "Typosquatting".to_string(),
                    value: TYPOSQUATTING_WARNING_VALUE,
                });
            }
            continue;
        }

        let label = label_for(key)
            .map(|s| s.to_string())
            .unwrap_or_else(|| title_case(key));
        components.push(ScoreComponent {
            label,
            value: *value,
        });
    }

    components.sort_by(|a, b| a.label.cmp(&b.label));
    components
}
