//! Selection rule: pick the `(introduced, fixed)` range whose interval
//! contains the dependency's current version, falling back to the last
//! observed pair when no interval matches (or the range isn't SEMVER).

use depsentry_core::{RangeType, Vulnerability};
use semver::Version;

use crate::wire::{OsvEvent, OsvVulnerability};

/// Groups a flat OSV `events[]` array into `(introduced, fixed)` pairs. A new
/// pair starts at every `introduced` event; a later `fixed` closes the most
/// recently opened pair.
fn pairs_from_events(events: &[OsvEvent]) -> Vec<(Option<String>, Option<String>)> {
    let mut pairs: Vec<(Option<String>, Option<String>)> = Vec::new();
    for event in events {
        if let Some(introduced) = &event.introduced {
            pairs.push((Some(introduced.clone()), None));
        } else if let Some(fixed) = &event.fixed {
            if let Some(last) = pairs.last_mut() {
                last.1 = Some(fixed.clone());
            } else {
                pairs.push((None, Some(fixed.clone())));
            }
        }
    }
    pairs
}

/// Strips a leading `v` before parsing.
fn parse_semver(s: &str) -> Option<Version> {
    Version::parse(s.strip_prefix('v').unwrap_or(s)).ok()
}

/// Flattens one OSV vulnerability into the workspace's [`Vulnerability`]
/// shape by applying the selection rule across every `affected[].ranges[]`.
pub fn flatten_vulnerability(osv: &OsvVulnerability, current_version: &str) -> Vulnerability {
    let current = parse_semver(current_version);
    let mut last_seen: Option<(RangeType, Option<String>, Option<String>)> = None;

    for affected in &osv.affected {
        for range in &affected.ranges {
            let range_type = RangeType::from_osv(&range.range_type);
            for (introduced, fixed) in pairs_from_events(&range.events) {
                last_seen = Some((range_type.clone(), introduced.clone(), fixed.clone()));

                if range_type == RangeType::Semver {
                    if let (Some(cur), Some(intro_str), Some(fixed_str)) =
                        (&current, &introduced, &fixed)
                    {
                        if let (Some(intro), Some(fix)) =
                            (parse_semver(intro_str), parse_semver(fixed_str))
                        {
                            if intro <= *cur && *cur < fix {
                                return Vulnerability {
                                    id: osv.id.clone(),
                                    summary: osv.summary.clone(),
                                    details: osv.details.clone(),
                                    introduced,
                                    fixed,
                                    range_type,
                                };
                            }
                        }
                    }
                }
            }
        }
    }

    let (range_type, introduced, fixed) =
        last_seen.unwrap_or((RangeType::Other("UNKNOWN".to_string()), None, None));

    Vulnerability {
        id: osv.id.clone(),
        summary: osv.summary.clone(),
        details: osv.details.clone(),
        introduced,
        fixed,
        range_type,
    }
}
