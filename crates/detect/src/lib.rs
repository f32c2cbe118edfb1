//! Allergen detection over normalized ingredient text.
//!
//! Three independent passes, each producing tagged detections:
//! - listed: a rule keyword appears directly in the text (High)
//! - advisory: precautionary labelling triggers a blanket warning (Medium)
//! - negated: the text carries a "-free" / "free from" claim (Low)
//!
//! `detect` merges the passes in priority order. Matching is literal
//! substring search over the lowercased text; keyword phrases must appear
//! contiguously exactly as authored.

use labelscan_model::{AllergenRule, Detection, Severity};

/// Fixed `matched` value for advisory detections, which are not tied to any
/// single keyword in the text.
pub const ADVISORY_MATCH: &str = "may contain/produced in facility";

const ADVISORY_TRIGGERS: [&str; 2] = ["may contain", "produced in a facility"];
const NEGATION_TRIGGERS: [&str; 2] = ["free from", "-free"];

/// Normalize text for matching: lowercase only. Punctuation and whitespace
/// are left untouched so keyword phrases match as authored.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}

/// High pass: scan each rule's keywords in order; the first one found as a
/// substring emits a single detection and ends the scan for that rule.
///
/// At most one High detection per allergen per scan.
pub fn detect_listed(lower: &str, rules: &[AllergenRule]) -> Vec<Detection> {
    let mut detected = Vec::new();

    for rule in rules {
        for keyword in &rule.keywords {
            if lower.contains(keyword.as_str()) {
                detected.push(Detection {
                    allergen: rule.key.clone(),
                    matched: keyword.clone(),
                    severity: Severity::High,
                });
                break;
            }
        }
    }

    detected
}

/// Medium pass: precautionary labelling ("may contain", facility warnings)
/// emits one detection for every configured allergen, textually present or
/// not. Deliberate over-approximation.
pub fn detect_advisory(lower: &str, rules: &[AllergenRule]) -> Vec<Detection> {
    if !ADVISORY_TRIGGERS.iter().any(|t| lower.contains(t)) {
        return Vec::new();
    }

    rules
        .iter()
        .map(|rule| Detection {
            allergen: rule.key.clone(),
            matched: ADVISORY_MATCH.to_string(),
            severity: Severity::Medium,
        })
        .collect()
}

/// Low pass: "free from" / "-free" claims. Every keyword of every rule is
/// checked as "<keyword> free" and "<keyword>-free"; each hit emits a
/// detection. Duplicates across keywords of one allergen are kept.
pub fn detect_negated(lower: &str, rules: &[AllergenRule]) -> Vec<Detection> {
    if !NEGATION_TRIGGERS.iter().any(|t| lower.contains(t)) {
        return Vec::new();
    }

    let mut detected = Vec::new();

    for rule in rules {
        for keyword in &rule.keywords {
            let spaced = format!("{keyword} free");
            let hyphenated = format!("{keyword}-free");
            if lower.contains(&spaced) || lower.contains(&hyphenated) {
                detected.push(Detection {
                    allergen: rule.key.clone(),
                    matched: hyphenated,
                    severity: Severity::Low,
                });
            }
        }
    }

    detected
}

/// Scan ingredient text against the allergen rules.
///
/// Lowercases once, runs the three passes, and returns their detections in
/// High, Medium, Low order. Empty text yields an empty list; an empty list
/// is a valid result, not an error.
pub fn detect(text: &str, rules: &[AllergenRule]) -> Vec<Detection> {
    let lower = normalize(text);

    let mut detected = detect_listed(&lower, rules);
    detected.extend(detect_advisory(&lower, rules));
    detected.extend(detect_negated(&lower, rules));

    detected
}
