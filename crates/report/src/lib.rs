//! Report assembly: combine matcher, scorer, and inferrer output with the
//! user's allergy profile into one `ScanReport`.
//!
//! Pure function of its inputs. Never fails: empty or missing reference data
//! degrades to empty collections, not errors.

use labelscan_model::{
    Detection, HealthScore, RiskSummary, ScanReport, Severity, UserAllergyProfile,
};
use std::collections::{BTreeMap, BTreeSet};

/// Assemble the final report.
///
/// `alternatives_lookup` resolves an allergen key to its configured safe
/// alternatives; keys with none configured must yield an empty list. It is
/// consulted for every distinct allergen appearing anywhere in `detections`,
/// relevant to the profile or not.
pub fn assemble(
    profile: &UserAllergyProfile,
    detections: Vec<Detection>,
    health: HealthScore,
    predictive_allergens: BTreeSet<String>,
    alternatives_lookup: impl Fn(&str) -> Vec<String>,
) -> ScanReport {
    let relevant = relevant_allergens(&detections, profile);
    let summary = summarize(&detections, profile);

    let mut safe_alternatives = BTreeMap::new();
    for detection in &detections {
        safe_alternatives
            .entry(detection.allergen.clone())
            .or_insert_with(|| alternatives_lookup(&detection.allergen));
    }

    ScanReport {
        detections,
        relevant,
        summary,
        safe_alternatives,
        health,
        predictive_allergens,
    }
}

/// Distinct detected allergens that intersect the user profile, in
/// first-seen detection order.
fn relevant_allergens(detections: &[Detection], profile: &UserAllergyProfile) -> Vec<String> {
    let mut seen = BTreeSet::new();
    detections
        .iter()
        .filter(|d| profile.contains(&d.allergen))
        .filter(|d| seen.insert(d.allergen.clone()))
        .map(|d| d.allergen.clone())
        .collect()
}

/// Group the relevant-filtered detections into severity buckets.
///
/// Buckets are not deduplicated: one allergen detected twice at low severity
/// appears twice in the low bucket.
fn summarize(detections: &[Detection], profile: &UserAllergyProfile) -> RiskSummary {
    let bucket = |severity: Severity| -> Vec<String> {
        detections
            .iter()
            .filter(|d| d.severity == severity && profile.contains(&d.allergen))
            .map(|d| d.allergen.clone())
            .collect()
    };

    RiskSummary {
        high: bucket(Severity::High),
        medium: bucket(Severity::Medium),
        low: bucket(Severity::Low),
        had_detections: !detections.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn detection(allergen: &str, matched: &str, severity: Severity) -> Detection {
        Detection {
            allergen: allergen.to_string(),
            matched: matched.to_string(),
            severity,
        }
    }

    fn profile(keys: &[&str]) -> UserAllergyProfile {
        keys.iter().map(|k| k.to_string()).collect()
    }

    fn no_alternatives(_: &str) -> Vec<String> {
        Vec::new()
    }

    #[test]
    fn test_relevant_is_profile_intersection() {
        let detections = vec![
            detection("milk", "milk", Severity::High),
            detection("peanut", "peanut", Severity::High),
        ];
        let report = assemble(
            &profile(&["milk"]),
            detections,
            HealthScore::default(),
            BTreeSet::new(),
            no_alternatives,
        );

        assert_eq!(report.relevant, vec!["milk".to_string()]);
        // relevant is always a subset of both profile and detected keys
        for key in &report.relevant {
            assert!(report.detections.iter().any(|d| &d.allergen == key));
        }
    }

    #[test]
    fn test_relevant_first_seen_order_distinct() {
        let detections = vec![
            detection("peanut", "peanut", Severity::High),
            detection("milk", "milk", Severity::High),
            detection("peanut", "peanut-free", Severity::Low),
        ];
        let report = assemble(
            &profile(&["milk", "peanut"]),
            detections,
            HealthScore::default(),
            BTreeSet::new(),
            no_alternatives,
        );
        assert_eq!(report.relevant, vec!["peanut".to_string(), "milk".to_string()]);
    }

    #[test]
    fn test_summary_buckets_relevant_only() {
        let detections = vec![
            detection("milk", "milk", Severity::High),
            detection("egg", "egg", Severity::High),
            detection("milk", "may contain/produced in facility", Severity::Medium),
        ];
        let report = assemble(
            &profile(&["milk"]),
            detections,
            HealthScore::default(),
            BTreeSet::new(),
            no_alternatives,
        );

        assert_eq!(report.summary.high, vec!["milk".to_string()]);
        assert_eq!(report.summary.medium, vec!["milk".to_string()]);
        assert!(report.summary.low.is_empty());
        assert!(report.summary.had_detections);
    }

    #[test]
    fn test_none_relevant_summary_state() {
        let detections = vec![detection("egg", "egg", Severity::High)];
        let report = assemble(
            &profile(&["milk"]),
            detections,
            HealthScore::default(),
            BTreeSet::new(),
            no_alternatives,
        );

        assert!(report.relevant.is_empty());
        assert!(report.summary.none_relevant());
        assert_eq!(
            report.summary.message(),
            "No allergens in your profile detected."
        );
    }

    #[test]
    fn test_clean_scan_summary_state() {
        let report = assemble(
            &profile(&["milk"]),
            Vec::new(),
            HealthScore::default(),
            BTreeSet::new(),
            no_alternatives,
        );

        assert!(report.summary.is_clean());
        assert_eq!(report.summary.message(), "No allergens detected.");
        assert!(report.safe_alternatives.is_empty());
    }

    #[test]
    fn test_alternatives_for_all_detected_not_just_relevant() {
        let detections = vec![
            detection("milk", "milk", Severity::High),
            detection("peanut", "peanut", Severity::High),
        ];
        let report = assemble(
            &profile(&["milk"]),
            detections,
            HealthScore::default(),
            BTreeSet::new(),
            |key| match key {
                "peanut" => vec!["Almond butter".to_string()],
                _ => Vec::new(),
            },
        );

        assert_eq!(report.safe_alternatives.len(), 2);
        assert_eq!(
            report.safe_alternatives["peanut"],
            vec!["Almond butter".to_string()]
        );
        // no configured alternative degrades to an empty list, never an error
        assert!(report.safe_alternatives["milk"].is_empty());
    }
}
