//! Core domain model for labelscan ingredient analysis.
//!
//! This crate defines the fundamental types used throughout the system:
//! - `AllergenRule`, `HarmfulIngredientRule`, `PredictiveRule`: reference data
//! - `Detection`: a single tiered allergen hit
//! - `Severity`: high/medium/low confidence classification
//! - `ScanReport`: the assembled result returned to the caller

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Confidence tier of an allergen detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Keyword found directly in the ingredient text
    High,
    /// Precautionary labelling ("may contain", facility warnings)
    Medium,
    /// Mentioned only in a "-free" / "free from" claim
    Low,
}

impl Severity {
    /// Get a human-readable label for this tier.
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High Risk",
            Self::Medium => "Medium Risk",
            Self::Low => "Low Risk",
        }
    }
}

/// An allergen keyword rule: one stable key, its lexical variants in
/// match-priority order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllergenRule {
    /// Stable lowercase identifier (e.g. "tree_nuts")
    pub key: String,

    /// Ordered keyword variants; first substring hit wins
    pub keywords: Vec<String>,
}

impl AllergenRule {
    pub fn new(key: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            key: key.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// A harmful additive and its healthiness penalty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarmfulIngredientRule {
    /// Lowercase substring to look for
    pub ingredient: String,

    /// Penalty points subtracted from the score
    pub weight: u32,
}

impl HarmfulIngredientRule {
    pub fn new(ingredient: impl Into<String>, weight: u32) -> Self {
        Self {
            ingredient: ingredient.into(),
            weight,
        }
    }
}

/// Association rule: a food item that historically co-occurs with an allergen
/// even when the allergen is not textually present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictiveRule {
    /// Lowercase food-item substring
    pub food_item: String,

    /// Allergen key statistically associated with the food item
    pub possible_allergen: String,
}

impl PredictiveRule {
    pub fn new(food_item: impl Into<String>, possible_allergen: impl Into<String>) -> Self {
        Self {
            food_item: food_item.into(),
            possible_allergen: possible_allergen.into(),
        }
    }
}

/// A single allergen hit in the scanned text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    /// Allergen key from the rule that fired
    pub allergen: String,

    /// The literal keyword or phrase that triggered the match
    pub matched: String,

    /// Confidence tier
    pub severity: Severity,
}

/// One contribution to a healthiness deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthFinding {
    pub ingredient: String,
    pub weight: u32,
}

/// Healthiness score with the matches that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthScore {
    /// 0-100, starts at 100, floored at 0
    pub score: u32,

    /// Matched harmful ingredients in rule iteration order
    pub found: Vec<HealthFinding>,
}

impl Default for HealthScore {
    fn default() -> Self {
        Self {
            score: 100,
            found: Vec::new(),
        }
    }
}

/// Severity-grouped summary of the detections relevant to the user.
///
/// Exposes the three buckets and the empty-state flags so any front end can
/// render its own wording; `message()` provides the default rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSummary {
    /// Relevant allergen keys detected at high severity
    pub high: Vec<String>,

    /// Relevant allergen keys detected at medium severity
    pub medium: Vec<String>,

    /// Relevant allergen keys detected at low severity
    pub low: Vec<String>,

    /// Whether the scan produced any detections at all, relevant or not
    pub had_detections: bool,
}

impl RiskSummary {
    /// No detections of any kind.
    pub fn is_clean(&self) -> bool {
        !self.had_detections
    }

    /// Detections exist but none intersect the user profile.
    pub fn none_relevant(&self) -> bool {
        self.had_detections && self.high.is_empty() && self.medium.is_empty() && self.low.is_empty()
    }

    /// Default human-readable rendering, one line per non-empty bucket.
    pub fn message(&self) -> String {
        if self.is_clean() {
            return "No allergens detected.".to_string();
        }
        if self.none_relevant() {
            return "No allergens in your profile detected.".to_string();
        }

        let mut parts = Vec::new();
        if !self.high.is_empty() {
            parts.push(format!("High Risk: {}", self.high.join(", ")));
        }
        if !self.medium.is_empty() {
            parts.push(format!("Medium Risk: {}", self.medium.join(", ")));
        }
        if !self.low.is_empty() {
            parts.push(format!(
                "Low Risk (mentioned as -free or safe): {}",
                self.low.join(", ")
            ));
        }
        parts.join("\n")
    }
}

/// The assembled result of one scan. Transient: created fresh per invocation,
/// never persisted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// All detections in pass order (high, medium, low)
    pub detections: Vec<Detection>,

    /// Distinct detected allergens that intersect the user profile,
    /// first-seen order
    pub relevant: Vec<String>,

    /// Severity-grouped summary of the relevant detections
    pub summary: RiskSummary,

    /// Alternatives for every distinct detected allergen; allergens with no
    /// configured alternative map to an empty list
    pub safe_alternatives: BTreeMap<String, Vec<String>>,

    /// Healthiness score and its deductions
    pub health: HealthScore,

    /// Allergens associated with detected food items, absent direct evidence
    pub predictive_allergens: BTreeSet<String>,
}

/// The user's declared allergies, supplied by the caller per request.
pub type UserAllergyProfile = BTreeSet<String>;

/// Human display label for a built-in allergen key.
///
/// Unknown keys fall back to the key itself rather than erroring.
pub fn display_name(key: &str) -> &str {
    match key {
        "milk" => "Milk / Dairy",
        "egg" => "Egg",
        "peanut" => "Peanut",
        "tree_nuts" => "Tree nuts",
        "soy" => "Soy",
        "wheat" => "Wheat / Gluten",
        "fish" => "Fish",
        "shellfish" => "Shellfish / Crustaceans",
        "sesame" => "Sesame",
        "mustard" => "Mustard",
        "sulfites" => "Sulfites",
        "celery" => "Celery",
        "lupin" => "Lupin",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
        let parsed: Severity = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(parsed, Severity::Medium);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::High < Severity::Medium);
        assert!(Severity::Medium < Severity::Low);
    }

    #[test]
    fn test_detection_serialization() {
        let detection = Detection {
            allergen: "milk".to_string(),
            matched: "whey".to_string(),
            severity: Severity::High,
        };
        let json = serde_json::to_string(&detection).unwrap();
        let parsed: Detection = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, detection);
    }

    #[test]
    fn test_summary_empty_states() {
        let clean = RiskSummary::default();
        assert!(clean.is_clean());
        assert_eq!(clean.message(), "No allergens detected.");

        let none_relevant = RiskSummary {
            had_detections: true,
            ..Default::default()
        };
        assert!(none_relevant.none_relevant());
        assert_eq!(none_relevant.message(), "No allergens in your profile detected.");
    }

    #[test]
    fn test_summary_message_buckets() {
        let summary = RiskSummary {
            high: vec!["milk".to_string(), "peanut".to_string()],
            medium: vec![],
            low: vec!["wheat".to_string()],
            had_detections: true,
        };
        let message = summary.message();
        assert!(message.contains("High Risk: milk, peanut"));
        assert!(message.contains("Low Risk"));
        assert!(!message.contains("Medium"));
    }

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(display_name("tree_nuts"), "Tree nuts");
        assert_eq!(display_name("quinoa"), "quinoa");
    }
}
