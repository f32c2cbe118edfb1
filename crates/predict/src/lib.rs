//! Predictive risk inference via food-item association rules.
//!
//! A food item named in the text can imply an allergen that is not textually
//! present (chocolate products routinely carry peanut and milk traces, soy
//! sauce usually contains gluten). Rules are many-to-many.

use labelscan_model::PredictiveRule;
use std::collections::BTreeSet;

/// Infer associated allergens from food items named in the text.
///
/// Returns a set: duplicates collapse, iteration order is deterministic.
pub fn infer(text: &str, rules: &[PredictiveRule]) -> BTreeSet<String> {
    let lower = text.to_lowercase();

    rules
        .iter()
        .filter(|rule| lower.contains(rule.food_item.to_lowercase().as_str()))
        .map(|rule| rule.possible_allergen.clone())
        .collect()
}
