//! Healthiness scoring via weighted harmful-ingredient lookup.
//!
//! Starts at 100 and subtracts the weight of every harmful-ingredient rule
//! whose substring appears in the text. No early exit and no cap on the
//! number of deductions; the final score is floored at 0.

use labelscan_model::{HarmfulIngredientRule, HealthFinding, HealthScore};

/// Score ingredient text against the harmful-ingredient rules.
///
/// Every matching rule applies independently; `found` records the matches in
/// rule iteration order. Nothing can raise the score above the starting 100.
pub fn score(text: &str, rules: &[HarmfulIngredientRule]) -> HealthScore {
    let lower = text.to_lowercase();

    let mut remaining: i64 = 100;
    let mut found = Vec::new();

    for rule in rules {
        let ingredient = rule.ingredient.to_lowercase();
        if lower.contains(&ingredient) {
            remaining -= i64::from(rule.weight);
            found.push(HealthFinding {
                ingredient,
                weight: rule.weight,
            });
        }
    }

    HealthScore {
        score: remaining.max(0) as u32,
        found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rules() -> Vec<HarmfulIngredientRule> {
        vec![
            HarmfulIngredientRule::new("sugar", 20),
            HarmfulIngredientRule::new("trans fat", 30),
            HarmfulIngredientRule::new("monosodium glutamate", 10),
        ]
    }

    #[test]
    fn test_deductions_in_rule_order() {
        let health = score("Sugar, trans fat, salt", &rules());
        assert_eq!(health.score, 50);
        assert_eq!(
            health.found,
            vec![
                HealthFinding {
                    ingredient: "sugar".to_string(),
                    weight: 20,
                },
                HealthFinding {
                    ingredient: "trans fat".to_string(),
                    weight: 30,
                },
            ]
        );
    }

    #[test]
    fn test_clean_text_full_score() {
        let health = score("water, oats, salt", &rules());
        assert_eq!(health.score, 100);
        assert!(health.found.is_empty());
    }

    #[test]
    fn test_empty_text_full_score() {
        let health = score("", &rules());
        assert_eq!(health, HealthScore::default());
    }

    #[test]
    fn test_score_floored_at_zero() {
        let heavy = vec![
            HarmfulIngredientRule::new("sugar", 60),
            HarmfulIngredientRule::new("trans fat", 60),
        ];
        let health = score("sugar and trans fat", &heavy);
        assert_eq!(health.score, 0);
        assert_eq!(health.found.len(), 2);
    }

    #[test]
    fn test_monotonic_in_matches() {
        let one = score("sugar", &rules());
        let two = score("sugar and trans fat", &rules());
        assert!(two.score <= one.score);
        assert!(one.score <= 100);
    }
}
