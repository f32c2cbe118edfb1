//! Reference data access for the scan pipeline.
//!
//! Provides the `ReferenceStore` trait and its in-memory implementation.
//! The engine only ever reads reference data; whoever owns the store is free
//! to back it with a database, a config file, or the built-in tables.

use labelscan_model::{AllergenRule, HarmfulIngredientRule, PredictiveRule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Errors from reference data access.
///
/// An unreachable store must propagate to the caller: silently empty rules
/// would report a clean scan instead of a failed one.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Reference data unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed reference data: {0}")]
    Parse(String),
}

/// Trait for reference data stores.
///
/// All methods take `&self`; implementations must support concurrent reads.
/// The engine never writes through this interface.
pub trait ReferenceStore {
    /// Allergen keyword rules, in match order.
    fn allergen_rules(&self) -> Result<Vec<AllergenRule>, StoreError>;

    /// Harmful-ingredient penalty rules.
    fn harmful_ingredients(&self) -> Result<Vec<HarmfulIngredientRule>, StoreError>;

    /// Food-item association rules.
    fn predictive_rules(&self) -> Result<Vec<PredictiveRule>, StoreError>;

    /// Safe alternatives for one allergen key (case-insensitive); an
    /// unconfigured key yields an empty list, not an error.
    fn safe_alternatives(&self, allergen: &str) -> Result<Vec<String>, StoreError>;

    /// Get the store name for logging.
    fn name(&self) -> &'static str;
}

/// The four reference tables as one serde document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub allergens: Vec<AllergenRule>,

    #[serde(default)]
    pub harmful_ingredients: Vec<HarmfulIngredientRule>,

    #[serde(default)]
    pub predictive_rules: Vec<PredictiveRule>,

    #[serde(default)]
    pub safe_alternatives: BTreeMap<String, Vec<String>>,
}

/// In-memory reference store.
#[derive(Debug)]
pub struct MemoryStore {
    data: ReferenceData,
}

impl MemoryStore {
    /// Create a store over an already-materialized document.
    pub fn new(data: ReferenceData) -> Self {
        Self { data }
    }

    /// Parse a JSON reference document.
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let data: ReferenceData =
            serde_json::from_str(json).map_err(|e| StoreError::Parse(e.to_string()))?;

        tracing::debug!(
            allergens = data.allergens.len(),
            harmful = data.harmful_ingredients.len(),
            predictive = data.predictive_rules.len(),
            "Loaded reference data from JSON"
        );

        Ok(Self::new(data))
    }

    /// Load a JSON reference document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path.as_ref())
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Self::from_json_str(&json)
    }

    /// Store seeded with the built-in reference tables.
    pub fn builtin() -> Self {
        Self::new(builtin_data())
    }

    /// Borrow the underlying document (for dumping/inspection).
    pub fn data(&self) -> &ReferenceData {
        &self.data
    }
}

impl ReferenceStore for MemoryStore {
    fn allergen_rules(&self) -> Result<Vec<AllergenRule>, StoreError> {
        Ok(self.data.allergens.clone())
    }

    fn harmful_ingredients(&self) -> Result<Vec<HarmfulIngredientRule>, StoreError> {
        Ok(self.data.harmful_ingredients.clone())
    }

    fn predictive_rules(&self) -> Result<Vec<PredictiveRule>, StoreError> {
        Ok(self.data.predictive_rules.clone())
    }

    fn safe_alternatives(&self, allergen: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .data
            .safe_alternatives
            .get(&allergen.to_lowercase())
            .cloned()
            .unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Built-in reference tables: the 13 common allergen categories with their
/// label synonyms, additive penalties, association rules, and alternatives.
pub fn builtin_data() -> ReferenceData {
    let allergens = vec![
        AllergenRule::new(
            "milk",
            &[
                "milk",
                "lactose",
                "whey",
                "casein",
                "sodium caseinate",
                "caseinate",
                "milk protein",
                "milk solids",
            ],
        ),
        AllergenRule::new(
            "egg",
            &[
                "egg",
                "eggs",
                "albumen",
                "albumin",
                "egg white",
                "egg yolk",
                "ovomucoid",
            ],
        ),
        AllergenRule::new("peanut", &["peanut", "groundnut", "peanuts"]),
        AllergenRule::new(
            "tree_nuts",
            &[
                "almond",
                "cashew",
                "walnut",
                "hazelnut",
                "pistachio",
                "pecan",
                "brazil nut",
                "macadamia",
            ],
        ),
        AllergenRule::new(
            "soy",
            &[
                "soy",
                "soya",
                "soybean",
                "soy protein",
                "soy lecithin",
                "soya lecithin",
                "lecithin (e322)",
            ],
        ),
        AllergenRule::new(
            "wheat",
            &["wheat", "gluten", "spelt", "rye", "barley", "semolina", "triticale"],
        ),
        AllergenRule::new(
            "fish",
            &["fish", "anchovy", "salmon", "tuna", "cod", "haddock", "pollock"],
        ),
        AllergenRule::new(
            "shellfish",
            &["shrimp", "prawn", "crab", "lobster", "crustacean", "shellfish", "scampi"],
        ),
        AllergenRule::new("sesame", &["sesame", "sesamum", "tahini"]),
        AllergenRule::new("mustard", &["mustard", "mustard seed", "mustard flour"]),
        AllergenRule::new(
            "sulfites",
            &[
                "sulphite",
                "sulfite",
                "sulfur dioxide",
                "e220",
                "e221",
                "e222",
                "e223",
                "e224",
                "e225",
                "e226",
                "e227",
                "e228",
            ],
        ),
        AllergenRule::new("celery", &["celery", "celeriac"]),
        AllergenRule::new("lupin", &["lupin", "lupine"]),
    ];

    let harmful_ingredients = vec![
        HarmfulIngredientRule::new("sugar", 20),
        HarmfulIngredientRule::new("high fructose corn syrup", 25),
        HarmfulIngredientRule::new("sodium benzoate", 15),
        HarmfulIngredientRule::new("potassium sorbate", 12),
        HarmfulIngredientRule::new("trans fat", 30),
        HarmfulIngredientRule::new("partially hydrogenated", 30),
        HarmfulIngredientRule::new("artificial sweetener", 15),
        HarmfulIngredientRule::new("monosodium glutamate", 10),
    ];

    let predictive_rules = vec![
        PredictiveRule::new("chocolate", "peanut"),
        PredictiveRule::new("chocolate", "milk"),
        PredictiveRule::new("ice cream", "milk"),
        PredictiveRule::new("soy sauce", "gluten"),
        PredictiveRule::new("cake", "egg"),
    ];

    let safe_alternatives: BTreeMap<String, Vec<String>> = [
        (
            "peanut",
            vec!["Almond butter".to_string(), "Sunflower seed butter".to_string()],
        ),
        ("milk", vec!["Soy milk".to_string(), "Oat milk".to_string()]),
        ("wheat", vec!["Rice flour".to_string()]),
        ("gluten", vec!["Corn flour".to_string()]),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    ReferenceData {
        allergens,
        harmful_ingredients,
        predictive_rules,
        safe_alternatives,
    }
}
