use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NutriError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Special-case scoring constants
// ─────────────────────────────────────────────────────────────────────────────

/// Essential amino acid pair scored as one total.
pub const PHENYLALANINE: &str = "Phenylalanine";
pub const TYROSINE: &str = "Tyrosine";
pub const PHENYLALANINE_TYROSINE_MIN: f64 = 1.625;

/// Folate is scored as dietary folate equivalents.
pub const FOOD_FOLATE: &str = "Folate, food";
pub const FOLIC_ACID: &str = "Folic acid";
pub const FOLIC_ACID_DFE_FACTOR: f64 = 1.7;
pub const FOLATE_DFE_MIN: f64 = 400.0;
pub const FOLATE_DFE_MAX: f64 = 1000.0;

/// Caffeine above the threshold adds `total - offset` directly.
pub const CAFFEINE: &str = "Caffeine";
pub const CAFFEINE_THRESHOLD: f64 = 20.0;
pub const CAFFEINE_OFFSET: f64 = 5.0;

/// Linked to low bone density; every unit counts against the recipe.
pub const DIHYDROPHYLLOQUINONE: &str = "Dihydrophylloquinone";

/// Complexity penalties saturate at this value.
pub const COMPLEXITY_CAP: f64 = 10.0;

/// Food count at which the food-count penalty saturates.
pub const FOOD_COUNT_SCALE: f64 = 100.0;

/// Total grams at which the mass penalty saturates.
pub const MASS_SCALE_GRAMS: f64 = 3000.0;

// ─────────────────────────────────────────────────────────────────────────────
// Daily target table (adult male, 65 kg)
// ─────────────────────────────────────────────────────────────────────────────

/// (nutrient description, min, max). A max of 0 means no upper bound.
const DAILY_TARGETS: &[(&str, f64, f64)] = &[
    // Some fat is needed; excess is tolerated up to a point
    ("Total lipid (fat)", 60.0, 300.0),
    ("Energy, kcal", 2700.0, 10000.0),
    // 0.7 g/lb at 145 lb
    ("Protein", 101.5, 3510.0),
    ("Fiber, total dietary", 38.0, 0.0),
    ("Calcium, Ca", 1000.0, 2500.0),
    ("Iron, Fe", 8.0, 45.0),
    ("Magnesium, Mg", 400.0, 0.0),
    ("Phosphorus, P", 700.0, 4000.0),
    ("Potassium, K", 4700.0, 0.0),
    ("Sodium, Na", 1500.0, 2300.0),
    ("Zinc, Zn", 11.0, 40.0),
    ("Copper, Cu", 0.9, 10.0),
    ("Manganese, Mn", 2.3, 11.0),
    ("Selenium, Se", 55.0, 400.0),
    ("Vitamin A, RAE", 900.0, 1500.0),
    ("Vitamin E (alpha-tocopherol)", 15.0, 1000.0),
    ("Lutein + zeaxanthin", 12000.0, 0.0),
    ("Vitamin C, total ascorbic acid", 90.0, 2000.0),
    ("Thiamin", 1.2, 0.0),
    ("Riboflavin", 1.3, 0.0),
    ("Niacin", 16.0, 35.0),
    ("Pantothenic acid", 5.0, 0.0),
    ("Vitamin B-6", 1.3, 100.0),
    ("Vitamin B-12", 2.4, 0.0),
    ("Choline, total", 550.0, 3500.0),
    ("Vitamin K (phylloquinone)", 120.0, 0.0),
    // Essential amino acids
    ("Lysine", 1.95, 0.0),
    ("Leucine", 2.535, 0.0),
    ("Methionine", 0.65, 0.0),
    ("Cystine", 0.26, 0.0),
    ("Valine", 1.69, 0.0),
    ("Histidine", 0.65, 0.0),
    ("Tryptophan", 0.26, 0.0),
    ("Threonine", 0.975, 0.0),
    ("Isoleucine", 1.3, 0.0),
    // Omega-3
    ("18:3 n-3 c,c,c (ALA)", 1.6, 0.0),
    ("20:5 n-3 (EPA)", 1.6, 0.0),
    ("22:6 n-3 (DHA)", 1.6, 0.0),
    // Half of the daily 64 fl oz from food
    ("Water", 946.0, 0.0),
];

/// Adequate range for one nutrient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRange {
    /// Nutrient description as it appears in the catalog.
    pub nutrient: String,
    pub min: f64,
    /// `None` (or 0) means no upper bound.
    #[serde(default)]
    pub max: Option<f64>,
}

impl TargetRange {
    pub fn new(nutrient: &str, min: f64, max: Option<f64>) -> Self {
        Self {
            nutrient: nutrient.to_string(),
            min,
            max,
        }
    }

    /// Upper bound, treating 0 as unbounded.
    pub fn upper(&self) -> Option<f64> {
        self.max.filter(|&m| m != 0.0)
    }
}

/// Ordered list of per-nutrient target ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetTable {
    pub entries: Vec<TargetRange>,
}

impl Default for TargetTable {
    fn default() -> Self {
        let entries = DAILY_TARGETS
            .iter()
            .map(|&(name, min, max)| TargetRange::new(name, min, Some(max).filter(|&m| m != 0.0)))
            .collect();
        Self { entries }
    }
}

impl TargetTable {
    /// Load a replacement table from a JSON list of `{nutrient, min, max}`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let table: TargetTable = serde_json::from_str(&content)?;
        table.validate()?;
        Ok(table)
    }

    /// Reject ranges the penalty ramp cannot handle.
    pub fn validate(&self) -> Result<()> {
        for entry in &self.entries {
            if !(entry.min.is_finite() && entry.min >= 0.0) {
                return Err(NutriError::InvalidInput(format!(
                    "target for {} has invalid min {}",
                    entry.nutrient, entry.min
                )));
            }
            if let Some(max) = entry.upper() {
                if max <= entry.min {
                    return Err(NutriError::InvalidInput(format!(
                        "target for {} has max {} not above min {}",
                        entry.nutrient, max, entry.min
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nutrient names the model reads, including the special cases.
    pub fn referenced_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.nutrient.as_str()).chain([
            PHENYLALANINE,
            TYROSINE,
            FOOD_FOLATE,
            FOLIC_ACID,
            CAFFEINE,
            DIHYDROPHYLLOQUINONE,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_table_is_valid() {
        let table = TargetTable::default();
        assert_eq!(table.len(), DAILY_TARGETS.len());
        table.validate().unwrap();
        assert!(table.entries.iter().all(|e| e.min > 0.0));
    }

    #[test]
    fn test_zero_max_becomes_unbounded() {
        let table = TargetTable::default();
        let fiber = table
            .entries
            .iter()
            .find(|e| e.nutrient == "Fiber, total dietary")
            .unwrap();
        assert_eq!(fiber.max, None);

        let sodium = table
            .entries
            .iter()
            .find(|e| e.nutrient == "Sodium, Na")
            .unwrap();
        assert_eq!(sodium.upper(), Some(2300.0));
    }

    #[test]
    fn test_load_custom_table() {
        let json = r#"[
            {"nutrient": "Protein", "min": 50, "max": 200},
            {"nutrient": "Water", "min": 1000}
        ]"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let table = TargetTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries[1].max, None);
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let table = TargetTable {
            entries: vec![TargetRange::new("Iron, Fe", 45.0, Some(8.0))],
        };
        assert!(matches!(
            table.validate(),
            Err(NutriError::InvalidInput(_))
        ));
    }
}
