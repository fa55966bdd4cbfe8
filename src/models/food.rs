use serde::{Deserialize, Serialize};

pub type NutrientId = u32;
pub type FoodId = u32;

/// Contributions below this amount (in the nutrient's own unit) are not worth reporting.
pub const REPORT_THRESHOLD: f64 = 0.01;

/// A nutrient definition from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nutrient {
    pub id: NutrientId,
    pub units: String,
    pub description: String,
}

/// Amount of one nutrient carried by a single gram of a food.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientAmount {
    pub nutrient_id: NutrientId,
    pub per_gram: f64,
}

impl NutrientAmount {
    /// Build from a per-100g lab measurement.
    ///
    /// A measurement backed by zero observed data points was calculated or
    /// imputed and is not trusted, so it counts as zero.
    pub fn from_per_100g(nutrient_id: NutrientId, per_100g: f64, data_points: u32) -> Self {
        let per_100g = if data_points == 0 { 0.0 } else { per_100g };
        Self {
            nutrient_id,
            per_gram: per_100g / 100.0,
        }
    }
}

/// A food item with its per-gram nutrient contributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: FoodId,
    #[serde(default)]
    pub group: String,
    pub description: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub nutrients: Vec<NutrientAmount>,
}

impl FoodItem {
    /// Amount of each nutrient supplied by `grams` of this food, skipping
    /// anything that would display as zero.
    pub fn contributions_at(&self, grams: u32) -> impl Iterator<Item = (NutrientId, f64)> + '_ {
        self.nutrients
            .iter()
            .map(move |n| (n.nutrient_id, n.per_gram * grams as f64))
            .filter(|&(_, amount)| amount >= REPORT_THRESHOLD)
    }

    /// Per-gram amount of a nutrient, 0 when the food does not list it.
    pub fn per_gram(&self, nutrient_id: NutrientId) -> f64 {
        self.nutrients
            .iter()
            .filter(|n| n.nutrient_id == nutrient_id)
            .map(|n| n.per_gram)
            .sum()
    }
}

impl PartialEq for FoodItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FoodItem {}
