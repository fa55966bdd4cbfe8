mod filter;
mod persistence;
mod usda;

pub use filter::FoodFilter;
pub use persistence::{CatalogFile, load_catalog, save_catalog};
pub use usda::{UsdaFiles, load_usda};

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::error::{NutriError, Result};
use crate::models::{FoodId, FoodItem, Nutrient, NutrientId};

/// Read-only set of nutrients and foods available to the optimizer.
///
/// Foods and nutrients are keyed in ordered maps so every walk over the
/// catalog happens in ascending id order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    nutrients: BTreeMap<NutrientId, Nutrient>,
    name_to_id: HashMap<String, NutrientId>,
    foods: BTreeMap<FoodId, FoodItem>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    ///
    /// Food contributions that reference an unknown nutrient are dropped.
    pub fn new(nutrients: Vec<Nutrient>, foods: Vec<FoodItem>) -> Result<Self> {
        let mut catalog = Self::default();

        for nutrient in nutrients {
            if catalog.nutrients.contains_key(&nutrient.id) {
                return Err(NutriError::DuplicateNutrient(nutrient.id));
            }
            catalog
                .name_to_id
                .insert(nutrient.description.clone(), nutrient.id);
            catalog.nutrients.insert(nutrient.id, nutrient);
        }

        for mut food in foods {
            if catalog.foods.contains_key(&food.id) {
                return Err(NutriError::DuplicateFood(food.id));
            }

            let before = food.nutrients.len();
            food.nutrients
                .retain(|n| catalog.nutrients.contains_key(&n.nutrient_id));
            if food.nutrients.len() != before {
                debug!(
                    "Dropped {} unknown nutrient entries from food {}",
                    before - food.nutrients.len(),
                    food.id
                );
            }

            catalog.foods.insert(food.id, food);
        }

        Ok(catalog)
    }

    pub fn nutrient(&self, id: NutrientId) -> Option<&Nutrient> {
        self.nutrients.get(&id)
    }

    /// Look up a nutrient id by its description.
    pub fn nutrient_id(&self, name: &str) -> Option<NutrientId> {
        self.name_to_id.get(name).copied()
    }

    pub fn food(&self, id: FoodId) -> Option<&FoodItem> {
        self.foods.get(&id)
    }

    /// All nutrients in ascending id order.
    pub fn nutrients(&self) -> impl Iterator<Item = &Nutrient> {
        self.nutrients.values()
    }

    /// All foods in ascending id order.
    pub fn foods(&self) -> impl Iterator<Item = &FoodItem> {
        self.foods.values()
    }

    /// All nutrient descriptions known to the catalog.
    pub fn nutrient_names(&self) -> impl Iterator<Item = &str> {
        self.name_to_id.keys().map(String::as_str)
    }

    pub fn len_foods(&self) -> usize {
        self.foods.len()
    }

    pub fn len_nutrients(&self) -> usize {
        self.nutrients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    /// Split back into plain lists for serialization.
    pub fn to_file(&self) -> CatalogFile {
        CatalogFile {
            nutrients: self.nutrients.values().cloned().collect(),
            foods: self.foods.values().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutrientAmount;

    fn nutrient(id: NutrientId, description: &str) -> Nutrient {
        Nutrient {
            id,
            units: "mg".to_string(),
            description: description.to_string(),
        }
    }

    fn food(id: FoodId, nutrients: Vec<NutrientAmount>) -> FoodItem {
        FoodItem {
            id,
            group: "1100".to_string(),
            description: format!("Food {}", id),
            manufacturer: String::new(),
            nutrients,
        }
    }

    #[test]
    fn test_foods_iterate_in_id_order() {
        let catalog = Catalog::new(
            vec![nutrient(301, "Calcium, Ca")],
            vec![food(300, vec![]), food(7, vec![]), food(42, vec![])],
        )
        .unwrap();

        let ids: Vec<FoodId> = catalog.foods().map(|f| f.id).collect();
        assert_eq!(ids, vec![7, 42, 300]);
    }

    #[test]
    fn test_name_lookup() {
        let catalog = Catalog::new(vec![nutrient(301, "Calcium, Ca")], vec![]).unwrap();
        assert_eq!(catalog.nutrient_id("Calcium, Ca"), Some(301));
        assert_eq!(catalog.nutrient_id("Iron, Fe"), None);
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = Catalog::new(
            vec![nutrient(301, "Calcium, Ca"), nutrient(301, "Calcium again")],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, NutriError::DuplicateNutrient(301)));

        let err = Catalog::new(vec![], vec![food(1, vec![]), food(1, vec![])]).unwrap_err();
        assert!(matches!(err, NutriError::DuplicateFood(1)));
    }

    #[test]
    fn test_unknown_nutrient_contributions_dropped() {
        let catalog = Catalog::new(
            vec![nutrient(301, "Calcium, Ca")],
            vec![food(
                1,
                vec![
                    NutrientAmount {
                        nutrient_id: 301,
                        per_gram: 1.0,
                    },
                    NutrientAmount {
                        nutrient_id: 999,
                        per_gram: 2.0,
                    },
                ],
            )],
        )
        .unwrap();

        let stored = catalog.food(1).unwrap();
        assert_eq!(stored.nutrients.len(), 1);
        assert_eq!(stored.nutrients[0].nutrient_id, 301);
    }
}
