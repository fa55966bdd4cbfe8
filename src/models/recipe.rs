use std::collections::HashMap;

use crate::catalog::Catalog;
use crate::error::{NutriError, Result};
use crate::models::food::{FoodId, FoodItem, NutrientId};

/// Maximum drift tolerated between cached and recomputed nutrient totals.
pub const CONSISTENCY_TOLERANCE: f64 = 0.5;

/// A candidate combination of food quantities.
///
/// `nutrient_totals` is a cache kept in step with `quantities` on every
/// mutation: for each nutrient it holds the sum over foods of
/// `grams * per_gram`. Every catalog nutrient has an entry, even at zero.
#[derive(Debug, Clone)]
pub struct Recipe {
    /// Food id to grams. Never holds a zero quantity.
    quantities: HashMap<FoodId, u32>,
    nutrient_totals: HashMap<NutrientId, f64>,
}

impl Recipe {
    /// Create an empty recipe with a zero total for every catalog nutrient.
    pub fn new(catalog: &Catalog) -> Self {
        let nutrient_totals = catalog.nutrients().map(|n| (n.id, 0.0)).collect();
        Self {
            quantities: HashMap::new(),
            nutrient_totals,
        }
    }

    /// Rebuild a recipe from saved quantities.
    pub fn from_quantities<I>(catalog: &Catalog, quantities: I) -> Result<Self>
    where
        I: IntoIterator<Item = (FoodId, u32)>,
    {
        let mut recipe = Self::new(catalog);
        for (food_id, grams) in quantities {
            let food = catalog
                .food(food_id)
                .ok_or(NutriError::FoodNotFound(food_id))?;
            recipe.add_food(food, grams)?;
        }
        Ok(recipe)
    }

    /// Add `grams` of a food, creating its entry if needed.
    pub fn add_food(&mut self, food: &FoodItem, grams: u32) -> Result<()> {
        if grams == 0 {
            return Err(NutriError::InvalidQuantity {
                food_id: food.id,
                grams,
            });
        }

        let held = self.quantity(food.id);
        let total = held
            .checked_add(grams)
            .ok_or(NutriError::QuantityOverflow {
                food_id: food.id,
                held,
                grams,
            })?;

        self.quantities.insert(food.id, total);
        self.apply(food, grams as f64);
        Ok(())
    }

    /// Remove `grams` of a food. The entry disappears when it reaches zero.
    pub fn remove_food(&mut self, food: &FoodItem, grams: u32) -> Result<()> {
        if grams == 0 {
            return Err(NutriError::InvalidQuantity {
                food_id: food.id,
                grams,
            });
        }

        let held = self.quantity(food.id);
        if held == 0 || grams > held {
            return Err(NutriError::InvalidRemoval {
                food_id: food.id,
                requested: grams,
                held,
            });
        }

        if grams == held {
            self.quantities.remove(&food.id);
        } else {
            self.quantities.insert(food.id, held - grams);
        }

        self.apply(food, -(grams as f64));
        Ok(())
    }

    fn apply(&mut self, food: &FoodItem, signed_grams: f64) {
        for amount in &food.nutrients {
            *self.nutrient_totals.entry(amount.nutrient_id).or_insert(0.0) +=
                amount.per_gram * signed_grams;
        }
    }

    pub fn has_food(&self, food: &FoodItem) -> bool {
        self.quantities.contains_key(&food.id)
    }

    /// Grams of a food currently held (0 when absent).
    pub fn quantity(&self, food_id: FoodId) -> u32 {
        self.quantities.get(&food_id).copied().unwrap_or(0)
    }

    pub fn quantities(&self) -> &HashMap<FoodId, u32> {
        &self.quantities
    }

    /// Quantities ordered by food id.
    pub fn sorted_quantities(&self) -> Vec<(FoodId, u32)> {
        let mut sorted: Vec<(FoodId, u32)> =
            self.quantities.iter().map(|(&id, &g)| (id, g)).collect();
        sorted.sort_unstable_by_key(|&(id, _)| id);
        sorted
    }

    pub fn nutrient_totals(&self) -> &HashMap<NutrientId, f64> {
        &self.nutrient_totals
    }

    /// Total of a nutrient, 0 for ids the recipe has never seen.
    pub fn nutrient_total(&self, nutrient_id: NutrientId) -> f64 {
        self.nutrient_totals.get(&nutrient_id).copied().unwrap_or(0.0)
    }

    /// Number of distinct foods with a nonzero quantity.
    pub fn food_count(&self) -> usize {
        self.quantities.values().filter(|&&g| g != 0).count()
    }

    pub fn total_grams(&self) -> u64 {
        self.quantities.values().map(|&g| g as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// Recompute totals from scratch and compare them with the cache.
    ///
    /// Not for the hot path: this walks every nutrient of every food in the recipe.
    pub fn check_consistency(&self, catalog: &Catalog) -> Result<()> {
        let mut recomputed: HashMap<NutrientId, f64> = HashMap::new();

        for (&food_id, &grams) in &self.quantities {
            if grams == 0 {
                return Err(NutriError::ConsistencyFault(format!(
                    "food {} stored with zero quantity",
                    food_id
                )));
            }

            let food = catalog.food(food_id).ok_or_else(|| {
                NutriError::ConsistencyFault(format!("food {} is not in the catalog", food_id))
            })?;

            for amount in &food.nutrients {
                *recomputed.entry(amount.nutrient_id).or_insert(0.0) +=
                    amount.per_gram * grams as f64;
            }
        }

        let ids = recomputed.keys().chain(self.nutrient_totals.keys());
        for &id in ids {
            let cached = self.nutrient_total(id);
            let expected = recomputed.get(&id).copied().unwrap_or(0.0);
            if (cached - expected).abs() > CONSISTENCY_TOLERANCE {
                return Err(NutriError::ConsistencyFault(format!(
                    "nutrient {} cached total {:.4} diverges from recomputed {:.4}",
                    id, cached, expected
                )));
            }
        }

        Ok(())
    }
}

/// Recipes are equal when they hold the same foods at the same grams.
impl PartialEq for Recipe {
    fn eq(&self, other: &Self) -> bool {
        self.quantities == other.quantities
    }
}
