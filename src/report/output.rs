use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::Deserialize;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::models::{FoodId, REPORT_THRESHOLD, Recipe};
use crate::optimizer::OptimizationOutcome;

/// Round a float to n decimal places.
fn truncate(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Write the recipe as `food_id,description,grams` rows in ascending food id.
pub fn write_recipe_csv(recipe: &Recipe, catalog: &Catalog, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["food_id", "description", "grams"])?;

    for (food_id, grams) in recipe.sorted_quantities() {
        let description = catalog
            .food(food_id)
            .map(|f| f.description.as_str())
            .unwrap_or("");
        wtr.write_record([food_id.to_string(), description.to_string(), grams.to_string()])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the full search result, including nutrient totals, to a JSON file.
pub fn write_recipe_json(
    outcome: &OptimizationOutcome,
    catalog: &Catalog,
    path: &Path,
) -> Result<()> {
    let json = serde_json::json!({
        "score": truncate(outcome.score, 4),
        "reason": outcome.reason,
        "rounds": outcome.rounds,
        "quantities": outcome.recipe.sorted_quantities().iter().map(|&(food_id, grams)| {
            serde_json::json!({
                "food_id": food_id,
                "description": catalog.food(food_id).map(|f| f.description.as_str()),
                "grams": grams,
            })
        }).collect::<Vec<_>>(),
        "nutrient_totals": catalog.nutrients()
            .map(|n| (n, outcome.recipe.nutrient_total(n.id)))
            .filter(|&(_, amount)| amount >= REPORT_THRESHOLD)
            .map(|(n, amount)| {
                serde_json::json!({
                    "nutrient_id": n.id,
                    "description": n.description,
                    "units": n.units,
                    "amount": truncate(amount, 3),
                })
            }).collect::<Vec<_>>(),
    });

    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(&json)?.as_bytes())?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct SavedQuantity {
    food_id: FoodId,
    grams: u32,
}

#[derive(Debug, Deserialize)]
struct SavedRecipe {
    quantities: Vec<SavedQuantity>,
}

/// Read back the quantities of a recipe written by [`write_recipe_json`].
///
/// Every other field is ignored; totals are rebuilt from the catalog.
pub fn load_recipe_json(path: &Path) -> Result<Vec<(FoodId, u32)>> {
    let content = fs::read_to_string(path)?;
    let saved: SavedRecipe = serde_json::from_str(&content)?;
    Ok(saved
        .quantities
        .into_iter()
        .map(|q| (q.food_id, q.grams))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoodItem, Nutrient, NutrientAmount};
    use crate::optimizer::TerminationReason;
    use tempfile::tempdir;

    fn catalog() -> Catalog {
        let nutrients = vec![Nutrient {
            id: 203,
            units: "g".to_string(),
            description: "Protein".to_string(),
        }];
        let foods = vec![
            FoodItem {
                id: 9,
                group: String::new(),
                description: "Lentils, raw".to_string(),
                manufacturer: String::new(),
                nutrients: vec![NutrientAmount {
                    nutrient_id: 203,
                    per_gram: 0.25,
                }],
            },
            FoodItem {
                id: 4,
                group: String::new(),
                description: "Rice, white".to_string(),
                manufacturer: String::new(),
                nutrients: vec![NutrientAmount {
                    nutrient_id: 203,
                    per_gram: 0.07,
                }],
            },
        ];
        Catalog::new(nutrients, foods).unwrap()
    }

    fn outcome(catalog: &Catalog) -> OptimizationOutcome {
        let recipe = Recipe::from_quantities(catalog, [(9, 40), (4, 15)]).unwrap();
        OptimizationOutcome {
            recipe,
            score: 12.345678,
            rounds: 11,
            reason: TerminationReason::LocalOptimum,
            history: vec![100.0, 12.345678],
        }
    }

    #[test]
    fn test_csv_rows_in_food_id_order() {
        let catalog = catalog();
        let outcome = outcome(&catalog);
        let dir = tempdir().unwrap();
        let path = dir.path().join("recipe.csv");

        write_recipe_csv(&outcome.recipe, &catalog, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "food_id,description,grams");
        assert_eq!(lines[1], "4,\"Rice, white\",15");
        assert_eq!(lines[2], "9,\"Lentils, raw\",40");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_json_reload_rebuilds_recipe() {
        let catalog = catalog();
        let outcome = outcome(&catalog);
        let dir = tempdir().unwrap();
        let path = dir.path().join("recipe.json");

        write_recipe_json(&outcome, &catalog, &path).unwrap();

        let quantities = load_recipe_json(&path).unwrap();
        assert_eq!(quantities, vec![(4, 15), (9, 40)]);

        let rebuilt = Recipe::from_quantities(&catalog, quantities).unwrap();
        assert_eq!(rebuilt, outcome.recipe);
    }

    #[test]
    fn test_json_fields() {
        let catalog = catalog();
        let outcome = outcome(&catalog);
        let dir = tempdir().unwrap();
        let path = dir.path().join("recipe.json");

        write_recipe_json(&outcome, &catalog, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["score"], 12.3457);
        assert_eq!(value["reason"], "LocalOptimum");
        assert_eq!(value["rounds"], 11);
        // 40 * 0.25 + 15 * 0.07
        assert_eq!(value["nutrient_totals"][0]["amount"], 11.05);
    }
}
