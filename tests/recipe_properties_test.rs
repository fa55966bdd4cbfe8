use assert_float_eq::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use diet_optimizer_rs::NutriError;
use diet_optimizer_rs::catalog::Catalog;
use diet_optimizer_rs::models::{FoodItem, Nutrient, NutrientAmount, Recipe};

const NUTRIENTS: u32 = 6;
const FOODS: u32 = 12;

fn random_catalog(rng: &mut StdRng) -> Catalog {
    let nutrients = (1..=NUTRIENTS)
        .map(|id| Nutrient {
            id,
            units: "mg".to_string(),
            description: format!("Nutrient {}", id),
        })
        .collect();

    let foods = (1..=FOODS)
        .map(|id| FoodItem {
            id,
            group: String::new(),
            description: format!("Food {}", id),
            manufacturer: String::new(),
            nutrients: (1..=NUTRIENTS)
                .filter_map(|nutrient_id| {
                    rng.gen_bool(0.6).then(|| NutrientAmount {
                        nutrient_id,
                        per_gram: rng.gen_range(0.0..5.0),
                    })
                })
                .collect(),
        })
        .collect();

    Catalog::new(nutrients, foods).unwrap()
}

fn assert_totals_match(a: &Recipe, b: &Recipe) {
    for id in 1..=NUTRIENTS {
        assert_float_absolute_eq!(a.nutrient_total(id), b.nutrient_total(id), 1e-6);
    }
}

#[test]
fn test_add_then_remove_restores_recipe() {
    let mut rng = StdRng::seed_from_u64(7);
    let catalog = random_catalog(&mut rng);
    let mut recipe = Recipe::from_quantities(&catalog, [(1, 40), (5, 15)]).unwrap();
    let start = recipe.clone();

    for _ in 0..500 {
        let food = catalog.food(rng.gen_range(1..=FOODS)).unwrap();
        let grams = rng.gen_range(1..=50);

        recipe.add_food(food, grams).unwrap();
        recipe.remove_food(food, grams).unwrap();

        assert_eq!(recipe, start);
        assert_totals_match(&recipe, &start);
    }
}

#[test]
fn test_random_walk_stays_consistent() {
    let mut rng = StdRng::seed_from_u64(42);
    let catalog = random_catalog(&mut rng);
    let mut recipe = Recipe::new(&catalog);

    for _ in 0..2000 {
        let food = catalog.food(rng.gen_range(1..=FOODS)).unwrap();
        let grams = rng.gen_range(1..=25);

        if rng.gen_bool(0.5) {
            recipe.add_food(food, grams).unwrap();
        } else {
            let held = recipe.quantity(food.id);
            match recipe.remove_food(food, grams) {
                Ok(()) => assert_eq!(recipe.quantity(food.id), held - grams),
                Err(NutriError::InvalidRemoval { held: h, .. }) => {
                    assert_eq!(h, held);
                    assert!(grams > held);
                }
                Err(e) => panic!("unexpected error {}", e),
            }
        }

        assert!(recipe.quantities().values().all(|&g| g > 0));
    }

    recipe.check_consistency(&catalog).unwrap();

    let rebuilt = Recipe::from_quantities(&catalog, recipe.sorted_quantities()).unwrap();
    assert_eq!(rebuilt, recipe);
    assert_totals_match(&rebuilt, &recipe);
}

#[test]
fn test_clone_is_independent() {
    let mut rng = StdRng::seed_from_u64(3);
    let catalog = random_catalog(&mut rng);
    let original = Recipe::from_quantities(&catalog, [(2, 30), (9, 10)]).unwrap();
    let snapshot = original.sorted_quantities();

    let mut copy = original.clone();
    for _ in 0..100 {
        let food = catalog.food(rng.gen_range(1..=FOODS)).unwrap();
        copy.add_food(food, rng.gen_range(1..=10)).unwrap();
    }
    copy.remove_food(catalog.food(2).unwrap(), 30).unwrap();

    assert_eq!(original.sorted_quantities(), snapshot);
    original.check_consistency(&catalog).unwrap();
    assert_ne!(copy, original);
}

#[test]
fn test_remove_to_zero_drops_entry() {
    let mut rng = StdRng::seed_from_u64(11);
    let catalog = random_catalog(&mut rng);
    let food = catalog.food(4).unwrap();
    let mut recipe = Recipe::new(&catalog);

    recipe.add_food(food, 10).unwrap();
    recipe.remove_food(food, 10).unwrap();

    assert!(!recipe.has_food(food));
    assert!(recipe.is_empty());
    assert_eq!(recipe.food_count(), 0);
    for id in 1..=NUTRIENTS {
        assert_float_absolute_eq!(recipe.nutrient_total(id), 0.0, 1e-9);
    }

    assert!(matches!(
        recipe.remove_food(food, 5),
        Err(NutriError::InvalidRemoval { held: 0, .. })
    ));
}
