pub mod food;
pub mod recipe;

pub use food::{FoodId, FoodItem, Nutrient, NutrientAmount, NutrientId, REPORT_THRESHOLD};
pub use recipe::{CONSISTENCY_TOLERANCE, Recipe};
