pub mod output;
pub mod render;

pub use output::{load_recipe_json, write_recipe_csv, write_recipe_json};
pub use render::{
    display_food_breakdown, display_outcome, display_score_breakdown, display_total_nutrients,
};
