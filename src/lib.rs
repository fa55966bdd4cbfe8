pub mod catalog;
pub mod cli;
pub mod error;
pub mod models;
pub mod optimizer;
pub mod report;
pub mod scoring;

pub use catalog::Catalog;
pub use error::{NutriError, Result};
pub use models::{FoodItem, Nutrient, NutrientAmount, Recipe};
pub use optimizer::{OptimizationOutcome, Optimizer, OptimizerConfig, TerminationReason};
pub use scoring::{Objective, PenaltyModel, TargetTable};
