use thiserror::Error;

use crate::models::{FoodId, NutrientId};

#[derive(Debug, Error)]
pub enum NutriError {
    #[error("Invalid quantity for food {food_id}: {grams} g (must be positive)")]
    InvalidQuantity { food_id: FoodId, grams: u32 },

    #[error("Adding {grams} g of food {food_id} to {held} g exceeds the largest quantity")]
    QuantityOverflow { food_id: FoodId, held: u32, grams: u32 },

    #[error("Cannot remove {requested} g of food {food_id}: recipe holds {held} g")]
    InvalidRemoval {
        food_id: FoodId,
        requested: u32,
        held: u32,
    },

    #[error("Internal consistency fault: {0}")]
    ConsistencyFault(String),

    #[error("Food not found: {0}")]
    FoodNotFound(FoodId),

    #[error("Duplicate nutrient id: {0}")]
    DuplicateNutrient(NutrientId),

    #[error("Duplicate food id: {0}")]
    DuplicateFood(FoodId),

    #[error("Malformed record in {file} at line {line}: {reason}")]
    MalformedRecord {
        file: String,
        line: u64,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl NutriError {
    /// True for faults that indicate a bug in incremental bookkeeping rather than bad input.
    pub fn is_internal_fault(&self) -> bool {
        matches!(self, NutriError::ConsistencyFault(_))
    }
}

pub type Result<T> = std::result::Result<T, NutriError>;
