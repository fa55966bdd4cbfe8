pub mod search;

pub use search::{
    DEFAULT_STEP_GRAMS, OptimizationOutcome, Optimizer, OptimizerConfig, SearchState,
    TerminationReason,
};
