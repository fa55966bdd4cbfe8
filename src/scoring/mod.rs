pub mod model;
pub mod penalty;
pub mod targets;

pub use model::{Objective, PenaltyModel};
pub use penalty::{PenaltyKind, PenaltyLine, RAMP_SCALE, ScoreBreakdown, classify, range_penalty};
pub use targets::{TargetRange, TargetTable};
