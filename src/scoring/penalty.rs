/// Which branch of the scoring model produced a penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenaltyKind {
    /// Below the minimum: linear ramp from 100 at zero intake.
    Deficit,
    /// Between min and the midpoint of [min, max], or above min with no max.
    Adequate,
    /// Past the midpoint: linear ramp reaching 100 at max and growing beyond.
    Excess,
    /// Added only once the total crosses a threshold.
    Threshold,
    /// Raw total counted directly.
    PassThrough,
    /// Food count or total mass.
    Complexity,
}

/// Scale of the deficit and excess ramps.
pub const RAMP_SCALE: f64 = 100.0;

/// Penalty for one nutrient amount against a target range.
///
/// A `max` of `None` or 0 means no upper bound. Excess penalty is not
/// clamped: it keeps growing linearly past `max`.
pub fn range_penalty(amount: f64, min: f64, max: Option<f64>) -> f64 {
    classify(amount, min, max).0
}

/// Penalty together with the branch that produced it.
pub fn classify(amount: f64, min: f64, max: Option<f64>) -> (f64, PenaltyKind) {
    if amount < min && min > 0.0 {
        return ((min - amount) / min * RAMP_SCALE, PenaltyKind::Deficit);
    }

    let max = match max.filter(|&m| m != 0.0) {
        Some(m) => m,
        None => return (0.0, PenaltyKind::Adequate),
    };

    let midpoint = min + (max - min) / 2.0;
    if amount < midpoint {
        (0.0, PenaltyKind::Adequate)
    } else {
        let over_by = amount - midpoint;
        (over_by / (max - midpoint) * RAMP_SCALE, PenaltyKind::Excess)
    }
}

/// One line of a verbose score trace.
#[derive(Debug, Clone)]
pub struct PenaltyLine {
    pub label: String,
    pub amount: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub penalty: f64,
    pub kind: PenaltyKind,
}

/// Per-line account of how a score was reached.
#[derive(Debug, Clone, Default)]
pub struct ScoreBreakdown {
    pub total: f64,
    pub lines: Vec<PenaltyLine>,
}

impl ScoreBreakdown {
    /// Lines that actually cost something, worst first.
    pub fn offenders(&self) -> Vec<&PenaltyLine> {
        let mut lines: Vec<&PenaltyLine> =
            self.lines.iter().filter(|l| l.penalty > 0.0).collect();
        lines.sort_by(|a, b| {
            b.penalty
                .partial_cmp(&a.penalty)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        lines
    }
}
