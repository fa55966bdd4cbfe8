use strsim::jaro_winkler;
use tracing::warn;

use crate::catalog::Catalog;
use crate::models::{NutrientId, Recipe};
use crate::scoring::penalty::{PenaltyKind, PenaltyLine, ScoreBreakdown, classify};
use crate::scoring::targets::*;

/// Ranks recipes for the optimizer. Lower is better; 0 is ideal.
pub trait Objective {
    fn score(&self, recipe: &Recipe) -> f64;
}

#[derive(Debug, Clone)]
struct ResolvedTarget {
    range: TargetRange,
    id: Option<NutrientId>,
}

/// Collects trace lines only when a sink is present.
struct Trace<'a>(Option<&'a mut Vec<PenaltyLine>>);

impl Trace<'_> {
    fn push(&mut self, line: impl FnOnce() -> PenaltyLine) {
        if let Some(lines) = self.0.as_mut() {
            lines.push(line());
        }
    }
}

/// Maps a recipe's nutrient totals to a single non-negative penalty.
///
/// Nutrient names are resolved to catalog ids once, at construction. A name
/// the catalog does not know reads as an amount of 0.
#[derive(Debug, Clone)]
pub struct PenaltyModel {
    targets: Vec<ResolvedTarget>,
    phenylalanine: Option<NutrientId>,
    tyrosine: Option<NutrientId>,
    food_folate: Option<NutrientId>,
    folic_acid: Option<NutrientId>,
    caffeine: Option<NutrientId>,
    dihydrophylloquinone: Option<NutrientId>,
    missing: Vec<String>,
}

impl PenaltyModel {
    /// Model using the built-in daily target table.
    pub fn new(catalog: &Catalog) -> Self {
        Self::with_targets(catalog, TargetTable::default())
    }

    pub fn with_targets(catalog: &Catalog, table: TargetTable) -> Self {
        let targets = table
            .entries
            .iter()
            .map(|range| ResolvedTarget {
                id: catalog.nutrient_id(&range.nutrient),
                range: range.clone(),
            })
            .collect();

        let missing: Vec<String> = table
            .referenced_names()
            .filter(|name| catalog.nutrient_id(name).is_none())
            .map(str::to_string)
            .collect();

        if catalog.len_nutrients() == 0 {
            if !missing.is_empty() {
                warn!("Catalog defines no nutrients; every target reads as 0");
            }
        } else {
            for name in &missing {
                match closest_name(catalog, name) {
                    Some(guess) => warn!(
                        "Target nutrient '{}' not in catalog, scoring it as 0 (closest: '{}')",
                        name, guess
                    ),
                    None => warn!("Target nutrient '{}' not in catalog, scoring it as 0", name),
                }
            }
        }

        Self {
            targets,
            phenylalanine: catalog.nutrient_id(PHENYLALANINE),
            tyrosine: catalog.nutrient_id(TYROSINE),
            food_folate: catalog.nutrient_id(FOOD_FOLATE),
            folic_acid: catalog.nutrient_id(FOLIC_ACID),
            caffeine: catalog.nutrient_id(CAFFEINE),
            dihydrophylloquinone: catalog.nutrient_id(DIHYDROPHYLLOQUINONE),
            missing,
        }
    }

    /// Names the model references that the catalog does not define.
    pub fn missing_nutrients(&self) -> &[String] {
        &self.missing
    }

    /// Score a recipe. Lower is better; 0 is ideal.
    pub fn score(&self, recipe: &Recipe) -> f64 {
        self.evaluate(recipe, Trace(None))
    }

    /// Score a recipe and keep a line for every contribution.
    pub fn score_traced(&self, recipe: &Recipe) -> ScoreBreakdown {
        let mut lines = Vec::with_capacity(self.targets.len() + 6);
        let total = self.evaluate(recipe, Trace(Some(&mut lines)));
        ScoreBreakdown { total, lines }
    }

    fn evaluate(&self, recipe: &Recipe, mut trace: Trace<'_>) -> f64 {
        let amount = |id: Option<NutrientId>| id.map_or(0.0, |id| recipe.nutrient_total(id));
        let mut total = 0.0;

        for target in &self.targets {
            let value = amount(target.id);
            let max = target.range.upper();
            let (penalty, kind) = classify(value, target.range.min, max);
            total += penalty;
            trace.push(|| PenaltyLine {
                label: target.range.nutrient.clone(),
                amount: value,
                min: Some(target.range.min),
                max,
                penalty,
                kind,
            });
        }

        let amino = amount(self.phenylalanine) + amount(self.tyrosine);
        let (penalty, kind) = classify(amino, PHENYLALANINE_TYROSINE_MIN, None);
        total += penalty;
        trace.push(|| PenaltyLine {
            label: format!("{} + {}", PHENYLALANINE, TYROSINE),
            amount: amino,
            min: Some(PHENYLALANINE_TYROSINE_MIN),
            max: None,
            penalty,
            kind,
        });

        let folate = amount(self.food_folate) + FOLIC_ACID_DFE_FACTOR * amount(self.folic_acid);
        let (penalty, kind) = classify(folate, FOLATE_DFE_MIN, Some(FOLATE_DFE_MAX));
        total += penalty;
        trace.push(|| PenaltyLine {
            label: "Folate, DFE".to_string(),
            amount: folate,
            min: Some(FOLATE_DFE_MIN),
            max: Some(FOLATE_DFE_MAX),
            penalty,
            kind,
        });

        let caffeine = amount(self.caffeine);
        let penalty = if caffeine > CAFFEINE_THRESHOLD {
            caffeine - CAFFEINE_OFFSET
        } else {
            0.0
        };
        total += penalty;
        trace.push(|| PenaltyLine {
            label: CAFFEINE.to_string(),
            amount: caffeine,
            min: None,
            max: Some(CAFFEINE_THRESHOLD),
            penalty,
            kind: PenaltyKind::Threshold,
        });

        // Floored so incremental drift cannot push the score below zero
        let dihydro = amount(self.dihydrophylloquinone).max(0.0);
        total += dihydro;
        trace.push(|| PenaltyLine {
            label: DIHYDROPHYLLOQUINONE.to_string(),
            amount: dihydro,
            min: None,
            max: None,
            penalty: dihydro,
            kind: PenaltyKind::PassThrough,
        });

        let food_count = recipe.food_count() as f64;
        let penalty = (food_count / FOOD_COUNT_SCALE).min(1.0) * COMPLEXITY_CAP;
        total += penalty;
        trace.push(|| PenaltyLine {
            label: "Number of foods".to_string(),
            amount: food_count,
            min: None,
            max: Some(FOOD_COUNT_SCALE),
            penalty,
            kind: PenaltyKind::Complexity,
        });

        let mass = recipe.total_grams() as f64;
        let penalty = (mass / MASS_SCALE_GRAMS).min(1.0) * COMPLEXITY_CAP;
        total += penalty;
        trace.push(|| PenaltyLine {
            label: "Total mass (g)".to_string(),
            amount: mass,
            min: None,
            max: Some(MASS_SCALE_GRAMS),
            penalty,
            kind: PenaltyKind::Complexity,
        });

        total
    }
}

impl Objective for PenaltyModel {
    fn score(&self, recipe: &Recipe) -> f64 {
        PenaltyModel::score(self, recipe)
    }
}

fn closest_name<'a>(catalog: &'a Catalog, name: &str) -> Option<&'a str> {
    catalog
        .nutrient_names()
        .map(|candidate| (candidate, jaro_winkler(name, candidate)))
        .filter(|&(_, similarity)| similarity > 0.8)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(candidate, _)| candidate)
}
