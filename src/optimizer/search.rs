use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::{NutriError, Result};
use crate::models::Recipe;
use crate::scoring::Objective;

/// Grams added or removed per trial move unless configured otherwise.
pub const DEFAULT_STEP_GRAMS: u32 = 5;

/// Configuration for the hill-climbing search.
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    /// Grams added or removed per trial move.
    pub step_grams: u32,
    /// Recompute nutrient totals after every trial mutation. Slow; for debugging.
    pub check_consistency: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            step_grams: DEFAULT_STEP_GRAMS,
            check_consistency: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TerminationReason {
    /// No single add or remove of one step improves the score.
    LocalOptimum,
    /// The score reached 0.
    IdealScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Exploring,
    Terminated(TerminationReason),
}

/// Final result of a search.
#[derive(Debug, Clone)]
pub struct OptimizationOutcome {
    pub recipe: Recipe,
    pub score: f64,
    pub rounds: usize,
    pub reason: TerminationReason,
    /// Score of the empty recipe, then the adopted best score after each improving round.
    pub history: Vec<f64>,
}

/// Steepest-descent hill climber over food quantities.
///
/// Each round tries, for every catalog food in ascending id order, removing
/// one step (if present) and adding one step, and adopts the single best
/// strictly-improving neighbor. Ties keep the first neighbor found.
pub struct Optimizer<'a, S: Objective + ?Sized> {
    catalog: &'a Catalog,
    model: &'a S,
    config: OptimizerConfig,
    best: Recipe,
    best_score: f64,
    rounds: usize,
    history: Vec<f64>,
    state: SearchState,
}

impl<'a, S: Objective + ?Sized> Optimizer<'a, S> {
    /// Start from the empty recipe.
    pub fn new(catalog: &'a Catalog, model: &'a S, config: OptimizerConfig) -> Result<Self> {
        if config.step_grams == 0 {
            return Err(NutriError::InvalidInput(
                "step size must be at least 1 gram".to_string(),
            ));
        }

        let best = Recipe::new(catalog);
        let best_score = model.score(&best);
        let state = if best_score <= 0.0 {
            SearchState::Terminated(TerminationReason::IdealScore)
        } else {
            SearchState::Exploring
        };

        Ok(Self {
            catalog,
            model,
            config,
            best,
            best_score,
            rounds: 0,
            history: vec![best_score],
            state,
        })
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn best(&self) -> &Recipe {
        &self.best
    }

    pub fn best_score(&self) -> f64 {
        self.best_score
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Run one search round. Does nothing once terminated.
    pub fn step(&mut self) -> Result<SearchState> {
        if let SearchState::Terminated(_) = self.state {
            return Ok(self.state);
        }

        let candidate = self.search_round()?;
        self.rounds += 1;

        match candidate {
            None => {
                self.state = SearchState::Terminated(TerminationReason::LocalOptimum);
            }
            Some((recipe, score)) => {
                if score > self.best_score {
                    return Err(NutriError::ConsistencyFault(format!(
                        "round {} adopted score {:.6} worse than {:.6}",
                        self.rounds, score, self.best_score
                    )));
                }

                self.best = recipe;
                self.best_score = score;
                self.history.push(score);

                debug!(
                    "Round {}: score {:.4} with {} foods, {} g",
                    self.rounds,
                    score,
                    self.best.food_count(),
                    self.best.total_grams()
                );

                if score <= 0.0 {
                    self.state = SearchState::Terminated(TerminationReason::IdealScore);
                }
            }
        }

        Ok(self.state)
    }

    /// Run rounds until the search terminates.
    pub fn run(mut self) -> Result<OptimizationOutcome> {
        info!(
            "Searching {} foods with {} g steps, initial score {:.3}",
            self.catalog.len_foods(),
            self.config.step_grams,
            self.best_score
        );

        let reason = loop {
            if let SearchState::Terminated(reason) = self.step()? {
                break reason;
            }
        };

        match reason {
            TerminationReason::LocalOptimum => info!(
                "Reached local optimum after {} rounds, score {:.4}",
                self.rounds, self.best_score
            ),
            TerminationReason::IdealScore => info!(
                "Reached ideal score after {} rounds",
                self.rounds
            ),
        }

        Ok(OptimizationOutcome {
            recipe: self.best,
            score: self.best_score,
            rounds: self.rounds,
            reason,
            history: self.history,
        })
    }

    /// Try every single-step neighbor of the current best.
    ///
    /// Returns the best strictly-improving neighbor and its score, if any.
    fn search_round(&self) -> Result<Option<(Recipe, f64)>> {
        let step = self.config.step_grams;

        // Trial moves are applied to this copy and always undone
        let mut working = self.best.clone();
        let mut round_best: Option<Recipe> = None;
        let mut round_best_score = self.best_score;

        for food in self.catalog.foods() {
            if working.has_food(food) {
                working.remove_food(food, step)?;
                self.verify(&working)?;
                let score = self.model.score(&working);
                if score < round_best_score {
                    round_best = Some(working.clone());
                    round_best_score = score;
                }
                working.add_food(food, step)?;
            }

            working.add_food(food, step)?;
            self.verify(&working)?;
            let score = self.model.score(&working);
            if score < round_best_score {
                round_best = Some(working.clone());
                round_best_score = score;
            }
            working.remove_food(food, step)?;
        }

        if self.config.check_consistency && working != self.best {
            return Err(NutriError::ConsistencyFault(
                "trial moves were not fully undone".to_string(),
            ));
        }

        Ok(round_best.map(|recipe| (recipe, round_best_score)))
    }

    fn verify(&self, recipe: &Recipe) -> Result<()> {
        if self.config.check_consistency {
            recipe.check_consistency(self.catalog)?;
        }
        Ok(())
    }
}
