use crate::catalog::Catalog;
use crate::models::Recipe;
use crate::optimizer::{OptimizationOutcome, TerminationReason};
use crate::scoring::{PenaltyKind, ScoreBreakdown};

fn reason_label(reason: TerminationReason) -> &'static str {
    match reason {
        TerminationReason::LocalOptimum => "local optimum",
        TerminationReason::IdealScore => "ideal score",
    }
}

fn food_name(catalog: &Catalog, food_id: u32) -> String {
    catalog
        .food(food_id)
        .map(|f| f.description.clone())
        .unwrap_or_else(|| format!("<unknown food {}>", food_id))
}

/// Display the final recipe with a short summary.
pub fn display_outcome(outcome: &OptimizationOutcome, catalog: &Catalog) {
    println!();
    println!("=== Recipe ===");
    println!();

    if outcome.recipe.is_empty() {
        println!("No food improved on the empty recipe.");
    }

    for (food_id, grams) in outcome.recipe.sorted_quantities() {
        println!("{:>6} g  {:>6}  {}", grams, food_id, food_name(catalog, food_id));
    }

    println!();
    println!("--- Summary ---");
    println!("Score: {:.4}", outcome.score);
    println!(
        "Stopped at {} after {} rounds",
        reason_label(outcome.reason),
        outcome.rounds
    );
    println!("Foods: {}", outcome.recipe.food_count());
    println!("Total mass: {} g", outcome.recipe.total_grams());
    println!();
}

/// Display what each food in the recipe contributes at its quantity.
pub fn display_food_breakdown(recipe: &Recipe, catalog: &Catalog) {
    println!();
    println!("=== Nutrients by food ===");

    for (food_id, grams) in recipe.sorted_quantities() {
        let food = match catalog.food(food_id) {
            Some(food) => food,
            None => continue,
        };

        println!();
        println!("{} g {}", grams, food.description);
        for (nutrient_id, amount) in food.contributions_at(grams) {
            if let Some(nutrient) = catalog.nutrient(nutrient_id) {
                println!(
                    "    {:>10.2} {:<6} {}",
                    amount, nutrient.units, nutrient.description
                );
            }
        }
    }

    println!();
}

/// One line per catalog nutrient, zeros included, in ascending nutrient id.
fn total_lines(recipe: &Recipe, catalog: &Catalog) -> Vec<String> {
    catalog
        .nutrients()
        .map(|nutrient| {
            format!(
                "{:>12.2} {:<6} {}",
                recipe.nutrient_total(nutrient.id),
                nutrient.units,
                nutrient.description
            )
        })
        .collect()
}

/// Display recipe-wide nutrient totals in ascending nutrient id.
pub fn display_total_nutrients(recipe: &Recipe, catalog: &Catalog) {
    println!();
    println!("=== Total nutrients ===");
    println!();

    for line in total_lines(recipe, catalog) {
        println!("{}", line);
    }

    println!();
}

/// Display the per-line penalty trace, followed by the worst offenders.
pub fn display_score_breakdown(breakdown: &ScoreBreakdown) {
    println!();
    println!("=== Score breakdown ===");
    println!();

    let width = breakdown
        .lines
        .iter()
        .map(|l| l.label.len())
        .max()
        .unwrap_or(10);

    for line in &breakdown.lines {
        let range = match (line.min, line.max) {
            (Some(min), Some(max)) => format!("[{}, {}]", min, max),
            (Some(min), None) => format!("[{}, -]", min),
            (None, Some(max)) => format!("[-, {}]", max),
            (None, None) => String::new(),
        };
        let tag = match line.kind {
            PenaltyKind::Deficit => "low",
            PenaltyKind::Excess => "high",
            _ => "",
        };

        println!(
            "{:<width$}  {:>12.3} {:<18} {:>10.3} {}",
            line.label,
            line.amount,
            range,
            line.penalty,
            tag,
            width = width
        );
    }

    println!();
    println!("Total: {:.4}", breakdown.total);

    let offenders = breakdown.offenders();
    if !offenders.is_empty() {
        println!();
        println!("--- Largest penalties ---");
        for line in offenders.iter().take(5) {
            println!("  {:<width$}  {:.3}", line.label, line.penalty, width = width);
        }
    }
    println!();
}
