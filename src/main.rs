use clap::Parser;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

use diet_optimizer_rs::catalog::{
    Catalog, FoodFilter, UsdaFiles, load_catalog, load_usda, save_catalog,
};
use diet_optimizer_rs::cli::{CatalogSource, Cli, Command};
use diet_optimizer_rs::error::Result;
use diet_optimizer_rs::models::Recipe;
use diet_optimizer_rs::optimizer::{Optimizer, OptimizerConfig};
use diet_optimizer_rs::report::{
    display_food_breakdown, display_outcome, display_score_breakdown, display_total_nutrients,
    load_recipe_json, write_recipe_csv, write_recipe_json,
};
use diet_optimizer_rs::scoring::{PenaltyModel, TargetTable};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        if e.is_internal_fault() {
            eprintln!("Rerun with --check-consistency to locate the first bad move.");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Import { usda_dir, out } => cmd_import(&usda_dir, &out),
        Command::Optimize {
            source,
            step,
            targets,
            check_consistency,
            verbose,
            csv,
            json,
        } => {
            let config = OptimizerConfig {
                step_grams: step,
                check_consistency,
            };
            cmd_optimize(
                &source,
                targets.as_deref(),
                config,
                verbose,
                csv.as_deref(),
                json.as_deref(),
            )
        }
        Command::Score {
            recipe,
            source,
            targets,
        } => cmd_score(&recipe, &source, targets.as_deref()),
    }
}

fn open_catalog(source: &CatalogSource) -> Result<Catalog> {
    let catalog = match &source.usda_dir {
        Some(dir) => load_usda(&UsdaFiles::in_dir(dir), &FoodFilter::default())?,
        None => load_catalog(&source.catalog)?,
    };
    info!(
        "Loaded {} foods and {} nutrients",
        catalog.len_foods(),
        catalog.len_nutrients()
    );
    Ok(catalog)
}

fn build_model(catalog: &Catalog, targets: Option<&Path>) -> Result<PenaltyModel> {
    let table = match targets {
        Some(path) => TargetTable::load(path)?,
        None => TargetTable::default(),
    };
    Ok(PenaltyModel::with_targets(catalog, table))
}

/// Convert the USDA SR flat files into a JSON catalog.
fn cmd_import(usda_dir: &Path, out: &Path) -> Result<()> {
    let catalog = load_usda(&UsdaFiles::in_dir(usda_dir), &FoodFilter::default())?;
    save_catalog(out, &catalog)?;
    println!(
        "Wrote {} foods and {} nutrients to {}",
        catalog.len_foods(),
        catalog.len_nutrients(),
        out.display()
    );
    Ok(())
}

/// Run the search and print the best recipe.
fn cmd_optimize(
    source: &CatalogSource,
    targets: Option<&Path>,
    config: OptimizerConfig,
    verbose: bool,
    csv: Option<&Path>,
    json: Option<&Path>,
) -> Result<()> {
    let catalog = open_catalog(source)?;
    let model = build_model(&catalog, targets)?;

    let outcome = Optimizer::new(&catalog, &model, config)?.run()?;

    display_outcome(&outcome, &catalog);

    if verbose {
        display_food_breakdown(&outcome.recipe, &catalog);
        display_total_nutrients(&outcome.recipe, &catalog);
        display_score_breakdown(&model.score_traced(&outcome.recipe));
    }

    if let Some(path) = csv {
        write_recipe_csv(&outcome.recipe, &catalog, path)?;
        println!("Recipe written to {}", path.display());
    }

    if let Some(path) = json {
        write_recipe_json(&outcome, &catalog, path)?;
        println!("Result written to {}", path.display());
    }

    Ok(())
}

/// Rebuild a saved recipe and print how its score breaks down.
fn cmd_score(recipe_path: &Path, source: &CatalogSource, targets: Option<&Path>) -> Result<()> {
    let catalog = open_catalog(source)?;
    let model = build_model(&catalog, targets)?;

    let quantities = load_recipe_json(recipe_path)?;
    let recipe = Recipe::from_quantities(&catalog, quantities)?;

    display_food_breakdown(&recipe, &catalog);
    display_total_nutrients(&recipe, &catalog);
    display_score_breakdown(&model.score_traced(&recipe));

    Ok(())
}
