use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Diet optimizer: hill-climbs food quantities toward daily nutrient targets.
#[derive(Parser, Debug)]
#[command(name = "diet_optimizer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging (per-round progress).
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Where to read the food catalog from.
#[derive(Args, Debug, Clone)]
pub struct CatalogSource {
    /// Path to a JSON catalog written by `import`.
    #[arg(long, default_value = "catalog.json", conflicts_with = "usda_dir")]
    pub catalog: PathBuf,

    /// Directory holding the USDA SR flat files, read directly.
    #[arg(long)]
    pub usda_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read the USDA SR flat files and write a JSON catalog.
    Import {
        /// Directory holding NUTR_DEF.txt, FOOD_DES.txt and NUT_DATA.txt.
        #[arg(long)]
        usda_dir: PathBuf,

        /// Output catalog path.
        #[arg(long, default_value = "catalog.json")]
        out: PathBuf,
    },

    /// Search for the recipe with the lowest penalty.
    Optimize {
        #[command(flatten)]
        source: CatalogSource,

        /// Grams added or removed per trial move.
        #[arg(long, default_value_t = 5)]
        step: u32,

        /// JSON target table replacing the built-in daily targets.
        #[arg(long)]
        targets: Option<PathBuf>,

        /// Recompute nutrient totals after every trial move. Slow.
        #[arg(long)]
        check_consistency: bool,

        /// Print per-food nutrients, totals and the score breakdown.
        #[arg(short, long)]
        verbose: bool,

        /// Write the recipe as CSV.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write the result as JSON (reloadable with `score`).
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Score a saved recipe and print its penalty breakdown.
    Score {
        /// Recipe JSON written by `optimize --json`.
        #[arg(long)]
        recipe: PathBuf,

        #[command(flatten)]
        source: CatalogSource,

        /// JSON target table replacing the built-in daily targets.
        #[arg(long)]
        targets: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimize_defaults() {
        let cli = Cli::try_parse_from(["diet_optimizer", "optimize"]).unwrap();
        match cli.command {
            Command::Optimize {
                source,
                step,
                check_consistency,
                verbose,
                ..
            } => {
                assert_eq!(source.catalog, PathBuf::from("catalog.json"));
                assert!(source.usda_dir.is_none());
                assert_eq!(step, 5);
                assert!(!check_consistency);
                assert!(!verbose);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(!cli.debug);
    }

    #[test]
    fn test_global_debug_after_subcommand() {
        let cli = Cli::try_parse_from([
            "diet_optimizer",
            "score",
            "--recipe",
            "r.json",
            "--debug",
        ])
        .unwrap();
        assert!(cli.debug);
    }

    #[test]
    fn test_catalog_and_usda_dir_conflict() {
        let result = Cli::try_parse_from([
            "diet_optimizer",
            "optimize",
            "--catalog",
            "c.json",
            "--usda-dir",
            "sr28",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_import_requires_dir() {
        assert!(Cli::try_parse_from(["diet_optimizer", "import"]).is_err());
    }
}
