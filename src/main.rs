//! # FitGenie CLI (`fitgenie`)
//!
//! Runs the FitGenieAI HTTP API, or answers the same questions directly from
//! the command line.
//!
//! ## Usage
//!
//! ```bash
//! fitgenie --config ./config/fitgenie.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fitgenie serve` | Start the HTTP API |
//! | `fitgenie exercises` | List catalog exercises as JSON |
//! | `fitgenie exercise <id>` | Print one exercise as JSON |
//! | `fitgenie workout` | Generate a workout as JSON |
//! | `fitgenie ask "<query>"` | Ask the coach a question |
//!
//! ## Examples
//!
//! ```bash
//! # Beginner barbell exercises for the quads
//! fitgenie exercises --equipment barbell --level beginner --muscle quadriceps
//!
//! # A 45 minute push day
//! fitgenie workout --goal hypertrophy --level intermediate \
//!     --equipment barbell --equipment dumbbell \
//!     --duration 45 --split-type ppl --day push
//!
//! fitgenie ask "how many sets should I do?"
//! ```
//!
//! Logs go to stderr and honour `RUST_LOG` (default `info`).

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use fitgenie::coach::ask_coach;
use fitgenie::config::{self, Config};
use fitgenie::context::AppContext;
use fitgenie::models::{ExerciseFilter, UserProfile};
use fitgenie::server;
use fitgenie::workout::generate_workout;

/// FitGenie: exercise catalog, workout generator, and fitness coach.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/fitgenie.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "fitgenie",
    about = "FitGenie: exercise catalog, rule-based workout generator, and fitness coach",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/fitgenie.toml`. Built-in defaults are used when
    /// the file does not exist.
    #[arg(long, global = true, default_value = "./config/fitgenie.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API.
    ///
    /// Binds to `[server].bind` after loading the catalog and, when
    /// embeddings are enabled, building the embedding index.
    Serve,

    /// List exercises matching all given filters.
    Exercises {
        /// Exact equipment value (e.g. `barbell`).
        #[arg(long)]
        equipment: Option<String>,

        /// Exact level value (e.g. `beginner`).
        #[arg(long)]
        level: Option<String>,

        /// Primary muscle the exercise must target.
        #[arg(long)]
        muscle: Option<String>,

        /// Maximum number of exercises to print.
        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// Print one exercise by id.
    Exercise {
        /// Exercise id (e.g. `Barbell_Squat`).
        id: String,
    },

    /// Generate a workout.
    Workout {
        /// Training goal: strength, hypertrophy, fat loss, endurance.
        #[arg(long)]
        goal: String,

        /// Experience level: beginner, intermediate, expert.
        #[arg(long)]
        level: String,

        /// Available equipment. Repeat for several values.
        #[arg(long)]
        equipment: Vec<String>,

        /// Session length in minutes.
        #[arg(long, default_value = "45")]
        duration: u32,

        /// Split type, e.g. `full body` or `ppl`.
        #[arg(long, default_value = "full body")]
        split_type: String,

        /// PPL day: push, pull, or legs.
        #[arg(long)]
        day: Option<String>,

        /// Seed for reproducible sampling. Overrides `[workout].seed`.
        #[arg(long)]
        seed: Option<u64>,

        /// Body weight in kg; enables the calorie estimate.
        #[arg(long)]
        weight_kg: Option<f64>,
    },

    /// Ask the coach a question.
    Ask {
        /// Free-text question.
        query: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load the config file, or fall back to defaults when it does not exist.
fn load_or_default(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        config::load_config(path)
    } else {
        tracing::warn!(
            path = %path.display(),
            "config file not found; using defaults"
        );
        Ok(Config::default())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut cfg = load_or_default(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            server::run_server(cfg).await?;
        }
        Commands::Exercises {
            equipment,
            level,
            muscle,
            limit,
        } => {
            let filter = ExerciseFilter {
                equipment,
                level,
                muscle,
                limit,
            };
            let catalog = load_catalog(&cfg)?;
            let exercises = catalog.list_exercises(&filter);
            println!("{}", serde_json::to_string_pretty(&exercises)?);
        }
        Commands::Exercise { id } => {
            let catalog = load_catalog(&cfg)?;
            let exercise = catalog.get_exercise(&id)?;
            println!("{}", serde_json::to_string_pretty(exercise)?);
        }
        Commands::Workout {
            goal,
            level,
            equipment,
            duration,
            split_type,
            day,
            seed,
            weight_kg,
        } => {
            if seed.is_some() {
                cfg.workout.seed = seed;
            }
            let profile = UserProfile {
                goal,
                level,
                equipment,
                duration,
                split_type,
                day,
                limitations: None,
                weight_kg,
                age: None,
                gender: None,
            };
            let catalog = load_catalog(&cfg)?;
            let ctx = AppContext::new(cfg, catalog, None);
            let workout = generate_workout(ctx.catalog(), &profile, &mut ctx.workout_rng())?;
            println!("{}", serde_json::to_string_pretty(&workout)?);
        }
        Commands::Ask { query } => {
            let ctx = AppContext::initialize(cfg).await;
            let answer = ask_coach(&ctx, &query).await?;
            println!("{}", answer.response);
            if let Some(exercises) = answer.relevant_exercises {
                println!();
                for ex in exercises {
                    println!("  - {} ({})", ex.name, ex.id);
                }
            }
        }
    }

    Ok(())
}

/// Catalog commands fail loudly on a missing file; only the server degrades.
fn load_catalog(cfg: &Config) -> anyhow::Result<fitgenie::catalog::Catalog> {
    fitgenie::loader::load_catalog(&cfg.catalog.path)
}
