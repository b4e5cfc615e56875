//! Battle core - Development Tools

use std::path::PathBuf;
use std::process::ExitCode;

use battle_tools::{demo, loader, validate};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "battle-tools")]
#[command(about = "Development tools for the battle core")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate unit catalogs
    Validate {
        /// Catalog file or directory of catalogs
        #[arg(default_value = "assets/data")]
        path: PathBuf,
    },
    /// Compose an army and print it
    Compose {
        /// Catalog file
        catalog: PathBuf,
        /// Point budget
        #[arg(short, long)]
        budget: u32,
        /// Battle configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run a demo battle between two armies composed from one catalog
    Battle {
        /// Catalog file
        catalog: PathBuf,
        /// Point budget for each side
        #[arg(short, long)]
        budget: u32,
        /// Battle configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Round limit, overriding the configuration
        #[arg(long)]
        max_rounds: Option<u32>,
    },
}

fn run(command: Commands) -> Result<bool, Box<dyn std::error::Error>> {
    match command {
        Commands::Validate { path } => {
            tracing::info!("Validating catalogs in: {}", path.display());
            let reports = validate::validate_path(&path)?;
            let mut ok = true;
            for report in &reports {
                if report.is_ok() {
                    println!("{}: {} templates, ok", report.path, report.templates);
                } else {
                    ok = false;
                    println!("{}: {} problems", report.path, report.problems.len());
                    for problem in &report.problems {
                        println!("  - {problem}");
                    }
                }
            }
            Ok(ok)
        }
        Commands::Compose {
            catalog,
            budget,
            config,
        } => {
            let catalog = loader::load_catalog(&catalog)?;
            let config = loader::load_config(config.as_ref())?;
            let army = battle_core::composer::ArmyComposer::new(config.composer)
                .compose(&catalog.units, budget);
            print!("{}", demo::preview(&army));
            Ok(true)
        }
        Commands::Battle {
            catalog,
            budget,
            config,
            max_rounds,
        } => {
            let catalog = loader::load_catalog(&catalog)?;
            let mut config = loader::load_config(config.as_ref())?;
            if max_rounds.is_some() {
                config.simulation.max_rounds = max_rounds;
            }

            let battle = demo::run_demo(&catalog.units, budget, &config)?;
            println!("Player army:");
            print!("{}", demo::preview(&battle.player));
            println!("\nComputer army:");
            print!("{}", demo::preview(&battle.computer));
            println!();
            print!("{}", demo::render_board(&battle.player, &battle.computer));
            println!(
                "\n{:?} after {} rounds, {} attacks",
                battle.report.outcome, battle.report.rounds, battle.report.attacks
            );
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            tracing::error!("Validation failed");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
