//! CLI frontend for the class change progression engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "classchange",
    about = "Inspect class curves, check databases, and replay progression scenarios",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine decisions at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the experience table of a class
    Curve {
        /// Database JSON file
        db: PathBuf,

        /// Class id
        #[arg(short, long)]
        class: u32,

        /// Last level to print (default: the database's max level)
        #[arg(short, long)]
        to: Option<u32>,
    },

    /// Convert an experience amount to a level
    Level {
        /// Database JSON file
        db: PathBuf,

        /// Class id
        #[arg(short, long)]
        class: u32,

        /// Experience amount
        #[arg(short, long, allow_hyphen_values = true)]
        exp: i64,
    },

    /// Validate a database and its annotations
    Check {
        /// Database JSON file
        db: PathBuf,
    },

    /// Replay a scenario of progression commands
    Run {
        /// Database JSON file
        db: PathBuf,

        /// Scenario JSON file
        scenario: PathBuf,

        /// Write the final save state to this file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Curve { db, class, to } => commands::curve::run(&db, class, to),
        Commands::Level { db, class, exp } => commands::level::run(&db, class, exp),
        Commands::Check { db } => commands::check::run(&db),
        Commands::Run { db, scenario, save } => {
            commands::run::run(&db, &scenario, save.as_deref())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
