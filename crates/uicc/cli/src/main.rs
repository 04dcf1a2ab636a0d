//! `uicc`: replay card status scripts through the lifecycle engine

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

mod config;
mod replay;
mod script;

#[derive(Parser)]
#[command(version, about = "Replay UICC card status reports and watch the card lifecycle")]
struct Cli {
    /// TOML configuration file, overridden by UICC_* environment variables
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug level output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Feed every step of a script to a telephony manager
    Replay {
        /// Path to a JSON script
        #[arg(required = true)]
        script: PathBuf,

        /// Accept the restart prompt after a hot-swap
        #[arg(long)]
        auto_restart: bool,
    },

    /// Check that a script parses
    Validate {
        /// Path to a JSON script
        #[arg(required = true)]
        script: PathBuf,
    },
}

fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match &cli.command {
        Commands::Replay {
            script,
            auto_restart,
        } => {
            let config = config::load_config(cli.config.as_deref())?;
            let steps = script::load_script(script)?;
            info!(steps = steps.len(), multi_sim = config.multi_sim_enabled, "Replaying script");
            let prompts = replay::replay(&config, &steps, *auto_restart)?;
            info!(prompts = prompts.len(), "Replay finished");
        }
        Commands::Validate { script } => {
            let steps = script::load_script(script)?;
            println!("{}: {} steps", script.display(), steps.len());
        }
    }

    Ok(())
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(true)
        .init();
}
