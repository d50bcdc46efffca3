use anyhow::Result;
use aurum::core::PurityTier;
use aurum::core::log::init_logging;
use clap::{CommandFactory, Parser, Subcommand};
use std::time::Duration;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for aurum::AppCommand {
    fn from(cmd: Commands) -> aurum::AppCommand {
        match cmd {
            Commands::Rates { force, no_persist } => aurum::AppCommand::Rates {
                force,
                persist: !no_persist,
            },
            Commands::Refresh => aurum::AppCommand::Refresh,
            Commands::Quote { tier, grams } => aurum::AppCommand::Quote { tier, grams },
            Commands::Watch {
                interval_secs,
                count,
            } => aurum::AppCommand::Watch {
                every: Duration::from_secs(interval_secs),
                count,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display current gold rates
    Rates {
        /// Skip the refresh window and fetch now
        #[arg(short, long)]
        force: bool,

        /// Do not read or write the offline rate store
        #[arg(long)]
        no_persist: bool,
    },
    /// Refresh rates on the backend and update product prices
    Refresh,
    /// Value a weight of gold at the current rate
    Quote {
        /// Purity tier: 24k, 22k, 18k or 14k
        tier: PurityTier,

        /// Weight in grams
        grams: f64,
    },
    /// Keep displaying rates at a fixed interval
    Watch {
        /// Seconds between reads
        #[arg(short, long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
        interval_secs: u64,

        /// Stop after this many reads
        #[arg(short = 'n', long)]
        count: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => aurum::cli::setup::setup(),
        Some(cmd) => aurum::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
