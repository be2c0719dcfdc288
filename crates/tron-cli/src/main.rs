//! tron - board housekeeping for scheduled runs (cron, systemd timers).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tron_core::app::{App, AppBuilder, Notifications, RunContext};
use tron_core::config::TronConfig;
use tron_core::pipeline::Cadence;
use tron_core::ports::{Clock, FixedClock, SystemClock};
use tron_core::recurrence::{ParseOutcome, parse};

/// Recurring tasks and stage pipelines for a Trello board.
#[derive(Parser)]
#[command(name = "tron")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, global = true, env = "TRON_CONFIG", default_value = "tron.toml")]
    config: PathBuf,

    /// Log intended writes instead of performing them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reschedule completed recurring tasks and report overdue ones
    Recur {
        /// Evaluate as of this instant instead of the current time
        #[arg(long, value_parser = parse_instant)]
        now: Option<DateTime<Utc>>,
    },

    /// Move tasks along the pipeline transitions of one cadence
    Advance {
        /// daily or weekly
        cadence: Cadence,
    },

    /// Show how a task description's !repeat directive is read
    Parse {
        description: String,
    },
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("tron=debug,tron_core=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    if let Commands::Parse { description } = &cli.command {
        print_parse(description);
        return ExitCode::SUCCESS;
    }

    let config = match TronConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            // no recipient known yet, so nowhere to send an alert
            error!(path = %cli.config.display(), error = %e, "failed to load config");
            return ExitCode::FAILURE;
        }
    };
    info!(board = %config.trello.board, dry_run = cli.dry_run, "config loaded");

    let clock: Box<dyn Clock> = match &cli.command {
        Commands::Recur { now: Some(at) } => Box::new(FixedClock::new(*at)),
        _ => Box::new(SystemClock),
    };
    let ctx = RunContext::from_clock(clock.as_ref()).with_dry_run(cli.dry_run);

    let app = match AppBuilder::from_config(&config).build() {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "invalid setup");
            Notifications::from_config(&config).alert_failure(&ctx, &e).await;
            return ExitCode::FAILURE;
        }
    };

    match run(&app, &ctx, &cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "run failed");
            app.alert_failure(&ctx, &*e).await;
            ExitCode::FAILURE
        }
    }
}

async fn run(app: &App, ctx: &RunContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Recur { .. } => {
            let report = app.recur(ctx).await?;
            print!("{report}");
        }
        Commands::Advance { cadence } => {
            let report = app.advance(ctx, *cadence).await?;
            print!("{report}");
        }
        Commands::Parse { .. } => {}
    }
    Ok(())
}

fn print_parse(description: &str) {
    match parse(description) {
        ParseOutcome::NoDirective => println!("no !repeat directive"),
        ParseOutcome::Malformed(reason) => println!("malformed directive: {reason}"),
        ParseOutcome::Parsed(spec) => println!("repeats every {spec}"),
    }
}
