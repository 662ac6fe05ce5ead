//! `clublink` command-line entry point.
//!
//! Wires configuration, logging and the connection pool together, then
//! dispatches to one subcommand:
//!
//! | Command | Effect |
//! |---------|--------|
//! | `serve` | Run the HTTP API until `Ctrl-C` |
//! | `migrate` | Apply embedded migrations |
//! | `seed` | Insert the demo data set (`--reset` wipes first) |
//! | `reset` | Delete every row, children before parents |
//! | `smoke` | Build and tear down a User -> Owner -> Gym -> Member chain |
//! | `verify-schema` | Print tables, enums, foreign keys and row counts |
//!
//! # Startup Sequence
//!
//! 1. Load `.env.local` then `.env`
//! 2. Initialize structured logging (tracing)
//! 3. Load configuration
//! 4. Connect to `PostgreSQL`
//! 5. Run the command
//! 6. Close the pool

mod config;
mod error;
mod report;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use clublink_api::AppState;
use clublink_db::{
    PostgresPool, SchemaInspector, count_rows, reset_all, run_smoke_test, seed_demo_data,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::CliError;

/// Club Link data store and API.
#[derive(Debug, Parser)]
#[command(name = "clublink", version, about)]
struct Cli {
    /// Path to a TOML config file (default: `./clublink.toml` if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, env = "CLUBLINK_JSON_LOGS")]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API server.
    Serve {
        /// Override `server.host`.
        #[arg(long)]
        host: Option<String>,
        /// Override `server.port`.
        #[arg(long)]
        port: Option<u16>,
        /// Apply migrations before listening.
        #[arg(long)]
        migrate: bool,
    },
    /// Apply embedded migrations.
    Migrate,
    /// Insert the demo data set.
    Seed {
        /// Delete all rows first.
        #[arg(long)]
        reset: bool,
    },
    /// Delete every row from every table.
    Reset,
    /// Run the end-to-end smoke test.
    Smoke,
    /// Inspect the live schema and fail if anything is missing.
    VerifySchema,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Missing files are fine; .env.local wins because dotenvy never overwrites.
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = AppConfig::load(cli.config.as_deref())?;
    let db = PostgresPool::connect(&config.postgres()).await?;

    let outcome = run(cli.command, &config, &db).await;
    db.close().await;

    if let Err(e) = &outcome {
        tracing::error!(error = %e, "clublink failed");
    }
    outcome
}

async fn run(command: Command, config: &AppConfig, db: &PostgresPool) -> Result<(), CliError> {
    match command {
        Command::Serve {
            host,
            port,
            migrate,
        } => {
            if migrate {
                db.run_migrations().await?;
            }
            let mut server = config.server();
            if let Some(host) = host {
                server.host = host;
            }
            if let Some(port) = port {
                server.port = port;
            }
            let state = Arc::new(AppState::new(db.clone()));
            clublink_api::start_server(&server, state).await?;
        }
        Command::Migrate => {
            db.run_migrations().await?;
            println!("Migrations applied.");
        }
        Command::Seed { reset } => {
            if reset {
                reset_all(db.pool()).await?;
            }
            let counts = seed_demo_data(db).await?;
            println!("{}", report::counts_table(&counts));
        }
        Command::Reset => {
            let removed = reset_all(db.pool()).await?;
            println!("{}", report::counts_table(&removed));
            let remaining = count_rows(db.pool()).await?;
            info!(
                remaining = remaining.iter().map(|c| c.rows).sum::<u64>(),
                "Reset complete"
            );
        }
        Command::Smoke => {
            let outcome = run_smoke_test(db).await?;
            println!("{}", report::smoke_summary(&outcome));
        }
        Command::VerifySchema => {
            let schema = SchemaInspector::new(db.pool()).report().await?;
            println!("{}", report::schema_report(&schema));
            if !schema.is_complete() {
                let missing: Vec<String> = schema
                    .missing_tables()
                    .iter()
                    .map(ToString::to_string)
                    .chain(schema.missing_enums())
                    .collect();
                return Err(CliError::IncompleteSchema {
                    missing: missing.join(", "),
                });
            }
        }
    }
    Ok(())
}
