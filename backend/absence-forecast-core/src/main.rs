// src/main.rs
use absence_forecast::alerts::check_horizon;
use absence_forecast::clock::{Clock, SystemClock};
use absence_forecast::report::save_alerts_csv;
use absence_forecast::server::{router, AppState};
use absence_forecast::{Config, ForecastEngine};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "absence-forecast", version, about = "Predictive absence risk engine")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Print the absence patterns as JSON
    Patterns,
    /// Print upcoming alerts as JSON, or write them to a CSV file
    Alerts {
        /// Number of weeks to look ahead, at most 52 (defaults to HORIZON_WEEKS)
        #[arg(long)]
        weeks: Option<u32>,
        /// Reference date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        reference: Option<NaiveDate>,
        /// Write CSV to this path instead of printing JSON
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration from environment")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let engine = config
        .build_engine()
        .context("Failed to build forecast engine")?;
    info!(
        "Forecast engine ready: {} historical records, {} school holidays, {} bridge days",
        engine.history().len(),
        engine.rules().school_holidays.len(),
        engine.rules().bridge_days.len()
    );

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config, engine).await,
        Command::Patterns => {
            let patterns = engine.analyze_patterns();
            println!("{}", serde_json::to_string_pretty(&patterns)?);
            Ok(())
        }
        Command::Alerts {
            weeks,
            reference,
            csv,
        } => {
            let reference = reference.unwrap_or_else(|| SystemClock.today());
            let weeks = weeks.unwrap_or(engine.settings().horizon_weeks);
            check_horizon(weeks)?;
            let alerts = engine
                .generate_alerts_for(reference, weeks)
                .with_context(|| format!("Failed to generate alerts from {}", reference))?;
            match csv {
                Some(path) => save_alerts_csv(&path, &alerts)
                    .with_context(|| format!("Failed to write alerts to {}", path.display()))?,
                None => println!("{}", serde_json::to_string_pretty(&alerts)?),
            }
            Ok(())
        }
    }
}

async fn serve(config: &Config, engine: ForecastEngine) -> Result<()> {
    let app = router(AppState::new(engine, SystemClock));

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
