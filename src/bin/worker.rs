use chrono::NaiveDate;
use clap::Parser;
use std::time::Duration;
use wfh_scheduler::{
    AppState,
    config::Config,
    db::create_pool,
    error::AppResult,
    init_tracing,
    services::ExpiryService,
    store::PgStore,
    validation::rules::parse_calendar_date,
};

/// Expires pending requests that were never reviewed.
#[derive(Parser, Debug)]
#[command(name = "wfh-worker", version)]
struct Args {
    /// Run a single sweep and exit
    #[arg(long)]
    once: bool,

    /// Seconds between sweeps (defaults to SWEEP_INTERVAL_SECS)
    #[arg(long)]
    interval_secs: Option<u64>,

    /// Expire requests starting before this date instead of the rolling cutoff
    #[arg(long, value_parser = parse_calendar_date)]
    cutoff: Option<NaiveDate>,
}

fn sweep_once(state: &AppState, cutoff: Option<NaiveDate>) -> AppResult<Vec<i64>> {
    let ctx = state.context(0);
    let cutoff = cutoff.unwrap_or_else(|| ExpiryService::default_cutoff(&ctx));
    let mut conn = state.db.get()?;
    let expired = ExpiryService::sweep_expired(&mut PgStore::new(&mut conn), &ctx, cutoff)?;
    tracing::info!(count = expired.len(), %cutoff, "Expiry sweep finished");
    Ok(expired)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&config);

    let db = match create_pool(&config.database()) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create database connection pool");
            std::process::exit(1);
        }
    };

    let interval = Duration::from_secs(args.interval_secs.unwrap_or(config.sweep_interval_secs));
    let state = AppState::new(db, config);

    loop {
        if let Err(e) = sweep_once(&state, args.cutoff) {
            tracing::error!(error = %e, "Expiry sweep failed");
            if args.once {
                std::process::exit(1);
            }
        }
        if args.once {
            break;
        }
        tokio::time::sleep(interval).await;
    }
}
