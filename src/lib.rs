pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod schema;
pub mod services;
pub mod store;
pub mod validation;

use crate::config::Config;
use crate::db::DbPool;
use crate::services::context::RequestContext;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DbPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Context for one call, dated with the server's local calendar day.
    pub fn context(&self, actor_id: i64) -> RequestContext {
        RequestContext::new(
            actor_id,
            chrono::Local::now().date_naive(),
            self.config.policy(),
        )
    }
}

pub fn init_tracing(config: &Config) {
    let logging = config.logging();
    let level = level_filter(&logging.level);

    match logging.format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_max_level(level)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .pretty()
                .with_max_level(level)
                .init();
        }
    }
}

/// Unknown levels fall back to INFO.
fn level_filter(level: &str) -> LevelFilter {
    match level.to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}
