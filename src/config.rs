use crate::error::{AppError, AppResult};
use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub database_min_connections: u32,
    #[serde(default = "default_connection_timeout")]
    pub database_connection_timeout: u64,

    #[serde(default = "default_host")]
    pub server_host: String,
    #[serde(default = "default_port")]
    pub server_port: u16,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,

    #[serde(default = "default_lookback_days")]
    pub wfh_lookback_days: i64,
    #[serde(default = "default_lookahead_days")]
    pub wfh_lookahead_days: i64,
    #[serde(default = "default_withdrawal_window_days")]
    pub wfh_withdrawal_window_days: i64,
    #[serde(default = "default_max_remote_ratio")]
    pub wfh_max_remote_ratio: f64,

    #[serde(default = "default_sweep_page_size")]
    pub sweep_page_size: i64,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Scheduling policy knobs. Every service reads them through the
/// `RequestContext`.
#[derive(Clone, Debug, PartialEq)]
pub struct WfhPolicy {
    /// How far back a request may start.
    pub lookback_days: i64,
    /// How far ahead a request may start or end.
    pub lookahead_days: i64,
    /// Half-width of the window around today in which an approved day may be withdrawn.
    pub withdrawal_window_days: i64,
    /// Largest admitted fraction of a team working remotely on one half-day.
    pub max_remote_ratio: f64,
    pub sweep_page_size: i64,
}

impl Default for WfhPolicy {
    fn default() -> Self {
        Self {
            lookback_days: default_lookback_days(),
            lookahead_days: default_lookahead_days(),
            withdrawal_window_days: default_withdrawal_window_days(),
            max_remote_ratio: default_max_remote_ratio(),
            sweep_page_size: default_sweep_page_size(),
        }
    }
}

// Default value functions
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    5
}
fn default_connection_timeout() -> u64 {
    30
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_lookback_days() -> i64 {
    60
}
fn default_lookahead_days() -> i64 {
    90
}
fn default_withdrawal_window_days() -> i64 {
    14
}
fn default_max_remote_ratio() -> f64 {
    0.5
}
fn default_sweep_page_size() -> i64 {
    200
}
fn default_sweep_interval_secs() -> u64 {
    3600
} // 1 hour

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let config = envy::from_env::<Config>()
            .map_err(|e| AppError::Config(format!("Failed to load config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        if self.database_max_connections == 0 {
            return Err(AppError::Config(
                "DATABASE_MAX_CONNECTIONS must be > 0".to_string(),
            ));
        }

        if self.database_min_connections > self.database_max_connections {
            return Err(AppError::Config(
                "DATABASE_MIN_CONNECTIONS cannot be greater than DATABASE_MAX_CONNECTIONS"
                    .to_string(),
            ));
        }

        if self.wfh_lookback_days < 0 || self.wfh_lookahead_days < 0 {
            return Err(AppError::Config(
                "WFH_LOOKBACK_DAYS and WFH_LOOKAHEAD_DAYS must be >= 0".to_string(),
            ));
        }

        if self.wfh_withdrawal_window_days < 0 {
            return Err(AppError::Config(
                "WFH_WITHDRAWAL_WINDOW_DAYS must be >= 0".to_string(),
            ));
        }

        if !(self.wfh_max_remote_ratio > 0.0 && self.wfh_max_remote_ratio <= 1.0) {
            return Err(AppError::Config(
                "WFH_MAX_REMOTE_RATIO must be in (0, 1]".to_string(),
            ));
        }

        if self.sweep_page_size <= 0 {
            return Err(AppError::Config("SWEEP_PAGE_SIZE must be > 0".to_string()));
        }

        Ok(())
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn database(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database_url.clone(),
            max_connections: self.database_max_connections,
            min_connections: self.database_min_connections,
            connection_timeout: self.database_connection_timeout,
        }
    }

    pub fn server(&self) -> ServerConfig {
        ServerConfig {
            host: self.server_host.clone(),
            port: self.server_port,
            cors_origins: self.cors_origins.clone(),
        }
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            format: self.log_format.clone(),
        }
    }

    pub fn policy(&self) -> WfhPolicy {
        WfhPolicy {
            lookback_days: self.wfh_lookback_days,
            lookahead_days: self.wfh_lookahead_days,
            withdrawal_window_days: self.wfh_withdrawal_window_days,
            max_remote_ratio: self.wfh_max_remote_ratio,
            sweep_page_size: self.sweep_page_size,
        }
    }
}
