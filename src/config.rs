use crate::analysis::comparison::MetricSet;
use crate::error::AppError;
use std::env;
use std::str::FromStr;

pub const DEFAULT_SEASON: &str = "2024-25";
pub const DEFAULT_SEASON_TYPE: &str = "Regular Season";
pub const DEFAULT_BASE_URL: &str = "https://stats.nba.com/stats";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REQUESTS_PER_SECOND: u32 = 2;
const DEFAULT_RETRY_BASE_MS: u64 = 2000;

#[derive(Debug, Clone)]
pub struct Config {
    pub season: String,
    pub season_type: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub requests_per_second: u32,
    /// Backoff after the n-th 429 is `n * retry_base_ms`.
    pub retry_base_ms: u64,
    pub metrics: MetricSet,
    pub cache_ttl_minutes: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            season: DEFAULT_SEASON.to_string(),
            season_type: DEFAULT_SEASON_TYPE.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
            retry_base_ms: DEFAULT_RETRY_BASE_MS,
            metrics: MetricSet::default(),
            cache_ttl_minutes: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let metrics = match lookup("NBA_COMPARE_METRICS") {
            Some(raw) => MetricSet::parse_list(&raw)?,
            None => defaults.metrics,
        };

        let requests_per_second = parse_var(&lookup, "NBA_STATS_REQUESTS_PER_SECOND")?
            .unwrap_or(defaults.requests_per_second);
        if requests_per_second == 0 {
            return Err(AppError::ConfigError(
                "NBA_STATS_REQUESTS_PER_SECOND must be at least 1".to_string(),
            ));
        }

        Ok(Config {
            season: lookup("NBA_STATS_SEASON").unwrap_or(defaults.season),
            season_type: lookup("NBA_STATS_SEASON_TYPE").unwrap_or(defaults.season_type),
            base_url: lookup("NBA_STATS_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            timeout_secs: parse_var(&lookup, "NBA_STATS_TIMEOUT_SECS")?
                .unwrap_or(defaults.timeout_secs),
            requests_per_second,
            retry_base_ms: parse_var(&lookup, "NBA_STATS_RETRY_BASE_MS")?
                .unwrap_or(defaults.retry_base_ms),
            metrics,
            cache_ttl_minutes: parse_var(&lookup, "NBA_CACHE_TTL_MINUTES")?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AppError::ConfigError(format!("{} has invalid value '{}'", key, raw))),
        None => Ok(None),
    }
}
