use crate::config::Config;
use crate::error::AppError;
use crate::repository::StatsProvider;
use crate::table::{AggregationMode, EntityKind, StatsTable};
use governor::{
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::endpoints::{stats_url, DEFAULT_QUERY, LEAGUE_ID, REQUEST_HEADERS};
use super::models::parse_stats_response;

const MAX_RETRIES: u32 = 3;

pub struct NbaStatsClient {
    base_url: String,
    retry_base_ms: u64,
    agent: ureq::Agent,
    clock: DefaultClock,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl NbaStatsClient {
    pub fn new(config: &Config) -> Self {
        // zero is rejected by Config::from_lookup
        let per_second =
            NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();

        NbaStatsClient {
            base_url: config.base_url.clone(),
            retry_base_ms: config.retry_base_ms,
            agent,
            clock: DefaultClock::default(),
            rate_limiter: RateLimiter::direct(Quota::per_second(per_second)),
        }
    }

    fn wait_for_slot(&self) {
        while let Err(not_until) = self.rate_limiter.check() {
            thread::sleep(not_until.wait_time_from(self.clock.now()));
        }
    }

    fn execute_request(&self, url: &str, query: &[(&str, &str)]) -> Result<String, AppError> {
        let mut retry_count = 0;

        loop {
            self.wait_for_slot();

            let mut request = self.agent.get(url);
            for (name, value) in REQUEST_HEADERS {
                request = request.set(name, value);
            }
            for (name, value) in query {
                request = request.query(name, value);
            }

            match request.call() {
                Ok(resp) => {
                    return resp
                        .into_string()
                        .map_err(|e| AppError::HttpError(e.to_string()));
                }
                Err(ureq::Error::Status(429, _)) => {
                    if retry_count >= MAX_RETRIES {
                        return Err(AppError::RateLimited);
                    }
                    let wait_ms = self.retry_base_ms * (retry_count + 1) as u64;
                    warn!(url, wait_ms, "rate limited by stats provider, retrying");
                    thread::sleep(Duration::from_millis(wait_ms));
                    retry_count += 1;
                }
                Err(ureq::Error::Status(code, _)) => {
                    return Err(AppError::HttpError(format!("{} returned status {}", url, code)));
                }
                Err(e) => {
                    return Err(AppError::HttpError(e.to_string()));
                }
            }
        }
    }

    pub fn get_league_stats(
        &self,
        kind: EntityKind,
        season: &str,
        season_type: &str,
        mode: AggregationMode,
    ) -> Result<StatsTable, AppError> {
        let url = stats_url(&self.base_url, kind);
        let mut query: Vec<(&str, &str)> = vec![
            ("LeagueID", LEAGUE_ID),
            ("Season", season),
            ("SeasonType", season_type),
            ("PerMode", mode.as_param()),
        ];
        query.extend_from_slice(DEFAULT_QUERY);

        info!(%kind, %mode, season, season_type, "fetching league stats");
        let body = self.execute_request(&url, &query)?;
        let table = parse_stats_response(&body, kind)?;
        debug!(rows = table.len(), columns = table.columns().len(), "parsed league stats");

        Ok(table)
    }
}

impl StatsProvider for NbaStatsClient {
    fn query(
        &self,
        kind: EntityKind,
        season: &str,
        season_type: &str,
        mode: AggregationMode,
    ) -> Result<StatsTable, AppError> {
        self.get_league_stats(kind, season, season_type, mode)
    }
}
