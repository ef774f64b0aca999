use crate::cache::DatasetCache;
use crate::config::{DEFAULT_SEASON, DEFAULT_SEASON_TYPE};
use crate::error::AppError;
use crate::table::{AggregationMode, EntityKind, StatsTable};
use std::sync::Arc;
use tracing::warn;

/// Source of season statistics tables.
pub trait StatsProvider {
    fn query(
        &self,
        kind: EntityKind,
        season: &str,
        season_type: &str,
        mode: AggregationMode,
    ) -> Result<StatsTable, AppError>;
}

impl<P: StatsProvider + ?Sized> StatsProvider for &P {
    fn query(
        &self,
        kind: EntityKind,
        season: &str,
        season_type: &str,
        mode: AggregationMode,
    ) -> Result<StatsTable, AppError> {
        (**self).query(kind, season, season_type, mode)
    }
}

/// Fetches tables for one season through a session-owned cache.
pub struct StatsRepository<P> {
    provider: P,
    cache: DatasetCache,
    season: String,
    season_type: String,
}

impl<P: StatsProvider> StatsRepository<P> {
    pub fn new(provider: P, cache: DatasetCache) -> Self {
        StatsRepository {
            provider,
            cache,
            season: DEFAULT_SEASON.to_string(),
            season_type: DEFAULT_SEASON_TYPE.to_string(),
        }
    }

    pub fn with_season(mut self, season: impl Into<String>, season_type: impl Into<String>) -> Self {
        self.season = season.into();
        self.season_type = season_type.into();
        self
    }

    pub fn season(&self) -> &str {
        &self.season
    }

    pub fn season_type(&self) -> &str {
        &self.season_type
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut DatasetCache {
        &mut self.cache
    }

    /// Returns the full table for `kind` and `mode`, extra columns included.
    ///
    /// Rows without a text entity name are dropped, so every returned row
    /// is selectable by name. Provider failures, tables without the
    /// entity-key column, and tables left with no rows all come back as
    /// [`AppError::DataUnavailable`].
    pub fn fetch(
        &mut self,
        kind: EntityKind,
        mode: AggregationMode,
    ) -> Result<Arc<StatsTable>, AppError> {
        let key = self.cache.key(kind, mode);
        let provider = &self.provider;
        let (season, season_type) = (self.season.as_str(), self.season_type.as_str());

        self.cache.get_or_fetch(key, || {
            let table = provider
                .query(kind, season, season_type, mode)
                .map_err(|e| unavailable(kind, mode, e))?;
            check_usable(kind, mode, table)
        })
    }
}

fn unavailable(kind: EntityKind, mode: AggregationMode, err: AppError) -> AppError {
    match err {
        AppError::DataUnavailable { .. } => err,
        other => {
            warn!(%kind, %mode, error = %other, "stats provider failed");
            AppError::DataUnavailable {
                kind,
                mode,
                reason: other.to_string(),
            }
        }
    }
}

fn check_usable(
    kind: EntityKind,
    mode: AggregationMode,
    mut table: StatsTable,
) -> Result<StatsTable, AppError> {
    let reason = if table.is_empty() {
        "provider returned no rows".to_string()
    } else if !table.has_column(table.entity_key()) {
        format!("provider response has no {} column", table.entity_key())
    } else {
        let dropped = table.retain_named();
        if dropped > 0 {
            warn!(%kind, %mode, dropped, key = table.entity_key(), "dropped rows without entity name");
        }
        if !table.is_empty() {
            return Ok(table);
        }
        format!("no row has a {} value", table.entity_key())
    };

    warn!(%kind, %mode, %reason, "unusable stats table");
    Err(AppError::DataUnavailable { kind, mode, reason })
}
