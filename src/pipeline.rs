use crate::analysis::comparison::{ComparisonBuilder, ComparisonResult, MetricSet};
use crate::analysis::selector::EntitySelector;
use crate::error::AppError;
use crate::repository::{StatsProvider, StatsRepository};
use crate::table::{AggregationMode, EntityKind, Row};
use tracing::info;

/// Everything one comparison request produces.
#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub kind: EntityKind,
    pub mode: AggregationMode,
    pub result: ComparisonResult,
    /// Complete provider rows for A and B, extra columns included.
    pub rows: (Row, Row),
}

/// Fetch, select, and reshape in one call. The table is served from the
/// repository's cache after the first request for a `(kind, mode)` pair.
pub fn compare<P: StatsProvider>(
    repo: &mut StatsRepository<P>,
    kind: EntityKind,
    mode: AggregationMode,
    name_a: &str,
    name_b: &str,
    metrics: &MetricSet,
) -> Result<ComparisonReport, AppError> {
    let table = repo.fetch(kind, mode)?;
    metrics.validate_schema(&table)?;

    let row_a = EntitySelector::select(&table, name_a)?;
    let row_b = EntitySelector::select(&table, name_b)?;
    let result = ComparisonBuilder::build(row_a, row_b, name_a, name_b, metrics)?;

    info!(%kind, %mode, name_a, name_b, metrics = metrics.len(), "built comparison");

    Ok(ComparisonReport {
        kind,
        mode,
        result,
        rows: (row_a.clone(), row_b.clone()),
    })
}

/// Names available for selection under `kind` and `mode`.
pub fn entity_names<P: StatsProvider>(
    repo: &mut StatsRepository<P>,
    kind: EntityKind,
    mode: AggregationMode,
) -> Result<Vec<String>, AppError> {
    let table = repo.fetch(kind, mode)?;
    Ok(EntitySelector::list_entities(&table))
}
