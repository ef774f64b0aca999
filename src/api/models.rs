use crate::error::AppError;
use crate::table::{EntityKind, Row, StatValue, StatsTable};
use serde::Deserialize;
use serde_json::Value;

// stats.nba.com tabular response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(default)]
    pub resource: String,
    pub result_sets: Vec<ResultSet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    #[serde(default)]
    pub name: String,
    pub headers: Vec<String>,
    pub row_set: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn into_table(self, kind: EntityKind) -> Result<StatsTable, AppError> {
        let width = self.headers.len();
        let mut rows = Vec::with_capacity(self.row_set.len());

        for (idx, raw) in self.row_set.into_iter().enumerate() {
            if raw.len() != width {
                return Err(AppError::JsonError(format!(
                    "row {} of {} has {} cells, expected {}",
                    idx,
                    self.name,
                    raw.len(),
                    width
                )));
            }
            let cells = self
                .headers
                .iter()
                .cloned()
                .zip(raw.into_iter().map(to_stat_value))
                .collect();
            rows.push(Row::new(cells));
        }

        Ok(StatsTable::new(kind.entity_key(), self.headers, rows))
    }
}

fn to_stat_value(value: Value) -> StatValue {
    match value {
        Value::Number(n) => n.as_f64().map(StatValue::Number).unwrap_or(StatValue::Null),
        Value::String(s) => StatValue::Text(s),
        Value::Bool(b) => StatValue::Text(b.to_string()),
        Value::Null => StatValue::Null,
        other => StatValue::Text(other.to_string()),
    }
}

/// Parses a league dashboard response body into the first result set's table.
pub fn parse_stats_response(body: &str, kind: EntityKind) -> Result<StatsTable, AppError> {
    let response: StatsResponse =
        serde_json::from_str(body).map_err(|e| AppError::JsonError(e.to_string()))?;

    let set = response.result_sets.into_iter().next().ok_or_else(|| {
        AppError::JsonError(format!("response for '{}' has no result sets", response.resource))
    })?;

    set.into_table(kind)
}
