use crate::error::AppError;
use crate::table::{Row, StatsTable};
use std::collections::BTreeSet;
use tracing::debug;

pub struct EntitySelector;

impl EntitySelector {
    /// Distinct entity names in lexical order.
    pub fn list_entities(table: &StatsTable) -> Vec<String> {
        table
            .rows()
            .iter()
            .filter_map(|row| table.entity_name(row))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// First row in table order whose entity key equals `name`.
    pub fn select<'a>(table: &'a StatsTable, name: &str) -> Result<&'a Row, AppError> {
        let mut matches = table
            .rows()
            .iter()
            .filter(|row| table.entity_name(row) == Some(name));

        let row = matches.next().ok_or_else(|| {
            debug!(name, key = table.entity_key(), "entity not in table");
            AppError::EntityNotFound(name.to_string())
        })?;

        if matches.next().is_some() {
            debug!(name, "duplicate entity key, using first row");
        }
        Ok(row)
    }
}
