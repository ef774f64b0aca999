use std::fmt;

/// Which provider endpoint a table comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Team,
    Player,
}

impl EntityKind {
    /// Column holding the entity name in provider tables.
    pub fn entity_key(self) -> &'static str {
        match self {
            EntityKind::Team => "TEAM_NAME",
            EntityKind::Player => "PLAYER_NAME",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Team => write!(f, "Team"),
            EntityKind::Player => write!(f, "Player"),
        }
    }
}

/// Per-game normalized figures or season totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregationMode {
    PerGame,
    Totals,
}

impl AggregationMode {
    /// Value of the provider's `PerMode` parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            AggregationMode::PerGame => "PerGame",
            AggregationMode::Totals => "Totals",
        }
    }
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatValue {
    Number(f64),
    Text(String),
    Null,
}

impl StatValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StatValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StatValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<f64> for StatValue {
    fn from(value: f64) -> Self {
        StatValue::Number(value)
    }
}

impl From<i64> for StatValue {
    fn from(value: i64) -> Self {
        StatValue::Number(value as f64)
    }
}

impl From<i32> for StatValue {
    fn from(value: i32) -> Self {
        StatValue::Number(value as f64)
    }
}

impl From<&str> for StatValue {
    fn from(value: &str) -> Self {
        StatValue::Text(value.to_string())
    }
}

impl From<String> for StatValue {
    fn from(value: String) -> Self {
        StatValue::Text(value)
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Number(n) => write!(f, "{}", n),
            StatValue::Text(s) => f.write_str(s),
            StatValue::Null => f.write_str("-"),
        }
    }
}

/// One entity's record, columns kept in provider order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<(String, StatValue)>,
}

impl Row {
    pub fn new(cells: Vec<(String, StatValue)>) -> Self {
        Row { cells }
    }

    pub fn get(&self, column: &str) -> Option<&StatValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatValue)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<StatValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A provider table: one row per entity, keyed by `entity_key`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsTable {
    entity_key: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl StatsTable {
    pub fn new(entity_key: impl Into<String>, columns: Vec<String>, rows: Vec<Row>) -> Self {
        StatsTable {
            entity_key: entity_key.into(),
            columns,
            rows,
        }
    }

    /// Builds a table whose column list is taken from the first row.
    pub fn from_rows(entity_key: impl Into<String>, rows: Vec<Row>) -> Self {
        let columns = rows
            .first()
            .map(|row| row.iter().map(|(name, _)| name.to_string()).collect())
            .unwrap_or_default();
        Self::new(entity_key, columns, rows)
    }

    pub fn entity_key(&self) -> &str {
        &self.entity_key
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drops rows whose key cell is not text. Returns how many were dropped.
    pub fn retain_named(&mut self) -> usize {
        let before = self.rows.len();
        let key = self.entity_key.as_str();
        self.rows
            .retain(|row| row.get(key).and_then(StatValue::as_str).is_some());
        before - self.rows.len()
    }

    /// Entity name of `row`, if its key cell is text.
    pub fn entity_name<'a>(&self, row: &'a Row) -> Option<&'a str> {
        row.get(&self.entity_key).and_then(StatValue::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_lookup_by_column() {
        let row: Row = [("TEAM_NAME", StatValue::from("Boston Celtics")), ("PTS", 116.3.into())]
            .into_iter()
            .collect();
        assert_eq!(row.get("PTS"), Some(&StatValue::Number(116.3)));
        assert_eq!(row.get("AST"), None);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn columns_come_from_first_row() {
        let row: Row = [("TEAM_NAME", StatValue::from("Utah Jazz")), ("REB", 44.into())]
            .into_iter()
            .collect();
        let table = StatsTable::from_rows("TEAM_NAME", vec![row.clone()]);
        assert_eq!(table.columns(), ["TEAM_NAME", "REB"]);
        assert!(table.has_column("REB"));
        assert_eq!(table.entity_name(&row), Some("Utah Jazz"));
    }

    #[test]
    fn rows_without_text_key_are_dropped() {
        let named: Row = [("TEAM_NAME", StatValue::from("Utah Jazz"))].into_iter().collect();
        let null: Row = [("TEAM_NAME", StatValue::Null)].into_iter().collect();
        let numeric: Row = [("TEAM_NAME", StatValue::from(7))].into_iter().collect();
        let mut table = StatsTable::from_rows("TEAM_NAME", vec![null, named.clone(), numeric]);

        assert_eq!(table.retain_named(), 2);
        assert_eq!(table.rows(), [named]);
    }

    #[test]
    fn whole_numbers_display_without_fraction() {
        assert_eq!(StatValue::from(110).to_string(), "110");
        assert_eq!(StatValue::from(0.482).to_string(), "0.482");
        assert_eq!(StatValue::Null.to_string(), "-");
    }

    #[test]
    fn entity_keys_follow_kind() {
        assert_eq!(EntityKind::Team.entity_key(), "TEAM_NAME");
        assert_eq!(EntityKind::Player.entity_key(), "PLAYER_NAME");
        assert_eq!(AggregationMode::PerGame.as_param(), "PerGame");
        assert_eq!(AggregationMode::Totals.to_string(), "Totals");
    }
}
