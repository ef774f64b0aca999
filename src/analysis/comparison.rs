use crate::error::AppError;
use crate::table::{Row, StatValue, StatsTable};

pub const DEFAULT_METRICS: &[&str] = &["FG_PCT", "REB", "AST", "TOV", "PTS"];

/// Ordered, non-empty list of metric columns to compare.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSet {
    names: Vec<String>,
}

impl MetricSet {
    pub fn new<I, S>(names: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(AppError::EmptyMetricSet);
        }
        Ok(MetricSet { names })
    }

    /// Parses a comma separated list such as `"PTS, AST"`.
    pub fn parse_list(raw: &str) -> Result<Self, AppError> {
        Self::new(
            raw.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty()),
        )
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Checks once that every metric is a column of `table`.
    pub fn validate_schema(&self, table: &StatsTable) -> Result<(), AppError> {
        match self.iter().find(|metric| !table.has_column(metric)) {
            Some(missing) => Err(AppError::MetricMissing(missing.to_string())),
            None => Ok(()),
        }
    }
}

impl Default for MetricSet {
    fn default() -> Self {
        MetricSet {
            names: DEFAULT_METRICS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WideEntry {
    pub metric: String,
    pub value_a: StatValue,
    pub value_b: StatValue,
}

impl WideEntry {
    /// `value_a - value_b` when both sides are numeric.
    pub fn difference(&self) -> Option<f64> {
        Some(self.value_a.as_f64()? - self.value_b.as_f64()?)
    }
}

/// Metric-indexed side-by-side values, in metric set order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WideView {
    entries: Vec<WideEntry>,
}

impl WideView {
    pub fn get(&self, metric: &str) -> Option<(&StatValue, &StatValue)> {
        self.entries
            .iter()
            .find(|entry| entry.metric == metric)
            .map(|entry| (&entry.value_a, &entry.value_b))
    }

    pub fn entries(&self) -> &[WideEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord {
    pub metric: String,
    pub entity: String,
    pub value: StatValue,
}

impl LongRecord {
    fn new(metric: &str, entity: &str, value: &StatValue) -> Self {
        LongRecord {
            metric: metric.to_string(),
            entity: entity.to_string(),
            value: value.clone(),
        }
    }
}

/// `(metric, entity, value)` triples: per metric, entity A then entity B.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LongView {
    records: Vec<LongRecord>,
}

impl LongView {
    pub fn records(&self) -> &[LongRecord] {
        &self.records
    }

    /// Records grouped by metric, two per group.
    pub fn groups(&self) -> impl Iterator<Item = &[LongRecord]> {
        self.records.chunks(2)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub name_a: String,
    pub name_b: String,
    pub wide: WideView,
    pub long: LongView,
}

pub struct ComparisonBuilder;

impl ComparisonBuilder {
    /// Reshapes two rows into wide and long views over `metrics`.
    ///
    /// Every metric is checked against both rows before anything is built,
    /// so a missing column never yields a partial result. Comparing an
    /// entity with itself is allowed.
    pub fn build(
        row_a: &Row,
        row_b: &Row,
        name_a: &str,
        name_b: &str,
        metrics: &MetricSet,
    ) -> Result<ComparisonResult, AppError> {
        if metrics.is_empty() {
            return Err(AppError::EmptyMetricSet);
        }

        let pairs = metrics
            .iter()
            .map(|metric| match (row_a.get(metric), row_b.get(metric)) {
                (Some(a), Some(b)) => Ok((metric, a, b)),
                _ => Err(AppError::MetricMissing(metric.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut wide = Vec::with_capacity(pairs.len());
        let mut long = Vec::with_capacity(pairs.len() * 2);

        for (metric, a, b) in pairs {
            wide.push(WideEntry {
                metric: metric.to_string(),
                value_a: a.clone(),
                value_b: b.clone(),
            });
            long.push(LongRecord::new(metric, name_a, a));
            long.push(LongRecord::new(metric, name_b, b));
        }

        Ok(ComparisonResult {
            name_a: name_a.to_string(),
            name_b: name_b.to_string(),
            wide: WideView { entries: wide },
            long: LongView { records: long },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, f64)]) -> Row {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn pts_ast_scenario() {
        let metrics = MetricSet::new(["PTS", "AST"]).unwrap();
        let a = row(&[("PTS", 110.0), ("AST", 25.0)]);
        let b = row(&[("PTS", 105.0), ("AST", 30.0)]);

        let result = ComparisonBuilder::build(&a, &b, "Alpha", "Beta", &metrics).unwrap();

        assert_eq!(
            result.wide.get("PTS"),
            Some((&StatValue::from(110), &StatValue::from(105)))
        );
        assert_eq!(
            result.wide.get("AST"),
            Some((&StatValue::from(25), &StatValue::from(30)))
        );

        let triples: Vec<(&str, &str, f64)> = result
            .long
            .records()
            .iter()
            .map(|r| (r.metric.as_str(), r.entity.as_str(), r.value.as_f64().unwrap()))
            .collect();
        assert_eq!(
            triples,
            [
                ("PTS", "Alpha", 110.0),
                ("PTS", "Beta", 105.0),
                ("AST", "Alpha", 25.0),
                ("AST", "Beta", 30.0),
            ]
        );
    }

    #[test]
    fn long_view_interleaves_by_metric() {
        let metrics = MetricSet::default();
        let a = row(&[("FG_PCT", 0.48), ("REB", 44.1), ("AST", 26.0), ("TOV", 13.2), ("PTS", 116.0)]);
        let b = row(&[("FG_PCT", 0.45), ("REB", 42.7), ("AST", 24.5), ("TOV", 14.9), ("PTS", 109.4)]);

        let result = ComparisonBuilder::build(&a, &b, "A", "B", &metrics).unwrap();
        let long = result.long.records();
        assert_eq!(long.len(), 2 * metrics.len());

        for (i, metric) in metrics.iter().enumerate() {
            assert_eq!(long[2 * i], LongRecord::new(metric, "A", a.get(metric).unwrap()));
            assert_eq!(long[2 * i + 1], LongRecord::new(metric, "B", b.get(metric).unwrap()));
        }
        assert_eq!(result.long.groups().count(), metrics.len());
    }

    #[test]
    fn same_entity_twice_is_allowed() {
        let metrics = MetricSet::new(["PTS", "AST"]).unwrap();
        let x = row(&[("PTS", 99.0), ("AST", 21.0)]);

        let result = ComparisonBuilder::build(&x, &x, "X", "X", &metrics).unwrap();
        for pair in result.long.groups() {
            assert_eq!(pair[0], pair[1]);
        }
        assert_eq!(result.wide.entries()[0].difference(), Some(0.0));
    }

    #[test]
    fn missing_metric_fails_without_output() {
        let metrics = MetricSet::new(["PTS", "STL"]).unwrap();
        let a = row(&[("PTS", 100.0)]);
        let b = row(&[("PTS", 101.0), ("STL", 8.0)]);

        let err = ComparisonBuilder::build(&a, &b, "A", "B", &metrics).unwrap_err();
        assert!(matches!(err, AppError::MetricMissing(m) if m == "STL"));

        let err = ComparisonBuilder::build(&b, &a, "B", "A", &metrics).unwrap_err();
        assert!(matches!(err, AppError::MetricMissing(m) if m == "STL"));
    }

    #[test]
    fn text_values_pass_through() {
        let metrics = MetricSet::new(["TEAM_ABBREVIATION"]).unwrap();
        let a: Row = [("TEAM_ABBREVIATION", "BOS")].into_iter().collect();
        let b: Row = [("TEAM_ABBREVIATION", "LAL")].into_iter().collect();

        let result = ComparisonBuilder::build(&a, &b, "Celtics", "Lakers", &metrics).unwrap();
        assert_eq!(result.wide.entries()[0].difference(), None);
        assert_eq!(result.long.records()[1].value, StatValue::from("LAL"));
    }

    #[test]
    fn empty_metric_set_is_rejected() {
        let err = MetricSet::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, AppError::EmptyMetricSet));
        assert!(MetricSet::parse_list(",,").is_err());
    }

    #[test]
    fn schema_validation_names_first_missing_metric() {
        let table = StatsTable::from_rows(
            "TEAM_NAME",
            vec![[("TEAM_NAME", StatValue::from("A")), ("PTS", StatValue::from(1))]
                .into_iter()
                .collect()],
        );
        assert!(MetricSet::new(["PTS"]).unwrap().validate_schema(&table).is_ok());

        let err = MetricSet::default().validate_schema(&table).unwrap_err();
        assert!(matches!(err, AppError::MetricMissing(m) if m == "FG_PCT"));
    }
}
