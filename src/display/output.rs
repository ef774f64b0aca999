use crate::analysis::comparison::{ComparisonResult, LongView};
use crate::table::{EntityKind, Row};
use colored::*;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

const CHART_WIDTH: usize = 40;

#[derive(Tabled)]
struct EntityRow {
    #[tabled(rename = "#")]
    number: String,
    name: String,
}

pub fn display_entities(kind: EntityKind, names: &[String]) {
    println!(
        "\n{}",
        format!("📋 Available {}s ({})", kind, names.len()).bold().cyan()
    );
    println!("{}\n", "=".repeat(60).cyan());

    let rows: Vec<EntityRow> = names
        .iter()
        .enumerate()
        .map(|(idx, name)| EntityRow {
            number: format!("{}", idx + 1),
            name: name.clone(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_comparison(result: &ComparisonResult) {
    println!(
        "\n{}",
        format!("📊 Comparing {} and {}", result.name_a, result.name_b)
            .bold()
            .cyan()
    );
    println!("{}\n", "=".repeat(60).cyan());

    let mut builder = Builder::default();
    builder.push_record(vec![
        "Metric".to_string(),
        result.name_a.clone(),
        result.name_b.clone(),
        "Diff".to_string(),
    ]);
    for entry in result.wide.entries() {
        builder.push_record(vec![
            entry.metric.clone(),
            entry.value_a.to_string(),
            entry.value_b.to_string(),
            entry.difference().map(format_difference).unwrap_or_default(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_chart(long: &LongView) {
    println!("{}", "Metric Comparison".bold().yellow());

    let label_width = long
        .records()
        .iter()
        .map(|r| r.entity.chars().count())
        .max()
        .unwrap_or(0);

    for group in long.groups() {
        let Some(first) = group.first() else {
            continue;
        };
        let max = group
            .iter()
            .filter_map(|r| r.value.as_f64())
            .map(f64::abs)
            .fold(0.0, f64::max);

        println!("\n  {}", first.metric.bold());
        for (idx, record) in group.iter().enumerate() {
            let bar = match record.value.as_f64() {
                Some(v) => "█".repeat(bar_length(v, max, CHART_WIDTH)),
                None => String::new(),
            };
            let bar = if idx == 0 { bar.cyan() } else { bar.magenta() };
            println!(
                "  {:<width$}  {} {}",
                record.entity,
                bar,
                record.value,
                width = label_width
            );
        }
    }
    println!();
}

/// Prints every column of both rows side by side.
pub fn display_full_rows(name_a: &str, row_a: &Row, name_b: &str, row_b: &Row) {
    println!("{}", "Full Stats".bold().yellow());

    let mut builder = Builder::default();
    builder.push_record(vec![
        "Column".to_string(),
        name_a.to_string(),
        name_b.to_string(),
    ]);
    for (column, value_a) in row_a.iter() {
        let value_b = row_b
            .get(column)
            .map(ToString::to_string)
            .unwrap_or_default();
        builder.push_record(vec![column.to_string(), value_a.to_string(), value_b]);
    }
    for (column, value_b) in row_b.iter().filter(|(c, _)| !row_a.contains(c)) {
        builder.push_record(vec![column.to_string(), String::new(), value_b.to_string()]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

fn bar_length(value: f64, max: f64, width: usize) -> usize {
    if !value.is_finite() || !max.is_finite() || max <= 0.0 {
        return 0;
    }
    let len = (value.abs() / max * width as f64).round() as usize;
    len.min(width)
}

fn format_difference(diff: f64) -> String {
    let rounded = (diff * 1000.0).round() / 1000.0;
    if rounded > 0.0 {
        format!("+{}", rounded)
    } else if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{}", rounded)
    }
}
