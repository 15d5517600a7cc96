//! Data quality checks run between consolidation and analysis.

use crate::kpi::VOLUME_COLUMNS;
use insight_core::{Row, Table};
use serde::Serialize;
use std::collections::BTreeMap;

/// Share of missing cells above which a column flags the report.
const MISSING_FLAG_THRESHOLD_PCT: f64 = 5.0;

#[derive(Debug, Clone, Serialize)]
pub struct MissingValueStat {
    pub count: usize,
    pub percentage: f64,
}

/// Findings from one validation pass. Validation never mutates the table;
/// cleaning is a separate, explicit step.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub empty_columns: Vec<String>,
    pub duplicate_rows: usize,
    pub missing_values: BTreeMap<String, MissingValueStat>,
    pub inconsistencies: Vec<String>,
    pub has_issues: bool,
}

pub fn validate(table: &Table) -> ValidationReport {
    let mut report = ValidationReport::default();
    let row_count = table.len();

    for column in table.columns() {
        if row_count > 0 && table.rows().iter().all(|row| !row.contains(column)) {
            report.empty_columns.push(column.clone());
            report.has_issues = true;
        }
    }

    report.duplicate_rows = count_duplicates(table.rows());
    if report.duplicate_rows > 0 {
        report.has_issues = true;
    }

    for column in table.columns() {
        let missing = table
            .rows()
            .iter()
            .filter(|row| !row.contains(column))
            .count();
        if missing == 0 {
            continue;
        }
        let percentage = round2(missing as f64 / row_count as f64 * 100.0);
        if percentage > MISSING_FLAG_THRESHOLD_PCT {
            report.has_issues = true;
        }
        report.missing_values.insert(
            column.clone(),
            MissingValueStat {
                count: missing,
                percentage,
            },
        );
    }

    for column in VOLUME_COLUMNS {
        if !table.has_column(column) {
            continue;
        }
        let negatives = table
            .numbers(column)
            .filter(|value| matches!(value, Some(v) if *v < 0.0))
            .count();
        if negatives > 0 {
            report
                .inconsistencies
                .push(format!("{column} has {negatives} negative values"));
            report.has_issues = true;
        }
    }

    if table.has_column("spend") && table.has_column("conversions") {
        let zero_spend_conversions = table
            .rows()
            .iter()
            .filter(|row| {
                row.number("spend") == Some(0.0)
                    && row.number("conversions").is_some_and(|c| c > 0.0)
            })
            .count();
        if zero_spend_conversions > 0 {
            report.inconsistencies.push(format!(
                "{zero_spend_conversions} rows have conversions but zero spend"
            ));
            report.has_issues = true;
        }
    }

    report
}

#[derive(Debug, Clone, Copy)]
pub struct CleanOptions {
    pub remove_duplicates: bool,
    /// Zero-fill missing cells in the volume columns.
    pub fill_missing: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            remove_duplicates: true,
            fill_missing: false,
        }
    }
}

/// Produce a cleaned copy: entirely-empty columns dropped, duplicate rows
/// optionally removed (first occurrence kept), missing volume cells
/// optionally zero-filled.
pub fn clean(table: &Table, options: CleanOptions) -> Table {
    let kept_columns: Vec<&String> = table
        .columns()
        .iter()
        .filter(|column| {
            table.is_empty() || table.rows().iter().any(|row| row.contains(column.as_str()))
        })
        .collect();

    let mut cleaned = Table::with_columns(kept_columns.iter().map(|c| c.as_str()));
    let mut kept_rows: Vec<Row> = Vec::new();

    for row in table.rows() {
        let mut projected = Row::new();
        for column in &kept_columns {
            if let Some(value) = row.get(column.as_str()) {
                projected.set(column.as_str(), value.clone());
            }
        }
        if options.fill_missing {
            for column in VOLUME_COLUMNS {
                if cleaned.has_column(column) && !projected.contains(column) {
                    projected.set(*column, 0.0);
                }
            }
        }
        if options.remove_duplicates && kept_rows.contains(&projected) {
            continue;
        }
        kept_rows.push(projected);
    }

    for row in kept_rows {
        cleaned.push_row(row);
    }
    cleaned
}

fn count_duplicates(rows: &[Row]) -> usize {
    let mut seen: Vec<&Row> = Vec::new();
    let mut duplicates = 0;
    for row in rows {
        if seen.contains(&row) {
            duplicates += 1;
        } else {
            seen.push(row);
        }
    }
    duplicates
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
