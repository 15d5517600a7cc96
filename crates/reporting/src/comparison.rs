//! Cross-platform comparison table with formatted aggregate KPIs.

use crate::insights::SpendShare;
use insight_core::{Row, Table};
use insight_metrics::ratio;
use serde::Serialize;
use std::collections::HashMap;

/// One platform's formatted aggregates. Undefined KPIs render as `n/a`.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub platform: String,
    pub total_spend: String,
    pub impressions: String,
    pub ctr: String,
    pub cpc: String,
    pub cpa: String,
    pub conversions: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformComparison {
    pub rows: Vec<ComparisonRow>,
    pub spend_shares: Vec<SpendShare>,
}

/// Build the comparison from the metrics table. Platforms keep their
/// first-seen order; the spend-share breakdown is computed here
/// independently of the insight generator, over the same grouped rows,
/// so both report identical percentages.
///
/// Returns `None` when the table has no `platform` column.
pub fn compare_platforms(table: &Table) -> Option<PlatformComparison> {
    if !table.has_column("platform") {
        return None;
    }

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&Row>> = HashMap::new();
    for row in table.rows() {
        let Some(platform) = row.get("platform") else {
            continue;
        };
        let key = platform.to_string();
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(row);
    }

    let mut rows = Vec::new();
    let mut spends: Vec<(String, f64)> = Vec::new();

    for platform in &order {
        let group = &groups[platform];
        let impressions = column_sum(table, group, "impressions");
        let clicks = column_sum(table, group, "clicks");
        let spend = column_sum(table, group, "spend");
        let conversions = column_sum(table, group, "conversions");

        rows.push(ComparisonRow {
            platform: platform.clone(),
            total_spend: format_currency(spend),
            impressions: format_count(impressions),
            ctr: format_percent(ratio(clicks, impressions, 100.0)),
            cpc: format_currency_opt(ratio(spend, clicks, 1.0)),
            cpa: format_currency_opt(ratio(spend, conversions, 1.0)),
            conversions: conversions as u64,
        });
        spends.push((platform.clone(), spend));
    }

    let total_spend: f64 = spends.iter().map(|(_, spend)| spend).sum();
    let spend_shares = if total_spend > 0.0 {
        spends
            .into_iter()
            .map(|(platform, spend)| SpendShare {
                platform,
                spend,
                percentage: spend / total_spend * 100.0,
            })
            .collect()
    } else {
        Vec::new()
    };

    Some(PlatformComparison { rows, spend_shares })
}

fn column_sum(table: &Table, rows: &[&Row], column: &str) -> f64 {
    if !table.has_column(column) {
        return 0.0;
    }
    rows.iter().filter_map(|row| row.number(column)).sum()
}

// ─── Formatting ─────────────────────────────────────────────────────────────

pub(crate) fn format_currency(value: f64) -> String {
    format!("${}", format_thousands(value, 2))
}

pub(crate) fn format_currency_opt(value: Option<f64>) -> String {
    value.map(format_currency).unwrap_or_else(|| "n/a".to_string())
}

pub(crate) fn format_count(value: f64) -> String {
    format_thousands(value, 0)
}

pub(crate) fn format_percent(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}%"))
        .unwrap_or_else(|| "n/a".to_string())
}

pub(crate) fn format_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", int_part),
    };

    let mut grouped = String::new();
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}
