//! Platform-level statistical profiling of campaign performance.
//!
//! Two views per platform: aggregate KPIs recomputed from volume totals
//! (volume-weighted, the budget-allocation view) and the distribution of
//! row-level KPI values across campaigns (the optimization view). Large
//! campaigns dominate the former; the latter shows actual variability.
//! The analyzer returns structured records; rendering is the caller's
//! concern.

use insight_core::{Row, Table};
use insight_metrics::ratio;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// KPIs profiled at the campaign level.
pub const PROFILED_KPIS: &[&str] = &["ctr", "cpc", "conversion_rate", "cpa"];

#[derive(Debug, Clone, Default, Serialize)]
pub struct VolumeTotals {
    pub impressions: Option<f64>,
    pub clicks: Option<f64>,
    pub spend: Option<f64>,
    pub conversions: Option<f64>,
}

/// Volume-weighted KPIs from the platform totals. `None` marks a missing
/// source column or a zero denominator.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregateKpis {
    pub ctr: Option<f64>,
    pub cpc: Option<f64>,
    pub conversion_rate: Option<f64>,
    pub cpa: Option<f64>,
}

/// Distribution of defined row-level values for one KPI.
#[derive(Debug, Clone, Serialize)]
pub struct KpiDistribution {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n-1 divisor).
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Set when std_dev exceeds half the mean.
    pub high_variability: bool,
    pub samples: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignHighlight {
    pub campaign: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CampaignHighlights {
    pub best_ctr: Option<CampaignHighlight>,
    pub lowest_cpc: Option<CampaignHighlight>,
    pub best_conversion_rate: Option<CampaignHighlight>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformStatistics {
    pub platform: String,
    pub campaign_count: usize,
    pub data_points: usize,
    pub totals: VolumeTotals,
    pub aggregate: AggregateKpis,
    /// Keyed by KPI name; populated only when more than one campaign runs
    /// on the platform.
    pub distributions: BTreeMap<String, KpiDistribution>,
    pub highlights: Option<CampaignHighlights>,
}

/// Profile every platform in the metrics table, in lexicographic order.
/// Returns an empty list when the table has no `platform` column.
pub fn analyze_platforms(table: &Table) -> Vec<PlatformStatistics> {
    if !table.has_column("platform") {
        return Vec::new();
    }

    let mut groups: BTreeMap<String, Vec<&Row>> = BTreeMap::new();
    for row in table.rows() {
        let Some(platform) = row.get("platform") else {
            continue;
        };
        groups.entry(platform.to_string()).or_default().push(row);
    }

    groups
        .iter()
        .map(|(platform, rows)| analyze_platform(table, platform, rows))
        .collect()
}

fn analyze_platform(table: &Table, platform: &str, rows: &[&Row]) -> PlatformStatistics {
    let campaign_count = if table.has_column("campaign") {
        count_campaigns(rows)
    } else {
        0
    };

    let totals = VolumeTotals {
        impressions: column_total(table, rows, "impressions"),
        clicks: column_total(table, rows, "clicks"),
        spend: column_total(table, rows, "spend"),
        conversions: column_total(table, rows, "conversions"),
    };

    let aggregate = AggregateKpis {
        ctr: weighted(totals.clicks, totals.impressions, 100.0),
        cpc: weighted(totals.spend, totals.clicks, 1.0),
        conversion_rate: weighted(totals.conversions, totals.clicks, 100.0),
        cpa: weighted(totals.spend, totals.conversions, 1.0),
    };

    let mut distributions = BTreeMap::new();
    let mut highlights = None;

    if campaign_count > 1 {
        for kpi in PROFILED_KPIS {
            if !table.has_column(kpi) {
                continue;
            }
            // Undefined cells are excluded, never treated as zero.
            let values: Vec<f64> = rows.iter().filter_map(|row| row.number(kpi)).collect();
            if values.len() < 2 {
                continue;
            }
            distributions.insert(kpi.to_string(), distribution(&values));
        }

        highlights = Some(CampaignHighlights {
            best_ctr: extreme_campaign(table, rows, "ctr", Extreme::Max),
            lowest_cpc: extreme_campaign(table, rows, "cpc", Extreme::Min),
            best_conversion_rate: extreme_campaign(table, rows, "conversion_rate", Extreme::Max),
        });
    }

    PlatformStatistics {
        platform: platform.to_string(),
        campaign_count,
        data_points: rows.len(),
        totals,
        aggregate,
        distributions,
        highlights,
    }
}

/// Distinct campaign values; rows without one collectively form a single
/// degenerate group.
fn count_campaigns(rows: &[&Row]) -> usize {
    let mut names = BTreeSet::new();
    let mut unnamed = false;
    for row in rows {
        match row.get("campaign") {
            Some(value) => {
                names.insert(value.to_string());
            }
            None => unnamed = true,
        }
    }
    names.len() + usize::from(unnamed)
}

fn column_total(table: &Table, rows: &[&Row], column: &str) -> Option<f64> {
    if !table.has_column(column) {
        return None;
    }
    Some(rows.iter().filter_map(|row| row.number(column)).sum())
}

fn weighted(numerator: Option<f64>, denominator: Option<f64>, scale: f64) -> Option<f64> {
    match (numerator, denominator) {
        (Some(numerator), Some(denominator)) => ratio(numerator, denominator, scale),
        _ => None,
    }
}

fn distribution(values: &[f64]) -> KpiDistribution {
    let mean = mean(values);
    let std_dev = sample_std_dev(values, mean);
    KpiDistribution {
        mean,
        median: median(values),
        std_dev,
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        high_variability: std_dev > mean * 0.5,
        samples: values.len(),
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn sample_std_dev(values: &[f64], mean: f64) -> f64 {
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}

#[derive(Clone, Copy)]
enum Extreme {
    Max,
    Min,
}

/// Campaign holding the extremal defined value of `kpi`. Ties go to the
/// first occurrence in row order.
fn extreme_campaign(
    table: &Table,
    rows: &[&Row],
    kpi: &str,
    extreme: Extreme,
) -> Option<CampaignHighlight> {
    if !table.has_column(kpi) {
        return None;
    }
    let mut best: Option<(&Row, f64)> = None;
    for row in rows {
        let Some(value) = row.number(kpi) else {
            continue;
        };
        let better = match (&best, extreme) {
            (None, _) => true,
            (Some((_, current)), Extreme::Max) => value > *current,
            (Some((_, current)), Extreme::Min) => value < *current,
        };
        if better {
            best = Some((*row, value));
        }
    }
    best.map(|(row, value)| CampaignHighlight {
        campaign: row
            .get("campaign")
            .map(|v| v.to_string())
            .unwrap_or_else(|| "(unspecified)".to_string()),
        value,
    })
}
