//! Volume-weighted aggregation by platform.

use crate::kpi::{ratio, KPI_SPECS, VOLUME_COLUMNS};
use insight_core::{Row, Table};
use std::collections::BTreeMap;
use std::collections::HashMap;
use tracing::info;

/// Group rows by exact platform value and recompute KPIs from the group
/// sums.
///
/// Whichever of the volume columns exist are summed per platform (missing
/// cells contribute nothing), then every KPI whose source columns are
/// among the summed set is recomputed from the totals. This is the
/// volume-weighted aggregate; it is numerically distinct from averaging
/// the per-row KPI column. Platforms come out in lexicographic order.
///
/// Returns `None` when the table has no `platform` column; rows with a
/// missing platform cell are excluded from grouping.
pub fn platform_summary(table: &Table) -> Option<Table> {
    if !table.has_column("platform") {
        return None;
    }

    let sum_columns: Vec<&str> = VOLUME_COLUMNS
        .iter()
        .copied()
        .filter(|column| table.has_column(column))
        .collect();

    // BTreeMap gives the summary its lexicographic platform order.
    let mut groups: BTreeMap<String, Vec<&Row>> = BTreeMap::new();
    for row in table.rows() {
        let Some(platform) = row.get("platform") else {
            continue;
        };
        groups.entry(platform.to_string()).or_default().push(row);
    }

    let computable: Vec<_> = KPI_SPECS
        .iter()
        .filter(|spec| {
            sum_columns.contains(&spec.numerator) && sum_columns.contains(&spec.denominator)
        })
        .collect();

    let mut summary = Table::with_columns(["platform"]);
    for column in &sum_columns {
        summary.add_column(column);
    }
    for spec in &computable {
        summary.add_column(spec.name);
    }

    for (platform, rows) in &groups {
        let mut out = Row::new();
        out.set("platform", platform.as_str());

        let mut totals: HashMap<&str, f64> = HashMap::new();
        for column in &sum_columns {
            let total: f64 = rows.iter().filter_map(|row| row.number(column)).sum();
            totals.insert(*column, total);
            out.set(*column, total);
        }

        for spec in &computable {
            let (Some(numerator), Some(denominator)) =
                (totals.get(spec.numerator), totals.get(spec.denominator))
            else {
                continue;
            };
            if let Some(value) = ratio(*numerator, *denominator, spec.scale) {
                out.set(spec.name, value);
            }
        }

        summary.push_row(out);
    }

    info!(platforms = summary.len(), "built platform summary");
    Some(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign_row(platform: &str, impressions: f64, clicks: f64) -> Row {
        let mut row = Row::new();
        row.set("platform", platform);
        row.set("impressions", impressions);
        row.set("clicks", clicks);
        row
    }

    #[test]
    fn test_aggregate_ctr_is_volume_weighted() {
        // Campaign 1: ctr 10, campaign 2: ctr 1. The weighted aggregate is
        // 190 / 10000 * 100 = 1.9, not the 5.5 simple average.
        let mut table = Table::with_columns(["platform", "impressions", "clicks"]);
        table.push_row(campaign_row("meta", 1000.0, 100.0));
        table.push_row(campaign_row("meta", 9000.0, 90.0));

        let summary = platform_summary(&table).unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary.rows()[0].number("ctr"), Some(1.9));
    }

    #[test]
    fn test_missing_platform_column_yields_none() {
        let table = Table::with_columns(["impressions", "clicks"]);
        assert!(platform_summary(&table).is_none());
    }

    #[test]
    fn test_zero_denominator_aggregate_is_undefined() {
        let mut table = Table::with_columns(["platform", "clicks", "spend"]);
        let mut row = Row::new();
        row.set("platform", "meta");
        row.set("clicks", 0.0);
        row.set("spend", 50.0);
        table.push_row(row);

        let summary = platform_summary(&table).unwrap();
        assert!(summary.has_column("cpc"));
        assert_eq!(summary.rows()[0].number("cpc"), None);
        assert_eq!(summary.rows()[0].number("spend"), Some(50.0));
    }

    #[test]
    fn test_platforms_sorted_lexicographically() {
        let mut table = Table::with_columns(["platform", "clicks", "impressions"]);
        table.push_row(campaign_row("tiktok", 100.0, 1.0));
        table.push_row(campaign_row("google", 100.0, 2.0));
        table.push_row(campaign_row("meta", 100.0, 3.0));

        let summary = platform_summary(&table).unwrap();
        let platforms: Vec<&str> = summary
            .rows()
            .iter()
            .filter_map(|row| row.text("platform"))
            .collect();
        assert_eq!(platforms, vec!["google", "meta", "tiktok"]);
    }

    #[test]
    fn test_rows_without_platform_are_excluded() {
        let mut table = Table::with_columns(["platform", "clicks", "impressions"]);
        table.push_row(campaign_row("meta", 1000.0, 10.0));
        let mut orphan = Row::new();
        orphan.set("clicks", 500.0);
        orphan.set("impressions", 5000.0);
        table.push_row(orphan);

        let summary = platform_summary(&table).unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary.rows()[0].number("clicks"), Some(10.0));
    }

    #[test]
    fn test_only_present_volume_columns_summed() {
        let mut table = Table::with_columns(["platform", "clicks"]);
        let mut row = Row::new();
        row.set("platform", "meta");
        row.set("clicks", 10.0);
        table.push_row(row);

        let summary = platform_summary(&table).unwrap();
        assert_eq!(summary.columns(), &["platform", "clicks"]);
    }

    #[test]
    fn test_kpis_requiring_unsummed_columns_absent() {
        // revenue is not a volume column, so no roas at the platform level.
        let mut table = Table::with_columns(["platform", "spend", "revenue"]);
        let mut row = Row::new();
        row.set("platform", "meta");
        row.set("spend", 100.0);
        row.set("revenue", 300.0);
        table.push_row(row);

        let summary = platform_summary(&table).unwrap();
        assert!(!summary.has_column("roas"));
    }
}
