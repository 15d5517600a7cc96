//! Ranked, natural-language-ready findings from a platform summary.

use insight_core::Table;
use serde::Serialize;

/// One platform's share of the total ad spend.
#[derive(Debug, Clone, Serialize)]
pub struct SpendShare {
    pub platform: String,
    pub spend: f64,
    pub percentage: f64,
}

/// Ordered findings from a platform summary table: the extremal platform
/// for each KPI, then one spend-share line per platform in summary order.
/// A finding whose KPI column is absent is skipped; rows with an
/// undefined cell are ignored by the ranking.
pub fn performance_insights(summary: &Table) -> Vec<String> {
    let mut insights = Vec::new();
    if summary.is_empty() {
        return insights;
    }

    if let Some((platform, value)) = extreme(summary, "ctr", Extreme::Max) {
        insights.push(format!("{platform} has the highest CTR ({value:.2}%)"));
    }
    if let Some((platform, value)) = extreme(summary, "cpc", Extreme::Min) {
        insights.push(format!("{platform} has the lowest CPC (${value:.2})"));
    }
    if let Some((platform, value)) = extreme(summary, "conversion_rate", Extreme::Max) {
        insights.push(format!(
            "{platform} has the best conversion rate ({value:.2}%)"
        ));
    }
    if let Some((platform, value)) = extreme(summary, "cpa", Extreme::Min) {
        insights.push(format!("{platform} has the lowest CPA (${value:.2})"));
    }

    for share in spend_shares(summary) {
        insights.push(format!(
            "{} represents {:.1}% of total ad spend",
            share.platform, share.percentage
        ));
    }

    insights
}

/// Spend share per platform, in summary order. Empty when the summary has
/// no `spend` column or the total spend is not positive.
pub fn spend_shares(summary: &Table) -> Vec<SpendShare> {
    if !summary.has_column("spend") {
        return Vec::new();
    }
    let total: f64 = summary.numbers("spend").flatten().sum();
    if total <= 0.0 {
        return Vec::new();
    }

    summary
        .rows()
        .iter()
        .filter_map(|row| {
            let platform = row.get("platform")?.to_string();
            let spend = row.number("spend")?;
            Some(SpendShare {
                platform,
                spend,
                percentage: spend / total * 100.0,
            })
        })
        .collect()
}

#[derive(Clone, Copy)]
enum Extreme {
    Max,
    Min,
}

fn extreme(summary: &Table, kpi: &str, extreme: Extreme) -> Option<(String, f64)> {
    if !summary.has_column(kpi) {
        return None;
    }
    let mut best: Option<(String, f64)> = None;
    for row in summary.rows() {
        let Some(value) = row.number(kpi) else {
            continue;
        };
        let Some(platform) = row.get("platform") else {
            continue;
        };
        let platform = platform.to_string();
        let better = match (&best, extreme) {
            (None, _) => true,
            (Some((_, current)), Extreme::Max) => value > *current,
            (Some((_, current)), Extreme::Min) => value < *current,
        };
        if better {
            best = Some((platform, value));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_core::Row;

    fn summary_row(platform: &str, pairs: &[(&str, f64)]) -> Row {
        let mut row = Row::new();
        row.set("platform", platform);
        for (column, value) in pairs {
            row.set(*column, *value);
        }
        row
    }

    #[test]
    fn test_best_ctr_platform_named() {
        let mut summary = Table::with_columns(["platform", "ctr"]);
        summary.push_row(summary_row("a", &[("ctr", 5.0)]));
        summary.push_row(summary_row("b", &[("ctr", 8.0)]));

        let insights = performance_insights(&summary);
        assert_eq!(insights[0], "b has the highest CTR (8.00%)");
    }

    #[test]
    fn test_lowest_cpc_and_cpa_use_minimum() {
        let mut summary = Table::with_columns(["platform", "cpc", "cpa"]);
        summary.push_row(summary_row("a", &[("cpc", 2.5), ("cpa", 30.0)]));
        summary.push_row(summary_row("b", &[("cpc", 1.25), ("cpa", 45.0)]));

        let insights = performance_insights(&summary);
        assert!(insights.contains(&"b has the lowest CPC ($1.25)".to_string()));
        assert!(insights.contains(&"a has the lowest CPA ($30.00)".to_string()));
    }

    #[test]
    fn test_absent_kpi_column_skips_finding() {
        let mut summary = Table::with_columns(["platform", "spend"]);
        summary.push_row(summary_row("a", &[("spend", 100.0)]));

        let insights = performance_insights(&summary);
        assert_eq!(insights, vec!["a represents 100.0% of total ad spend"]);
    }

    #[test]
    fn test_spend_shares_sum_to_hundred() {
        let mut summary = Table::with_columns(["platform", "spend"]);
        summary.push_row(summary_row("a", &[("spend", 123.45)]));
        summary.push_row(summary_row("b", &[("spend", 67.89)]));
        summary.push_row(summary_row("c", &[("spend", 8.66)]));

        let total: f64 = spend_shares(&summary)
            .iter()
            .map(|share| share.percentage)
            .sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_undefined_cells_ignored_by_ranking() {
        let mut summary = Table::with_columns(["platform", "ctr"]);
        summary.push_row(summary_row("a", &[]));
        summary.push_row(summary_row("b", &[("ctr", 3.0)]));

        let insights = performance_insights(&summary);
        assert_eq!(insights[0], "b has the highest CTR (3.00%)");
    }

    #[test]
    fn test_ties_go_to_first_platform() {
        let mut summary = Table::with_columns(["platform", "ctr"]);
        summary.push_row(summary_row("first", &[("ctr", 4.0)]));
        summary.push_row(summary_row("second", &[("ctr", 4.0)]));

        let insights = performance_insights(&summary);
        assert_eq!(insights[0], "first has the highest CTR (4.00%)");
    }

    #[test]
    fn test_empty_summary_yields_no_insights() {
        let summary = Table::with_columns(["platform", "ctr"]);
        assert!(performance_insights(&summary).is_empty());
    }

    #[test]
    fn test_zero_total_spend_skips_shares() {
        let mut summary = Table::with_columns(["platform", "spend"]);
        summary.push_row(summary_row("a", &[("spend", 0.0)]));

        assert!(spend_shares(&summary).is_empty());
        assert!(performance_insights(&summary).is_empty());
    }
}
