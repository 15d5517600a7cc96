//! Plain-text rendering of the statistics and comparison records.
//!
//! Pure presentation: every figure comes from the structured records, no
//! computation happens here.

use crate::comparison::{format_count, format_currency, PlatformComparison};
use crate::statistics::{KpiDistribution, PlatformStatistics};

const RULE_WIDTH: usize = 70;

pub fn render_statistics_report(
    stats: &[PlatformStatistics],
    comparison: Option<&PlatformComparison>,
) -> String {
    let mut out = String::new();
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    out.push_str(&heavy);
    out.push_str("\nMARKETING PERFORMANCE STATISTICS\n");
    out.push_str(&heavy);
    out.push('\n');
    out.push_str("Aggregate metrics are volume-weighted (budget allocation view).\n");
    out.push_str("Campaign metrics show per-campaign variability (optimization view).\n");

    for platform in stats {
        out.push('\n');
        out.push_str(&light);
        out.push('\n');
        out.push_str(&platform.platform.to_uppercase());
        out.push('\n');
        out.push_str(&light);
        out.push('\n');
        out.push_str(&format!(
            "Campaigns: {} | Data points: {}\n",
            platform.campaign_count, platform.data_points
        ));

        out.push_str("\nVolume totals:\n");
        push_total(&mut out, "impressions", platform.totals.impressions, false);
        push_total(&mut out, "clicks", platform.totals.clicks, false);
        push_total(&mut out, "spend", platform.totals.spend, true);
        push_total(&mut out, "conversions", platform.totals.conversions, false);

        out.push_str("\nAggregate KPIs (volume-weighted):\n");
        push_aggregate(&mut out, "ctr", platform.aggregate.ctr);
        push_aggregate(&mut out, "cpc", platform.aggregate.cpc);
        push_aggregate(&mut out, "conversion_rate", platform.aggregate.conversion_rate);
        push_aggregate(&mut out, "cpa", platform.aggregate.cpa);

        for (kpi, dist) in &platform.distributions {
            push_distribution(&mut out, kpi, dist);
        }

        if let Some(highlights) = &platform.highlights {
            let mut lines = Vec::new();
            if let Some(best) = &highlights.best_ctr {
                lines.push(format!(
                    "  Best CTR: {} ({})",
                    best.campaign,
                    format_kpi("ctr", best.value)
                ));
            }
            if let Some(best) = &highlights.lowest_cpc {
                lines.push(format!(
                    "  Lowest CPC: {} ({})",
                    best.campaign,
                    format_kpi("cpc", best.value)
                ));
            }
            if let Some(best) = &highlights.best_conversion_rate {
                lines.push(format!(
                    "  Best conversion rate: {} ({})",
                    best.campaign,
                    format_kpi("conversion_rate", best.value)
                ));
            }
            if !lines.is_empty() {
                out.push_str("\nCampaign highlights:\n");
                for line in lines {
                    out.push_str(&line);
                    out.push('\n');
                }
            }
        }
    }

    if let Some(comparison) = comparison {
        out.push('\n');
        out.push_str(&heavy);
        out.push_str("\nCROSS-PLATFORM COMPARISON\n");
        out.push_str(&heavy);
        out.push('\n');
        out.push_str(&format!(
            "{:<16} {:>14} {:>14} {:>9} {:>10} {:>10} {:>12}\n",
            "Platform", "Total Spend", "Impressions", "CTR", "CPC", "CPA", "Conversions"
        ));
        for row in &comparison.rows {
            out.push_str(&format!(
                "{:<16} {:>14} {:>14} {:>9} {:>10} {:>10} {:>12}\n",
                row.platform,
                row.total_spend,
                row.impressions,
                row.ctr,
                row.cpc,
                row.cpa,
                row.conversions
            ));
        }

        if !comparison.spend_shares.is_empty() {
            out.push_str("\nBudget allocation:\n");
            for share in &comparison.spend_shares {
                out.push_str(&format!(
                    "  {}: {} ({:.1}%)\n",
                    share.platform,
                    format_currency(share.spend),
                    share.percentage
                ));
            }
        }
    }

    out
}

fn push_total(out: &mut String, label: &str, value: Option<f64>, currency: bool) {
    let Some(value) = value else {
        return;
    };
    let rendered = if currency {
        format_currency(value)
    } else {
        format_count(value)
    };
    out.push_str(&format!("  {label}: {rendered}\n"));
}

fn push_aggregate(out: &mut String, kpi: &str, value: Option<f64>) {
    let Some(value) = value else {
        return;
    };
    out.push_str(&format!("  {}: {}\n", kpi_label(kpi), format_kpi(kpi, value)));
}

fn push_distribution(out: &mut String, kpi: &str, dist: &KpiDistribution) {
    out.push_str(&format!(
        "\n{} distribution across campaigns ({} samples):\n",
        kpi_label(kpi),
        dist.samples
    ));
    out.push_str(&format!(
        "  mean {} | median {} | std dev {} | range {} - {}\n",
        format_kpi(kpi, dist.mean),
        format_kpi(kpi, dist.median),
        format_kpi(kpi, dist.std_dev),
        format_kpi(kpi, dist.min),
        format_kpi(kpi, dist.max)
    ));
    if dist.high_variability {
        out.push_str("  high variability - review individual campaigns\n");
    }
}

fn kpi_label(kpi: &str) -> &str {
    match kpi {
        "ctr" => "CTR",
        "cpc" => "CPC",
        "cpa" => "CPA",
        "conversion_rate" => "Conversion rate",
        other => other,
    }
}

fn format_kpi(kpi: &str, value: f64) -> String {
    match kpi {
        "ctr" | "conversion_rate" => format!("{value:.2}%"),
        "cpc" | "cpa" => format!("${value:.2}"),
        _ => format!("{value:.2}"),
    }
}
