//! Marketing KPI derivation.

use insight_core::Table;
use tracing::debug;

/// Volume columns summed by the platform aggregator.
pub const VOLUME_COLUMNS: &[&str] = &["impressions", "clicks", "spend", "conversions"];

/// Definition of one derived KPI: `numerator / denominator * scale`.
#[derive(Debug, Clone, Copy)]
pub struct KpiSpec {
    pub name: &'static str,
    pub numerator: &'static str,
    pub denominator: &'static str,
    pub scale: f64,
}

/// Every KPI the pipeline derives, in output order.
pub const KPI_SPECS: &[KpiSpec] = &[
    KpiSpec {
        name: "ctr",
        numerator: "clicks",
        denominator: "impressions",
        scale: 100.0,
    },
    KpiSpec {
        name: "cpc",
        numerator: "spend",
        denominator: "clicks",
        scale: 1.0,
    },
    KpiSpec {
        name: "cpm",
        numerator: "spend",
        denominator: "impressions",
        scale: 1000.0,
    },
    KpiSpec {
        name: "cpa",
        numerator: "spend",
        denominator: "conversions",
        scale: 1.0,
    },
    KpiSpec {
        name: "conversion_rate",
        numerator: "conversions",
        denominator: "clicks",
        scale: 100.0,
    },
    KpiSpec {
        name: "roas",
        numerator: "revenue",
        denominator: "spend",
        scale: 1.0,
    },
];

/// `numerator / denominator * scale`, rounded to two decimals.
///
/// A zero denominator has no defined value. This is the single division
/// policy for the whole pipeline; the row-level calculator, the platform
/// aggregator, and the statistics analyzer all go through it.
pub fn ratio(numerator: f64, denominator: f64, scale: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    Some(round2(numerator / denominator * scale))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Add a column for every KPI whose source columns exist in `table`.
///
/// Rows missing an operand, or dividing by zero, keep that cell undefined
/// while the rest of the column still computes. A KPI whose source columns
/// are missing is not added at all. Columns already present are left
/// untouched, so derived values survive repeated pipeline stages.
pub fn derive_kpis(table: &mut Table) {
    for spec in KPI_SPECS {
        if table.has_column(spec.name) {
            debug!(kpi = spec.name, "column already present, not recomputed");
            continue;
        }
        if !table.has_column(spec.numerator) || !table.has_column(spec.denominator) {
            debug!(kpi = spec.name, "source columns missing, skipped");
            continue;
        }
        table.add_column(spec.name);
        for row in table.rows_mut() {
            let computed = match (row.number(spec.numerator), row.number(spec.denominator)) {
                (Some(numerator), Some(denominator)) => ratio(numerator, denominator, spec.scale),
                _ => None,
            };
            if let Some(value) = computed {
                row.set(spec.name, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_core::Row;

    fn metrics_row(pairs: &[(&str, f64)]) -> Table {
        let mut table = Table::with_columns(pairs.iter().map(|(c, _)| *c));
        let mut row = Row::new();
        for (column, value) in pairs {
            row.set(*column, *value);
        }
        table.push_row(row);
        table
    }

    #[test]
    fn test_reference_row_kpis() {
        let mut table = metrics_row(&[
            ("impressions", 1000.0),
            ("clicks", 50.0),
            ("spend", 100.0),
            ("conversions", 5.0),
        ]);
        derive_kpis(&mut table);

        let row = &table.rows()[0];
        assert_eq!(row.number("ctr"), Some(5.0));
        assert_eq!(row.number("cpc"), Some(2.0));
        assert_eq!(row.number("cpm"), Some(100.0));
        assert_eq!(row.number("cpa"), Some(20.0));
        assert_eq!(row.number("conversion_rate"), Some(10.0));
    }

    #[test]
    fn test_roas_from_revenue() {
        let mut table = metrics_row(&[("revenue", 300.0), ("spend", 100.0)]);
        derive_kpis(&mut table);
        assert_eq!(table.rows()[0].number("roas"), Some(3.0));
    }

    #[test]
    fn test_zero_denominator_leaves_cell_undefined() {
        let mut table = Table::with_columns(["clicks", "spend"]);
        let mut zero = Row::new();
        zero.set("clicks", 0.0);
        zero.set("spend", 50.0);
        table.push_row(zero);
        let mut fine = Row::new();
        fine.set("clicks", 10.0);
        fine.set("spend", 50.0);
        table.push_row(fine);

        derive_kpis(&mut table);
        assert!(table.has_column("cpc"));
        assert_eq!(table.rows()[0].number("cpc"), None);
        assert_eq!(table.rows()[1].number("cpc"), Some(5.0));
    }

    #[test]
    fn test_missing_source_column_skips_kpi_entirely() {
        let mut table = metrics_row(&[("clicks", 10.0), ("spend", 50.0)]);
        derive_kpis(&mut table);
        assert!(!table.has_column("ctr"));
        assert!(!table.has_column("cpm"));
        assert!(!table.has_column("roas"));
        assert!(table.has_column("cpc"));
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        let mut table = metrics_row(&[("clicks", 1.0), ("impressions", 3.0)]);
        derive_kpis(&mut table);
        assert_eq!(table.rows()[0].number("ctr"), Some(33.33));
    }

    #[test]
    fn test_existing_kpi_column_not_recomputed() {
        let mut table = Table::with_columns(["clicks", "impressions", "ctr"]);
        let mut row = Row::new();
        row.set("clicks", 50.0);
        row.set("impressions", 1000.0);
        row.set("ctr", 99.0);
        table.push_row(row);

        derive_kpis(&mut table);
        assert_eq!(table.rows()[0].number("ctr"), Some(99.0));
    }

    #[test]
    fn test_missing_operand_leaves_cell_undefined() {
        let mut table = Table::with_columns(["clicks", "impressions"]);
        let mut partial = Row::new();
        partial.set("clicks", 5.0);
        table.push_row(partial);

        derive_kpis(&mut table);
        assert!(table.has_column("ctr"));
        assert_eq!(table.rows()[0].number("ctr"), None);
    }
}
