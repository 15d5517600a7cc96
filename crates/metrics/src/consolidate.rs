//! Concatenation of heterogeneous row sets into one table.

use insight_core::{InsightError, InsightResult, Table};
use tracing::info;

/// Concatenate `tables` in order.
///
/// Columns are unioned in first-seen order, every row is kept (no
/// deduplication), and cells absent from a source table stay absent rather
/// than becoming zero. An empty input set is an error; callers must not
/// invoke consolidation without at least one table.
pub fn consolidate(tables: &[Table]) -> InsightResult<Table> {
    if tables.is_empty() {
        return Err(InsightError::EmptyInput);
    }

    let mut consolidated = Table::new();
    for table in tables {
        for column in table.columns() {
            consolidated.add_column(column);
        }
        for row in table.rows() {
            consolidated.push_row(row.clone());
        }
    }

    info!(
        tables = tables.len(),
        rows = consolidated.len(),
        "consolidated input tables"
    );
    Ok(consolidated)
}
