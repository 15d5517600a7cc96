//! Column-name normalization onto the canonical schema.

use insight_core::Table;
use tracing::debug;

/// Alias fragments mapped onto canonical column names, in resolution order.
pub const COLUMN_ALIASES: &[(&str, &str)] = &[
    ("cost", "spend"),
    ("amount", "spend"),
    ("impress", "impressions"),
    ("views", "impressions"),
    ("conv", "conversions"),
    ("sales", "conversions"),
];

/// Lowercase and trim every column name, then resolve known aliases onto
/// the canonical schema.
///
/// An alias never overwrites an existing canonical column. An exact
/// lowercase match beats substring containment; within each tier the first
/// column in table order wins. Unrecognized columns pass through untouched,
/// and re-running on an already canonical table is a no-op.
pub fn normalize_columns(table: &mut Table) {
    // Lowercasing that would collide with an existing distinct column
    // keeps the original header.
    for name in table.columns().to_vec() {
        let lowered = name.trim().to_lowercase();
        if lowered != name && !table.rename_column(&name, &lowered) {
            debug!(column = %name, "lowercased name collides, header kept");
        }
    }

    for &(alias, canonical) in COLUMN_ALIASES {
        if table.has_column(canonical) {
            continue;
        }
        let matched = table
            .columns()
            .iter()
            .position(|c| c == alias)
            .or_else(|| table.columns().iter().position(|c| c.contains(alias)));
        if let Some(index) = matched {
            let from = table.columns()[index].clone();
            debug!(from = %from, to = %canonical, "resolved column alias");
            table.rename_column(&from, canonical);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_trims_headers() {
        let mut table = Table::with_columns(["  Campaign ", "PLATFORM", "Clicks"]);
        normalize_columns(&mut table);
        assert_eq!(table.columns(), &["campaign", "platform", "clicks"]);
    }

    #[test]
    fn test_resolves_known_aliases() {
        let mut table = Table::with_columns(["Cost", "Views", "Sales"]);
        normalize_columns(&mut table);
        assert_eq!(table.columns(), &["spend", "impressions", "conversions"]);
    }

    #[test]
    fn test_never_overwrites_canonical_column() {
        let mut table = Table::with_columns(["spend", "cost"]);
        normalize_columns(&mut table);
        assert_eq!(table.columns(), &["spend", "cost"]);
    }

    #[test]
    fn test_exact_match_beats_substring() {
        let mut table = Table::with_columns(["total cost", "cost"]);
        normalize_columns(&mut table);
        assert_eq!(table.columns(), &["total cost", "spend"]);
    }

    #[test]
    fn test_first_substring_match_wins() {
        let mut table = Table::with_columns(["ad cost", "media cost"]);
        normalize_columns(&mut table);
        assert_eq!(table.columns(), &["spend", "media cost"]);
    }

    #[test]
    fn test_unrecognized_columns_pass_through() {
        let mut table = Table::with_columns(["region", "device"]);
        normalize_columns(&mut table);
        assert_eq!(table.columns(), &["region", "device"]);
    }

    #[test]
    fn test_idempotent() {
        let mut once = Table::with_columns(["Cost", "Impressions", "conv"]);
        normalize_columns(&mut once);
        let mut twice = once.clone();
        normalize_columns(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_already_canonical_conversions_not_rematched() {
        // "conversions" itself contains the "conv" fragment; the canonical
        // guard has to keep it in place.
        let mut table = Table::with_columns(["conversions", "conversion_rate"]);
        normalize_columns(&mut table);
        assert_eq!(table.columns(), &["conversions", "conversion_rate"]);
    }
}
