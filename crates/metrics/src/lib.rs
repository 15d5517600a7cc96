//! Consolidation, normalization, and KPI derivation for campaign
//! performance tables.

pub mod consolidate;
pub mod kpi;
pub mod normalize;
pub mod platform;
pub mod validate;

pub use consolidate::consolidate;
pub use kpi::{derive_kpis, ratio, KpiSpec, KPI_SPECS, VOLUME_COLUMNS};
pub use normalize::{normalize_columns, COLUMN_ALIASES};
pub use platform::platform_summary;
pub use validate::{clean, validate, CleanOptions, ValidationReport};
