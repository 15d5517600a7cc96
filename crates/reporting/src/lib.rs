//! Statistical reporting over consolidated campaign tables.

pub mod comparison;
pub mod export;
pub mod insights;
pub mod render;
pub mod statistics;

pub use comparison::{compare_platforms, ComparisonRow, PlatformComparison};
pub use export::{write_table_csv, write_table_json, write_text_report, ExportFormat, ReportOutput};
pub use insights::{performance_insights, spend_shares, SpendShare};
pub use render::render_statistics_report;
pub use statistics::{analyze_platforms, PlatformStatistics};
