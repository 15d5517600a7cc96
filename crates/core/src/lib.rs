pub mod config;
pub mod error;
pub mod table;

pub use config::AppConfig;
pub use error::{InsightError, InsightResult};
pub use table::{Row, Table, Value};
