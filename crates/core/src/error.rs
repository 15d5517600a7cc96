use thiserror::Error;

pub type InsightResult<T> = Result<T, InsightError>;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("no input tables supplied")]
    EmptyInput,

    #[error("ingest error: {0}")]
    Ingest(String),

    #[error("export error: {0}")]
    Export(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
