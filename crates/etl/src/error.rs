/// Every way a pipeline run can fail. All variants abort the run.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Invalid date range: {0}")]
    InvalidRange(String),
    #[error("Empty input: {0} table has no rows")]
    EmptyInput(&'static str),
    #[error("Schema error: {0}")]
    Schema(String),
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Upstream unavailable: {endpoint} ({reason})")]
    UpstreamUnavailable { endpoint: String, reason: String },
    #[error("Failed to query database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to read telemetry file: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
