use thiserror::Error;

/// Errors emitted by the generation engine.
///
/// Every variant except I/O wrappers maps onto one of the fatal classes of
/// the error taxonomy: configuration errors, pool exhaustion, and missing
/// synthetic-text capabilities. Recoverable evaluation failures (formula,
/// pattern formatting) never surface here; they resolve the field to null.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("reference file not found: {0}")]
    MissingReference(String),
    #[error("no more unique values available in {file} for {field}")]
    PoolExhausted { file: String, field: String },
    #[error("unknown faker method: {0}")]
    UnknownFaker(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
