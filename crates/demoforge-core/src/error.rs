use thiserror::Error;

/// Core error type shared across Demoforge crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The config violates the topic-config contract.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// The config file could not be parsed as YAML.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Catch-all I/O failure while reading config or pool files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results returned by Demoforge crates.
pub type Result<T> = std::result::Result<T, Error>;
