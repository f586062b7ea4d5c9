use thiserror::Error;

/// Batch-fatal failures. Record-level data anomalies are never reported
/// through this type; they go to the problem collector instead.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid sampling rate {0}: must be between 0 and 100")]
    InvalidSamplingRate(u32),

    #[error("Unexpected input shape: {0}")]
    InputShape(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
