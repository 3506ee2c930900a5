use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid number for '{field}': {value}")]
    InvalidNumber { field: String, value: String },

    #[error("Invalid period: {0} (expected month, day or hour)")]
    InvalidPeriod(String),

    #[error("Unknown vendor: {0}")]
    UnknownVendor(String),

    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("Executor error: {0}")]
    Executor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// True when the error was caused by the caller's request rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::MissingParameter(_)
                | Error::InvalidNumber { .. }
                | Error::InvalidPeriod(_)
                | Error::UnknownVendor(_)
        )
    }

    /// Short label used for metrics and error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MissingParameter(_) => "missing_parameter",
            Error::InvalidNumber { .. } => "invalid_number",
            Error::InvalidPeriod(_) => "invalid_period",
            Error::UnknownVendor(_) => "unknown_vendor",
            Error::MalformedRecord { .. } => "malformed_record",
            Error::Executor(_) | Error::Http(_) => "executor_failure",
            Error::Io(_) | Error::Csv(_) | Error::Json(_) => "io",
            Error::Config(_) => "config",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
