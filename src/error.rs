// Error types for the superstore crate.
// Covers API transport failures, response shape problems, table and cache errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WrangleError {
    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}: {body}")]
    Status { status: u16, url: String, body: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid endpoint name: {0:?}")]
    InvalidEndpoint(String),

    #[error("Unexpected response for '{endpoint}': {reason}")]
    Schema { endpoint: String, reason: String },

    #[error("Pagination for '{endpoint}' exceeded {limit} pages")]
    PageLimit { endpoint: String, limit: u32 },

    #[error("Column not found: {0}")]
    MissingColumn(String),

    #[error("Join column '{column}' holds {left} keys on the left and {right} keys on the right")]
    KeyTypeMismatch {
        column: String,
        left: String,
        right: String,
    },

    #[error("Row has {found} values, expected {expected}")]
    RowWidth { expected: usize, found: usize },

    #[error("Malformed cache file {path}: {reason}")]
    CacheFormat { path: String, reason: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl WrangleError {
    pub(crate) fn schema(endpoint: &str, reason: impl Into<String>) -> Self {
        Self::Schema {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WrangleError>;
