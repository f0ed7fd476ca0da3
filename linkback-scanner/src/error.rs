use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request to {0} timed out")]
    Timeout(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Worker count must be a positive integer, got {0}")]
    InvalidWorkerCount(usize),

    #[error("Could not decode {url} as {encoding}")]
    Decode { url: String, encoding: String },

    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
