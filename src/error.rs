// src/error.rs
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from the games API, classified from the response body and status.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid API key (server said Forbidden)")]
    Forbidden,

    #[error("entry not found for the requested window")]
    EntryNotFound,

    #[error("request limit exceeded")]
    LimitExceeded,

    #[error("too many requests in this session")]
    TooManyRequests,

    #[error("invalid value for request parameter {param:?}")]
    InvalidParameter { param: String },

    #[error("request failed after {attempts} attempts: {last}")]
    Request { attempts: u32, last: String },

    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors while interpreting placement strings.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed placement string: {0:?}")]
    MalformedBuild(String),

    #[error("placement coordinate outside the board in {0:?}")]
    CoordinateOutOfRange(String),
}

/// Errors while loading the unit index or upgrade tree resources.
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unit index is missing column {0:?}")]
    MissingColumn(&'static str),

    #[error("invalid unit code {value:?} for unit {unit:?}")]
    BadUnitCode { unit: String, value: String },

    #[error("invalid upgrade tree json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Crate-level error for the fetch/crawl pipeline.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Cli(String),
}

pub type Result<T, E = ScrapeError> = std::result::Result<T, E>;
