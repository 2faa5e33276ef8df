use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReaperError {
    #[error("invalid expiration date {value:?}, expected YYYY-MM-DD")]
    InvalidExpireDate { value: String },

    #[error("invalid creation date {value:?}, expected YYYY-MM-DD")]
    InvalidCreatedDate { value: String },

    #[error("invalid policy: {0}")]
    InvalidPolicy(String),

    #[error(transparent)]
    Provider(#[from] reaper_provider::Error),

    #[error("failed to write report {}: {source}", .path.display())]
    Report { path: PathBuf, source: csv::Error },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReaperError>;
