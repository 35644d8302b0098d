use thiserror::Error;

#[derive(Error, Debug)]
pub enum JenLensError {
    #[error("API request failed with status {status} for {url}")]
    Api { status: u16, url: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("project response carries no jobs list")]
    MissingJobsField,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, JenLensError>;
