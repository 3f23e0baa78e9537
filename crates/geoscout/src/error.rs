use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoscoutError {
    #[error("Search error: {0}")]
    SearchError(#[from] crate::model::SearchError),
    #[error("Projection error: {0}")]
    ProjectionError(#[from] crate::projection::ProjectionError),
    #[error("Trip error: {0}")]
    TripError(#[from] crate::events::TripError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, GeoscoutError>;
