/// An error type for the scene module.
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// Error when a detection record is malformed.
    #[error("Invalid detection: {0}")]
    InvalidDetection(String),

    /// Error when the engine configuration is not valid.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Error when reading a configuration or frame file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Error when parsing a configuration or frame file.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
