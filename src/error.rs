use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpdaterError {
    #[error("Not in a git repository")]
    NotARepository,

    #[error("Package discovery failed: {0}")]
    Discovery(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Failed to run command: {0}")]
    CommandSpawn(String),

    #[error("Aborted by user")]
    UserCancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, UpdaterError>;
