use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Session must be installed before creating links")]
    NotInitialized,

    #[error("A session is already installed")]
    AlreadyInstalled,

    #[error("Failed to get link from URI: {0:?}")]
    InvalidUri(String),

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),
}

pub type Result<T> = std::result::Result<T, LinkError>;
