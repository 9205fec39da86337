use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriveLinkError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("clipboard error: {0}")]
    Clipboard(String),
    #[error("io error: {0}")]
    Io(String),
}

pub type DriveLinkResult<T> = Result<T, DriveLinkError>;
