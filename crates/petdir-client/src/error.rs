use petdir_core::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid pet: {0}")]
    Validation(#[from] ValidationError),

    #[error("No form is open")]
    NoOpenForm,
}

pub type Result<T> = std::result::Result<T, ClientError>;
