use thiserror::Error;

#[derive(Error, Debug)]
pub enum PetDirError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),
}

impl PetDirError {
    /// True when the error means the connection itself is unusable and
    /// should not go back into the pool.
    pub fn is_connection_failure(&self) -> bool {
        use rusqlite::ErrorCode;
        match self {
            PetDirError::Database(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                ErrorCode::CannotOpen
                    | ErrorCode::NotADatabase
                    | ErrorCode::DatabaseCorrupt
                    | ErrorCode::SystemIoFailure
                    | ErrorCode::ReadOnly
            ),
            PetDirError::Io(_) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, PetDirError>;
