use parley_models::DomainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid domain: {0}")]
    Domain(#[from] DomainError),

    #[error("Profile error: {0}")]
    Profile(String),

    #[error("Received {0} before settings")]
    NotStarted(&'static str),

    #[error("Session already started")]
    AlreadyStarted,

    #[error("Session already finished")]
    Finished,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
