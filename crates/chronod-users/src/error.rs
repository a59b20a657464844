use thiserror::Error;

/// All user-store errors. Kept separate from the scheduler's errors so the
/// server can map each layer to response codes without coupling them.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("User already exists: {0}")]
    AlreadyExists(String),

    #[error("Key/value store error: {0}")]
    Backend(#[from] redis::RedisError),
}

pub type Result<T> = std::result::Result<T, UserError>;
