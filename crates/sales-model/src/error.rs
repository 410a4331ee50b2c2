use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid schema profile '{name}': {reason}")]
    InvalidProfile { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
