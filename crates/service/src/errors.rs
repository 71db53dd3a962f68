use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn storage(e: impl std::fmt::Display) -> Self { Self::Storage(e.to_string()) }

    pub fn duplicate_id(id: &str) -> Self { Self::Conflict(format!("item with id '{}' already exists", id)) }
}
