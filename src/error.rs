use crate::models::Collection;

#[derive(Debug, thiserror::Error)]
pub enum FinanceError {
    #[error("User not authenticated")]
    NotAuthenticated,

    #[error("No {collection} with id {id}")]
    NotFound { collection: Collection, id: i64 },

    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    Store(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, FinanceError>;
