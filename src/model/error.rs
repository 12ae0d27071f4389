use thiserror::Error;
use uuid::Uuid;

use crate::ordering::OrderError;

pub type DatabaseResult<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("sqlx migrate error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("sqlx error: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("json error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("record {id} was moved to another parent by a concurrent transaction")]
    SiblingMoved { id: Uuid },
    #[error("ordering error: {0}")]
    OrderingError(Box<OrderError>),
}

impl From<OrderError> for DatabaseError {
    fn from(value: OrderError) -> Self {
        Self::OrderingError(Box::new(value))
    }
}
