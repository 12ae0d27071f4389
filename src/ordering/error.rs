use thiserror::Error;
use uuid::Uuid;

use crate::model::{DatabaseError, ResourceType};

pub type OrderResult<T> = std::result::Result<T, OrderError>;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("{resource_type:?} not found: {id}")]
    NotFound { resource_type: ResourceType, id: Uuid },
    #[error("invalid order {requested}, expected a value in 0..={max}")]
    InvalidOrder { requested: i32, max: i32 },
    #[error("transaction failure: {0}")]
    TransactionFailure(#[from] DatabaseError),
}

impl OrderError {
    pub fn not_found(resource_type: ResourceType, id: Uuid) -> Self {
        Self::NotFound { resource_type, id }
    }

    pub fn invalid_order(requested: i32, max: i32) -> Self {
        Self::InvalidOrder { requested, max }
    }
}

impl From<sqlx::Error> for OrderError {
    fn from(value: sqlx::Error) -> Self {
        Self::TransactionFailure(DatabaseError::SqlxError(value))
    }
}
