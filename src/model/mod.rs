mod database;
pub use database::{DEFAULT_MAX_CONNECTIONS, DbConnection};

pub mod entity;

mod error;
pub use error::{DatabaseError, DatabaseResult};

mod repo;
pub use repo::{CrudRepository, Page, PaginatableRepository, ResourceType, ResourceTyped};

use sqlx::PgPool;

use crate::ordering::{OrderService, PgSiblingStore};

#[derive(Debug, Clone)]
pub struct ModelManager {
    database: DbConnection,
    ordering: OrderService<PgSiblingStore>,
}

impl ModelManager {
    pub fn new(conn: DbConnection) -> Self {
        let ordering = OrderService::new(PgSiblingStore::new(conn.pool().clone()));
        Self {
            database: conn,
            ordering,
        }
    }

    pub fn executor(&self) -> &PgPool {
        self.database.pool()
    }

    pub fn ordering(&self) -> &OrderService<PgSiblingStore> {
        &self.ordering
    }
}
