use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::model::error::DatabaseResult;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Lazily connected postgres pool shared by the repositories and the order service.
#[derive(Debug, Clone)]
pub struct DbConnection {
    pool: PgPool,
}

impl DbConnection {
    pub fn connect(connection_str: &str, max_connections: u32) -> DatabaseResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(connection_str)?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}
