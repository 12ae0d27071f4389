use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    model::DatabaseResult,
    ordering::{OrderUpdate, Sibling, SiblingLevel, SiblingStore, SiblingTx},
};

#[derive(Debug, Clone)]
pub struct PgSiblingStore {
    pool: PgPool,
}

impl PgSiblingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Postgres transaction. Parents are locked with `SELECT ... FOR UPDATE`, which serializes
/// every order mutation under the same parent until commit.
pub struct PgSiblingTx {
    tx: Transaction<'static, Postgres>,
}

impl PgSiblingTx {
    /// Connection of the open transaction, for entity writes that must commit with the
    /// order changes.
    pub fn connection(&mut self) -> &mut PgConnection {
        &mut self.tx
    }
}

#[async_trait]
impl SiblingStore for PgSiblingStore {
    type Tx = PgSiblingTx;

    async fn begin(&self) -> DatabaseResult<PgSiblingTx> {
        let tx = self.pool.begin().await?;
        Ok(PgSiblingTx { tx })
    }
}

#[async_trait]
impl SiblingTx for PgSiblingTx {
    async fn lock_parent(&mut self, level: SiblingLevel, parent_id: Uuid) -> DatabaseResult<bool> {
        let sql = format!(
            "SELECT id FROM {} WHERE id = $1 FOR UPDATE",
            level.parent_table()
        );
        let found: Option<Uuid> = sqlx::query_scalar(&sql)
            .bind(parent_id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(found.is_some())
    }

    async fn find_sibling(
        &mut self,
        level: SiblingLevel,
        id: Uuid,
    ) -> DatabaseResult<Option<Sibling>> {
        let sql = format!(
            "SELECT id, {} AS parent_id, order_index FROM {} WHERE id = $1",
            level.parent_column(),
            level.table()
        );
        let sibling = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(sibling)
    }

    async fn list_siblings(
        &mut self,
        level: SiblingLevel,
        parent_id: Uuid,
    ) -> DatabaseResult<Vec<Sibling>> {
        let sql = format!(
            "SELECT id, {parent} AS parent_id, order_index FROM {table} WHERE {parent} = $1 ORDER BY order_index, id",
            parent = level.parent_column(),
            table = level.table()
        );
        let siblings = sqlx::query_as(&sql)
            .bind(parent_id)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(siblings)
    }

    async fn write_position(
        &mut self,
        level: SiblingLevel,
        update: &OrderUpdate,
    ) -> DatabaseResult<()> {
        let sql = format!(
            "UPDATE {} SET {} = $1, order_index = $2, updated_at = now() WHERE id = $3",
            level.table(),
            level.parent_column()
        );
        let result = sqlx::query(&sql)
            .bind(update.parent_id)
            .bind(update.order_index)
            .bind(update.id)
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound.into());
        }
        Ok(())
    }

    async fn remove(&mut self, level: SiblingLevel, id: Uuid) -> DatabaseResult<()> {
        // lesson writers lock the module row before their lessons, so take it first
        if level == SiblingLevel::Module {
            self.lock_parent(SiblingLevel::Lesson, id).await?;
            sqlx::query("DELETE FROM lessons WHERE module_id = $1")
                .bind(id)
                .execute(&mut *self.tx)
                .await?;
        }

        let sql = format!("DELETE FROM {} WHERE id = $1", level.table());
        sqlx::query(&sql).bind(id).execute(&mut *self.tx).await?;
        Ok(())
    }

    async fn commit(self) -> DatabaseResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> DatabaseResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
