//! In-memory sibling store with write-failure injection.
//!
//! A transaction holds the store lock from `begin` until commit or drop, so transactions
//! are fully serialized. Writes go to a private copy that replaces the shared state on commit.

use std::collections::HashSet;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::{
    model::{DatabaseError, DatabaseResult},
    ordering::{OrderUpdate, Sibling, SiblingInsert, SiblingLevel, SiblingStore, SiblingTx},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryState {
    courses: HashSet<Uuid>,
    modules: Vec<Sibling>,
    lessons: Vec<Sibling>,
}

impl MemoryState {
    fn rows(&self, level: SiblingLevel) -> &Vec<Sibling> {
        match level {
            SiblingLevel::Module => &self.modules,
            SiblingLevel::Lesson => &self.lessons,
        }
    }

    fn rows_mut(&mut self, level: SiblingLevel) -> &mut Vec<Sibling> {
        match level {
            SiblingLevel::Module => &mut self.modules,
            SiblingLevel::Lesson => &mut self.lessons,
        }
    }

    fn children(&self, level: SiblingLevel, parent_id: Uuid) -> Vec<Sibling> {
        let mut children: Vec<Sibling> = self
            .rows(level)
            .iter()
            .copied()
            .filter(|s| s.parent_id == parent_id)
            .collect();
        children.sort_by_key(|s| (s.order_index, s.id));
        children
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    // 1-based index of the write_position call that fails, 0 disables
    fail_on_write: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on_write(&self, nth: usize) {
        self.fail_on_write.store(nth, Ordering::SeqCst);
    }

    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }

    pub async fn add_course(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().await.courses.insert(id);
        id
    }

    /// Seeds `n` children with contiguous orders after any existing ones.
    pub async fn add_children(&self, level: SiblingLevel, parent_id: Uuid, n: usize) -> Vec<Uuid> {
        self.add_children_at(level, parent_id, &vec![None; n]).await
    }

    /// Seeds children with explicit orders (`None` continues after the previous one).
    pub async fn add_children_at(
        &self,
        level: SiblingLevel,
        parent_id: Uuid,
        orders: &[Option<i32>],
    ) -> Vec<Uuid> {
        let mut state = self.state.lock().await;
        let mut next = state.children(level, parent_id).len() as i32;
        orders
            .iter()
            .map(|order| {
                let order_index = order.unwrap_or(next);
                next = order_index + 1;
                let id = Uuid::new_v4();
                state.rows_mut(level).push(Sibling {
                    id,
                    parent_id,
                    order_index,
                });
                id
            })
            .collect()
    }

    /// Children of `parent_id` as `(id, order)` pairs sorted by order.
    pub async fn children(&self, level: SiblingLevel, parent_id: Uuid) -> Vec<(Uuid, i32)> {
        self.state
            .lock()
            .await
            .children(level, parent_id)
            .into_iter()
            .map(|s| (s.id, s.order_index))
            .collect()
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
    writes: usize,
    fail_on_write: usize,
}

#[async_trait]
impl SiblingStore for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> DatabaseResult<MemoryTx> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(MemoryTx {
            guard,
            working,
            writes: 0,
            fail_on_write: self.fail_on_write.load(Ordering::SeqCst),
        })
    }
}

#[async_trait]
impl SiblingTx for MemoryTx {
    async fn lock_parent(&mut self, level: SiblingLevel, parent_id: Uuid) -> DatabaseResult<bool> {
        Ok(match level {
            SiblingLevel::Module => self.working.courses.contains(&parent_id),
            SiblingLevel::Lesson => self.working.modules.iter().any(|m| m.id == parent_id),
        })
    }

    async fn find_sibling(
        &mut self,
        level: SiblingLevel,
        id: Uuid,
    ) -> DatabaseResult<Option<Sibling>> {
        Ok(self.working.rows(level).iter().copied().find(|s| s.id == id))
    }

    async fn list_siblings(
        &mut self,
        level: SiblingLevel,
        parent_id: Uuid,
    ) -> DatabaseResult<Vec<Sibling>> {
        Ok(self.working.children(level, parent_id))
    }

    async fn write_position(
        &mut self,
        level: SiblingLevel,
        update: &OrderUpdate,
    ) -> DatabaseResult<()> {
        self.writes += 1;
        if self.writes == self.fail_on_write {
            return Err(DatabaseError::SqlxError(sqlx::Error::Protocol(format!(
                "injected failure on write #{}",
                self.writes
            ))));
        }

        let row = self
            .working
            .rows_mut(level)
            .iter_mut()
            .find(|s| s.id == update.id)
            .ok_or(DatabaseError::SqlxError(sqlx::Error::RowNotFound))?;
        row.parent_id = update.parent_id;
        row.order_index = update.order_index;
        Ok(())
    }

    async fn remove(&mut self, level: SiblingLevel, id: Uuid) -> DatabaseResult<()> {
        if level == SiblingLevel::Module {
            self.working.lessons.retain(|l| l.parent_id != id);
        }
        self.working.rows_mut(level).retain(|s| s.id != id);
        Ok(())
    }

    async fn commit(self) -> DatabaseResult<()> {
        let MemoryTx {
            mut guard, working, ..
        } = self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self) -> DatabaseResult<()> {
        Ok(())
    }
}

/// Bare sibling used as the inserted record in tests.
#[derive(Debug, Clone, Copy)]
pub struct NewSibling {
    pub level: SiblingLevel,
    pub parent_id: Uuid,
    pub order_index: Option<i32>,
}

#[async_trait]
impl SiblingInsert<MemoryTx> for NewSibling {
    type Output = Sibling;

    fn level(&self) -> SiblingLevel {
        self.level
    }

    fn parent_id(&self) -> Uuid {
        self.parent_id
    }

    fn requested_order(&self) -> Option<i32> {
        self.order_index
    }

    async fn insert(self, tx: &mut MemoryTx, order_index: i32) -> DatabaseResult<Sibling> {
        let sibling = Sibling {
            id: Uuid::new_v4(),
            parent_id: self.parent_id,
            order_index,
        };
        tx.working.rows_mut(self.level).push(sibling);
        Ok(sibling)
    }
}
