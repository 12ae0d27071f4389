use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    model::{DatabaseResult, ResourceType},
    ordering::{OrderUpdate, Sibling},
};

/// Which sibling sets an operation works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiblingLevel {
    /// Modules under a course
    Module,
    /// Lessons under a module
    Lesson,
}

impl SiblingLevel {
    pub fn resource_type(self) -> ResourceType {
        match self {
            Self::Module => ResourceType::Module,
            Self::Lesson => ResourceType::Lesson,
        }
    }

    pub fn parent_resource_type(self) -> ResourceType {
        match self {
            Self::Module => ResourceType::Course,
            Self::Lesson => ResourceType::Module,
        }
    }

    pub(crate) fn table(self) -> &'static str {
        match self {
            Self::Module => "modules",
            Self::Lesson => "lessons",
        }
    }

    pub(crate) fn parent_table(self) -> &'static str {
        match self {
            Self::Module => "courses",
            Self::Lesson => "modules",
        }
    }

    pub(crate) fn parent_column(self) -> &'static str {
        match self {
            Self::Module => "course_id",
            Self::Lesson => "module_id",
        }
    }
}

/// One atomic unit of work against the ordered-sibling store.
///
/// Nothing written through a transaction is visible to others until [`SiblingTx::commit`];
/// dropping or rolling back discards every write.
#[async_trait]
pub trait SiblingTx: Send {
    /// Locks the parent for the rest of the transaction. Returns `false` if it does not exist.
    async fn lock_parent(&mut self, level: SiblingLevel, parent_id: Uuid) -> DatabaseResult<bool>;

    async fn find_sibling(&mut self, level: SiblingLevel, id: Uuid)
    -> DatabaseResult<Option<Sibling>>;

    /// Children of `parent_id`, sorted by order.
    async fn list_siblings(
        &mut self,
        level: SiblingLevel,
        parent_id: Uuid,
    ) -> DatabaseResult<Vec<Sibling>>;

    async fn write_position(&mut self, level: SiblingLevel, update: &OrderUpdate)
    -> DatabaseResult<()>;

    /// Removes the record together with its own children.
    async fn remove(&mut self, level: SiblingLevel, id: Uuid) -> DatabaseResult<()>;

    async fn commit(self) -> DatabaseResult<()>
    where
        Self: Sized;

    async fn rollback(self) -> DatabaseResult<()>
    where
        Self: Sized;
}

#[async_trait]
pub trait SiblingStore: Send + Sync {
    type Tx: SiblingTx;

    async fn begin(&self) -> DatabaseResult<Self::Tx>;
}

/// A new record that is written into a slot opened by the order service.
#[async_trait]
pub trait SiblingInsert<T: SiblingTx>: Send {
    type Output: Send;

    fn level(&self) -> SiblingLevel;

    fn parent_id(&self) -> Uuid;

    /// `None` appends after the last sibling.
    fn requested_order(&self) -> Option<i32>;

    async fn insert(self, tx: &mut T, order_index: i32) -> DatabaseResult<Self::Output>;
}
