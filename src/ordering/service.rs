use tracing::debug;
use uuid::Uuid;

use crate::{
    error::log_error,
    model::DatabaseError,
    ordering::{
        OrderError, OrderResult, OrderUpdate, Sibling, SiblingInsert, SiblingLevel, SiblingStore,
        SiblingTx, plan,
    },
};

fn reject_negative(order: Option<i32>) -> OrderResult<()> {
    match order {
        Some(requested) if requested < 0 => Err(OrderError::invalid_order(requested, 0)),
        _ => Ok(()),
    }
}

async fn write_all<T: SiblingTx>(
    tx: &mut T,
    level: SiblingLevel,
    updates: &[OrderUpdate],
) -> OrderResult<()> {
    for update in updates {
        tx.write_position(level, update).await?;
    }
    Ok(())
}

async fn lock_parent<T: SiblingTx>(
    tx: &mut T,
    level: SiblingLevel,
    parent_id: Uuid,
) -> OrderResult<()> {
    if tx.lock_parent(level, parent_id).await? {
        Ok(())
    } else {
        Err(OrderError::not_found(level.parent_resource_type(), parent_id))
    }
}

/// Reads the record, locks its parent (and `other_parent`, in id order) and reads it again
/// under the lock.
async fn locate<T: SiblingTx>(
    tx: &mut T,
    level: SiblingLevel,
    id: Uuid,
    other_parent: Option<Uuid>,
) -> OrderResult<Sibling> {
    let not_found = || OrderError::not_found(level.resource_type(), id);
    let found = tx.find_sibling(level, id).await?.ok_or_else(not_found)?;

    let mut parents = vec![found.parent_id];
    parents.extend(other_parent.filter(|p| *p != found.parent_id));
    parents.sort();
    for parent_id in parents {
        lock_parent(tx, level, parent_id).await?;
    }

    let current = tx.find_sibling(level, id).await?.ok_or_else(not_found)?;
    if current.parent_id != found.parent_id {
        return Err(DatabaseError::SiblingMoved { id }.into());
    }
    Ok(current)
}

/// Locks `parent_id` and shifts its children so that `requested` is free.
/// Returns the order the new record must be written with.
pub async fn open_slot<T: SiblingTx>(
    tx: &mut T,
    level: SiblingLevel,
    parent_id: Uuid,
    requested: Option<i32>,
) -> OrderResult<i32> {
    reject_negative(requested)?;
    lock_parent(tx, level, parent_id).await?;

    let siblings = tx.list_siblings(level, parent_id).await?;
    let plan = plan::plan_insert(parent_id, &siblings, requested)?;
    debug!(
        ?level,
        %parent_id,
        order_index = plan.order_index,
        shifted = plan.updates.len(),
        "opening slot"
    );
    write_all(tx, level, &plan.updates).await?;
    Ok(plan.order_index)
}

/// Removes the record (and its children) and closes the gap among its siblings.
pub async fn close_gap<T: SiblingTx>(
    tx: &mut T,
    level: SiblingLevel,
    id: Uuid,
) -> OrderResult<Sibling> {
    let removed = locate(tx, level, id, None).await?;
    let siblings = tx.list_siblings(level, removed.parent_id).await?;

    tx.remove(level, id).await?;
    let updates = plan::plan_delete(removed.parent_id, &siblings, id);
    debug!(?level, %id, shifted = updates.len(), "closing gap");
    write_all(tx, level, &updates).await?;
    Ok(removed)
}

/// Moves the record to `new_order` under `new_parent` (its own parent when `None`).
///
/// Inside the same parent a `None` order leaves the record where it is; across parents it
/// appends.
pub async fn relocate<T: SiblingTx>(
    tx: &mut T,
    level: SiblingLevel,
    id: Uuid,
    new_order: Option<i32>,
    new_parent: Option<Uuid>,
) -> OrderResult<Sibling> {
    reject_negative(new_order)?;
    let moving = locate(tx, level, id, new_parent).await?;
    let destination = new_parent.unwrap_or(moving.parent_id);
    let source = tx.list_siblings(level, moving.parent_id).await?;

    let updates = if destination == moving.parent_id {
        match new_order {
            Some(new_order) => plan::plan_move(&source, &moving, new_order)?,
            None => return Ok(moving),
        }
    } else {
        let target = tx.list_siblings(level, destination).await?;
        plan::plan_transfer(&source, &target, &moving, destination, new_order)?
    };

    debug!(?level, %id, %destination, shifted = updates.len(), "relocating");
    write_all(tx, level, &updates).await?;

    Ok(updates
        .iter()
        .find(|u| u.id == id)
        .map(|u| Sibling {
            id,
            parent_id: u.parent_id,
            order_index: u.order_index,
        })
        .unwrap_or(moving))
}

/// Rewrites the children of `parent_id` to `0..N-1`. Returns the number of rows rewritten.
pub async fn compact<T: SiblingTx>(
    tx: &mut T,
    level: SiblingLevel,
    parent_id: Uuid,
) -> OrderResult<usize> {
    lock_parent(tx, level, parent_id).await?;
    let siblings = tx.list_siblings(level, parent_id).await?;
    let updates = plan::plan_compact(parent_id, &siblings);
    write_all(tx, level, &updates).await?;
    Ok(updates.len())
}

/// Commits on success, rolls back on failure. The original error wins over a failed rollback.
pub async fn finish<T: SiblingTx, V>(tx: T, result: OrderResult<V>) -> OrderResult<V> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                log_error(&rollback);
            }
            Err(e)
        }
    }
}

/// Keeps sibling orders dense under insert, delete and move.
/// Each call runs in its own transaction.
#[derive(Debug, Clone)]
pub struct OrderService<S> {
    store: S,
}

impl<S: SiblingStore> OrderService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn begin(&self) -> OrderResult<S::Tx> {
        Ok(self.store.begin().await?)
    }

    #[tracing::instrument(skip_all, fields(level = ?record.level(), parent_id = %record.parent_id()))]
    pub async fn insert_with_order<R>(&self, record: R) -> OrderResult<R::Output>
    where
        R: SiblingInsert<S::Tx>,
    {
        reject_negative(record.requested_order())?;
        let mut tx = self.begin().await?;
        let result = insert_in(&mut tx, record).await;
        finish(tx, result).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_and_compact(&self, level: SiblingLevel, id: Uuid) -> OrderResult<Sibling> {
        let mut tx = self.begin().await?;
        let result = close_gap(&mut tx, level, id).await;
        finish(tx, result).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn move_to(
        &self,
        level: SiblingLevel,
        id: Uuid,
        new_order: i32,
        new_parent: Option<Uuid>,
    ) -> OrderResult<Sibling> {
        reject_negative(Some(new_order))?;
        let mut tx = self.begin().await?;
        let result = relocate(&mut tx, level, id, Some(new_order), new_parent).await;
        finish(tx, result).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn normalize(&self, level: SiblingLevel, parent_id: Uuid) -> OrderResult<usize> {
        let mut tx = self.begin().await?;
        let result = compact(&mut tx, level, parent_id).await;
        finish(tx, result).await
    }
}

async fn insert_in<T, R>(tx: &mut T, record: R) -> OrderResult<R::Output>
where
    T: SiblingTx,
    R: SiblingInsert<T>,
{
    let order_index = open_slot(tx, record.level(), record.parent_id(), record.requested_order()).await?;
    Ok(record.insert(tx, order_index).await?)
}
