//! Pure order planning.
//!
//! Every plan assigns positions by sequence rather than by arithmetic on the stored
//! values, so a sibling set that was left sparse or duplicated is healed by the next
//! operation touching it. Plans validate before producing a single write.

use uuid::Uuid;

use crate::ordering::{OrderError, OrderResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct Sibling {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub order_index: i32,
}

/// A single positional write: the record ends up under `parent_id` at `order_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderUpdate {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub order_index: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertPlan {
    pub order_index: i32,
    pub updates: Vec<OrderUpdate>,
}

fn count(siblings: &[Sibling]) -> i32 {
    siblings.len() as i32
}

/// `None` marks the slot reserved for a record that does not exist yet.
fn renumber<'a, I>(sequence: I, parent_id: Uuid) -> Vec<OrderUpdate>
where
    I: IntoIterator<Item = Option<&'a Sibling>>,
{
    sequence
        .into_iter()
        .enumerate()
        .filter_map(|(position, sibling)| {
            let sibling = sibling?;
            let order_index = position as i32;
            (sibling.order_index != order_index || sibling.parent_id != parent_id).then_some(
                OrderUpdate {
                    id: sibling.id,
                    parent_id,
                    order_index,
                },
            )
        })
        .collect()
}

fn check_range(requested: i32, max: i32) -> OrderResult<()> {
    if (0..=max).contains(&requested) {
        Ok(())
    } else {
        Err(OrderError::invalid_order(requested, max))
    }
}

/// Opens a slot at `requested` (append when `None`).
pub fn plan_insert(
    parent_id: Uuid,
    siblings: &[Sibling],
    requested: Option<i32>,
) -> OrderResult<InsertPlan> {
    let max = count(siblings);
    let order_index = requested.unwrap_or(max);
    check_range(order_index, max)?;

    let mut sequence: Vec<Option<&Sibling>> = siblings.iter().map(Some).collect();
    sequence.insert(order_index as usize, None);

    Ok(InsertPlan {
        order_index,
        updates: renumber(sequence, parent_id),
    })
}

/// Closes the gap left by `removed`. The removed record itself is never written.
pub fn plan_delete(parent_id: Uuid, siblings: &[Sibling], removed: Uuid) -> Vec<OrderUpdate> {
    renumber(
        siblings.iter().filter(|s| s.id != removed).map(Some),
        parent_id,
    )
}

/// Moves `moving` to `new_order` inside its own sibling set.
pub fn plan_move(
    siblings: &[Sibling],
    moving: &Sibling,
    new_order: i32,
) -> OrderResult<Vec<OrderUpdate>> {
    let rest: Vec<&Sibling> = siblings.iter().filter(|s| s.id != moving.id).collect();
    check_range(new_order, rest.len() as i32)?;

    let mut sequence: Vec<Option<&Sibling>> = rest.into_iter().map(Some).collect();
    sequence.insert(new_order as usize, Some(moving));

    Ok(renumber(sequence, moving.parent_id))
}

/// Re-parents `moving` under `new_parent` at `new_order` (append when `None`), closing the
/// gap in the source set and opening one in the destination set.
pub fn plan_transfer(
    source: &[Sibling],
    destination: &[Sibling],
    moving: &Sibling,
    new_parent: Uuid,
    new_order: Option<i32>,
) -> OrderResult<Vec<OrderUpdate>> {
    let mut target: Vec<Option<&Sibling>> = destination
        .iter()
        .filter(|s| s.id != moving.id)
        .map(Some)
        .collect();
    let max = target.len() as i32;
    let order_index = new_order.unwrap_or(max);
    check_range(order_index, max)?;
    target.insert(order_index as usize, Some(moving));

    let mut updates = plan_delete(moving.parent_id, source, moving.id);
    updates.extend(renumber(target, new_parent));
    Ok(updates)
}

/// Rewrites a sibling set to `0..N-1`, keeping its current relative sequence.
pub fn plan_compact(parent_id: Uuid, siblings: &[Sibling]) -> Vec<OrderUpdate> {
    renumber(siblings.iter().map(Some), parent_id)
}

#[cfg(test)]
mod test {
    use super::*;

    fn siblings(parent_id: Uuid, n: usize) -> Vec<Sibling> {
        (0..n)
            .map(|i| Sibling {
                id: Uuid::new_v4(),
                parent_id,
                order_index: i as i32,
            })
            .collect()
    }

    /// Applies updates and returns the ids of `parent_id`'s children sorted by order.
    fn apply(rows: &[Sibling], updates: &[OrderUpdate], parent_id: Uuid) -> Vec<(Uuid, i32)> {
        let mut rows = rows.to_vec();
        for update in updates {
            let row = rows.iter_mut().find(|r| r.id == update.id).unwrap();
            row.parent_id = update.parent_id;
            row.order_index = update.order_index;
        }
        let mut children: Vec<(Uuid, i32)> = rows
            .into_iter()
            .filter(|r| r.parent_id == parent_id)
            .map(|r| (r.id, r.order_index))
            .collect();
        children.sort_by_key(|(_, order)| *order);
        children
    }

    #[test]
    fn test_insert_at_end_shifts_nothing() {
        let parent = Uuid::new_v4();
        let rows = siblings(parent, 3);

        let plan = plan_insert(parent, &rows, Some(3)).unwrap();
        assert_eq!(plan.order_index, 3);
        assert!(plan.updates.is_empty());

        let plan = plan_insert(parent, &rows, None).unwrap();
        assert_eq!(plan.order_index, 3);
        assert!(plan.updates.is_empty());
    }

    #[test]
    fn test_insert_collision_shifts_tail() {
        let parent = Uuid::new_v4();
        let rows = siblings(parent, 3);

        let plan = plan_insert(parent, &rows, Some(1)).unwrap();
        assert_eq!(plan.order_index, 1);
        assert_eq!(
            plan.updates,
            vec![
                OrderUpdate { id: rows[1].id, parent_id: parent, order_index: 2 },
                OrderUpdate { id: rows[2].id, parent_id: parent, order_index: 3 },
            ]
        );
    }

    #[test]
    fn test_insert_into_empty_set() {
        let plan = plan_insert(Uuid::new_v4(), &[], None).unwrap();
        assert_eq!(plan.order_index, 0);
        assert!(plan.updates.is_empty());
    }

    #[test]
    fn test_insert_out_of_range() {
        let parent = Uuid::new_v4();
        let rows = siblings(parent, 2);

        assert!(matches!(
            plan_insert(parent, &rows, Some(3)),
            Err(OrderError::InvalidOrder { requested: 3, max: 2 })
        ));
        assert!(matches!(
            plan_insert(parent, &rows, Some(-1)),
            Err(OrderError::InvalidOrder { requested: -1, .. })
        ));
    }

    #[test]
    fn test_delete_compacts() {
        let parent = Uuid::new_v4();
        let rows = siblings(parent, 4);

        let updates = plan_delete(parent, &rows, rows[1].id);
        let remaining: Vec<Sibling> = rows.iter().copied().filter(|r| r.id != rows[1].id).collect();
        let result = apply(&remaining, &updates, parent);

        assert_eq!(
            result,
            vec![(rows[0].id, 0), (rows[2].id, 1), (rows[3].id, 2)]
        );
    }

    #[test]
    fn test_delete_last_writes_nothing() {
        let parent = Uuid::new_v4();
        let rows = siblings(parent, 3);
        assert!(plan_delete(parent, &rows, rows[2].id).is_empty());
    }

    #[test]
    fn test_move_upward() {
        let parent = Uuid::new_v4();
        let rows = siblings(parent, 4); // A, B, C, D

        let updates = plan_move(&rows, &rows[0], 2).unwrap();
        let result = apply(&rows, &updates, parent);

        assert_eq!(
            result,
            vec![(rows[1].id, 0), (rows[2].id, 1), (rows[0].id, 2), (rows[3].id, 3)]
        );
        // D is untouched
        assert!(updates.iter().all(|u| u.id != rows[3].id));
    }

    #[test]
    fn test_move_downward() {
        let parent = Uuid::new_v4();
        let rows = siblings(parent, 4);

        let updates = plan_move(&rows, &rows[3], 1).unwrap();
        let result = apply(&rows, &updates, parent);

        assert_eq!(
            result,
            vec![(rows[0].id, 0), (rows[3].id, 1), (rows[1].id, 2), (rows[2].id, 3)]
        );
    }

    #[test]
    fn test_move_in_place_is_noop() {
        let parent = Uuid::new_v4();
        let rows = siblings(parent, 3);
        assert!(plan_move(&rows, &rows[1], 1).unwrap().is_empty());
    }

    #[test]
    fn test_move_out_of_range() {
        let parent = Uuid::new_v4();
        let rows = siblings(parent, 3);
        assert!(matches!(
            plan_move(&rows, &rows[0], 3),
            Err(OrderError::InvalidOrder { requested: 3, max: 2 })
        ));
    }

    #[test]
    fn test_transfer_between_parents() {
        let x = Uuid::new_v4();
        let y = Uuid::new_v4();
        let source = siblings(x, 3);
        let destination = siblings(y, 2);

        let updates = plan_transfer(&source, &destination, &source[1], y, Some(0)).unwrap();
        let all: Vec<Sibling> = source.iter().chain(destination.iter()).copied().collect();

        assert_eq!(
            apply(&all, &updates, x),
            vec![(source[0].id, 0), (source[2].id, 1)]
        );
        assert_eq!(
            apply(&all, &updates, y),
            vec![(source[1].id, 0), (destination[0].id, 1), (destination[1].id, 2)]
        );
    }

    #[test]
    fn test_transfer_appends_by_default() {
        let x = Uuid::new_v4();
        let y = Uuid::new_v4();
        let source = siblings(x, 1);
        let destination = siblings(y, 2);

        let updates = plan_transfer(&source, &destination, &source[0], y, None).unwrap();
        assert_eq!(
            updates,
            vec![OrderUpdate { id: source[0].id, parent_id: y, order_index: 2 }]
        );
    }

    #[test]
    fn test_transfer_out_of_range() {
        let x = Uuid::new_v4();
        let y = Uuid::new_v4();
        let source = siblings(x, 2);
        let destination = siblings(y, 2);

        assert!(matches!(
            plan_transfer(&source, &destination, &source[0], y, Some(3)),
            Err(OrderError::InvalidOrder { requested: 3, max: 2 })
        ));
    }

    #[test]
    fn test_compact_heals_sparse_set() {
        let parent = Uuid::new_v4();
        // legacy one-based data with a hole
        let rows: Vec<Sibling> = [1, 2, 5]
            .into_iter()
            .map(|order_index| Sibling { id: Uuid::new_v4(), parent_id: parent, order_index })
            .collect();

        let updates = plan_compact(parent, &rows);
        assert_eq!(
            apply(&rows, &updates, parent),
            vec![(rows[0].id, 0), (rows[1].id, 1), (rows[2].id, 2)]
        );
    }
}
