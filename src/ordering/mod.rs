//! Sibling order maintenance.
//!
//! Modules under a course and lessons under a module carry an `order_index`. For every
//! parent the children's orders are exactly `0..N-1`. All mutations go through this module
//! and run in one transaction against a [`SiblingStore`].

mod error;
pub use error::{OrderError, OrderResult};

mod plan;
pub use plan::{
    InsertPlan, OrderUpdate, Sibling, plan_compact, plan_delete, plan_insert, plan_move,
    plan_transfer,
};

mod postgres;
pub use postgres::{PgSiblingStore, PgSiblingTx};

mod service;
pub use service::{OrderService, close_gap, compact, finish, open_slot, relocate};

mod store;
pub use store::{SiblingInsert, SiblingLevel, SiblingStore, SiblingTx};

#[cfg(test)]
pub(crate) mod memory;
