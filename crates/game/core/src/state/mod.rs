//! Persisted records the battle stack reads and writes.
//!
//! These are plain data: the runtime owns persistence and concurrency
//! control, game rules live in [`crate::stats`], [`crate::battle`] and
//! [`crate::tower`].

mod character;
mod inventory;

pub use character::{Character, CharacterId};
pub use inventory::{Inventory, InventoryId, Party};
