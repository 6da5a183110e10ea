//! Repository layer for dynamic runtime data.
//!
//! One [`Store`] interface (`read`, `commit`, `watch`) backs every write the
//! tower makes. Writes are optimistic: callers read a [`Versioned`] value,
//! build an [`AtomicOp`] that checks the versions they read, and retry on
//! [`CommitOutcome::Conflict`].

mod error;
mod memory;
mod traits;
mod types;

pub use error::RepositoryError;
pub use memory::InMemoryStore;
pub use traits::Store;
pub use types::{
    AtomicOp, BattleState, Check, CommitOutcome, Mutation, StoreKey, StoreValue, Versioned,
    Versionstamp,
};
