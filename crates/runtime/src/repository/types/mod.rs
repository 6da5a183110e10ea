//! Keys, values and atomic operations understood by every [`Store`](super::Store).

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use gacha_core::{Character, CharacterId, Inventory, InventoryId};

/// Monotonic version assigned to a key on every committed write.
pub type Versionstamp = u64;

/// Addressable record in the store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StoreKey {
    Inventory(InventoryId),
    Character(CharacterId),
    /// Live battle flag, keyed by battle id.
    Battle(String),
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKey::Inventory(id) => write!(f, "inventories/{id}"),
            StoreKey::Character(id) => write!(f, "characters/{id}"),
            StoreKey::Battle(id) => write!(f, "battles/{id}"),
        }
    }
}

/// Playback state of a running battle. Deleting it skips the battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleState {
    pub playing: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StoreValue {
    Inventory(Inventory),
    Character(Character),
    Battle(BattleState),
}

impl StoreValue {
    pub const fn kind(&self) -> &'static str {
        match self {
            StoreValue::Inventory(_) => "inventory",
            StoreValue::Character(_) => "character",
            StoreValue::Battle(_) => "battle",
        }
    }
}

/// A value together with the version it was read at.
#[derive(Clone, Debug, PartialEq)]
pub struct Versioned<T> {
    pub value: T,
    pub version: Versionstamp,
}

/// Precondition of an [`AtomicOp`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Check {
    pub key: StoreKey,
    /// Expected version, `None` when the key must be absent.
    pub version: Option<Versionstamp>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Mutation {
    Set {
        key: StoreKey,
        value: StoreValue,
        ttl: Option<Duration>,
    },
    Delete {
        key: StoreKey,
    },
}

/// All-or-nothing write: every check must hold for any mutation to apply.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AtomicOp {
    pub checks: Vec<Check>,
    pub mutations: Vec<Mutation>,
}

impl AtomicOp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(mut self, key: StoreKey, version: Option<Versionstamp>) -> Self {
        self.checks.push(Check { key, version });
        self
    }

    pub fn set(mut self, key: StoreKey, value: StoreValue) -> Self {
        self.mutations.push(Mutation::Set {
            key,
            value,
            ttl: None,
        });
        self
    }

    pub fn set_with_ttl(mut self, key: StoreKey, value: StoreValue, ttl: Duration) -> Self {
        self.mutations.push(Mutation::Set {
            key,
            value,
            ttl: Some(ttl),
        });
        self
    }

    pub fn delete(mut self, key: StoreKey) -> Self {
        self.mutations.push(Mutation::Delete { key });
        self
    }

    /// Checks and stores an inventory read earlier.
    pub fn update_inventory(self, read: Versioned<Inventory>) -> Self {
        let key = StoreKey::Inventory(read.value.id.clone());
        self.check(key.clone(), Some(read.version))
            .set(key, StoreValue::Inventory(read.value))
    }

    /// Checks and stores a character read earlier.
    pub fn update_character(self, read: Versioned<Character>) -> Self {
        let key = StoreKey::Character(read.value.id.clone());
        self.check(key.clone(), Some(read.version))
            .set(key, StoreValue::Character(read.value))
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty() && self.mutations.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed { version: Versionstamp },
    /// A check failed; nothing was written.
    Conflict,
}

impl CommitOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitOutcome::Committed { .. })
    }
}
