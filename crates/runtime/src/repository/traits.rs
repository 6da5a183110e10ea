//! Store contract shared by every persistence backend.

use async_trait::async_trait;
use tokio::sync::watch;

use gacha_core::{Character, CharacterId, Inventory, InventoryId};

use super::error::{RepositoryError, Result};
use super::types::{AtomicOp, CommitOutcome, StoreKey, StoreValue, Versioned};

/// Versioned key-value store with atomic conditional commits.
///
/// This is for DYNAMIC data that changes during play:
/// - inventories and characters (progression, keys, floors)
/// - live battle flags (with a time-to-live)
#[async_trait]
pub trait Store: Send + Sync {
    /// Current value of `key`, `None` if absent or expired.
    async fn read(&self, key: &StoreKey) -> Result<Option<Versioned<StoreValue>>>;

    /// Applies `op` if all of its checks hold.
    async fn commit(&self, op: AtomicOp) -> Result<CommitOutcome>;

    /// Subscribes to changes of `key`. The receiver starts at the current value
    /// and sees `None` once the key is deleted.
    fn watch(&self, key: &StoreKey) -> Result<watch::Receiver<Option<StoreValue>>>;

    async fn inventory(&self, id: &InventoryId) -> Result<Option<Versioned<Inventory>>> {
        let key = StoreKey::Inventory(id.clone());
        match self.read(&key).await? {
            None => Ok(None),
            Some(Versioned {
                value: StoreValue::Inventory(inventory),
                version,
            }) => Ok(Some(Versioned {
                value: inventory,
                version,
            })),
            Some(_) => Err(RepositoryError::TypeMismatch {
                key: key.to_string(),
                expected: "inventory",
            }),
        }
    }

    async fn character(&self, id: &CharacterId) -> Result<Option<Versioned<Character>>> {
        let key = StoreKey::Character(id.clone());
        match self.read(&key).await? {
            None => Ok(None),
            Some(Versioned {
                value: StoreValue::Character(character),
                version,
            }) => Ok(Some(Versioned {
                value: character,
                version,
            })),
            Some(_) => Err(RepositoryError::TypeMismatch {
                key: key.to_string(),
                expected: "character",
            }),
        }
    }
}
