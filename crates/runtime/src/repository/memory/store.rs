//! In-memory versioned store.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::repository::error::{RepositoryError, Result};
use crate::repository::traits::Store;
use crate::repository::types::{
    AtomicOp, Check, CommitOutcome, Mutation, StoreKey, StoreValue, Versioned, Versionstamp,
};

struct Entry {
    value: StoreValue,
    version: Versionstamp,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

#[derive(Default)]
struct Inner {
    entries: HashMap<StoreKey, Entry>,
    watchers: HashMap<StoreKey, watch::Sender<Option<StoreValue>>>,
    version: Versionstamp,
}

impl Inner {
    fn live(&self, key: &StoreKey, now: Instant) -> Option<&Entry> {
        self.entries.get(key).filter(|entry| entry.is_live(now))
    }

    fn check(&self, check: &Check, now: Instant) -> bool {
        self.live(&check.key, now).map(|entry| entry.version) == check.version
    }

    fn notify(&mut self, key: &StoreKey, value: Option<StoreValue>) {
        if let Some(sender) = self.watchers.get(key) {
            sender.send_replace(value);
            if sender.is_closed() {
                self.watchers.remove(key);
            }
        }
    }
}

/// In-memory [`Store`] for tests and the demo client.
///
/// Thread-safe but not persistent across process restarts. Expired entries
/// are treated as absent and dropped on the next write touching them; watchers
/// are not notified of expiry.
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> Result<usize> {
        let inner = self.inner.read().map_err(|_| RepositoryError::LockPoisoned)?;
        let now = Instant::now();
        Ok(inner.entries.values().filter(|entry| entry.is_live(now)).count())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn read(&self, key: &StoreKey) -> Result<Option<Versioned<StoreValue>>> {
        let inner = self.inner.read().map_err(|_| RepositoryError::LockPoisoned)?;

        Ok(inner.live(key, Instant::now()).map(|entry| Versioned {
            value: entry.value.clone(),
            version: entry.version,
        }))
    }

    async fn commit(&self, op: AtomicOp) -> Result<CommitOutcome> {
        let mut inner = self.inner.write().map_err(|_| RepositoryError::LockPoisoned)?;
        let now = Instant::now();

        if let Some(failed) = op.checks.iter().find(|check| !inner.check(check, now)) {
            tracing::debug!(target: "repository", key = %failed.key, "commit check failed");
            return Ok(CommitOutcome::Conflict);
        }

        inner.version += 1;
        let version = inner.version;

        for mutation in op.mutations {
            match mutation {
                Mutation::Set { key, value, ttl } => {
                    inner.notify(&key, Some(value.clone()));
                    inner.entries.insert(
                        key,
                        Entry {
                            value,
                            version,
                            expires_at: ttl.map(|ttl| now + ttl),
                        },
                    );
                }
                Mutation::Delete { key } => {
                    inner.entries.remove(&key);
                    inner.notify(&key, None);
                }
            }
        }

        Ok(CommitOutcome::Committed { version })
    }

    fn watch(&self, key: &StoreKey) -> Result<watch::Receiver<Option<StoreValue>>> {
        let mut inner = self.inner.write().map_err(|_| RepositoryError::LockPoisoned)?;
        let current = inner
            .live(key, Instant::now())
            .map(|entry| entry.value.clone());

        let sender = inner
            .watchers
            .entry(key.clone())
            .or_insert_with(|| watch::channel(None).0);
        sender.send_replace(current);

        Ok(sender.subscribe())
    }
}
