//! Shared fixtures for runtime integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::sync::watch;

use battle_runtime::{
    AtomicOp, CommitOutcome, EnemyCandidate, InMemoryStore, Mutation, RepositoryError,
    RuntimeConfig, StaticEnemyPool, Store, StoreKey, StoreValue, TowerRequest, TowerRuntime,
    Versioned,
};
use gacha_core::{
    Character, CharacterCombat, CharacterId, CharacterStats, Inventory, InventoryId, Party,
    SkillSet,
};

pub const GUILD: &str = "guild";

pub fn inventory_id() -> InventoryId {
    InventoryId::new("guild:player")
}

pub fn request() -> TowerRequest {
    TowerRequest::new(GUILD, inventory_id())
}

/// One candidate for every enemy rating.
pub fn enemy_pool() -> StaticEnemyPool {
    StaticEnemyPool::new(
        (1..=5)
            .map(|rating| EnemyCandidate {
                id: CharacterId::new(format!("pack:enemy{rating}")),
                name: format!("Enemy {rating}"),
                rating,
            })
            .collect(),
    )
}

/// Kills any early-floor enemy in one hit and shrugs off its attacks.
pub fn champion(id: &str) -> Character {
    Character::new(CharacterId::new(id), inventory_id(), 5).with_combat(CharacterCombat::new(
        CharacterStats::new(50, 50, 50, 500),
        SkillSet::new(),
    ))
}

/// Dies to the first hit and never outpaces anyone.
pub fn weakling(id: &str) -> Character {
    Character::new(CharacterId::new(id), inventory_id(), 1).with_combat(CharacterCombat::new(
        CharacterStats::new(0, 0, 0, 1),
        SkillSet::new(),
    ))
}

pub fn inventory(members: &[&Character]) -> Inventory {
    Inventory::new(inventory_id())
        .with_party(Party::from_members(members.iter().map(|c| c.id.clone())))
        .with_keys(3)
}

/// Writes `inventory` and `characters` in one commit.
pub async fn seed(store: &dyn Store, inventory: Inventory, characters: &[Character]) {
    let mut op = AtomicOp::new().set(
        StoreKey::Inventory(inventory.id.clone()),
        StoreValue::Inventory(inventory),
    );
    for character in characters {
        op = op.set(
            StoreKey::Character(character.id.clone()),
            StoreValue::Character(character.clone()),
        );
    }
    let outcome = store.commit(op).await.expect("seed commit should succeed");
    assert!(outcome.is_committed());
}

pub async fn read_inventory(store: &dyn Store) -> Inventory {
    store
        .inventory(&inventory_id())
        .await
        .expect("read should succeed")
        .expect("inventory should exist")
        .value
}

pub async fn read_character(store: &dyn Store, id: &str) -> Character {
    store
        .character(&CharacterId::new(id))
        .await
        .expect("read should succeed")
        .expect("character should exist")
        .value
}

pub fn runtime(store: Arc<dyn Store>, config: RuntimeConfig) -> TowerRuntime {
    TowerRuntime::builder()
        .config(config)
        .store(store)
        .enemy_pool(enemy_pool())
        .build()
        .expect("runtime should build")
}

/// Store that reports a conflict for the next `conflicts` commits writing an
/// inventory, as if another command had raced it.
pub struct ContendedStore {
    inner: InMemoryStore,
    conflicts: AtomicU32,
    injected: AtomicU32,
}

impl ContendedStore {
    pub fn new(conflicts: u32) -> Self {
        Self {
            inner: InMemoryStore::new(),
            conflicts: AtomicU32::new(conflicts),
            injected: AtomicU32::new(0),
        }
    }

    /// Backing store, for seeding without tripping the injection.
    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }

    pub fn injected(&self) -> u32 {
        self.injected.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Store for ContendedStore {
    async fn read(
        &self,
        key: &StoreKey,
    ) -> Result<Option<Versioned<StoreValue>>, RepositoryError> {
        self.inner.read(key).await
    }

    async fn commit(&self, op: AtomicOp) -> Result<CommitOutcome, RepositoryError> {
        let writes_inventory = op.mutations.iter().any(|mutation| {
            matches!(
                mutation,
                Mutation::Set {
                    key: StoreKey::Inventory(_),
                    ..
                }
            )
        });

        if writes_inventory
            && self
                .conflicts
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
        {
            self.injected.fetch_add(1, Ordering::SeqCst);
            return Ok(CommitOutcome::Conflict);
        }

        self.inner.commit(op).await
    }

    fn watch(
        &self,
        key: &StoreKey,
    ) -> Result<watch::Receiver<Option<StoreValue>>, RepositoryError> {
        self.inner.watch(key)
    }
}
