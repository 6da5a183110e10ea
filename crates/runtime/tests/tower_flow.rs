//! Tower progression against the in-memory store.
//!
//! Every scenario runs with [`RuntimeConfig::instant`] so battles play out
//! without pacing.

mod common;

use std::sync::Arc;

use battle_runtime::{
    FixedAttempts, InMemoryStore, RuntimeConfig, RuntimeError, StaticEnemyPool, Store, TowerRuntime,
};
use gacha_core::{Character, CharacterId, FloorStatus, GameConfig, Inventory, Party, Winner};

use common::*;

fn setup() -> (Arc<dyn Store>, TowerRuntime) {
    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
    let runtime = runtime(Arc::clone(&store), RuntimeConfig::instant());
    (store, runtime)
}

// ============================================================================
// Challenges
// ============================================================================

#[tokio::test]
async fn victory_advances_floor_and_grants_experience() {
    let (store, runtime) = setup();
    let (a, b) = (champion("pack:a"), champion("pack:b"));
    seed(&*store, inventory(&[&a, &b]), &[a, b]).await;

    let outcome = runtime
        .tower()
        .challenge(&request())
        .await
        .expect("challenge should succeed");

    assert!(outcome.is_victory());
    assert_eq!(outcome.floor, 1);
    assert_eq!(outcome.enemy.rating, 1);
    assert_eq!(outcome.floors_cleared, 1);
    assert_eq!(outcome.keys_left, 2);
    assert!(!outcome.skipped);
    assert_eq!(outcome.progress.len(), 2);
    assert!(outcome.progress.iter().all(|member| member.status.exp == 1.0));

    let inventory = read_inventory(&*store).await;
    assert_eq!(inventory.floors_cleared, 1);
    assert_eq!(inventory.available_keys, 2);

    for id in ["pack:a", "pack:b"] {
        let combat = read_character(&*store, id).await.combat.expect("combat stats");
        assert_eq!(combat.exp, 1.0);
        assert_eq!(combat.level, 0);
    }

    let next = runtime
        .tower()
        .challenge(&request())
        .await
        .expect("second challenge should succeed");
    assert_eq!(next.floor, 2);
    assert_eq!(next.floors_cleared, 2);
    assert_eq!(next.keys_left, 1);
}

#[tokio::test]
async fn defeat_only_costs_a_key() {
    let (store, runtime) = setup();
    let weak = weakling("pack:weak");
    seed(&*store, inventory(&[&weak]), &[weak]).await;

    let outcome = runtime
        .tower()
        .challenge(&request())
        .await
        .expect("challenge should succeed");

    assert_eq!(outcome.winner, Winner::Party2);
    assert!(outcome.progress.is_empty());
    assert_eq!(outcome.floors_cleared, 0);
    assert_eq!(outcome.keys_left, 2);

    let inventory = read_inventory(&*store).await;
    assert_eq!(inventory.floors_cleared, 0);
    assert_eq!(inventory.available_keys, 2);

    let combat = read_character(&*store, "pack:weak").await.combat.expect("combat stats");
    assert_eq!(combat.exp, 0.0);
}

#[tokio::test]
async fn fallen_members_earn_nothing() {
    let (store, runtime) = setup();
    // the enemy moves first and kills the front member
    let (weak, strong) = (weakling("pack:weak"), champion("pack:strong"));
    seed(&*store, inventory(&[&weak, &strong]), &[weak, strong]).await;

    let outcome = runtime
        .tower()
        .challenge(&request())
        .await
        .expect("challenge should succeed");

    assert!(outcome.is_victory());
    let rewarded: Vec<&str> = outcome
        .progress
        .iter()
        .map(|member| member.character.as_str())
        .collect();
    assert_eq!(rewarded, ["pack:strong"]);

    let weak = read_character(&*store, "pack:weak").await.combat.expect("combat stats");
    assert_eq!(weak.exp, 0.0);
}

#[tokio::test]
async fn enemy_is_fixed_per_guild_and_floor() {
    let (store, runtime) = setup();
    let a = champion("pack:a");
    seed(&*store, inventory(&[&a]).with_keys(2), &[a]).await;

    let first = runtime.tower().challenge(&request()).await.expect("challenge");
    assert_eq!(first.enemy.id, CharacterId::new("pack:enemy1"));

    let (other_store, other) = setup();
    let b = champion("pack:a");
    seed(&*other_store, inventory(&[&b]), &[b]).await;
    let replay = other.tower().challenge(&request()).await.expect("challenge");

    assert_eq!(first.enemy, replay.enemy);
    assert_eq!(first.winner, replay.winner);
}

// ============================================================================
// Guards
// ============================================================================

#[tokio::test]
async fn maintenance_refuses_everything() {
    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
    let runtime = runtime(
        Arc::clone(&store),
        RuntimeConfig::instant().with_combat_enabled(false),
    );
    let a = champion("pack:a");
    seed(&*store, inventory(&[&a]).with_floors_cleared(3), &[a]).await;

    let tower = runtime.tower();
    assert!(matches!(
        tower.challenge(&request()).await,
        Err(RuntimeError::CombatDisabled)
    ));
    assert!(matches!(
        tower.reclear(&request()).await,
        Err(RuntimeError::CombatDisabled)
    ));
    assert!(matches!(
        tower.ladder(&inventory_id()).await,
        Err(RuntimeError::CombatDisabled)
    ));
    assert_eq!(read_inventory(&*store).await.available_keys, 3);
}

#[tokio::test]
async fn top_floor_cannot_be_challenged() {
    let (store, runtime) = setup();
    let a = champion("pack:a");
    seed(
        &*store,
        inventory(&[&a]).with_floors_cleared(GameConfig::MAX_FLOORS),
        &[a],
    )
    .await;

    let err = runtime.tower().challenge(&request()).await.unwrap_err();
    assert!(matches!(err, RuntimeError::MaxFloorCleared { floors_cleared: 20 }));
    assert_eq!(read_inventory(&*store).await.available_keys, 3);
}

#[tokio::test]
async fn refused_challenges_keep_keys() {
    let (store, runtime) = setup();
    let a = champion("pack:a");
    seed(&*store, inventory(&[&a]).with_keys(0), &[a]).await;

    let err = runtime.tower().challenge(&request()).await.unwrap_err();
    assert!(matches!(err, RuntimeError::InsufficientKeys));
    assert_eq!(read_inventory(&*store).await.floors_cleared, 0);
}

#[tokio::test]
async fn party_must_be_ready() {
    let (store, runtime) = setup();
    seed(&*store, Inventory::new(inventory_id()).with_keys(1), &[]).await;
    let err = runtime.tower().challenge(&request()).await.unwrap_err();
    assert!(matches!(err, RuntimeError::EmptyParty));

    let fresh = Character::new(CharacterId::new("pack:fresh"), inventory_id(), 3);
    seed(&*store, inventory(&[&fresh]), &[fresh]).await;
    let err = runtime.tower().challenge(&request()).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::UninitializedCombat { ref character } if character.as_str() == "pack:fresh"
    ));

    let ghost = Inventory::new(inventory_id())
        .with_party(Party::from_members([CharacterId::new("pack:ghost")]))
        .with_keys(1);
    seed(&*store, ghost, &[]).await;
    let err = runtime.tower().challenge(&request()).await.unwrap_err();
    assert!(matches!(err, RuntimeError::CharacterNotFound(_)));

    assert_eq!(read_inventory(&*store).await.available_keys, 1);
}

#[tokio::test]
async fn missing_inventory_is_reported() {
    let (_store, runtime) = setup();
    let err = runtime.tower().challenge(&request()).await.unwrap_err();
    assert!(matches!(err, RuntimeError::InventoryNotFound(_)));
}

#[tokio::test]
async fn empty_enemy_pool_fails_without_spending_a_key() {
    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
    let runtime = TowerRuntime::builder()
        .config(RuntimeConfig::instant())
        .store(Arc::clone(&store))
        .enemy_pool(StaticEnemyPool::default())
        .build()
        .expect("runtime should build");
    let a = champion("pack:a");
    seed(&*store, inventory(&[&a]), &[a]).await;

    let err = runtime.tower().challenge(&request()).await.unwrap_err();
    assert!(matches!(err, RuntimeError::NoEnemyFound { floor: 1 }));
    assert_eq!(read_inventory(&*store).await.available_keys, 3);
}

#[test]
fn builder_requires_an_enemy_pool() {
    let result = TowerRuntime::builder().build();
    assert!(matches!(result, Err(RuntimeError::MissingEnemyPool)));
}

// ============================================================================
// Reclear and ladder
// ============================================================================

#[tokio::test]
async fn reclear_spends_every_key_on_the_highest_floor() {
    let (store, runtime) = setup();
    let (a, b) = (champion("pack:a"), champion("pack:b"));
    seed(
        &*store,
        inventory(&[&a, &b]).with_keys(4).with_floors_cleared(10),
        &[a, b],
    )
    .await;

    let outcome = runtime
        .tower()
        .reclear(&request())
        .await
        .expect("reclear should succeed");

    assert_eq!(outcome.floor, 10);
    assert_eq!(outcome.keys_spent, 4);
    assert_eq!(outcome.exp_per_member, 12.0);
    assert_eq!(outcome.progress.len(), 2);
    assert!(outcome.progress.iter().all(|member| member.status.level_up == 1));

    let inventory = read_inventory(&*store).await;
    assert_eq!(inventory.available_keys, 0);
    assert_eq!(inventory.floors_cleared, 10);

    let combat = read_character(&*store, "pack:a").await.combat.expect("combat stats");
    assert_eq!(combat.level, 1);
    assert_eq!(combat.exp, 2.0);
    assert_eq!(combat.cur_stats.hp, 505);
    assert_eq!(combat.cur_stats.points(), combat.base_stats.points() + 3);
}

#[tokio::test]
async fn reclear_needs_a_cleared_floor_and_keys() {
    let (store, runtime) = setup();
    let a = champion("pack:a");
    seed(&*store, inventory(&[&a]), &[a.clone()]).await;

    let err = runtime.tower().reclear(&request()).await.unwrap_err();
    assert!(matches!(err, RuntimeError::NoClearedFloors));

    seed(
        &*store,
        inventory(&[&a]).with_keys(0).with_floors_cleared(2),
        &[],
    )
    .await;
    let err = runtime.tower().reclear(&request()).await.unwrap_err();
    assert!(matches!(err, RuntimeError::InsufficientKeys));
}

#[tokio::test]
async fn ladder_follows_progress() {
    let (store, runtime) = setup();
    let a = champion("pack:a");
    seed(&*store, inventory(&[&a]).with_floors_cleared(7), &[a]).await;

    let ladder = runtime
        .tower()
        .ladder(&inventory_id())
        .await
        .expect("ladder should load");
    let floors: Vec<u32> = ladder.iter().map(|entry| entry.floor).collect();
    assert_eq!(floors, [10, 9, 8, 7, 6]);
    assert_eq!(ladder[2].status, FloorStatus::Current);

    // no inventory yet reads as nothing cleared
    let fresh = runtime
        .tower()
        .ladder(&gacha_core::InventoryId::new("guild:nobody"))
        .await
        .expect("ladder should load");
    assert_eq!(fresh[4].floor, 1);
    assert_eq!(fresh[4].status, FloorStatus::Current);
}

// ============================================================================
// Stat initialization and contention
// ============================================================================

#[tokio::test]
async fn stats_are_rolled_once() {
    let (store, runtime) = setup();
    let fresh = Character::new(CharacterId::new("pack:fresh"), inventory_id(), 5);
    seed(&*store, Inventory::new(inventory_id()), &[fresh]).await;

    let id = CharacterId::new("pack:fresh");
    let first = runtime.init_stats(&id).await.expect("init should succeed");
    let combat = first.combat.clone().expect("combat stats");
    assert_eq!(combat.base_stats.points(), 15);
    assert_eq!(combat.base_stats.hp, GameConfig::BASE_HP);
    assert_eq!(combat.skills.len(), 2);

    let again = runtime.init_stats(&id).await.expect("init should succeed");
    assert_eq!(again, first);
    assert_eq!(read_character(&*store, "pack:fresh").await, first);
}

#[tokio::test]
async fn conflicts_are_retried_without_double_spending() {
    let contended = Arc::new(ContendedStore::new(2));
    let a = champion("pack:a");
    seed(contended.inner(), inventory(&[&a]), &[a]).await;

    let store: Arc<dyn Store> = contended.clone();
    let runtime = runtime(Arc::clone(&store), RuntimeConfig::instant());

    let outcome = runtime
        .tower()
        .challenge(&request())
        .await
        .expect("challenge should succeed after retries");

    assert_eq!(contended.injected(), 2);
    assert_eq!(outcome.keys_left, 2);
    assert_eq!(outcome.floors_cleared, 1);

    let combat = read_character(&*store, "pack:a").await.combat.expect("combat stats");
    assert_eq!(combat.exp, 1.0);
}

#[tokio::test]
async fn exhausted_retries_leave_state_untouched() {
    let contended = Arc::new(ContendedStore::new(u32::MAX));
    let (a, b) = (champion("pack:a"), champion("pack:b"));
    seed(
        contended.inner(),
        inventory(&[&a, &b]).with_floors_cleared(4),
        &[a, b],
    )
    .await;

    let store: Arc<dyn Store> = contended.clone();
    let runtime = TowerRuntime::builder()
        .config(RuntimeConfig::instant())
        .store(Arc::clone(&store))
        .enemy_pool(enemy_pool())
        .retry(FixedAttempts(3))
        .build()
        .expect("runtime should build");

    let err = runtime.tower().challenge(&request()).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::RetriesExhausted {
            operation: "challenge",
            attempts: 3
        }
    ));
    assert_eq!(contended.injected(), 3);

    let err = runtime.tower().reclear(&request()).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::RetriesExhausted {
            operation: "reclear",
            ..
        }
    ));

    let inventory = read_inventory(&*store).await;
    assert_eq!(inventory.available_keys, 3);
    assert_eq!(inventory.floors_cleared, 4);
    let combat = read_character(&*store, "pack:a").await.combat.expect("combat stats");
    assert_eq!(combat.exp, 0.0);
}
