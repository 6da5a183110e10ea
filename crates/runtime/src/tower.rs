//! Tower progression: floor challenges, reclears and the floor ladder.
//!
//! # Challenge Flow
//!
//! ```text
//! guards ─► party ─► enemy (seeded) ─► BattleEngine ─► commit (retry)
//! ```
//!
//! Every guard runs before the battle so a refused challenge never costs a
//! key. The commit re-reads the inventory and the surviving characters on
//! each attempt; the enemy is derived from the floor seed and stays the same
//! across attempts.

use std::sync::Arc;

use async_trait::async_trait;

use gacha_core::tower::{enemy_rating, floor_seed};
use gacha_core::{
    Character, CharacterId, ExperienceStatus, FloorEntry, GameConfig, InventoryId, LehmerRng,
    PartyMember, PartySide, RandomSource, Winner, apply_experience, create_enemy_stats, floor_exp,
    floor_ladder,
};

use crate::api::{Result, RuntimeError};
use crate::battle::{BattleEngine, BattleSetup, new_battle_id};
use crate::config::RuntimeConfig;
use crate::party::{party_member, resolve_party};
use crate::repository::{AtomicOp, CommitOutcome, Store, Versioned};
use crate::retry::RetryPolicy;

/// A character that can be drafted as a floor's enemy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnemyCandidate {
    pub id: CharacterId,
    pub name: String,
    pub rating: u8,
}

/// Source of enemy characters, typically backed by the guild's enabled packs.
#[async_trait]
pub trait EnemyPool: Send + Sync {
    /// Candidates of the given rating, in a stable order for `seed`.
    async fn candidates(&self, rating: u8, seed: &str) -> Vec<EnemyCandidate>;

    /// Whether a drawn candidate is usable (not disabled, has media).
    async fn validate(&self, _candidate: &EnemyCandidate) -> bool {
        true
    }
}

/// Fixed list of candidates, filtered by rating.
#[derive(Debug, Clone, Default)]
pub struct StaticEnemyPool {
    candidates: Vec<EnemyCandidate>,
}

impl StaticEnemyPool {
    pub fn new(candidates: Vec<EnemyCandidate>) -> Self {
        Self { candidates }
    }
}

#[async_trait]
impl EnemyPool for StaticEnemyPool {
    async fn candidates(&self, rating: u8, _seed: &str) -> Vec<EnemyCandidate> {
        self.candidates
            .iter()
            .filter(|candidate| candidate.rating == rating)
            .cloned()
            .collect()
    }
}

/// Who is climbing, and in which guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TowerRequest {
    pub guild_id: String,
    pub inventory: InventoryId,
}

impl TowerRequest {
    pub fn new(guild_id: impl Into<String>, inventory: InventoryId) -> Self {
        Self {
            guild_id: guild_id.into(),
            inventory,
        }
    }
}

/// Experience outcome of one party member.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberProgress {
    pub character: CharacterId,
    pub name: String,
    pub status: ExperienceStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeOutcome {
    pub floor: u32,
    pub battle_id: String,
    pub winner: Winner,
    pub skipped: bool,
    pub enemy: EnemyCandidate,
    /// Experience granted to surviving members (empty unless won).
    pub progress: Vec<MemberProgress>,
    pub floors_cleared: u32,
    pub keys_left: u32,
}

impl ChallengeOutcome {
    pub fn is_victory(&self) -> bool {
        self.winner == Winner::Party1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReclearOutcome {
    pub floor: u32,
    pub keys_spent: u32,
    pub exp_per_member: f64,
    pub progress: Vec<MemberProgress>,
}

pub struct TowerController {
    store: Arc<dyn Store>,
    engine: BattleEngine,
    pool: Arc<dyn EnemyPool>,
    retry: Arc<dyn RetryPolicy>,
    config: RuntimeConfig,
}

impl TowerController {
    pub fn new(
        store: Arc<dyn Store>,
        engine: BattleEngine,
        pool: Arc<dyn EnemyPool>,
        retry: Arc<dyn RetryPolicy>,
        config: RuntimeConfig,
    ) -> Self {
        Self {
            store,
            engine,
            pool,
            retry,
            config,
        }
    }

    fn ensure_enabled(&self) -> Result<()> {
        if self.config.combat_enabled {
            Ok(())
        } else {
            Err(RuntimeError::CombatDisabled)
        }
    }

    /// Five-floor view around the inventory's current floor.
    pub async fn ladder(&self, inventory: &InventoryId) -> Result<Vec<FloorEntry>> {
        self.ensure_enabled()?;
        let cleared = self
            .store
            .inventory(inventory)
            .await?
            .map_or(0, |read| read.value.floors_cleared);
        Ok(floor_ladder(cleared))
    }

    /// Fights the next floor and records the outcome.
    pub async fn challenge(&self, request: &TowerRequest) -> Result<ChallengeOutcome> {
        self.ensure_enabled()?;

        let inventory = self
            .store
            .inventory(&request.inventory)
            .await?
            .ok_or_else(|| RuntimeError::InventoryNotFound(request.inventory.clone()))?
            .value;

        if inventory.floors_cleared >= GameConfig::MAX_FLOORS {
            return Err(RuntimeError::MaxFloorCleared {
                floors_cleared: inventory.floors_cleared,
            });
        }
        if inventory.available_keys == 0 {
            return Err(RuntimeError::InsufficientKeys);
        }

        let party1: Vec<PartyMember> = resolve_party(&*self.store, &inventory)
            .await?
            .iter()
            .filter_map(|read| party_member(PartySide::Party1, &read.value))
            .collect();

        let floor = inventory.current_floor();
        let seed = floor_seed(&request.guild_id, floor);
        let enemy = self.pick_enemy(floor, &seed).await?;
        let enemy_member = PartyMember::new(
            PartySide::Party2,
            Some(enemy.id.clone()),
            create_enemy_stats(floor, &seed),
        )
        .with_name(enemy.name.clone());

        tracing::info!(
            target: "tower",
            inventory = %request.inventory,
            floor,
            enemy = %enemy.id,
            "floor challenge"
        );

        let report = self
            .engine
            .run(BattleSetup {
                battle_id: new_battle_id(),
                title: format!("Floor {floor}"),
                party1,
                party2: vec![enemy_member],
                seed: seed.clone(),
            })
            .await?;

        let winner = report.result.winner;
        let victory = winner == Winner::Party1;
        let survivors: Vec<CharacterId> = if victory {
            report
                .result
                .survivors(PartySide::Party1)
                .filter_map(|member| member.character.clone())
                .collect()
        } else {
            Vec::new()
        };

        let (progress, floors_cleared, keys_left) = self
            .commit_challenge(&request.inventory, floor, victory, &survivors)
            .await?;

        tracing::info!(
            target: "tower",
            inventory = %request.inventory,
            floor,
            winner = %winner,
            floors_cleared,
            keys_left,
            "floor challenge recorded"
        );

        Ok(ChallengeOutcome {
            floor,
            battle_id: report.battle_id,
            winner,
            skipped: report.skipped,
            enemy,
            progress,
            floors_cleared,
            keys_left,
        })
    }

    /// Spends every key on the highest cleared floor for experience only.
    pub async fn reclear(&self, request: &TowerRequest) -> Result<ReclearOutcome> {
        self.ensure_enabled()?;

        let mut attempt = 0;
        loop {
            attempt += 1;

            let mut inventory = self
                .store
                .inventory(&request.inventory)
                .await?
                .ok_or_else(|| RuntimeError::InventoryNotFound(request.inventory.clone()))?;

            let floor = inventory.value.floors_cleared;
            if floor == 0 {
                return Err(RuntimeError::NoClearedFloors);
            }
            if inventory.value.available_keys == 0 {
                return Err(RuntimeError::InsufficientKeys);
            }

            let party = resolve_party(&*self.store, &inventory.value).await?;

            let keys_spent = inventory.value.consume_all_keys();
            let exp_per_member = floor_exp(floor) * f64::from(keys_spent);

            let mut op = AtomicOp::new().update_inventory(inventory);
            let mut progress = Vec::with_capacity(party.len());
            for read in party {
                let (read, member) = grant_experience(read, exp_per_member)?;
                progress.extend(member);
                op = op.update_character(read);
            }

            match self.store.commit(op).await? {
                CommitOutcome::Committed { .. } => {
                    tracing::info!(
                        target: "tower",
                        inventory = %request.inventory,
                        floor,
                        keys_spent,
                        exp_per_member,
                        "reclear recorded"
                    );
                    return Ok(ReclearOutcome {
                        floor,
                        keys_spent,
                        exp_per_member,
                        progress,
                    });
                }
                CommitOutcome::Conflict if self.retry.should_retry(attempt) => {
                    tracing::debug!(target: "tower", attempt, "reclear conflict, retrying");
                }
                CommitOutcome::Conflict => return Err(self.retry.exhausted("reclear")),
            }
        }
    }

    /// Draws candidates by seeded splice-selection until one validates.
    async fn pick_enemy(&self, floor: u32, seed: &str) -> Result<EnemyCandidate> {
        let mut pool = self.pool.candidates(enemy_rating(floor), seed).await;
        let mut rng = LehmerRng::new(seed);

        while !pool.is_empty() {
            let candidate = pool.remove(rng.pick_index(pool.len()));
            if self.pool.validate(&candidate).await {
                return Ok(candidate);
            }
            tracing::debug!(target: "tower", candidate = %candidate.id, "enemy candidate rejected");
        }

        Err(RuntimeError::NoEnemyFound { floor })
    }

    /// Consumes one key and, for a victory, advances the floor and grants
    /// experience to `survivors`.
    async fn commit_challenge(
        &self,
        inventory_id: &InventoryId,
        floor: u32,
        victory: bool,
        survivors: &[CharacterId],
    ) -> Result<(Vec<MemberProgress>, u32, u32)> {
        let exp = floor_exp(floor);

        let mut attempt = 0;
        loop {
            attempt += 1;

            let mut inventory = self
                .store
                .inventory(inventory_id)
                .await?
                .ok_or_else(|| RuntimeError::InventoryNotFound(inventory_id.clone()))?;

            inventory.value.consume_keys(1);
            if victory {
                inventory.value.floors_cleared = inventory.value.floors_cleared.max(floor);
            }
            let floors_cleared = inventory.value.floors_cleared;
            let keys_left = inventory.value.available_keys;

            let mut op = AtomicOp::new().update_inventory(inventory);
            let mut progress = Vec::with_capacity(survivors.len());
            for id in survivors {
                let Some(read) = self.store.character(id).await? else {
                    tracing::warn!(target: "tower", character = %id, "survivor vanished before commit");
                    continue;
                };
                let (read, member) = grant_experience(read, exp)?;
                progress.extend(member);
                op = op.update_character(read);
            }

            match self.store.commit(op).await? {
                CommitOutcome::Committed { .. } => return Ok((progress, floors_cleared, keys_left)),
                CommitOutcome::Conflict if self.retry.should_retry(attempt) => {
                    tracing::debug!(target: "tower", attempt, floor, "challenge conflict, retrying");
                }
                CommitOutcome::Conflict => return Err(self.retry.exhausted("challenge")),
            }
        }
    }
}

/// Applies `exp` to a character read for a commit.
fn grant_experience(
    mut read: Versioned<Character>,
    exp: f64,
) -> Result<(Versioned<Character>, Option<MemberProgress>)> {
    let name = read.value.display_name().to_string();
    let progress = match read.value.combat.as_mut() {
        Some(combat) => Some(MemberProgress {
            character: read.value.id.clone(),
            name,
            status: apply_experience(combat, exp)?,
        }),
        None => None,
    };
    Ok((read, progress))
}
