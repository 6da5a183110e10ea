//! Async battle engine.
//!
//! Drives a [`gacha_core::Battle`] step by step, pacing frames with the
//! configured delay and publishing them to a [`RenderSink`]. Playback stops
//! as soon as the battle state key is deleted or marked not playing; the
//! simulation itself always runs to the end so the outcome never depends on
//! whether someone was watching.

mod watch;

use std::sync::Arc;

use rand::Rng;
use rand::distributions::Alphanumeric;

use gacha_core::{Battle, BattleResult, PartyMember};

pub use watch::BattleWatch;

use crate::api::{Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::{BattleFrame, FrameKind, RenderSink};
use crate::repository::{AtomicOp, BattleState, CommitOutcome, Store, StoreKey, StoreValue};

/// Length of generated battle ids.
pub const BATTLE_ID_LEN: usize = 5;

/// Random alphanumeric battle id.
pub fn new_battle_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(BATTLE_ID_LEN)
        .map(char::from)
        .collect()
}

/// Everything needed to start a battle.
#[derive(Debug, Clone)]
pub struct BattleSetup {
    pub battle_id: String,
    /// Caption shown on every frame (e.g. the floor).
    pub title: String,
    pub party1: Vec<PartyMember>,
    pub party2: Vec<PartyMember>,
    /// Seed of the skill chance rolls.
    pub seed: String,
}

#[derive(Debug, Clone)]
pub struct BattleReport {
    pub battle_id: String,
    pub result: BattleResult,
    /// Whether playback was cancelled before the end.
    pub skipped: bool,
}

pub struct BattleEngine {
    store: Arc<dyn Store>,
    sink: Arc<dyn RenderSink>,
    config: RuntimeConfig,
}

impl BattleEngine {
    pub fn new(store: Arc<dyn Store>, sink: Arc<dyn RenderSink>, config: RuntimeConfig) -> Self {
        Self {
            store,
            sink,
            config,
        }
    }

    /// Runs a battle to completion.
    ///
    /// Claims the battle state key for the battle's lifetime (with the
    /// configured TTL) and deletes it once done.
    pub async fn run(&self, setup: BattleSetup) -> Result<BattleReport> {
        let BattleSetup {
            battle_id,
            title,
            party1,
            party2,
            seed,
        } = setup;
        let key = StoreKey::Battle(battle_id.clone());

        let claim = AtomicOp::new().check(key.clone(), None).set_with_ttl(
            key.clone(),
            StoreValue::Battle(BattleState { playing: true }),
            self.config.max_battle_time,
        );
        if self.store.commit(claim).await? == CommitOutcome::Conflict {
            return Err(RuntimeError::BattleIdTaken(battle_id));
        }

        tracing::info!(
            target: "battle",
            battle_id = %battle_id,
            party1 = party1.len(),
            party2 = party2.len(),
            "battle started"
        );

        let report = self
            .play(&key, &battle_id, &title, Battle::new(party1, party2, &seed, self.config.game_config.clone()))
            .await;

        // natural end; a skipped battle already lost its key
        self.store.commit(AtomicOp::new().delete(key)).await?;

        let report = report?;
        tracing::info!(
            target: "battle",
            battle_id = %battle_id,
            winner = %report.result.winner,
            exchanges = report.result.exchanges,
            skipped = report.skipped,
            "battle finished"
        );
        Ok(report)
    }

    async fn play(
        &self,
        key: &StoreKey,
        battle_id: &str,
        title: &str,
        mut battle: Battle,
    ) -> Result<BattleReport> {
        let watch = BattleWatch::spawn(self.store.watch(key)?);

        while let Some(step) = battle.step() {
            if !watch.is_playing() {
                continue;
            }
            let frame = BattleFrame::capture(battle_id, title, &battle, FrameKind::Step(step));
            self.present(&watch, &frame).await;
        }

        let result = battle.finish();

        if watch.is_playing() {
            let frame = BattleFrame {
                battle_id: battle_id.to_string(),
                title: title.to_string(),
                party1: result.party1.iter().map(PartyMember::view).collect(),
                party2: result.party2.iter().map(PartyMember::view).collect(),
                kind: FrameKind::Finished(result.winner),
            };
            self.present(&watch, &frame).await;
        }

        Ok(BattleReport {
            battle_id: battle_id.to_string(),
            skipped: !watch.is_playing(),
            result,
        })
    }

    /// Sleeps, then sends `frame` if the battle is still being watched.
    async fn present(&self, watch: &BattleWatch, frame: &BattleFrame) {
        if !self.config.message_delay.is_zero() {
            tokio::time::sleep(self.config.message_delay).await;
        }
        if !watch.is_playing() {
            return;
        }
        if let Err(err) = self.sink.send(frame).await {
            tracing::warn!(target: "battle", battle_id = %frame.battle_id, error = %err, "failed to render frame");
        }
    }
}

/// Stops playback of a running battle. Returns `false` if no such battle is
/// live.
pub async fn skip_battle(store: &dyn Store, battle_id: &str) -> Result<bool> {
    let key = StoreKey::Battle(battle_id.to_string());

    let Some(current) = store.read(&key).await? else {
        return Ok(false);
    };

    let outcome = store
        .commit(AtomicOp::new().check(key.clone(), Some(current.version)).delete(key))
        .await?;

    tracing::debug!(target: "battle", battle_id, skipped = outcome.is_committed(), "skip requested");
    Ok(outcome.is_committed())
}
