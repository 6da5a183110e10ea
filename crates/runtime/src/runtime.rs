//! High-level runtime orchestrator.
//!
//! Wires the store, the frame sink, the enemy pool and the retry policy into
//! a [`TowerController`], and exposes a builder-based API for clients.

use std::sync::Arc;

use tokio::sync::broadcast;

use gacha_core::{Character, CharacterId};

use crate::api::{Result, RuntimeError};
use crate::battle::{BattleEngine, skip_battle};
use crate::config::RuntimeConfig;
use crate::events::{BattleFrame, BroadcastSink, RenderSink};
use crate::party::init_stats;
use crate::repository::{InMemoryStore, Store};
use crate::retry::{FixedAttempts, RetryPolicy};
use crate::tower::{EnemyPool, TowerController};

/// Main runtime.
///
/// Design: frames go to an internal [`BroadcastSink`] and clients pick them
/// up with [`TowerRuntime::subscribe_frames`]. A sink set on the builder
/// replaces the broadcast channel, leaving subscribers with nothing.
pub struct TowerRuntime {
    store: Arc<dyn Store>,
    retry: Arc<dyn RetryPolicy>,
    frames: BroadcastSink,
    tower: TowerController,
}

impl TowerRuntime {
    pub fn builder() -> TowerRuntimeBuilder {
        TowerRuntimeBuilder::new()
    }

    pub fn tower(&self) -> &TowerController {
        &self.tower
    }

    pub fn store(&self) -> Arc<dyn Store> {
        Arc::clone(&self.store)
    }

    /// Receives every frame rendered from now on.
    pub fn subscribe_frames(&self) -> broadcast::Receiver<BattleFrame> {
        self.frames.subscribe()
    }

    /// Rolls combat stats for a character that has none.
    pub async fn init_stats(&self, character: &CharacterId) -> Result<Character> {
        init_stats(&*self.store, &*self.retry, character).await
    }

    /// Stops playback of a running battle.
    pub async fn skip(&self, battle_id: &str) -> Result<bool> {
        skip_battle(&*self.store, battle_id).await
    }
}

/// Builder for [`TowerRuntime`].
pub struct TowerRuntimeBuilder {
    config: RuntimeConfig,
    store: Option<Arc<dyn Store>>,
    pool: Option<Arc<dyn EnemyPool>>,
    retry: Option<Arc<dyn RetryPolicy>>,
    sink: Option<Arc<dyn RenderSink>>,
}

impl TowerRuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            store: None,
            pool: None,
            retry: None,
            sink: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an existing store. Defaults to a fresh [`InMemoryStore`].
    pub fn store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set required enemy pool
    pub fn enemy_pool(mut self, pool: impl EnemyPool + 'static) -> Self {
        self.pool = Some(Arc::new(pool));
        self
    }

    /// Override the commit retry policy. Defaults to
    /// [`RuntimeConfig::commit_max_attempts`] immediate attempts.
    pub fn retry(mut self, retry: impl RetryPolicy + 'static) -> Self {
        self.retry = Some(Arc::new(retry));
        self
    }

    /// Render frames to `sink` instead of the internal broadcast channel.
    pub fn sink(mut self, sink: impl RenderSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    pub fn build(self) -> Result<TowerRuntime> {
        let pool = self.pool.ok_or(RuntimeError::MissingEnemyPool)?;
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryStore::new()) as Arc<dyn Store>);
        let retry = self
            .retry
            .unwrap_or_else(|| {
                Arc::new(FixedAttempts(self.config.commit_max_attempts)) as Arc<dyn RetryPolicy>
            });

        let frames = BroadcastSink::new(self.config.render_buffer_size);
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(frames.clone()) as Arc<dyn RenderSink>);

        let engine = BattleEngine::new(Arc::clone(&store), sink, self.config.clone());
        let tower = TowerController::new(
            Arc::clone(&store),
            engine,
            pool,
            Arc::clone(&retry),
            self.config,
        );

        Ok(TowerRuntime {
            store,
            retry,
            frames,
            tower,
        })
    }
}
