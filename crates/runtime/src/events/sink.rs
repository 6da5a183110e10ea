use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;

use super::BattleFrame;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("render target is gone")]
    Closed,

    #[error("render failed: {0}")]
    Failed(String),
}

/// Destination of live battle frames (a chat message being edited, a
/// terminal, a test recorder).
#[async_trait]
pub trait RenderSink: Send + Sync {
    async fn send(&self, frame: &BattleFrame) -> Result<(), SinkError>;
}

/// Fans frames out to every subscriber over a broadcast channel.
///
/// Having no subscribers is normal and not an error.
#[derive(Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<BattleFrame>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            tx: broadcast::channel(capacity.max(1)).0,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BattleFrame> {
        self.tx.subscribe()
    }
}

#[async_trait]
impl RenderSink for BroadcastSink {
    async fn send(&self, frame: &BattleFrame) -> Result<(), SinkError> {
        if self.tx.send(frame.clone()).is_err() {
            tracing::trace!(target: "battle", battle_id = %frame.battle_id, "no frame subscribers");
        }
        Ok(())
    }
}
