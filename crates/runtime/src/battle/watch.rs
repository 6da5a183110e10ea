//! Scoped subscription to a battle's playback flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::repository::StoreValue;

fn is_playing(value: &Option<StoreValue>) -> bool {
    matches!(value, Some(StoreValue::Battle(state)) if state.playing)
}

/// Mirrors the battle state key into a flag the engine can poll.
///
/// The forwarding task is aborted when the guard drops, so the store watch is
/// released on every exit path of the engine.
pub struct BattleWatch {
    playing: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl BattleWatch {
    pub fn spawn(mut rx: watch::Receiver<Option<StoreValue>>) -> Self {
        let playing = Arc::new(AtomicBool::new(is_playing(&rx.borrow_and_update())));
        let flag = Arc::clone(&playing);

        let task = tokio::spawn(async move {
            while flag.load(Ordering::Acquire) && rx.changed().await.is_ok() {
                if !is_playing(&rx.borrow_and_update()) {
                    flag.store(false, Ordering::Release);
                }
            }
        });

        Self { playing, task }
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }
}

impl Drop for BattleWatch {
    fn drop(&mut self) {
        self.task.abort();
    }
}
