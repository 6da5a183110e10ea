//! Runtime orchestration for tower battles.
//!
//! This crate wires the pure battle simulation from `gacha-core` to a
//! versioned store, a live frame sink, and the tower progression rules.
//! Consumers embed [`TowerRuntime`] to challenge floors, farm cleared floors,
//! and watch battles unfold frame by frame.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the error types downstream clients interact with
//! - [`battle`] paces a battle and honours skip requests
//! - [`tower`] runs challenges and reclears against the store
//! - [`events`] carries rendered frames to whoever displays them
//! - [`repository`] provides the versioned store and its in-memory backend
pub mod api;
pub mod battle;
pub mod config;
pub mod events;
pub mod party;
pub mod repository;
pub mod retry;
pub mod runtime;
pub mod tower;

pub use api::{RepositoryError, Result, RuntimeError};
pub use battle::{BattleEngine, BattleReport, BattleSetup, BattleWatch, new_battle_id, skip_battle};
pub use config::RuntimeConfig;
pub use events::{BattleFrame, BroadcastSink, FrameKind, RenderSink, SinkError};
pub use party::{init_stats, party_member, resolve_party};
pub use repository::{
    AtomicOp, BattleState, Check, CommitOutcome, InMemoryStore, Mutation, Store, StoreKey,
    StoreValue, Versioned, Versionstamp,
};
pub use retry::{FixedAttempts, RetryPolicy};
pub use runtime::{TowerRuntime, TowerRuntimeBuilder};
pub use tower::{
    ChallengeOutcome, EnemyCandidate, EnemyPool, MemberProgress, ReclearOutcome, StaticEnemyPool,
    TowerController, TowerRequest,
};
