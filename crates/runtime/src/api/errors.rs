//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the store, progression and tower rules so clients can
//! bubble them up with consistent context and severity.
use thiserror::Error;

use gacha_core::{CharacterId, ErrorSeverity, GameError, InventoryId, ProgressionError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("combat is under maintenance")]
    CombatDisabled,

    #[error("all {floors_cleared} floors are already cleared")]
    MaxFloorCleared { floors_cleared: u32 },

    #[error("no keys left")]
    InsufficientKeys,

    #[error("party is empty")]
    EmptyParty,

    #[error("character {character} has no combat stats yet")]
    UninitializedCombat { character: CharacterId },

    #[error("no enemy candidate available for floor {floor}")]
    NoEnemyFound { floor: u32 },

    #[error("{operation} failed after {attempts} commit attempts")]
    RetriesExhausted {
        operation: &'static str,
        attempts: u32,
    },

    #[error("no cleared floors to reclear")]
    NoClearedFloors,

    #[error("inventory {0} not found")]
    InventoryNotFound(InventoryId),

    #[error("character {0} not found")]
    CharacterNotFound(CharacterId),

    #[error("battle id {0} is already in use")]
    BattleIdTaken(String),

    #[error("runtime requires an enemy pool to be configured before building")]
    MissingEnemyPool,

    #[error(transparent)]
    Progression(#[from] ProgressionError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CombatDisabled | Self::InsufficientKeys => ErrorSeverity::Recoverable,
            Self::MaxFloorCleared { .. }
            | Self::EmptyParty
            | Self::UninitializedCombat { .. }
            | Self::NoClearedFloors
            | Self::InventoryNotFound(_) => ErrorSeverity::Validation,
            Self::NoEnemyFound { .. }
            | Self::CharacterNotFound(_)
            | Self::BattleIdTaken(_)
            | Self::MissingEnemyPool => ErrorSeverity::Internal,
            Self::RetriesExhausted { .. } => ErrorSeverity::Fatal,
            Self::Progression(err) => err.severity(),
            Self::Repository(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CombatDisabled => "RUNTIME_COMBAT_DISABLED",
            Self::MaxFloorCleared { .. } => "RUNTIME_MAX_FLOOR_CLEARED",
            Self::InsufficientKeys => "RUNTIME_INSUFFICIENT_KEYS",
            Self::EmptyParty => "RUNTIME_EMPTY_PARTY",
            Self::UninitializedCombat { .. } => "RUNTIME_UNINITIALIZED_COMBAT",
            Self::NoEnemyFound { .. } => "RUNTIME_NO_ENEMY_FOUND",
            Self::RetriesExhausted { .. } => "RUNTIME_RETRIES_EXHAUSTED",
            Self::NoClearedFloors => "RUNTIME_NO_CLEARED_FLOORS",
            Self::InventoryNotFound(_) => "RUNTIME_INVENTORY_NOT_FOUND",
            Self::CharacterNotFound(_) => "RUNTIME_CHARACTER_NOT_FOUND",
            Self::BattleIdTaken(_) => "RUNTIME_BATTLE_ID_TAKEN",
            Self::MissingEnemyPool => "RUNTIME_MISSING_ENEMY_POOL",
            Self::Progression(err) => err.error_code(),
            Self::Repository(err) => err.error_code(),
        }
    }
}
