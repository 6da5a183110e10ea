//! Deterministic game rules and data types for the tower battle stack.
//!
//! `gacha-core` defines the canonical rules (stat rolls, progression, skills,
//! battle resolution, floor tables) as pure, synchronous APIs. Persistence,
//! pacing and broadcast live in the runtime crate, which depends on the types
//! re-exported here.
pub mod battle;
pub mod combat;
pub mod config;
pub mod error;
pub mod rng;
pub mod skills;
pub mod state;
pub mod stats;
pub mod tower;

pub use battle::{
    ActionOutcome, Battle, BattleResult, BattleStats, BattleStep, Effects, MemberView, PartyMember,
    PartySide, Winner,
};
pub use combat::{AttackResult, HitTag};
pub use config::GameConfig;
pub use error::{ErrorSeverity, GameError};
pub use rng::{LehmerRng, RandomSource, UnseededRng};
pub use skills::{Skill, SkillCatalog, SkillKey, SkillLevel, SkillSet};
pub use state::{Character, CharacterId, Inventory, InventoryId, Party};
pub use stats::{
    CharacterCombat, CharacterStats, ExperienceStatus, ProgressionError, apply_experience,
    ensure_init_stats, roll_stats,
};
pub use tower::{FloorEntry, FloorStatus, create_enemy_stats, floor_exp, floor_ladder, floor_seed};
