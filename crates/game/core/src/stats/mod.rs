//! Character stat system.
//!
//! # Architecture
//!
//! ```text
//! [ Roller ]       rating budget ──► base stats (+ skill slots)
//!      ↓
//! [ Combat ]       base stats, current stats, level, exp, skills (persisted)
//!      ↓
//! [ Progression ]  exp ──► levels ──► stat points redistributed by base ratio
//! ```
//!
//! ## Principles
//!
//! 1. **SSOT**: `base_stats` never change after initialization
//! 2. **Proportional growth**: level-ups follow the base stat ratios
//! 3. **Deterministic**: seeded rolls and progression are pure functions

pub mod combat;
pub mod progression;
pub mod roller;

pub use combat::{CharacterCombat, CharacterStats};
pub use progression::{
    ExperienceStatus, ProgressionError, apply_experience, distribute_stat_points, exp_to_level,
};
pub use roller::{ensure_init_stats, roll_stats, skill_slots, unclaimed_points};
