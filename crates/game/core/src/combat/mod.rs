//! Combat resolution system.
//!
//! Pure functions resolving one attack between two party members. All
//! randomness comes in through a [`RandomSource`](crate::rng::RandomSource),
//! so a seeded generator makes every action reproducible.
//!
//! # Core Functions
//!
//! - `resolve_attack`: complete attack resolution (skills + damage)
//! - `calculate_damage`: base damage from attack and defense
//! - `apply_damage` / `apply_heal`: HP changes, clamped

pub mod damage;
pub mod result;

pub use damage::{MIN_DAMAGE, apply_damage, apply_heal, calculate_damage};
pub use result::{AttackResult, HitTag, resolve_attack};
