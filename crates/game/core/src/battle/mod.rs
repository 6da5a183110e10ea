//! Tower battle simulation.
//!
//! # Architecture
//!
//! ```text
//! [ member ]   PartyMember: live HP, effects, skills of one fighter
//!      ↓
//! [ turns ]    speed ─► turn sequence of one exchange
//!      ↓
//! [ resolve ]  Battle: exchanges, actions, heals ─► BattleStep / BattleResult
//! ```
//!
//! Everything here is synchronous and deterministic for a given seed. Pacing,
//! broadcast and cancellation belong to the runtime.

mod member;
mod resolve;
pub mod turns;

pub use member::{BattleStats, Effects, MemberView, PartyMember, PartySide};
pub use resolve::{ActionOutcome, Battle, BattleResult, BattleStep, UsedSkills, Winner};
pub use turns::{TurnSequence, determine_fastest, extra_turns, speed_diff_percent, turn_sequence};
