//! Persisted combat block of a character.

use crate::config::GameConfig;
use crate::skills::SkillSet;

/// Attack / defense / speed / HP quadruple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterStats {
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub hp: u32,
}

impl CharacterStats {
    pub const fn new(attack: u32, defense: u32, speed: u32, hp: u32) -> Self {
        Self {
            attack,
            defense,
            speed,
            hp,
        }
    }

    /// Sum of the three point-bought stats (HP excluded).
    pub const fn points(&self) -> u32 {
        self.attack + self.defense + self.speed
    }
}

/// Combat data owned by a persisted character.
///
/// Invariants:
/// - `base_stats` is fixed at initialization
/// - `cur_stats.hp` only ever increases
/// - `exp < exp_to_level(level)` after progression unless at max level
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterCombat {
    pub base_stats: CharacterStats,
    pub cur_stats: CharacterStats,
    pub level: u32,
    pub exp: f64,
    pub skill_points: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: SkillSet,
    /// Whether attacks from this character retarget the enemy backline.
    #[cfg_attr(feature = "serde", serde(default))]
    pub sneak_attack: bool,
}

impl CharacterCombat {
    /// Fresh combat block with `cur_stats` mirroring `base_stats`.
    pub fn new(base_stats: CharacterStats, skills: SkillSet) -> Self {
        Self {
            base_stats,
            cur_stats: base_stats,
            level: 0,
            exp: 0.0,
            skill_points: 0,
            skills,
            sneak_attack: false,
        }
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= GameConfig::MAX_LEVEL
    }
}
