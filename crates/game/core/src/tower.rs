//! Tower floor tables and seeded enemy generation.
//!
//! Floors are 1-indexed and repeat a ten-floor difficulty cycle; every tenth
//! floor is a boss floor with the highest enemy rating and experience
//! multiplier. Enemies are a pure function of `(floor, seed)` so that commit
//! retries and replays always face the same opponent.

use crate::battle::BattleStats;
use crate::config::GameConfig;
use crate::rng::LehmerRng;
use crate::skills::{SkillCatalog, SkillKey};
use crate::stats::roller::{draw_skills, roll_stats};

/// Seed shared by every player of a guild for a given floor.
pub fn floor_seed(guild_id: &str, floor: u32) -> String {
    format!("{guild_id}{floor}")
}

/// Number of ten-floor cycles started at `floor`, at least 1.
fn decade(floor: u32) -> u32 {
    floor.div_ceil(10).max(1)
}

/// Experience granted to each survivor for clearing `floor`.
pub fn floor_exp(floor: u32) -> f64 {
    let multiplier = match floor % 10 {
        1..=4 => 1.0,
        5 => 2.0,
        6..=9 => 1.5,
        _ => 3.0,
    };
    multiplier * f64::from(decade(floor))
}

/// Star rating of the enemy guarding `floor`.
pub const fn enemy_rating(floor: u32) -> u8 {
    match floor % 10 {
        1..=3 => 1,
        4 | 6 => 2,
        7..=9 => 3,
        5 => 4,
        _ => 5,
    }
}

pub fn enemy_skill_slots(floor: u32) -> usize {
    ((floor / GameConfig::FLOORS_PER_ENEMY_SKILL) as usize).min(SkillCatalog::len())
}

pub fn enemy_max_skill_level(floor: u32) -> u8 {
    (floor / GameConfig::FLOORS_PER_ENEMY_SKILL).clamp(1, u32::from(u8::MAX)) as u8
}

/// Stat points the enemy of `floor` is rolled with, before scaling.
pub fn enemy_stat_points(floor: u32) -> u32 {
    GameConfig::ENEMY_POINTS_PER_RATING * u32::from(enemy_rating(floor))
}

/// Generates the enemy for `floor`.
///
/// Skills and stats each draw from their own fresh generator built from
/// `seed`, so the same `(floor, seed)` pair always yields the same enemy.
/// Rolled stats are scaled by `floor ^ 0.5` and rounded; the enemy starts at
/// full HP.
pub fn create_enemy_stats(floor: u32, seed: &str) -> BattleStats {
    let cap = enemy_max_skill_level(floor);
    let skills = draw_skills(
        enemy_skill_slots(floor),
        |key: SkillKey| cap.min(SkillCatalog::get(key).max_level),
        &mut LehmerRng::new(seed),
    );

    let rolled = roll_stats(enemy_stat_points(floor), &mut LehmerRng::new(seed));
    let factor = f64::from(floor).powf(GameConfig::ENEMY_SCALING_EXPONENT);
    let scale = |value: u32| (f64::from(value) * factor).round() as u32;

    let hp = scale(rolled.hp);
    BattleStats {
        attack: scale(rolled.attack),
        defense: scale(rolled.defense),
        speed: scale(rolled.speed),
        hp,
        max_hp: hp,
        skills,
        sneak_attack: false,
    }
}

/// Progress marker of a floor in the ladder view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum FloorStatus {
    Cleared,
    Current,
    Undiscovered,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloorEntry {
    pub floor: u32,
    pub status: FloorStatus,
}

/// Five-floor window around the player's position, highest floor first.
///
/// The window starts at floors 1 to 5 and stops sliding at the last five
/// floors.
pub fn floor_ladder(cleared: u32) -> Vec<FloorEntry> {
    let max = GameConfig::MAX_FLOORS;
    let first = match cleared {
        0 | 1 => 1,
        c if c + 2 >= max => max - 4,
        c => c - 1,
    };

    (first..first + 5)
        .rev()
        .map(|floor| FloorEntry {
            floor,
            status: if floor == cleared + 1 {
                FloorStatus::Current
            } else if floor > cleared {
                FloorStatus::Undiscovered
            } else {
                FloorStatus::Cleared
            },
        })
        .collect()
}

/// Whether another floor can be challenged.
pub fn can_challenge(cleared: u32) -> bool {
    cleared < GameConfig::MAX_FLOORS
}

/// Whether a cleared floor exists to farm.
pub fn can_reclear(cleared: u32) -> bool {
    cleared > 0
}
