//! Experience, level-ups and stat point redistribution.
//!
//! # Formulas
//!
//! ```text
//! exp_to_level(level) = max(level, 1) × 10
//!
//! per level-up:  +1 skill point, +3 stat points
//! bonus (first matching row, by new level):
//!     ≥ 10 → +1 skill, +6 stat
//!     ≥ 20 → +2 skill, +9 stat
//!     ≥ 40 → +3 skill, +15 stat
//! ```
//!
//! The ≥20 and ≥40 rows can never match while `MAX_LEVEL` is 10 (and the
//! ≥10 row shadows them). They are kept as the declared table.

use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};

use super::{CharacterCombat, CharacterStats};

/// Errors raised while applying progression.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProgressionError {
    /// Proportional redistribution needs a non-zero base stat sum.
    #[error("cannot distribute {points} stat points: base stats sum to zero")]
    ZeroBaseStats { points: u32 },
}

impl GameError for ProgressionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroBaseStats { .. } => "PROGRESSION_ZERO_BASE_STATS",
        }
    }
}

/// Outcome of one experience grant, as reported to the player.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperienceStatus {
    /// Levels gained by this grant.
    pub level_up: u32,
    pub skill_points: u32,
    pub stat_points: u32,
    /// Experience carried towards the next level.
    pub exp: f64,
    /// Experience required for the next level.
    pub exp_to_level: u32,
}

/// `(minimum new level, bonus skill points, bonus stat points)`.
const LEVEL_BONUSES: [(u32, u32, u32); 3] = [(10, 1, 3 * 2), (20, 2, 3 * 3), (40, 3, 3 * 5)];

/// Experience needed to leave `level`. Level 0 shares level 1's requirement.
pub const fn exp_to_level(level: u32) -> u32 {
    let level = if level == 0 { 1 } else { level };
    level * GameConfig::EXP_PER_LEVEL
}

/// Adds `gained` experience, levels the character up and redistributes the
/// earned stat points into `cur_stats`.
///
/// Level never decreases. On return `exp < exp_to_level(level)` unless the
/// character sits at [`GameConfig::MAX_LEVEL`], where experience keeps
/// accumulating.
pub fn apply_experience(
    combat: &mut CharacterCombat,
    gained: f64,
) -> Result<ExperienceStatus, ProgressionError> {
    let mut status = ExperienceStatus::default();

    combat.exp += gained.max(0.0);

    while combat.level < GameConfig::MAX_LEVEL
        && combat.exp >= f64::from(exp_to_level(combat.level))
    {
        combat.exp -= f64::from(exp_to_level(combat.level));

        combat.level += 1;
        combat.skill_points += GameConfig::SKILL_POINTS_PER_LEVEL;

        status.level_up += 1;
        status.skill_points += GameConfig::SKILL_POINTS_PER_LEVEL;
        status.stat_points += GameConfig::STAT_POINTS_PER_LEVEL;

        if let Some(&(_, skill, stat)) = LEVEL_BONUSES
            .iter()
            .find(|(threshold, _, _)| combat.level >= *threshold)
        {
            combat.skill_points += skill;
            status.skill_points += skill;
            status.stat_points += stat;
        }
    }

    status.exp = combat.exp;
    status.exp_to_level = exp_to_level(combat.level);

    if status.stat_points > 0 {
        distribute_stat_points(combat, status.stat_points, status.level_up)?;
    }

    Ok(status)
}

/// Splits `points` across attack/defense/speed proportionally to the base
/// stats and adds them (plus `5 × levels_gained` HP) to `cur_stats`.
///
/// Returns the distributed amounts; their `points()` always equals `points`.
pub fn distribute_stat_points(
    combat: &mut CharacterCombat,
    points: u32,
    levels_gained: u32,
) -> Result<CharacterStats, ProgressionError> {
    let [attack, defense, speed] = allocate(&combat.base_stats, points)?;

    combat.cur_stats.attack += attack;
    combat.cur_stats.defense += defense;
    combat.cur_stats.speed += speed;
    combat.cur_stats.hp += GameConfig::HP_PER_LEVEL * levels_gained;

    Ok(CharacterStats::new(
        attack,
        defense,
        speed,
        GameConfig::HP_PER_LEVEL * levels_gained,
    ))
}

// Adjustment order when several stats tie: speed, defense, attack.
const SPEED: usize = 2;
const DEFENSE: usize = 1;
const ATTACK: usize = 0;
const TIE_ORDER: [usize; 3] = [SPEED, DEFENSE, ATTACK];

fn allocate(base: &CharacterStats, points: u32) -> Result<[u32; 3], ProgressionError> {
    let sum = base.points();
    if sum == 0 {
        return Err(ProgressionError::ZeroBaseStats { points });
    }

    let share = |stat: u32| (f64::from(points) * (f64::from(stat) / f64::from(sum))).round() as u32;

    let mut split = [share(base.attack), share(base.defense), share(base.speed)];

    while split.iter().sum::<u32>() > points {
        let largest = pick(&split, |candidate, best| candidate > best);
        split[largest] -= 1;
    }

    while split.iter().sum::<u32>() < points {
        let smallest = pick(&split, |candidate, best| candidate < best);
        split[smallest] += 1;
    }

    Ok(split)
}

/// Index of the extreme value under `better`, ties resolved by [`TIE_ORDER`].
fn pick(split: &[u32; 3], better: impl Fn(u32, u32) -> bool) -> usize {
    let mut chosen = TIE_ORDER[0];
    for &index in &TIE_ORDER[1..] {
        if better(split[index], split[chosen]) {
            chosen = index;
        }
    }
    chosen
}
