//! Base stat rolls and first-time combat initialization.

use crate::config::GameConfig;
use crate::rng::RandomSource;
use crate::skills::{SkillKey, SkillLevel, SkillSet};
use crate::state::Character;

use super::{CharacterCombat, CharacterStats};

/// Distributes `total_points` one at a time among attack, defense and speed.
///
/// Each trial draws `floor(next_float × 3)`: 0 → attack, 1 → defense,
/// 2 → speed. HP is always [`GameConfig::BASE_HP`]. With a seeded source the
/// result is bit-identical for the same seed and total.
pub fn roll_stats(total_points: u32, rng: &mut impl RandomSource) -> CharacterStats {
    let mut stats = CharacterStats::new(0, 0, 0, GameConfig::BASE_HP);

    for _ in 0..total_points {
        match rng.pick_index(3) {
            0 => stats.attack += 1,
            1 => stats.defense += 1,
            _ => stats.speed += 1,
        }
    }

    stats
}

/// Number of skills a freshly initialized character receives.
pub const fn skill_slots(rating: u8) -> usize {
    match rating {
        5 => 2,
        4 => 1,
        _ => 0,
    }
}

/// Stat budget of a freshly initialized character.
pub const fn unclaimed_points(rating: u8) -> u32 {
    GameConfig::STAT_POINTS_PER_RATING * rating as u32
}

/// Picks `slots` distinct skills by splicing random entries out of the
/// catalog order.
pub(crate) fn draw_skills(slots: usize, level: impl Fn(SkillKey) -> u8, rng: &mut impl RandomSource) -> SkillSet {
    let mut pool = SkillKey::ALL.to_vec();
    let mut skills = SkillSet::new();

    for _ in 0..slots {
        if pool.is_empty() {
            break;
        }
        let key = pool.remove(rng.pick_index(pool.len()));
        skills.insert(key, SkillLevel::new(level(key)));
    }

    skills
}

/// Rolls base stats and skills for a character that has none yet.
///
/// Returns `true` when the character was initialized by this call; already
/// initialized characters are left untouched.
pub fn ensure_init_stats(character: &mut Character, rng: &mut impl RandomSource) -> bool {
    if character.combat.is_some() {
        return false;
    }

    let base = roll_stats(unclaimed_points(character.rating), rng);
    let skills = draw_skills(skill_slots(character.rating), |_| 1, rng);

    character.combat = Some(CharacterCombat::new(base, skills));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{LehmerRng, UnseededRng};
    use crate::state::{CharacterId, InventoryId};

    #[test]
    fn seeded_rolls_are_reproducible() {
        let first = roll_stats(9, &mut LehmerRng::new("a"));
        let second = roll_stats(9, &mut LehmerRng::new("a"));
        assert_eq!(first, second);
        assert_eq!(first.points(), 9);
        assert_eq!(first.hp, 10);
    }

    #[test]
    fn rolls_conserve_the_budget() {
        for total in [0, 1, 2, 3, 15, 45, 200] {
            let seeded = roll_stats(total, &mut LehmerRng::new("budget"));
            assert_eq!(seeded.points(), total);
            let unseeded = roll_stats(total, &mut UnseededRng);
            assert_eq!(unseeded.points(), total);
        }
    }

    #[test]
    fn skill_slots_follow_rating() {
        assert_eq!(skill_slots(1), 0);
        assert_eq!(skill_slots(3), 0);
        assert_eq!(skill_slots(4), 1);
        assert_eq!(skill_slots(5), 2);
        assert_eq!(unclaimed_points(5), 15);
    }

    #[test]
    fn initialization_is_idempotent() {
        let mut character = Character::new(CharacterId::new("pack:1"), InventoryId::new("inv"), 5);
        let mut rng = LehmerRng::new("init");

        assert!(ensure_init_stats(&mut character, &mut rng));
        let combat = character.combat.clone().unwrap();
        assert_eq!(combat.base_stats.points(), 15);
        assert_eq!(combat.cur_stats, combat.base_stats);
        assert_eq!(combat.skills.len(), 2);
        assert!(combat.skills.values().all(|s| s.level == 1));

        assert!(!ensure_init_stats(&mut character, &mut rng));
        assert_eq!(character.combat.unwrap(), combat);
    }
}
