//! Damage calculation and application.

use crate::battle::PartyMember;

/// Every landed hit deals at least this much.
pub const MIN_DAMAGE: u32 = 1;

/// Calculate base damage of an attack.
///
/// # Formula
///
/// ```text
/// damage = max(attack − defense, 1)
/// ```
///
/// Skill bonuses (chain, crit) are added on top by
/// [`resolve_attack`](super::resolve_attack).
pub fn calculate_damage(attacker: &PartyMember, receiver: &PartyMember) -> u32 {
    attacker.attack.saturating_sub(receiver.defense).max(MIN_DAMAGE)
}

/// Apply damage to current HP, clamped to 0.
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}

/// Apply healing to current HP, clamped to `max_hp`.
pub fn apply_heal(current_hp: u32, max_hp: u32, amount: u32) -> u32 {
    current_hp.saturating_add(amount).min(max_hp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{BattleStats, PartySide};
    use crate::skills::SkillSet;

    fn member(attack: u32, defense: u32) -> PartyMember {
        let stats = BattleStats {
            attack,
            defense,
            speed: 1,
            hp: 10,
            max_hp: 10,
            skills: SkillSet::new(),
            sneak_attack: false,
        };
        PartyMember::new(PartySide::Party1, None, stats)
    }

    #[test]
    fn defense_above_attack_still_deals_one() {
        assert_eq!(calculate_damage(&member(10, 0), &member(0, 15)), 1);
        assert_eq!(calculate_damage(&member(0, 0), &member(0, 0)), 1);
    }

    #[test]
    fn damage_is_attack_minus_defense() {
        assert_eq!(calculate_damage(&member(12, 0), &member(0, 5)), 7);
    }

    #[test]
    fn hp_changes_are_clamped() {
        assert_eq!(apply_damage(3, 10), 0);
        assert_eq!(apply_heal(8, 10, 5), 10);
        assert_eq!(apply_heal(2, 10, 5), 7);
    }
}
