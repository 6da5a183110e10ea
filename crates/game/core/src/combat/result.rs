//! Combat result types and attack resolution.

use arrayvec::ArrayVec;

use crate::battle::PartyMember;
use crate::rng::RandomSource;
use crate::skills::{SkillCatalog, SkillContext, SkillEffect, SkillKey};

use super::damage::calculate_damage;

/// Skill that modified a hit, shown next to the damage number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum HitTag {
    Chained,
    Crit,
}

/// Result of a combat resolution.
///
/// Nothing is applied yet: the caller removes `damage` from the receiver,
/// stuns it when `stunned` and heals the attacker by `lifesteal`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackResult {
    /// Total damage including skill bonuses. Always at least 1.
    pub damage: u32,
    pub tags: ArrayVec<HitTag, 2>,
    pub stunned: bool,
    pub lifesteal: u32,
}

impl AttackResult {
    pub fn has_tag(&self, tag: HitTag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Resolve a complete attack.
///
/// Skills are evaluated in a fixed order: chain, crit, stun, then lifesteal on
/// the final damage. A chance roll is drawn from `rng` only for skills the
/// attacker actually holds, so members without skills never advance it.
///
/// # Arguments
///
/// * `attacker` - Acting member
/// * `receiver` - Member taking the hit
/// * `combo` - Combo index of the current turn (0 outside bonus turns)
/// * `rng` - Battle generator supplying chance rolls
pub fn resolve_attack(
    attacker: &PartyMember,
    receiver: &PartyMember,
    combo: usize,
    rng: &mut impl RandomSource,
) -> AttackResult {
    let mut result = AttackResult {
        damage: calculate_damage(attacker, receiver),
        ..AttackResult::default()
    };

    if let Some(effect) = activate(SkillKey::Chain, attacker, result.damage, combo, rng)
        && let Some(extra) = effect.extra_damage()
    {
        result.damage += extra;
        result.tags.push(HitTag::Chained);
    }

    if let Some(effect) = activate(SkillKey::Crit, attacker, result.damage, combo, rng)
        && let Some(extra) = effect.extra_damage()
    {
        result.damage += extra;
        result.tags.push(HitTag::Crit);
    }

    result.stunned = activate(SkillKey::Stun, attacker, result.damage, combo, rng)
        .is_some_and(SkillEffect::is_stun);

    result.lifesteal = activate(SkillKey::Lifesteal, attacker, result.damage, combo, rng)
        .and_then(SkillEffect::heal)
        .unwrap_or(0);

    result
}

/// Runs `key` for `attacker` if it holds the skill.
fn activate(
    key: SkillKey,
    attacker: &PartyMember,
    damage: u32,
    combo: usize,
    rng: &mut impl RandomSource,
) -> Option<SkillEffect> {
    let level = attacker.skill_level(key)?;
    let skill = SkillCatalog::get(key);
    let roll = if skill.has_chance() { rng.roll_percent() } else { 0 };

    let ctx = SkillContext {
        level,
        attacking: attacker,
        damage,
        combo,
        roll,
    };
    Some(skill.activate(&ctx))
}
