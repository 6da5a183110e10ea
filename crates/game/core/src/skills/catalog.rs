//! Fixed skill registry and activation rules.
//!
//! # Activation Table
//!
//! | Skill     | Trigger                 | Effect (levels 1 / 2 / 3)                  |
//! |-----------|-------------------------|--------------------------------------------|
//! | chain     | combo turn only         | +ceil(damage × 20 / 35 / 50 %)              |
//! | crit      | roll ≤ 5 / 10 / 15      | +round(attack × 30 / 45 / 60 %)             |
//! | stun      | roll ≤ 5 / 10 / 15      | receiver stunned                           |
//! | lifesteal | every hit               | heal round(damage × 5 / 15 / 25 %)          |
//! | heal      | ally at low HP          | heal round(healer max HP × 5 / 15 / 25 %)   |
//!
//! Activations are pure: the chance roll is part of [`SkillContext`] and is
//! drawn by the battle engine from its seeded generator.

use crate::battle::PartyMember;

use super::SkillKey;

/// Inputs available to a skill activation.
#[derive(Clone, Copy, Debug)]
pub struct SkillContext<'a> {
    /// Skill level held by the acting member (clamped to the skill's max).
    pub level: u8,
    /// Member activating the skill (attacker, or healer for `heal`).
    pub attacking: &'a PartyMember,
    /// Damage computed so far in the current action.
    pub damage: u32,
    /// Combo index of the current turn (0 outside of bonus turns).
    pub combo: usize,
    /// Chance roll in `1..=100`.
    pub roll: u32,
}

/// Result of a skill activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkillEffect {
    /// The skill did not trigger.
    None,
    /// Additional damage on top of the base hit.
    ExtraDamage(u32),
    /// The receiver is stunned.
    Stun,
    /// HP restored to the skill's beneficiary.
    Heal(u32),
}

impl SkillEffect {
    pub fn extra_damage(self) -> Option<u32> {
        match self {
            SkillEffect::ExtraDamage(amount) => Some(amount),
            _ => None,
        }
    }

    pub fn heal(self) -> Option<u32> {
        match self {
            SkillEffect::Heal(amount) => Some(amount),
            _ => None,
        }
    }

    pub fn is_stun(self) -> bool {
        matches!(self, SkillEffect::Stun)
    }
}

/// Static definition of a skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Skill {
    pub key: SkillKey,
    pub max_level: u8,
    /// Trigger chance per level, in percent. `None` for skills that always apply.
    chance: Option<[u32; 3]>,
    /// Effect magnitude per level, in percent.
    scale: [u32; 3],
}

impl Skill {
    /// Runs the activation for the given context.
    pub fn activate(&self, ctx: &SkillContext<'_>) -> SkillEffect {
        let tier = self.tier(ctx.level);

        if let Some(chance) = self.chance
            && ctx.roll > chance[tier]
        {
            return SkillEffect::None;
        }

        let pct = self.scale[tier];

        match self.key {
            SkillKey::Chain => {
                if ctx.combo == 0 || ctx.damage == 0 {
                    return SkillEffect::None;
                }
                SkillEffect::ExtraDamage((ctx.damage * pct).div_ceil(100))
            }
            SkillKey::Crit => match percent_of(ctx.attacking.attack, pct) {
                0 => SkillEffect::None,
                extra => SkillEffect::ExtraDamage(extra),
            },
            SkillKey::Stun => SkillEffect::Stun,
            SkillKey::Lifesteal => match percent_of(ctx.damage, pct) {
                0 => SkillEffect::None,
                amount => SkillEffect::Heal(amount),
            },
            SkillKey::Heal => match percent_of(ctx.attacking.max_hp, pct) {
                0 => SkillEffect::None,
                amount => SkillEffect::Heal(amount),
            },
        }
    }

    /// Whether activation is gated by a chance roll.
    pub fn has_chance(&self) -> bool {
        self.chance.is_some()
    }

    /// Zero-based index into the per-level tables.
    fn tier(&self, level: u8) -> usize {
        usize::from(level.clamp(1, self.max_level)) - 1
    }
}

/// `round(value × pct / 100)`, rounding halves up.
fn percent_of(value: u32, pct: u32) -> u32 {
    (value * pct + 50) / 100
}

/// Registry of every skill, in [`SkillKey::ALL`] order.
pub struct SkillCatalog;

impl SkillCatalog {
    const SKILLS: [Skill; 5] = [
        Skill {
            key: SkillKey::Chain,
            max_level: 3,
            chance: None,
            scale: [20, 35, 50],
        },
        Skill {
            key: SkillKey::Crit,
            max_level: 3,
            chance: Some([5, 10, 15]),
            scale: [30, 45, 60],
        },
        Skill {
            key: SkillKey::Stun,
            max_level: 3,
            chance: Some([5, 10, 15]),
            scale: [0, 0, 0],
        },
        Skill {
            key: SkillKey::Lifesteal,
            max_level: 3,
            chance: None,
            scale: [5, 15, 25],
        },
        Skill {
            key: SkillKey::Heal,
            max_level: 3,
            chance: None,
            scale: [5, 15, 25],
        },
    ];

    pub fn get(key: SkillKey) -> &'static Skill {
        match key {
            SkillKey::Chain => &Self::SKILLS[0],
            SkillKey::Crit => &Self::SKILLS[1],
            SkillKey::Stun => &Self::SKILLS[2],
            SkillKey::Lifesteal => &Self::SKILLS[3],
            SkillKey::Heal => &Self::SKILLS[4],
        }
    }

    pub fn all() -> &'static [Skill] {
        &Self::SKILLS
    }

    pub fn len() -> usize {
        Self::SKILLS.len()
    }
}
