//! Combat skills a character can carry into battle.
//!
//! The set of skills is fixed; [`SkillCatalog`] exposes each skill's
//! declared maximum level and its activation function. Characters store only
//! `SkillKey → level` in a [`SkillSet`].

mod catalog;

use std::collections::BTreeMap;

pub use catalog::{Skill, SkillCatalog, SkillContext, SkillEffect};

/// Identifier of an activatable combat skill.
///
/// The declaration order is the catalog order used by seeded skill
/// assignment, so it must stay stable.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SkillKey {
    /// Bonus damage on combo turns.
    Chain,
    /// Chance for bonus damage scaled by attack.
    Crit,
    /// Chance to make the receiver lose its next action.
    Stun,
    /// Heals the attacker for part of the damage dealt.
    Lifesteal,
    /// Heals a low-HP ally once per exchange.
    Heal,
}

impl SkillKey {
    /// All skills in catalog order.
    pub const ALL: [SkillKey; 5] = [
        SkillKey::Chain,
        SkillKey::Crit,
        SkillKey::Stun,
        SkillKey::Lifesteal,
        SkillKey::Heal,
    ];
}

/// Level a character holds in one skill (1-indexed).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillLevel {
    pub level: u8,
}

impl SkillLevel {
    pub const fn new(level: u8) -> Self {
        Self { level }
    }
}

/// Skills owned by a character, keyed by skill.
pub type SkillSet = BTreeMap<SkillKey, SkillLevel>;
