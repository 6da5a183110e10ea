//! Runtime wrapper around a fighting character.

use bitflags::bitflags;

use crate::combat;
use crate::skills::{SkillKey, SkillSet};
use crate::state::CharacterId;
use crate::stats::CharacterCombat;

/// Which side of the battle a member fights on.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum PartySide {
    /// The challenging player.
    Party1,
    /// The defending side (tower enemy).
    Party2,
}

impl PartySide {
    pub const fn opponent(self) -> Self {
        match self {
            PartySide::Party1 => PartySide::Party2,
            PartySide::Party2 => PartySide::Party1,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            PartySide::Party1 => 0,
            PartySide::Party2 => 1,
        }
    }
}

bitflags! {
    /// Transient battle effects. Never persisted.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Effects: u8 {
        /// Loses its next action.
        const STUNNED = 1 << 0;
        /// Involved in a sneak attack this action (display only).
        const SNEAKY = 1 << 1;
    }
}

/// Combat numbers a member enters the battle with.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleStats {
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub skills: SkillSet,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sneak_attack: bool,
}

impl BattleStats {
    /// Battle stats of a player character, taken from its current stats.
    pub fn from_combat(combat: &CharacterCombat) -> Self {
        Self {
            attack: combat.cur_stats.attack,
            defense: combat.cur_stats.defense,
            speed: combat.cur_stats.speed,
            hp: combat.cur_stats.hp,
            max_hp: combat.cur_stats.hp,
            skills: combat.skills.clone(),
            sneak_attack: combat.sneak_attack,
        }
    }
}

/// A character taking part in one battle.
///
/// Created at battle start and discarded at the end; only the outcome is
/// persisted. `max_hp` is fixed for the whole battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartyMember {
    pub side: PartySide,
    /// Persisted character backing this member (`None` for generated enemies).
    pub character: Option<CharacterId>,
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub effects: Effects,
    pub skills: SkillSet,
    pub sneak_attack: bool,
}

impl PartyMember {
    pub fn new(side: PartySide, character: Option<CharacterId>, stats: BattleStats) -> Self {
        let name = character
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "enemy".to_string());

        Self {
            side,
            character,
            name,
            hp: stats.hp.min(stats.max_hp),
            max_hp: stats.max_hp,
            attack: stats.attack,
            defense: stats.defense,
            speed: stats.speed,
            effects: Effects::empty(),
            skills: stats.skills,
            sneak_attack: stats.sneak_attack,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_stunned(&self) -> bool {
        self.effects.contains(Effects::STUNNED)
    }

    /// Level held in `key`, if the member has the skill.
    pub fn skill_level(&self, key: SkillKey) -> Option<u8> {
        self.skills
            .get(&key)
            .map(|skill| skill.level)
            .filter(|level| *level > 0)
    }

    /// Removes HP, clamped at zero.
    pub fn damage(&mut self, amount: u32) {
        self.hp = combat::apply_damage(self.hp, amount);
    }

    /// Restores HP, clamped at `max_hp`.
    pub fn heal(&mut self, amount: u32) {
        self.hp = combat::apply_heal(self.hp, self.max_hp, amount);
    }

    /// Whether current HP is at most `percent` of max HP.
    pub fn is_hp_below_or_equals(&self, percent: u32) -> bool {
        if self.max_hp == 0 {
            return true;
        }
        u64::from(self.hp) * 100 <= u64::from(percent) * u64::from(self.max_hp)
    }

    pub fn view(&self) -> MemberView {
        MemberView {
            side: self.side,
            character: self.character.clone(),
            name: self.name.clone(),
            hp: self.hp,
            max_hp: self.max_hp,
            effects: self.effects,
        }
    }
}

/// Snapshot of a member for rendering a battle frame.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberView {
    pub side: PartySide,
    pub character: Option<CharacterId>,
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub effects: Effects,
}
