use core::fmt;

use crate::stats::CharacterCombat;

use super::InventoryId;

/// Identifier of an owned character (`"{pack}:{id}"`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CharacterId(pub String);

impl CharacterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A character owned by a player's inventory.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Character {
    pub id: CharacterId,
    pub inventory: InventoryId,
    /// Star rating, 1 to 5.
    pub rating: u8,
    pub nickname: Option<String>,
    /// `None` until stats are rolled for the first time.
    pub combat: Option<CharacterCombat>,
}

impl Character {
    pub fn new(id: CharacterId, inventory: InventoryId, rating: u8) -> Self {
        Self {
            id,
            inventory,
            rating,
            nickname: None,
            combat: None,
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn with_combat(mut self, combat: CharacterCombat) -> Self {
        self.combat = Some(combat);
        self
    }

    /// Display name: nickname when set, otherwise the id.
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(self.id.as_str())
    }
}
