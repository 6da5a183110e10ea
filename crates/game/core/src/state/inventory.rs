use core::fmt;

use crate::config::GameConfig;

use super::CharacterId;

/// Identifier of a player's inventory within a guild instance.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct InventoryId(pub String);

impl InventoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InventoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered party slots. Empty slots are skipped, order decides who fights first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Party {
    pub members: [Option<CharacterId>; GameConfig::MAX_PARTY_SIZE],
}

impl Party {
    /// Builds a party from up to five ids; extra ids are ignored.
    pub fn from_members<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = CharacterId>,
    {
        let mut party = Self::default();
        for (slot, id) in party.members.iter_mut().zip(ids) {
            *slot = Some(id);
        }
        party
    }

    /// Filled slots in order.
    pub fn iter(&self) -> impl Iterator<Item = &CharacterId> {
        self.members.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Tower-relevant slice of a player's inventory.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    pub id: InventoryId,
    pub party: Party,
    pub available_keys: u32,
    pub floors_cleared: u32,
}

impl Inventory {
    pub fn new(id: InventoryId) -> Self {
        Self {
            id,
            party: Party::default(),
            available_keys: 0,
            floors_cleared: 0,
        }
    }

    pub fn with_party(mut self, party: Party) -> Self {
        self.party = party;
        self
    }

    pub fn with_keys(mut self, available_keys: u32) -> Self {
        self.available_keys = available_keys;
        self
    }

    pub fn with_floors_cleared(mut self, floors_cleared: u32) -> Self {
        self.floors_cleared = floors_cleared;
        self
    }

    /// Next floor to challenge.
    pub fn current_floor(&self) -> u32 {
        self.floors_cleared + 1
    }

    /// Spends up to `amount` keys and returns how many were spent.
    pub fn consume_keys(&mut self, amount: u32) -> u32 {
        let spent = amount.min(self.available_keys);
        self.available_keys -= spent;
        spent
    }

    /// Spends every available key and returns how many were spent.
    pub fn consume_all_keys(&mut self) -> u32 {
        core::mem::take(&mut self.available_keys)
    }
}
