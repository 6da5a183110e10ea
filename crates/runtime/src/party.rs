//! Party resolution and first-time stat initialization.

use gacha_core::{
    BattleStats, Character, CharacterId, Inventory, PartyMember, PartySide, UnseededRng,
    ensure_init_stats,
};

use crate::api::{Result, RuntimeError};
use crate::repository::{AtomicOp, CommitOutcome, Store, Versioned};
use crate::retry::RetryPolicy;

/// Loads the characters of an inventory's party, in slot order.
///
/// Fails with [`RuntimeError::EmptyParty`] when no slot is filled and with
/// [`RuntimeError::UninitializedCombat`] when a member has never had its
/// stats rolled.
pub async fn resolve_party(store: &dyn Store, inventory: &Inventory) -> Result<Vec<Versioned<Character>>> {
    if inventory.party.is_empty() {
        return Err(RuntimeError::EmptyParty);
    }

    let mut characters = Vec::new();
    for id in inventory.party.iter() {
        let character = store
            .character(id)
            .await?
            .ok_or_else(|| RuntimeError::CharacterNotFound(id.clone()))?;

        if character.value.combat.is_none() {
            return Err(RuntimeError::UninitializedCombat {
                character: id.clone(),
            });
        }
        characters.push(character);
    }

    Ok(characters)
}

/// Battle member for a resolved character.
///
/// Characters without combat data are skipped; [`resolve_party`] already
/// rejects them.
pub fn party_member(side: PartySide, character: &Character) -> Option<PartyMember> {
    let combat = character.combat.as_ref()?;
    Some(
        PartyMember::new(side, Some(character.id.clone()), BattleStats::from_combat(combat))
            .with_name(character.display_name()),
    )
}

/// Rolls stats for a character that has none yet.
///
/// Already initialized characters are returned unchanged. The roll is
/// unseeded; a commit conflict re-reads the character and rolls again.
pub async fn init_stats(
    store: &dyn Store,
    retry: &dyn RetryPolicy,
    character_id: &CharacterId,
) -> Result<Character> {
    let mut attempt = 0;
    loop {
        attempt += 1;

        let mut read = store
            .character(character_id)
            .await?
            .ok_or_else(|| RuntimeError::CharacterNotFound(character_id.clone()))?;

        if !ensure_init_stats(&mut read.value, &mut UnseededRng) {
            return Ok(read.value);
        }

        let character = read.value.clone();
        match store.commit(AtomicOp::new().update_character(read)).await? {
            CommitOutcome::Committed { .. } => {
                tracing::info!(target: "tower", character = %character_id, "combat stats initialized");
                return Ok(character);
            }
            CommitOutcome::Conflict if retry.should_retry(attempt) => {
                tracing::debug!(target: "tower", character = %character_id, attempt, "init conflict, retrying");
            }
            CommitOutcome::Conflict => return Err(retry.exhausted("init_stats")),
        }
    }
}
