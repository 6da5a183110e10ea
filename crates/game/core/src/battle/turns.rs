//! Speed-based turn ordering.
//!
//! # Formula
//!
//! ```text
//! fastest            = party1 if speed1 > speed2 else party2
//! speed_diff_percent = (max − min) / min × 100
//! extra_turns        = min(floor(speed_diff_percent / 50), 2)
//! sequence           = [fastest] × (1 + extra_turns) ++ [slower]
//! ```
//!
//! Equal speeds favor party2: the comparison is strict, so the defending side
//! opens the exchange on a tie.

use arrayvec::ArrayVec;

use crate::config::GameConfig;

use super::{PartyMember, PartySide};

/// Cap on bonus turns granted by a speed advantage.
pub const MAX_EXTRA_TURNS: usize = 2;

/// Sides acting in one exchange, in order.
pub type TurnSequence = ArrayVec<PartySide, { GameConfig::MAX_TURNS_PER_EXCHANGE }>;

pub fn determine_fastest(party1: &PartyMember, party2: &PartyMember) -> PartySide {
    if party1.speed > party2.speed {
        PartySide::Party1
    } else {
        PartySide::Party2
    }
}

/// Percentage by which the faster speed exceeds the slower one.
///
/// A zero slower speed yields infinity (maximum bonus) unless both are zero.
pub fn speed_diff_percent(speed1: u32, speed2: u32) -> f64 {
    let (max, min) = if speed2 > speed1 {
        (speed2, speed1)
    } else {
        (speed1, speed2)
    };

    if min == 0 {
        return if max == 0 { 0.0 } else { f64::INFINITY };
    }

    f64::from(max - min) / f64::from(min) * 100.0
}

pub fn extra_turns(speed_diff_percent: f64) -> usize {
    (speed_diff_percent / 50.0).floor().min(MAX_EXTRA_TURNS as f64) as usize
}

/// Full turn order for an exchange between two front members.
pub fn turn_sequence(party1: &PartyMember, party2: &PartyMember) -> TurnSequence {
    let fastest = determine_fastest(party1, party2);
    let bonus = extra_turns(speed_diff_percent(party1.speed, party2.speed));

    let mut turns = TurnSequence::new();
    for _ in 0..=bonus {
        turns.push(fastest);
    }
    turns.push(fastest.opponent());
    turns
}

/// Combo index of turn `index` in a sequence of `len` turns.
///
/// Interior turns (bonus swings) get `index + 1`; the opening and closing
/// turns get 0.
pub fn combo_index(index: usize, len: usize) -> usize {
    if index > 0 && index + 1 < len { index + 1 } else { 0 }
}
