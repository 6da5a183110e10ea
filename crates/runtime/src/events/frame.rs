use serde::{Deserialize, Serialize};

use gacha_core::{Battle, BattleStep, MemberView, PartySide, Winner};

/// What a frame shows on top of the two party panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FrameKind {
    Step(BattleStep),
    Finished(Winner),
}

/// Full render state of a battle at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleFrame {
    pub battle_id: String,
    pub title: String,
    pub party1: Vec<MemberView>,
    pub party2: Vec<MemberView>,
    pub kind: FrameKind,
}

impl BattleFrame {
    pub fn capture(battle_id: &str, title: &str, battle: &Battle, kind: FrameKind) -> Self {
        let views = |side: PartySide| -> Vec<MemberView> {
            battle.party(side).iter().map(|member| member.view()).collect()
        };
        Self {
            battle_id: battle_id.to_string(),
            title: title.to_string(),
            party1: views(PartySide::Party1),
            party2: views(PartySide::Party2),
            kind,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self.kind, FrameKind::Finished(_))
    }
}
