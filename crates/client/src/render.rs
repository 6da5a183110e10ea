//! Terminal renderer for battle frames.
//!
//! Frames arrive over the runtime's broadcast channel. Ctrl-C skips the
//! battle on screen; with no battle running it exits.

use std::fmt::Write as _;
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use battle_runtime::{BattleFrame, FrameKind, Store, TowerRuntime, skip_battle};
use gacha_core::{ActionOutcome, BattleStep, Effects, MemberView, Winner};

const HP_BAR_WIDTH: u32 = 10;

/// Prints every frame until the runtime is dropped.
pub fn spawn(runtime: &TowerRuntime, json: bool) -> JoinHandle<()> {
    let mut frames = runtime.subscribe_frames();
    let store = runtime.store();

    tokio::spawn(async move {
        let mut on_screen: Option<String> = None;
        loop {
            tokio::select! {
                frame = frames.recv() => match frame {
                    Ok(frame) => {
                        on_screen = (!frame.is_final()).then(|| frame.battle_id.clone());
                        print_frame(&frame, json);
                    }
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "renderer fell behind, frames dropped");
                    }
                    Err(RecvError::Closed) => break,
                },
                signal = tokio::signal::ctrl_c() => {
                    if let Err(err) = signal {
                        tracing::error!(error = %err, "cannot listen for ctrl-c");
                        break;
                    }
                    match on_screen.take() {
                        Some(battle_id) => skip(&store, &battle_id).await,
                        None => std::process::exit(130),
                    }
                }
            }
        }
    })
}

async fn skip(store: &Arc<dyn Store>, battle_id: &str) {
    match skip_battle(&**store, battle_id).await {
        Ok(true) => println!("-- battle {battle_id} skipped --"),
        Ok(false) => {}
        Err(err) => tracing::warn!(battle_id, error = %err, "skip failed"),
    }
}

fn print_frame(frame: &BattleFrame, json: bool) {
    if json {
        match serde_json::to_string(frame) {
            Ok(line) => println!("{line}"),
            Err(err) => tracing::warn!(error = %err, "frame not serializable"),
        }
        return;
    }

    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}", frame.battle_id, frame.title);
    for (left, right) in panel_rows(&frame.party1, &frame.party2) {
        let _ = writeln!(out, "  {left:<32}{right}");
    }
    let _ = writeln!(out, "  > {}", describe(&frame.kind));
    println!("{out}");
}

fn panel_rows(party1: &[MemberView], party2: &[MemberView]) -> Vec<(String, String)> {
    let rows = party1.len().max(party2.len());
    (0..rows)
        .map(|i| {
            (
                party1.get(i).map(member_line).unwrap_or_default(),
                party2.get(i).map(member_line).unwrap_or_default(),
            )
        })
        .collect()
}

fn member_line(member: &MemberView) -> String {
    let filled = if member.max_hp == 0 {
        0
    } else {
        (member.hp * HP_BAR_WIDTH).div_ceil(member.max_hp)
    };
    let bar: String = (0..HP_BAR_WIDTH)
        .map(|i| if i < filled { '#' } else { '.' })
        .collect();

    let mut line = format!("{} [{bar}] {}/{}", member.name, member.hp, member.max_hp);
    if member.effects.contains(Effects::STUNNED) {
        line.push_str(" zz");
    }
    if member.effects.contains(Effects::SNEAKY) {
        line.push_str(" ~");
    }
    line
}

fn describe(kind: &FrameKind) -> String {
    match kind {
        FrameKind::Step(BattleStep::Preparing {
            attacker,
            receiver,
            combo,
        }) => match combo {
            0 => format!("{} prepares to attack {}", attacker.name, receiver.name),
            n => format!("{} lines up combo hit {n} on {}", attacker.name, receiver.name),
        },
        FrameKind::Step(BattleStep::Action {
            attacker,
            outcome: ActionOutcome::Recovered,
            ..
        }) => format!("{} shakes off the stun", attacker.name),
        FrameKind::Step(BattleStep::Action {
            attacker,
            receiver,
            outcome: ActionOutcome::Hit(hit),
            ..
        }) => {
            let mut line = format!("{} hits {} for {}", attacker.name, receiver.name, hit.damage);
            if !hit.tags.is_empty() {
                let tags: Vec<&str> = hit.tags.iter().map(|tag| tag.as_ref()).collect();
                let _ = write!(line, " ({})", tags.join(", "));
            }
            if hit.stunned {
                let _ = write!(line, ", {} is stunned", receiver.name);
            }
            if hit.lifesteal > 0 {
                let _ = write!(line, ", drains {} HP", hit.lifesteal);
            }
            line
        }
        FrameKind::Step(BattleStep::Heal {
            healer,
            target,
            amount,
        }) => format!("{} heals {} for {amount}", healer.name, target.name),
        FrameKind::Finished(Winner::Party1) => "Victory!".to_string(),
        FrameKind::Finished(Winner::Party2) => "Defeat.".to_string(),
        FrameKind::Finished(Winner::Draw) => "Draw.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gacha_core::PartySide;

    fn view(hp: u32, max_hp: u32) -> MemberView {
        MemberView {
            side: PartySide::Party1,
            character: None,
            name: "Aria".to_string(),
            hp,
            max_hp,
            effects: Effects::STUNNED,
        }
    }

    #[test]
    fn hp_bar_rounds_up_while_alive() {
        assert_eq!(member_line(&view(1, 100)), "Aria [#.........] 1/100 zz");
        assert_eq!(member_line(&view(0, 100)), "Aria [..........] 0/100 zz");
        assert_eq!(member_line(&view(0, 0)), "Aria [..........] 0/0 zz");
    }

    #[test]
    fn finished_frames_name_the_outcome() {
        assert_eq!(describe(&FrameKind::Finished(Winner::Draw)), "Draw.");
    }
}
