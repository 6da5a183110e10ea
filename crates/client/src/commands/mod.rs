//! Subcommands of the demo client.

mod climb;
mod enemy;
mod ladder;
mod reclear;

pub use climb::Climb;
pub use enemy::Enemy;
pub use ladder::Ladder;
pub use reclear::Reclear;

use battle_runtime::MemberProgress;

/// One line per member that gained experience.
fn print_progress(progress: &[MemberProgress]) {
    for member in progress {
        let status = &member.status;
        if status.level_up > 0 {
            println!(
                "    {} +{} level(s), +{} skill point(s), +{} stat point(s)",
                member.name, status.level_up, status.skill_points, status.stat_points
            );
        } else {
            println!(
                "    {} {:.1}/{} exp",
                member.name, status.exp, status.exp_to_level
            );
        }
    }
}
