//! Challenge floors until keys run out or the tower is cleared.

use anyhow::Result;
use clap::Parser;

use battle_runtime::RuntimeError;

use crate::render;
use crate::world::WorldArgs;

/// Challenge floors one after another
#[derive(Parser, Debug)]
pub struct Climb {
    #[command(flatten)]
    pub world: WorldArgs,

    /// Stop after this many challenges (default: until out of keys)
    #[arg(long)]
    pub challenges: Option<u32>,

    /// Print frames as JSON lines
    #[arg(long)]
    pub json: bool,
}

impl Climb {
    pub async fn execute(self) -> Result<()> {
        let world = self.world.build().await?;
        let renderer = render::spawn(&world.runtime, self.json);

        let limit = self.challenges.unwrap_or(u32::MAX);
        for _ in 0..limit {
            let outcome = match world.runtime.tower().challenge(&world.request).await {
                Ok(outcome) => outcome,
                Err(err @ (RuntimeError::InsufficientKeys | RuntimeError::MaxFloorCleared { .. })) => {
                    println!("{err}");
                    break;
                }
                Err(err) => return Err(err.into()),
            };

            println!(
                "Floor {}: {} against {} ({} floor(s) cleared, {} key(s) left)",
                outcome.floor,
                if outcome.is_victory() { "victory" } else { "defeat" },
                outcome.enemy.name,
                outcome.floors_cleared,
                outcome.keys_left,
            );
            super::print_progress(&outcome.progress);
        }

        drop(world);
        renderer.await?;
        Ok(())
    }
}
