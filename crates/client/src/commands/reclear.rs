use anyhow::Result;
use clap::Parser;

use crate::world::WorldArgs;

/// Spend every key on the highest cleared floor
#[derive(Parser, Debug)]
pub struct Reclear {
    #[command(flatten)]
    pub world: WorldArgs,
}

impl Reclear {
    pub async fn execute(self) -> Result<()> {
        let world = self.world.build().await?;
        let outcome = world.runtime.tower().reclear(&world.request).await?;

        println!(
            "Reclear of floor {}: {} key(s) spent, {:.1} exp per member",
            outcome.floor, outcome.keys_spent, outcome.exp_per_member
        );
        super::print_progress(&outcome.progress);
        Ok(())
    }
}
