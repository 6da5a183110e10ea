use anyhow::Result;
use clap::Parser;

use gacha_core::FloorStatus;

use crate::world::WorldArgs;

/// Show the floors around a position
#[derive(Parser, Debug)]
pub struct Ladder {
    #[command(flatten)]
    pub world: WorldArgs,
}

impl Ladder {
    pub async fn execute(self) -> Result<()> {
        let world = self.world.build().await?;
        let ladder = world
            .runtime
            .tower()
            .ladder(&world.request.inventory)
            .await?;

        for entry in ladder {
            let marker = match entry.status {
                FloorStatus::Cleared => "x",
                FloorStatus::Current => ">",
                FloorStatus::Undiscovered => " ",
            };
            println!("[{marker}] Floor {:>2}", entry.floor);
        }
        Ok(())
    }
}
