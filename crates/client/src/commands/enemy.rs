//! Offline view of a floor's enemy. Needs no runtime.

use anyhow::{Result, ensure};
use clap::Parser;

use gacha_core::tower::enemy_rating;
use gacha_core::{GameConfig, create_enemy_stats, floor_exp, floor_seed};

/// Print the generated enemy of a floor
#[derive(Parser, Debug)]
pub struct Enemy {
    /// Floor to inspect
    #[arg(long)]
    pub floor: u32,

    /// Guild whose seed is used
    #[arg(long, default_value = "demo-guild")]
    pub guild: String,

    /// Print the stats as JSON
    #[arg(long)]
    pub json: bool,
}

impl Enemy {
    pub fn execute(self) -> Result<()> {
        ensure!(
            (1..=GameConfig::MAX_FLOORS).contains(&self.floor),
            "floor must be between 1 and {}",
            GameConfig::MAX_FLOORS
        );

        let stats = create_enemy_stats(self.floor, &floor_seed(&self.guild, self.floor));

        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
            return Ok(());
        }

        println!(
            "Floor {} enemy: {} star(s), {:.1} exp per survivor",
            self.floor,
            enemy_rating(self.floor),
            floor_exp(self.floor)
        );
        println!(
            "  attack {}  defense {}  speed {}  hp {}",
            stats.attack, stats.defense, stats.speed, stats.hp
        );
        for (key, skill) in &stats.skills {
            println!("  {key} lv{}", skill.level);
        }
        Ok(())
    }
}
