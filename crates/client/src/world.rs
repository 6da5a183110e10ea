//! Demo world: one player inventory with a freshly rolled party.

use std::time::Duration;

use anyhow::{Result, ensure};
use clap::Args;

use battle_runtime::{
    AtomicOp, EnemyCandidate, RuntimeConfig, StaticEnemyPool, Store, StoreKey, StoreValue,
    TowerRequest, TowerRuntime,
};
use gacha_core::{Character, CharacterId, GameConfig, Inventory, InventoryId, Party};

const PARTY_NAMES: [&str; GameConfig::MAX_PARTY_SIZE] = ["Aria", "Bram", "Cyra", "Dax", "Eun"];

const ENEMIES: [(&str, &str, u8); 10] = [
    ("slime", "Slime", 1),
    ("goblin", "Goblin", 1),
    ("harpy", "Harpy", 2),
    ("orc", "Orc", 2),
    ("golem", "Golem", 3),
    ("wyvern", "Wyvern", 3),
    ("lich", "Lich", 4),
    ("kraken", "Kraken", 4),
    ("dragon", "Dragon", 5),
    ("titan", "Titan", 5),
];

/// World setup shared by the runtime-backed commands
#[derive(Args, Debug, Clone)]
pub struct WorldArgs {
    /// Guild the tower belongs to (seeds every floor's enemy)
    #[arg(long, default_value = "demo-guild")]
    pub guild: String,

    /// Party star ratings in slot order
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = [5, 4, 3],
        value_parser = clap::value_parser!(u8).range(1..=5)
    )]
    pub party: Vec<u8>,

    /// Keys available at the start
    #[arg(long, default_value_t = 3)]
    pub keys: u32,

    /// Floors already cleared
    #[arg(long, default_value_t = 0)]
    pub cleared: u32,

    /// Pause between frames in milliseconds (overrides BATTLE_MESSAGE_DELAY_MS)
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

pub struct World {
    pub runtime: TowerRuntime,
    pub request: TowerRequest,
}

impl WorldArgs {
    /// Builds the runtime and seeds the player's inventory and party.
    pub async fn build(&self) -> Result<World> {
        ensure!(
            (1..=GameConfig::MAX_PARTY_SIZE).contains(&self.party.len()),
            "party needs 1 to {} members",
            GameConfig::MAX_PARTY_SIZE
        );

        let mut config = RuntimeConfig::from_env();
        if let Some(ms) = self.delay_ms {
            config = config.with_message_delay(Duration::from_millis(ms));
        }

        let runtime = TowerRuntime::builder()
            .config(config)
            .enemy_pool(enemy_pool())
            .build()?;

        let inventory_id = InventoryId::new(format!("{}:player", self.guild));
        let characters: Vec<Character> = self
            .party
            .iter()
            .zip(PARTY_NAMES)
            .enumerate()
            .map(|(slot, (&rating, name))| {
                Character::new(
                    CharacterId::new(format!("demo:{}", slot + 1)),
                    inventory_id.clone(),
                    rating,
                )
                .with_nickname(name)
            })
            .collect();

        let inventory = Inventory::new(inventory_id.clone())
            .with_party(Party::from_members(characters.iter().map(|c| c.id.clone())))
            .with_keys(self.keys)
            .with_floors_cleared(self.cleared.min(GameConfig::MAX_FLOORS));

        let mut op = AtomicOp::new().set(
            StoreKey::Inventory(inventory_id.clone()),
            StoreValue::Inventory(inventory),
        );
        for character in &characters {
            op = op.set(
                StoreKey::Character(character.id.clone()),
                StoreValue::Character(character.clone()),
            );
        }
        ensure!(
            runtime.store().commit(op).await?.is_committed(),
            "demo world already exists"
        );

        for character in &characters {
            let rolled = runtime.init_stats(&character.id).await?;
            if let Some(combat) = &rolled.combat {
                tracing::info!(
                    character = rolled.display_name(),
                    rating = rolled.rating,
                    attack = combat.base_stats.attack,
                    defense = combat.base_stats.defense,
                    speed = combat.base_stats.speed,
                    skills = ?combat.skills.keys().collect::<Vec<_>>(),
                    "party member ready"
                );
            }
        }

        Ok(World {
            runtime,
            request: TowerRequest::new(self.guild.clone(), inventory_id),
        })
    }
}

fn enemy_pool() -> StaticEnemyPool {
    StaticEnemyPool::new(
        ENEMIES
            .iter()
            .map(|&(id, name, rating)| EnemyCandidate {
                id: CharacterId::new(format!("demo-pack:{id}")),
                name: name.to_string(),
                rating,
            })
            .collect(),
    )
}
