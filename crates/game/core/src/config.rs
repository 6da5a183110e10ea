/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Percentage of max HP at or below which a party healer steps in.
    pub heal_threshold_percent: u32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of characters in a stored party.
    pub const MAX_PARTY_SIZE: usize = 5;
    /// Longest possible turn sequence in one exchange (1 + 2 extra + 1).
    pub const MAX_TURNS_PER_EXCHANGE: usize = 4;

    /// Exchanges after which an undecided battle is called a draw.
    pub const MAX_EXCHANGES: u32 = 500;

    // ===== progression =====
    pub const MAX_LEVEL: u32 = 10;
    pub const EXP_PER_LEVEL: u32 = 10;
    pub const STAT_POINTS_PER_LEVEL: u32 = 3;
    pub const SKILL_POINTS_PER_LEVEL: u32 = 1;
    pub const HP_PER_LEVEL: u32 = 5;

    // ===== initialization =====
    /// HP every freshly rolled character starts with.
    pub const BASE_HP: u32 = 10;
    /// Unclaimed stat points per rating star at initialization.
    pub const STAT_POINTS_PER_RATING: u32 = 3;

    // ===== tower =====
    pub const MAX_FLOORS: u32 = 20;
    /// Enemy stat points per enemy rating star.
    pub const ENEMY_POINTS_PER_RATING: u32 = 9;
    /// Enemy stats are scaled by `floor ^ ENEMY_SCALING_EXPONENT`.
    pub const ENEMY_SCALING_EXPONENT: f64 = 0.5;
    /// Floors per enemy skill slot / skill level.
    pub const FLOORS_PER_ENEMY_SKILL: u32 = 5;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_HEAL_THRESHOLD_PERCENT: u32 = 25;

    pub fn new() -> Self {
        Self {
            heal_threshold_percent: Self::DEFAULT_HEAL_THRESHOLD_PERCENT,
        }
    }

    pub fn with_heal_threshold(heal_threshold_percent: u32) -> Self {
        Self {
            heal_threshold_percent,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
