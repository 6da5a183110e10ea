//! Runtime configuration.
//!
//! Every knob has a default matching production pacing; [`RuntimeConfig::from_env`]
//! overrides them from the process environment.

use std::env;
use std::time::Duration;

use gacha_core::GameConfig;

/// Runtime configuration shared by the battle engine and tower controller.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    /// Pause before each rendered battle frame.
    pub message_delay: Duration,
    /// Lifetime of the battle state key; a stale battle expires after this.
    pub max_battle_time: Duration,
    /// Commit attempts before a write is abandoned.
    pub commit_max_attempts: u32,
    /// Maintenance switch. When off, every tower operation is refused.
    pub combat_enabled: bool,
    pub render_buffer_size: usize,
}

impl RuntimeConfig {
    pub const DEFAULT_MESSAGE_DELAY_MS: u64 = 2_000;
    pub const DEFAULT_MAX_BATTLE_TIME_SECS: u64 = 3 * 60;
    pub const DEFAULT_COMMIT_MAX_ATTEMPTS: u32 = 5;
    pub const DEFAULT_RENDER_BUFFER_SIZE: usize = 64;

    /// Loads configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    ///
    /// - `BATTLE_MESSAGE_DELAY_MS`
    /// - `BATTLE_MAX_TIME_SECS`
    /// - `COMMIT_MAX_ATTEMPTS` (at least 1)
    /// - `COMBAT_ENABLED`
    /// - `RENDER_BUFFER_SIZE` (at least 1)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = read_env::<u64>("BATTLE_MESSAGE_DELAY_MS") {
            config.message_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = read_env::<u64>("BATTLE_MAX_TIME_SECS") {
            config.max_battle_time = Duration::from_secs(secs.max(1));
        }
        if let Some(attempts) = read_env::<u32>("COMMIT_MAX_ATTEMPTS") {
            config.commit_max_attempts = attempts.max(1);
        }
        if let Some(enabled) = read_env_bool("COMBAT_ENABLED") {
            config.combat_enabled = enabled;
        }
        if let Some(capacity) = read_env::<usize>("RENDER_BUFFER_SIZE") {
            config.render_buffer_size = capacity.max(1);
        }

        config
    }

    /// Configuration with no pauses between frames, for tests and replays.
    pub fn instant() -> Self {
        Self {
            message_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_message_delay(mut self, delay: Duration) -> Self {
        self.message_delay = delay;
        self
    }

    pub fn with_combat_enabled(mut self, enabled: bool) -> Self {
        self.combat_enabled = enabled;
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            message_delay: Duration::from_millis(Self::DEFAULT_MESSAGE_DELAY_MS),
            max_battle_time: Duration::from_secs(Self::DEFAULT_MAX_BATTLE_TIME_SECS),
            commit_max_attempts: Self::DEFAULT_COMMIT_MAX_ATTEMPTS,
            combat_enabled: true,
            render_buffer_size: Self::DEFAULT_RENDER_BUFFER_SIZE,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
