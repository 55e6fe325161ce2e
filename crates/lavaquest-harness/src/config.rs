use serde::Deserialize;

use lavaquest_core::config::GameTuning;

/// Top-level harness configuration, loaded from `lavaquest.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub game: GameTuning,
    pub run: RunConfig,
}

/// Driver settings: how many sessions to run and how to play them out.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Base seed for the run; 0 draws one from the OS.
    pub seed: u64,
    /// Sessions to play back to back. Session `i` uses `seed + i`.
    pub sessions: u32,
    pub tick_hz: f32,
    /// Probability the driver plays any given round as a win.
    pub win_chance: f32,
    /// When set, each finished session writes its final state here.
    pub snapshot_path: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            sessions: 1,
            tick_hz: 30.0,
            win_chance: 0.85,
            snapshot_path: None,
        }
    }
}

impl HarnessConfig {
    /// Load config from `lavaquest.toml` if it exists, then apply env var
    /// overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string("lavaquest.toml") {
            Ok(content) => match toml::from_str::<HarnessConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("loaded configuration from lavaquest.toml");
                    cfg
                }
                Err(e) => {
                    tracing::warn!("failed to parse lavaquest.toml: {e}, using defaults");
                    HarnessConfig::default()
                }
            },
            Err(_) => {
                tracing::info!("no lavaquest.toml found, using defaults");
                HarnessConfig::default()
            }
        };

        if let Ok(val) = std::env::var("LAVAQUEST_SEED")
            && let Ok(n) = val.parse::<u64>()
        {
            config.run.seed = n;
        }
        if let Ok(val) = std::env::var("LAVAQUEST_SESSIONS")
            && let Ok(n) = val.parse::<u32>()
        {
            config.run.sessions = n;
        }
        if let Ok(val) = std::env::var("LAVAQUEST_TICK_HZ")
            && let Ok(n) = val.parse::<f32>()
        {
            config.run.tick_hz = n;
        }
        if let Ok(val) = std::env::var("LAVAQUEST_WIN_CHANCE")
            && let Ok(n) = val.parse::<f32>()
        {
            config.run.win_chance = n;
        }
        if let Ok(val) = std::env::var("LAVAQUEST_PLATFORM_COUNT")
            && let Ok(n) = val.parse::<usize>()
        {
            config.game.platform_count = n;
        }
        if let Ok(val) = std::env::var("LAVAQUEST_POPULATION")
            && let Ok(n) = val.parse::<u32>()
        {
            config.game.matchmaking_max_players = n;
        }
        if let Ok(val) = std::env::var("LAVAQUEST_ELIMINATION_RATE")
            && let Ok(n) = val.parse::<f32>()
        {
            config.game.elimination_rate = n;
        }
        if let Ok(path) = std::env::var("LAVAQUEST_SNAPSHOT_PATH")
            && !path.is_empty()
        {
            config.run.snapshot_path = Some(path);
        }

        config
    }

    /// Validate configuration and refuse to start on out-of-range values.
    pub fn validate(&self) {
        let problems = self.game.validate();
        if !problems.is_empty() {
            for problem in &problems {
                tracing::error!("game tuning: {problem}");
            }
            std::process::exit(1);
        }

        if self.run.sessions == 0 {
            tracing::error!("run.sessions must be > 0");
            std::process::exit(1);
        }
        if !self.run.tick_hz.is_finite() || self.run.tick_hz <= 0.0 {
            tracing::error!("run.tick_hz must be a positive number");
            std::process::exit(1);
        }
        if !(0.0..=1.0).contains(&self.run.win_chance) {
            tracing::error!("run.win_chance must be in [0, 1]");
            std::process::exit(1);
        }
    }
}
