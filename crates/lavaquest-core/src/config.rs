use serde::Deserialize;

use crate::error::SimError;

/// Gameplay tuning knobs, usually the `[game]` table of `lavaquest.toml`.
///
/// Every value has a shipping default; a missing file or table is not an
/// error. Binaries are expected to call [`GameTuning::validate`] and refuse
/// to start on a non-empty result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameTuning {
    /// Number of platforms in the climb, including the start platform.
    pub platform_count: usize,
    /// Live-ops event length shown as a countdown while playing.
    pub event_duration_hours: f32,
    /// Simulated lobby size; also the starting fake-player population.
    pub matchmaking_max_players: u32,
    /// Seconds for the lobby count to fill from zero to capacity.
    pub matchmaking_duration: f32,
    /// Seconds before the lobby count starts rising.
    pub matchmaking_start_delay: f32,
    /// Seconds between lobby completion and the continue gate opening.
    pub matchmaking_delay_before_start: f32,
    /// Number of join pop cues spread evenly across the lobby fill.
    pub matchmaking_pop_interval: u32,
    /// Soft-currency reward reported on victory.
    pub victory_reward_amount: u32,
    /// Seconds before the tutorial accepts the starting tap.
    pub tutorial_tap_delay: f32,
    /// Seconds the camera takes to settle on the start platform.
    pub game_start_delay: f32,
    /// Vertical camera offset applied before the start pan.
    pub game_start_camera_offset: f32,
    /// Fraction of the non-player population eliminated per won round.
    pub elimination_rate: f32,
    /// Per-avatar lottery threshold on a won round; a roll above it
    /// eliminates. Independent of `elimination_rate`.
    pub elimination_lottery_threshold: f32,
    /// Total on-screen avatars, player included.
    pub display_avatar_count: usize,
    /// Stagger between consecutive avatar jumps in a round.
    pub avatar_jump_delay: f32,
    /// Seconds one jump animation takes to complete.
    pub jump_duration: f32,
    /// Seconds one fall animation takes to complete.
    pub fall_duration: f32,
    /// Force-completes a round stuck in animation after this many
    /// seconds. Zero disables the guard.
    pub round_timeout_secs: f32,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            platform_count: 8,
            event_duration_hours: 8.0,
            matchmaking_max_players: 100,
            matchmaking_duration: 3.0,
            matchmaking_start_delay: 0.5,
            matchmaking_delay_before_start: 0.5,
            matchmaking_pop_interval: 20,
            victory_reward_amount: 1453,
            tutorial_tap_delay: 2.0,
            game_start_delay: 1.0,
            game_start_camera_offset: 500.0,
            elimination_rate: 0.3,
            elimination_lottery_threshold: 0.6,
            display_avatar_count: 12,
            avatar_jump_delay: 0.15,
            jump_duration: 0.5,
            fall_duration: 1.2,
            round_timeout_secs: 10.0,
        }
    }
}

impl GameTuning {
    /// Parse a standalone tuning table, e.g. a `[game]` section lifted out
    /// of `lavaquest.toml`.
    pub fn from_toml_str(content: &str) -> Result<Self, SimError> {
        toml::from_str(content).map_err(|e| SimError::ConfigParse(e.to_string()))
    }

    /// Check every knob against its supported range. Returns one message
    /// per violation; an empty result means the tuning is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if !(3..=15).contains(&self.platform_count) {
            problems.push(format!(
                "platform_count must be between 3 and 15, got {}",
                self.platform_count
            ));
        }
        if self.event_duration_hours <= 0.0 || self.event_duration_hours > 24.0 {
            problems.push(format!(
                "event_duration_hours must be in (0, 24], got {}",
                self.event_duration_hours
            ));
        }
        if !(50..=200).contains(&self.matchmaking_max_players) {
            problems.push(format!(
                "matchmaking_max_players must be between 50 and 200, got {}",
                self.matchmaking_max_players
            ));
        }
        if self.matchmaking_duration <= 0.0 {
            problems.push("matchmaking_duration must be > 0".to_string());
        }
        if self.matchmaking_start_delay < 0.0 {
            problems.push("matchmaking_start_delay must be >= 0".to_string());
        }
        if self.matchmaking_delay_before_start < 0.0 {
            problems.push("matchmaking_delay_before_start must be >= 0".to_string());
        }
        if self.matchmaking_pop_interval == 0 {
            problems.push("matchmaking_pop_interval must be > 0".to_string());
        }
        if self.victory_reward_amount == 0 {
            problems.push("victory_reward_amount must be > 0".to_string());
        }
        if self.tutorial_tap_delay < 0.0 {
            problems.push("tutorial_tap_delay must be >= 0".to_string());
        }
        if self.game_start_delay < 0.0 {
            problems.push("game_start_delay must be >= 0".to_string());
        }
        if self.elimination_rate <= 0.0 || self.elimination_rate >= 1.0 {
            problems.push(format!(
                "elimination_rate must be in (0, 1), got {}",
                self.elimination_rate
            ));
        }
        if !(0.0..=1.0).contains(&self.elimination_lottery_threshold) {
            problems.push(format!(
                "elimination_lottery_threshold must be in [0, 1], got {}",
                self.elimination_lottery_threshold
            ));
        }
        if !(2..=20).contains(&self.display_avatar_count) {
            problems.push(format!(
                "display_avatar_count must be between 2 and 20, got {}",
                self.display_avatar_count
            ));
        }
        if self.display_avatar_count as u32 > self.matchmaking_max_players {
            problems.push(format!(
                "display_avatar_count ({}) cannot exceed matchmaking_max_players ({})",
                self.display_avatar_count, self.matchmaking_max_players
            ));
        }
        if self.avatar_jump_delay <= 0.0 {
            problems.push("avatar_jump_delay must be > 0".to_string());
        }
        if self.jump_duration <= 0.0 {
            problems.push("jump_duration must be > 0".to_string());
        }
        if self.fall_duration <= 0.0 {
            problems.push("fall_duration must be > 0".to_string());
        }
        if self.round_timeout_secs < 0.0 {
            problems.push("round_timeout_secs must be >= 0 (0 disables)".to_string());
        }

        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tuning_values() {
        let tuning = GameTuning::default();
        assert_eq!(tuning.platform_count, 8);
        assert_eq!(tuning.matchmaking_max_players, 100);
        assert_eq!(tuning.display_avatar_count, 12);
        assert_eq!(tuning.victory_reward_amount, 1453);
        assert!((tuning.elimination_rate - 0.3).abs() < f32::EPSILON);
        assert!((tuning.elimination_lottery_threshold - 0.6).abs() < f32::EPSILON);
        assert!((tuning.avatar_jump_delay - 0.15).abs() < f32::EPSILON);
        assert!((tuning.jump_duration - 0.5).abs() < f32::EPSILON);
        assert!((tuning.fall_duration - 1.2).abs() < f32::EPSILON);
    }

    #[test]
    fn default_tuning_is_valid() {
        assert!(GameTuning::default().validate().is_empty());
    }

    #[test]
    fn parse_partial_toml_keeps_defaults() {
        let tuning = GameTuning::from_toml_str(
            r#"
platform_count = 10
elimination_rate = 0.4
"#,
        )
        .unwrap();
        assert_eq!(tuning.platform_count, 10);
        assert!((tuning.elimination_rate - 0.4).abs() < f32::EPSILON);
        // untouched knobs fall back to defaults
        assert_eq!(tuning.matchmaking_max_players, 100);
        assert_eq!(tuning.display_avatar_count, 12);
    }

    #[test]
    fn parse_rejects_malformed_toml() {
        assert!(GameTuning::from_toml_str("platform_count = ").is_err());
    }

    #[test]
    fn validate_flags_out_of_range_platform_count() {
        let tuning = GameTuning {
            platform_count: 2,
            ..GameTuning::default()
        };
        let problems = tuning.validate();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("platform_count"));
    }

    #[test]
    fn validate_flags_degenerate_elimination_rate() {
        for rate in [0.0, 1.0, 1.5, -0.1] {
            let tuning = GameTuning {
                elimination_rate: rate,
                ..GameTuning::default()
            };
            assert!(
                !tuning.validate().is_empty(),
                "rate {rate} should be rejected"
            );
        }
    }

    #[test]
    fn validate_flags_display_count_above_population() {
        let tuning = GameTuning {
            matchmaking_max_players: 50,
            display_avatar_count: 20,
            ..GameTuning::default()
        };
        // 20 <= 20 passes the range check but exceeds nothing; shrink capacity
        assert!(tuning.validate().is_empty());

        let tuning = GameTuning {
            matchmaking_max_players: 50,
            display_avatar_count: 51,
            ..GameTuning::default()
        };
        let problems = tuning.validate();
        assert!(problems.iter().any(|p| p.contains("cannot exceed")));
    }

    #[test]
    fn validate_flags_zero_timings() {
        let tuning = GameTuning {
            avatar_jump_delay: 0.0,
            jump_duration: 0.0,
            fall_duration: 0.0,
            ..GameTuning::default()
        };
        assert_eq!(tuning.validate().len(), 3);
    }
}
