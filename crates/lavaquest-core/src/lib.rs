pub mod config;
pub mod error;
pub mod events;
pub mod identity;
pub mod join;
pub mod phase;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::config::GameTuning;
    use crate::events::Notification;
    use crate::phase::GamePhase;

    /// Tuning with animation and menu timings shortened so a full round
    /// settles within a handful of coarse ticks.
    pub fn fast_tuning() -> GameTuning {
        GameTuning {
            matchmaking_duration: 0.5,
            matchmaking_start_delay: 0.1,
            matchmaking_delay_before_start: 0.1,
            tutorial_tap_delay: 0.1,
            game_start_delay: 0.1,
            avatar_jump_delay: 0.05,
            jump_duration: 0.1,
            fall_duration: 0.2,
            ..GameTuning::default()
        }
    }

    /// Fast tuning with a specific simulated population.
    pub fn tuning_with_population(population: u32) -> GameTuning {
        GameTuning {
            matchmaking_max_players: population,
            ..fast_tuning()
        }
    }

    /// Fast tuning with a specific number of on-screen avatars.
    pub fn tuning_with_avatars(population: u32, display_count: usize) -> GameTuning {
        GameTuning {
            display_avatar_count: display_count,
            ..tuning_with_population(population)
        }
    }

    /// Extract the phase from every phase-change notification, in order.
    pub fn phase_changes(notifications: &[Notification]) -> Vec<GamePhase> {
        notifications
            .iter()
            .filter_map(|n| match n {
                Notification::PhaseChanged { phase } => Some(*phase),
                _ => None,
            })
            .collect()
    }

    /// Count notifications matching a predicate.
    pub fn count_matching(
        notifications: &[Notification],
        predicate: impl Fn(&Notification) -> bool,
    ) -> usize {
        notifications.iter().filter(|n| predicate(n)).count()
    }
}
