//! Round arithmetic and the win-round partition.
//!
//! The simulated population ("fake players") is far larger than the
//! handful of avatars on screen, so a win resolves in two steps: decide
//! how many fake players die this round, then remap that onto the small
//! visual crowd proportionally. The partition then picks which concrete
//! avatars fall.

use rand::Rng;

use lavaquest_core::identity::AvatarId;

/// How many of the simulated population are eliminated by one win.
///
/// Populations of 2 or fewer are stable: the end-game is decided by the
/// player reaching the top, not by the crowd thinning to zero.
pub fn fake_elimination_count(fake_player_count: u32, elimination_rate: f32) -> u32 {
    if fake_player_count <= 2 {
        return 0;
    }
    let non_player = (fake_player_count - 1) as f32;
    (non_player * elimination_rate).floor() as u32
}

/// Remap a fake-population elimination count onto the visual crowd.
///
/// `visual_avatar_count` and `fake_player_count` are the pre-round
/// totals, both including the player. The result is how many on-screen
/// opponents should visibly fall, clamped to the opponents that exist.
pub fn visual_elimination_count(
    visual_avatar_count: usize,
    fake_player_count: u32,
    fake_eliminations: u32,
) -> usize {
    if visual_avatar_count <= 1 {
        return 0;
    }
    let non_player_visual = visual_avatar_count - 1;
    if fake_player_count <= 1 {
        return 0;
    }
    let non_player_fake = (fake_player_count - 1) as f32;

    let ratio = fake_eliminations as f32 / non_player_fake;
    let visual = (non_player_visual as f32 * ratio).round() as usize;
    visual.min(non_player_visual)
}

/// Apply a round's eliminations to the population counter. The count
/// never drops below 1: the player is always "in" the population.
pub fn reduce_population(fake_player_count: u32, eliminated: u32) -> u32 {
    fake_player_count.saturating_sub(eliminated).max(1)
}

/// The outcome of splitting one platform's crowd on a win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundPartition {
    /// Avatars jumping to the next platform. The player is always first.
    pub advance: Vec<AvatarId>,
    /// Avatars falling out of the game.
    pub eliminate: Vec<AvatarId>,
}

/// Split a platform's occupants into advancers and eliminated.
///
/// Two passes. First, each non-player occupant rolls the lottery while
/// the eliminate set is still short of `target`: a roll above
/// `lottery_threshold` eliminates. Second, if the lottery came up short,
/// random non-player advancers are drafted into the eliminate set until
/// the target is met or only the player remains. The player is placed
/// in the advance set up front and is never drafted.
pub fn partition_for_win(
    player: AvatarId,
    occupants: &[AvatarId],
    target: usize,
    lottery_threshold: f32,
    rng: &mut impl Rng,
) -> RoundPartition {
    let mut advance = vec![player];
    let mut eliminate = Vec::new();

    for &id in occupants {
        if id == player {
            continue;
        }
        if eliminate.len() < target && rng.random::<f32>() > lottery_threshold {
            eliminate.push(id);
            continue;
        }
        advance.push(id);
    }

    while eliminate.len() < target && advance.len() > 1 {
        let pick = rng.random_range(1..advance.len());
        eliminate.push(advance.remove(pick));
    }

    RoundPartition { advance, eliminate }
}
