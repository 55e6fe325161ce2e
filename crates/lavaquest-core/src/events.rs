use serde::{Deserialize, Serialize};

use crate::identity::{AvatarId, AvatarStyle};
use crate::phase::GamePhase;

/// An input fed into the session from outside: a player tap or a debug
/// request. Commands are queued by the caller and drained on the next
/// update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Resolve the current round in the player's favor.
    Win,
    /// Resolve the current round against the player.
    Lose,
    /// Abandon the run and return to the intro screen from any phase.
    Reset,
    /// Clear the board and round counters in place, without a phase
    /// change.
    GameReset,
    /// Spawn the opening crowd immediately. Ignored once avatars exist.
    SpawnAvatars,
    /// Tap-to-continue on whichever menu phase is active.
    Continue,
}

/// Sound effects the presentation layer is expected to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCue {
    ButtonClick,
    MatchmakingPop,
    MatchmakingComplete,
    GameStart,
    Victory,
    Eliminated,
}

/// Everything the session wants the outside world to know about, in the
/// order it happened. One update call returns the batch produced by that
/// call; ordering within a batch is significant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notification {
    PhaseChanged { phase: GamePhase },
    AnimationStarted,
    AnimationEnded,
    RoundComplete { current_round: u32, total_rounds: u32 },
    PopulationChanged { current: u32, initial: u32 },
    PlayerEliminated,
    PlayerVictory { reward: u32 },
    PlayerAvatarData { style: AvatarStyle },
    CameraMove { x: f32, y: f32 },
    CameraReset,
    /// Park the camera `offset` units above the first platform before the
    /// run starts.
    CameraSetStart { offset: f32 },
    CameraAnimateToStart { duration: f32 },
    AvatarSpawned { id: AvatarId, is_player: bool, platform: usize },
    AvatarAdvanced { id: AvatarId, to_platform: usize },
    AvatarEliminated { id: AvatarId },
    MatchmakingProgress { joined: u32, capacity: u32 },
    MatchmakingComplete,
    Audio(AudioCue),
}
