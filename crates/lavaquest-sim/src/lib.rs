//! The Lava Quest round simulation.
//!
//! A [`GameSession`] owns one run of the game: the menu flow, the
//! simulated lobby, the avatar crowd, and round resolution. Callers
//! drive it with [`Command`]s and simulated time, and read back an
//! ordered batch of [`Notification`]s per update; nothing else crosses
//! the boundary. Rendering, tweening, and audio live entirely on the
//! caller's side of that boundary.

pub mod animation;
pub mod pool;
pub mod registry;
pub mod resolver;
pub mod topology;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use lavaquest_core::config::GameTuning;
use lavaquest_core::error::SimError;
use lavaquest_core::events::{AudioCue, Command, Notification};
use lavaquest_core::identity::{AvatarId, AvatarStyle};
use lavaquest_core::join::CompletionJoin;
use lavaquest_core::phase::{GamePhase, PhaseHandler, PhaseMachine};

use animation::{AnimationKind, AnimationScheduler};
use pool::OpponentPool;
use registry::{Avatar, AvatarRegistry};
use topology::{PlatformLayout, PlatformTopology};

/// Which way the round in flight is resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundKind {
    Win,
    Lose,
}

/// Bookkeeping for a round whose animations are still running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundInFlight {
    pub kind: RoundKind,
    pub join: CompletionJoin,
    /// Simulated seconds since the round was dispatched, for the stall
    /// guard.
    pub elapsed: f32,
}

/// Progress of the simulated lobby fill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchmakingState {
    pub start_delay_remaining: f32,
    /// Fractional join count; `joined` is this, truncated.
    pub fill: f32,
    pub joined: u32,
    pub complete: bool,
    pub gate_delay_remaining: f32,
    pub gate_open: bool,
    last_pop: u32,
}

impl MatchmakingState {
    fn start(tuning: &GameTuning) -> Self {
        Self {
            start_delay_remaining: tuning.matchmaking_start_delay,
            ..Self::default()
        }
    }
}

/// Session-level counters and latches, separate from the component
/// structs so a snapshot can carry them as one value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowState {
    /// Rounds won this run. Loses do not count.
    pub current_round: u32,
    pub fake_player_count: u32,
    pub initial_fake_player_count: u32,
    /// Mutual-exclusion latch: win/lose requests are rejected while a
    /// round's animations are in flight.
    pub is_animating: bool,
    pub round: Option<RoundInFlight>,
    pub matchmaking: MatchmakingState,
    pub tutorial_gate_in: f32,
    pub tutorial_gate_open: bool,
    /// Live-ops countdown, in seconds. Starts ticking the first time the
    /// run reaches Playing and resets on Intro or Eliminated.
    pub countdown_running: bool,
    pub event_countdown: f32,
}

/// Everything the phase handlers and round logic mutate.
struct SessionCtx {
    tuning: GameTuning,
    flow: FlowState,
    pool: OpponentPool,
    topology: PlatformTopology,
    registry: AvatarRegistry,
    scheduler: AnimationScheduler,
    rng: StdRng,
    seed: u64,
    out: Vec<Notification>,
}

impl SessionCtx {
    fn notify(&mut self, notification: Notification) {
        self.out.push(notification);
    }

    /// Tear down the run: empty the board, zero the counters, park the
    /// camera. Runs on every Intro entry.
    fn reset_game(&mut self) {
        self.flow.current_round = 0;
        self.flow.is_animating = false;
        self.flow.round = None;
        self.flow.fake_player_count = 0;
        self.flow.initial_fake_player_count = 0;
        self.registry.clear();
        self.topology.clear_all();
        self.scheduler.clear();
        self.notify(Notification::CameraReset);
    }

    /// Place the opening crowd on the first platform: opponents drawn
    /// from the roster, then the player, so the player lands on the last
    /// reserved slot and draws front-most.
    fn spawn_avatars(&mut self) {
        if self.topology.platform_count() == 0 {
            warn!("no platforms configured; skipping avatar spawn");
            return;
        }
        if !self.registry.is_empty() {
            warn!("avatars already spawned; ignoring spawn request");
            return;
        }

        self.pool.reset_selection(&mut self.rng);

        for _ in 1..self.tuning.display_avatar_count {
            let Some(index) = self.pool.draw_next(&mut self.rng) else {
                break;
            };
            let style = AvatarStyle::ROSTER[index];
            let position = self.topology.reserve_next_slot(0);
            let id = self.registry.spawn(style, false, 0, position);
            self.topology.add_occupant(0, id);
            self.notify(Notification::AvatarSpawned {
                id,
                is_player: false,
                platform: 0,
            });
        }

        let position = self.topology.reserve_next_slot(0);
        let id = self
            .registry
            .spawn(AvatarStyle::PLAYER, true, 0, position);
        self.topology.add_occupant(0, id);
        self.notify(Notification::AvatarSpawned {
            id,
            is_player: true,
            platform: 0,
        });

        self.registry.update_display_order();

        self.flow.fake_player_count = self.tuning.matchmaking_max_players;
        self.flow.initial_fake_player_count = self.tuning.matchmaking_max_players;
        self.notify(Notification::PopulationChanged {
            current: self.flow.fake_player_count,
            initial: self.flow.initial_fake_player_count,
        });

        info!(
            avatars = self.registry.len(),
            population = self.flow.fake_player_count,
            "game board spawned"
        );
    }

    /// The start-of-run sequence behind the tutorial's continue tap.
    fn initialize_game(&mut self) {
        self.notify(Notification::CameraSetStart {
            offset: self.tuning.game_start_camera_offset,
        });
        self.spawn_avatars();
        self.notify(Notification::CameraAnimateToStart {
            duration: self.tuning.game_start_delay,
        });
    }

    /// Commit a group of avatars to the target platform and queue their
    /// jump animations, staggered in list order. State changes land now;
    /// only the completion is deferred.
    fn schedule_advances(&mut self, ids: &[AvatarId], target: usize, delay_offset: usize) {
        for (i, &id) in ids.iter().enumerate() {
            let position = self.topology.reserve_next_slot(target);
            self.topology.add_occupant(target, id);
            if let Some(avatar) = self.registry.get_mut(id) {
                avatar.platform_index = target;
                avatar.position = position;
            }
            self.registry.bring_to_front(id);

            let delay = (i + delay_offset) as f32 * self.tuning.avatar_jump_delay;
            self.scheduler.schedule(
                id,
                AnimationKind::Advance,
                delay + self.tuning.jump_duration,
            );
            self.notify(Notification::AvatarAdvanced {
                id,
                to_platform: target,
            });
        }
    }

    /// Flag a group of avatars as eliminated and queue their falls. The
    /// registry entries stay alive until each fall completes.
    fn schedule_falls(&mut self, ids: &[AvatarId], delay_offset: usize) {
        for (i, &id) in ids.iter().enumerate() {
            self.registry.mark_eliminated(id);
            let delay = (delay_offset + i) as f32 * self.tuning.avatar_jump_delay;
            self.scheduler
                .schedule(id, AnimationKind::Fall, delay + self.tuning.fall_duration);
            self.notify(Notification::AvatarEliminated { id });
        }
    }

    /// Resolve a win request. Preconditions that do not hold make this a
    /// silent no-op; the requester may be racing the animation latch.
    fn resolve_win(&mut self) {
        if self.flow.is_animating {
            return;
        }
        let Some(player) = self.registry.player() else {
            return;
        };
        if player.eliminated {
            return;
        }
        let player_id = player.id;
        let platform = player.platform_index;
        if platform + 1 >= self.topology.platform_count() {
            debug!("win request on the final platform ignored");
            return;
        }

        self.flow.is_animating = true;
        self.flow.current_round += 1;
        self.notify(Notification::AnimationStarted);

        let occupants: Vec<AvatarId> = self.topology.occupants(platform).to_vec();

        let fake_eliminations = resolver::fake_elimination_count(
            self.flow.fake_player_count,
            self.tuning.elimination_rate,
        );
        let visual_eliminations = resolver::visual_elimination_count(
            self.registry.len(),
            self.flow.fake_player_count,
            fake_eliminations,
        );
        self.flow.fake_player_count =
            resolver::reduce_population(self.flow.fake_player_count, fake_eliminations);

        let split = resolver::partition_for_win(
            player_id,
            &occupants,
            visual_eliminations,
            self.tuning.elimination_lottery_threshold,
            &mut self.rng,
        );

        debug!(
            round = self.flow.current_round,
            fake_eliminated = fake_eliminations,
            visual_eliminated = split.eliminate.len(),
            advancing = split.advance.len(),
            "win round resolved"
        );

        self.topology.clear_platform(platform);

        self.flow.round = Some(RoundInFlight {
            kind: RoundKind::Win,
            join: CompletionJoin::new((split.advance.len() + split.eliminate.len()) as u32),
            elapsed: 0.0,
        });

        let next = platform + 1;
        self.schedule_advances(&split.advance, next, 0);
        self.schedule_falls(&split.eliminate, split.advance.len());

        let (x, y) = self.topology.anchor_position(next);
        self.notify(Notification::CameraMove { x, y });
    }

    /// Resolve a lose request: the player falls, everyone else on the
    /// platform advances unconditionally. No elimination math applies.
    fn resolve_lose(&mut self) {
        if self.flow.is_animating {
            return;
        }
        let Some(player) = self.registry.player() else {
            return;
        };
        if player.eliminated {
            return;
        }
        let player_id = player.id;
        let platform = player.platform_index;

        self.flow.is_animating = true;
        self.notify(Notification::AnimationStarted);

        let others: Vec<AvatarId> = self
            .topology
            .occupants(platform)
            .iter()
            .copied()
            .filter(|&id| id != player_id)
            .collect();

        self.topology.clear_platform(platform);

        debug!(others = others.len(), platform, "lose round resolved");

        self.flow.round = Some(RoundInFlight {
            kind: RoundKind::Lose,
            join: CompletionJoin::new(1 + others.len() as u32),
            elapsed: 0.0,
        });

        self.schedule_falls(&[player_id], 0);

        if platform + 1 >= self.topology.platform_count() {
            // no platform to advance onto; the others' animations are
            // vacuously complete and only the player's fall is pending
            if let Some(round) = self.flow.round.as_mut() {
                for _ in 0..others.len() {
                    round.join.complete_one();
                }
            }
        } else {
            let next = platform + 1;
            self.schedule_advances(&others, next, 1);
            let (x, y) = self.topology.anchor_position(next);
            self.notify(Notification::CameraMove { x, y });
        }
    }

    /// Lobby fill for the matchmaking phase: wait out the start delay,
    /// fill linearly to capacity, then wait out the continue-gate delay.
    fn tick_matchmaking(&mut self, dt: f32) {
        let capacity = self.tuning.matchmaking_max_players;

        if self.flow.matchmaking.complete {
            if !self.flow.matchmaking.gate_open {
                self.flow.matchmaking.gate_delay_remaining -= dt;
                if self.flow.matchmaking.gate_delay_remaining <= 0.0 {
                    self.flow.matchmaking.gate_open = true;
                    debug!("matchmaking continue gate open");
                }
            }
            return;
        }

        if self.flow.matchmaking.start_delay_remaining > 0.0 {
            self.flow.matchmaking.start_delay_remaining -= dt;
            return;
        }

        let fill_rate = capacity as f32 / self.tuning.matchmaking_duration;
        self.flow.matchmaking.fill =
            (self.flow.matchmaking.fill + fill_rate * dt).min(capacity as f32);
        let joined = self.flow.matchmaking.fill as u32;

        if joined != self.flow.matchmaking.joined {
            self.flow.matchmaking.joined = joined;
            self.notify(Notification::MatchmakingProgress { joined, capacity });

            let pop_step = (capacity / self.tuning.matchmaking_pop_interval).max(1);
            if joined - self.flow.matchmaking.last_pop >= pop_step {
                self.flow.matchmaking.last_pop = joined;
                self.notify(Notification::Audio(AudioCue::MatchmakingPop));
            }
        }

        if joined >= capacity {
            self.flow.matchmaking.complete = true;
            self.flow.matchmaking.gate_delay_remaining = self.tuning.matchmaking_delay_before_start;
            self.notify(Notification::Audio(AudioCue::MatchmakingComplete));
            self.notify(Notification::MatchmakingComplete);
        }
    }

    fn tick_countdown(&mut self, dt: f32) {
        if self.flow.countdown_running && self.flow.event_countdown > 0.0 {
            self.flow.event_countdown = (self.flow.event_countdown - dt).max(0.0);
        }
    }

    /// Cross-phase reactions to a phase change, mirroring what the
    /// HUD layer keys off the phase-changed signal.
    fn on_phase_changed(&mut self, next: GamePhase) {
        match next {
            GamePhase::Playing => {
                self.flow.countdown_running = true;
            }
            GamePhase::Intro | GamePhase::Eliminated => {
                self.flow.countdown_running = false;
                self.flow.event_countdown = self.tuning.event_duration_hours * 3600.0;
            }
            _ => {}
        }
    }
}

// ====================================================================
// Phase handlers
// ====================================================================

struct IntroPhase;

impl PhaseHandler<SessionCtx> for IntroPhase {
    fn enter(&mut self, ctx: &mut SessionCtx) {
        ctx.reset_game();
    }
}

struct MatchmakingPhase;

impl PhaseHandler<SessionCtx> for MatchmakingPhase {
    fn enter(&mut self, ctx: &mut SessionCtx) {
        ctx.flow.matchmaking = MatchmakingState::start(&ctx.tuning);
    }

    fn tick(&mut self, ctx: &mut SessionCtx, dt: f32) {
        ctx.tick_matchmaking(dt);
    }
}

struct TutorialPhase;

impl PhaseHandler<SessionCtx> for TutorialPhase {
    fn enter(&mut self, ctx: &mut SessionCtx) {
        ctx.flow.tutorial_gate_in = ctx.tuning.tutorial_tap_delay;
        ctx.flow.tutorial_gate_open = false;
    }

    fn tick(&mut self, ctx: &mut SessionCtx, dt: f32) {
        if !ctx.flow.tutorial_gate_open {
            ctx.flow.tutorial_gate_in -= dt;
            if ctx.flow.tutorial_gate_in <= 0.0 {
                ctx.flow.tutorial_gate_open = true;
            }
        }
    }
}

struct VictoryPhase;

impl PhaseHandler<SessionCtx> for VictoryPhase {
    fn enter(&mut self, ctx: &mut SessionCtx) {
        ctx.notify(Notification::Audio(AudioCue::Victory));
    }
}

struct EliminatedPhase;

impl PhaseHandler<SessionCtx> for EliminatedPhase {
    fn enter(&mut self, ctx: &mut SessionCtx) {
        ctx.notify(Notification::Audio(AudioCue::Eliminated));
    }
}

// ====================================================================
// Session
// ====================================================================

/// Point-in-time capture of a session, sufficient to resume the run in a
/// fresh process. Course geometry travels with the topology; tuning does
/// not travel and stays with the hosting session. The random stream
/// restarts from the original seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: GamePhase,
    pub flow: FlowState,
    pub pool: OpponentPool,
    pub topology: PlatformTopology,
    pub registry: AvatarRegistry,
    pub scheduler: AnimationScheduler,
    pub seed: u64,
}

/// One run of the game, from intro screen to victory or elimination.
///
/// Drive it by calling [`GameSession::update`] once per simulated frame
/// with the commands received since the previous frame. Playing and
/// RoundComplete have no registered handler; their behavior is the
/// round-resolution logic itself, gated on commands.
pub struct GameSession {
    phases: PhaseMachine<SessionCtx>,
    ctx: SessionCtx,
}

impl GameSession {
    pub fn new(tuning: GameTuning, layout: PlatformLayout, seed: u64) -> Self {
        let mut phases = PhaseMachine::new();
        phases.register(GamePhase::Intro, Box::new(IntroPhase));
        phases.register(GamePhase::Matchmaking, Box::new(MatchmakingPhase));
        phases.register(GamePhase::Tutorial, Box::new(TutorialPhase));
        phases.register(GamePhase::Victory, Box::new(VictoryPhase));
        phases.register(GamePhase::Eliminated, Box::new(EliminatedPhase));

        let ctx = SessionCtx {
            pool: OpponentPool::new(AvatarStyle::ROSTER.len()),
            topology: PlatformTopology::new(layout),
            registry: AvatarRegistry::new(),
            scheduler: AnimationScheduler::new(),
            rng: StdRng::seed_from_u64(seed),
            seed,
            flow: FlowState::default(),
            tuning,
            out: Vec::new(),
        };

        Self { phases, ctx }
    }

    /// Boot the session onto the intro screen.
    pub fn start(&mut self) -> Vec<Notification> {
        info!(seed = self.ctx.seed, "session starting");
        self.transition_to(GamePhase::Intro);
        std::mem::take(&mut self.ctx.out)
    }

    /// Advance the session by `dt` simulated seconds, applying `commands`
    /// first. Returns every notification produced, in order.
    pub fn update(&mut self, dt: f32, commands: &[Command]) -> Vec<Notification> {
        for &command in commands {
            self.apply_command(command);
        }

        self.phases.tick(&mut self.ctx, dt);
        self.ctx.tick_countdown(dt);
        self.advance_animations(dt);

        std::mem::take(&mut self.ctx.out)
    }

    /// Resolve a win round directly, bypassing the tap-level phase gate.
    /// The resolver's own preconditions still apply.
    pub fn request_win(&mut self) -> Vec<Notification> {
        self.ctx.resolve_win();
        std::mem::take(&mut self.ctx.out)
    }

    /// Resolve a lose round directly, bypassing the tap-level phase gate.
    pub fn request_lose(&mut self) -> Vec<Notification> {
        self.ctx.resolve_lose();
        std::mem::take(&mut self.ctx.out)
    }

    fn apply_command(&mut self, command: Command) {
        match command {
            Command::Win => {
                if self.phases.current().in_round() && !self.ctx.flow.is_animating {
                    self.ctx.notify(Notification::Audio(AudioCue::ButtonClick));
                    self.ctx.resolve_win();
                }
            }
            Command::Lose => {
                if self.phases.current().in_round() && !self.ctx.flow.is_animating {
                    self.ctx.notify(Notification::Audio(AudioCue::ButtonClick));
                    self.ctx.resolve_lose();
                }
            }
            Command::Reset => {
                self.transition_to(GamePhase::Intro);
            }
            Command::GameReset => self.ctx.reset_game(),
            Command::SpawnAvatars => self.ctx.spawn_avatars(),
            Command::Continue => self.apply_continue(),
        }
    }

    /// Tap-to-continue, dispatched against whichever menu is up. Taps on
    /// a closed gate are dropped.
    fn apply_continue(&mut self) {
        match self.phases.current() {
            GamePhase::Intro => {
                self.ctx.notify(Notification::Audio(AudioCue::ButtonClick));
                self.transition_to(GamePhase::Matchmaking);
            }
            GamePhase::Matchmaking => {
                if self.ctx.flow.matchmaking.gate_open {
                    self.ctx.notify(Notification::Audio(AudioCue::GameStart));
                    self.transition_to(GamePhase::Tutorial);
                }
            }
            GamePhase::Tutorial => {
                if self.ctx.flow.tutorial_gate_open {
                    self.ctx.notify(Notification::Audio(AudioCue::ButtonClick));
                    self.ctx.initialize_game();
                    self.transition_to(GamePhase::Playing);
                }
            }
            GamePhase::Victory | GamePhase::Eliminated => {
                self.ctx.notify(Notification::Audio(AudioCue::ButtonClick));
                self.transition_to(GamePhase::Intro);
            }
            GamePhase::Empty | GamePhase::Playing | GamePhase::RoundComplete => {}
        }
    }

    fn transition_to(&mut self, next: GamePhase) {
        if self.phases.transition(&mut self.ctx, next) {
            self.ctx.on_phase_changed(next);
            self.ctx.notify(Notification::PhaseChanged { phase: next });
        }
    }

    /// Drive pending animations and fold completions into the round
    /// join. A round stuck past the configured timeout is force-drained
    /// so a lost completion cannot wedge the run.
    fn advance_animations(&mut self, dt: f32) {
        if self.ctx.flow.round.is_none() {
            return;
        }

        let mut timed_out = false;
        if let Some(round) = self.ctx.flow.round.as_mut() {
            round.elapsed += dt;
            let timeout = self.ctx.tuning.round_timeout_secs;
            if timeout > 0.0 && round.elapsed >= timeout {
                timed_out = true;
            }
        }

        let completions = if timed_out {
            warn!(
                pending = self.ctx.scheduler.pending_count(),
                "round exceeded timeout; forcing animation completion"
            );
            self.ctx.scheduler.drain_all()
        } else {
            self.ctx.scheduler.update(dt)
        };

        for (id, kind) in completions {
            self.finish_animation(id, kind);
        }
    }

    fn finish_animation(&mut self, id: AvatarId, kind: AnimationKind) {
        let fired = match self.ctx.flow.round.as_mut() {
            Some(round) => round.join.complete_one(),
            None => false,
        };

        if fired {
            self.finish_round();
        }

        // falls finalize the avatar's removal; the player stays in the
        // registry so the end screens can still read their avatar
        if kind == AnimationKind::Fall && self.ctx.registry.get(id).is_some_and(|a| !a.is_player) {
            self.ctx.registry.remove(id);
        }
    }

    /// All animations for the round have reported in; release the latch
    /// and settle the outcome.
    fn finish_round(&mut self) {
        let Some(round) = self.ctx.flow.round.take() else {
            return;
        };

        self.ctx.flow.is_animating = false;
        self.ctx.notify(Notification::AnimationEnded);

        match round.kind {
            RoundKind::Win => self.finish_win_round(),
            RoundKind::Lose => {
                self.ctx.notify(Notification::PlayerEliminated);
                self.transition_to(GamePhase::Eliminated);
            }
        }
    }

    fn finish_win_round(&mut self) {
        self.ctx.registry.update_display_order();

        self.ctx.notify(Notification::PopulationChanged {
            current: self.ctx.flow.fake_player_count,
            initial: self.ctx.flow.initial_fake_player_count,
        });
        self.ctx.notify(Notification::RoundComplete {
            current_round: self.ctx.flow.current_round,
            total_rounds: self.ctx.topology.platform_count().saturating_sub(1) as u32,
        });

        let at_top = self
            .ctx
            .registry
            .player()
            .is_some_and(|p| p.platform_index + 1 >= self.ctx.topology.platform_count());

        if at_top {
            let style = self.ctx.registry.player().map(|p| p.style);
            if let Some(style) = style {
                self.ctx.notify(Notification::PlayerAvatarData { style });
            }
            self.ctx.notify(Notification::PlayerVictory {
                reward: self.ctx.tuning.victory_reward_amount,
            });
            self.transition_to(GamePhase::Victory);
        } else {
            self.transition_to(GamePhase::RoundComplete);
        }
    }

    // ----------------------------------------------------------------
    // Snapshots
    // ----------------------------------------------------------------

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phases.current(),
            flow: self.ctx.flow.clone(),
            pool: self.ctx.pool.clone(),
            topology: self.ctx.topology.clone(),
            registry: self.ctx.registry.clone(),
            scheduler: self.ctx.scheduler.clone(),
            seed: self.ctx.seed,
        }
    }

    pub fn serialize_state(&self) -> Result<Vec<u8>, SimError> {
        rmp_serde::to_vec(&self.snapshot()).map_err(|e| SimError::SnapshotEncode(e.to_string()))
    }

    pub fn apply_state(&mut self, bytes: &[u8]) -> Result<(), SimError> {
        let snapshot: SessionSnapshot =
            rmp_serde::from_slice(bytes).map_err(|e| SimError::SnapshotDecode(e.to_string()))?;
        self.apply_snapshot(snapshot);
        Ok(())
    }

    /// Adopt a snapshot wholesale. Phase handlers do not re-run their
    /// entry work; the snapshot already reflects it.
    pub fn apply_snapshot(&mut self, snapshot: SessionSnapshot) {
        self.ctx.flow = snapshot.flow;
        self.ctx.pool = snapshot.pool;
        self.ctx.topology = snapshot.topology;
        self.ctx.registry = snapshot.registry;
        self.ctx.scheduler = snapshot.scheduler;
        self.ctx.seed = snapshot.seed;
        self.ctx.rng = StdRng::seed_from_u64(snapshot.seed);
        self.ctx.out.clear();
        self.phases.restore(snapshot.phase);
    }

    // ----------------------------------------------------------------
    // Read access
    // ----------------------------------------------------------------

    pub fn phase(&self) -> GamePhase {
        self.phases.current()
    }

    pub fn flow(&self) -> &FlowState {
        &self.ctx.flow
    }

    pub fn current_round(&self) -> u32 {
        self.ctx.flow.current_round
    }

    pub fn fake_player_count(&self) -> u32 {
        self.ctx.flow.fake_player_count
    }

    pub fn initial_fake_player_count(&self) -> u32 {
        self.ctx.flow.initial_fake_player_count
    }

    pub fn is_animating(&self) -> bool {
        self.ctx.flow.is_animating
    }

    pub fn event_countdown(&self) -> f32 {
        self.ctx.flow.event_countdown
    }

    pub fn visual_avatar_count(&self) -> usize {
        self.ctx.registry.len()
    }

    pub fn player(&self) -> Option<&Avatar> {
        self.ctx.registry.player()
    }

    pub fn display_order(&self) -> &[AvatarId] {
        self.ctx.registry.display_order()
    }

    pub fn platform_count(&self) -> usize {
        self.ctx.topology.platform_count()
    }

    pub fn occupants(&self, platform: usize) -> &[AvatarId] {
        self.ctx.topology.occupants(platform)
    }

    pub fn tuning(&self) -> &GameTuning {
        &self.ctx.tuning
    }

    pub fn seed(&self) -> u64 {
        self.ctx.seed
    }
}
