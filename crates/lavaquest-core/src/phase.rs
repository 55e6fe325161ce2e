use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// The screens a run moves through.
///
/// Normal flow is Intro -> Matchmaking -> Tutorial -> Playing, then
/// Playing and RoundComplete alternate until the run ends in Victory or
/// Eliminated, both of which lead back to Intro. Empty is the pre-boot
/// phase and is never returned to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Empty,
    Intro,
    Matchmaking,
    Tutorial,
    Playing,
    RoundComplete,
    Victory,
    Eliminated,
}

impl GamePhase {
    /// True for the two end-of-run phases.
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Victory | GamePhase::Eliminated)
    }

    /// True while a run is live and rounds can be resolved.
    pub fn in_round(self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::RoundComplete)
    }
}

/// Per-phase behavior, parameterized over the session context the
/// handlers mutate. All callbacks default to no-ops so a phase only
/// implements the hooks it cares about.
pub trait PhaseHandler<C> {
    fn enter(&mut self, _ctx: &mut C) {}
    fn exit(&mut self, _ctx: &mut C) {}
    fn tick(&mut self, _ctx: &mut C, _dt: f32) {}
}

/// Owns the current phase and dispatches enter/exit/tick to whichever
/// handler is registered for it. Phases without a handler are still
/// legal targets; the machine just has nothing to call for them.
pub struct PhaseMachine<C> {
    handlers: HashMap<GamePhase, Box<dyn PhaseHandler<C> + Send>>,
    current: GamePhase,
}

impl<C> PhaseMachine<C> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            current: GamePhase::default(),
        }
    }

    pub fn register(&mut self, phase: GamePhase, handler: Box<dyn PhaseHandler<C> + Send>) {
        self.handlers.insert(phase, handler);
    }

    pub fn current(&self) -> GamePhase {
        self.current
    }

    /// Switch to `next`. Re-entering the current phase is a silent no-op
    /// and returns false; any real change runs exit on the old handler,
    /// then enter on the new one, and returns true so the caller can
    /// announce the change.
    pub fn transition(&mut self, ctx: &mut C, next: GamePhase) -> bool {
        if self.current == next {
            return false;
        }

        if let Some(handler) = self.handlers.get_mut(&self.current) {
            handler.exit(ctx);
        }

        let prev = self.current;
        self.current = next;
        debug!(from = ?prev, to = ?next, "phase transition");

        if let Some(handler) = self.handlers.get_mut(&next) {
            handler.enter(ctx);
        }

        true
    }

    /// Drive the current phase's per-frame behavior.
    pub fn tick(&mut self, ctx: &mut C, dt: f32) {
        if let Some(handler) = self.handlers.get_mut(&self.current) {
            handler.tick(ctx, dt);
        }
    }

    /// Set the current phase without running enter/exit hooks. Used when
    /// rehydrating a session from a snapshot, where the phase's entry
    /// work already happened in the run being restored.
    pub fn restore(&mut self, phase: GamePhase) {
        self.current = phase;
    }
}

impl<C> Default for PhaseMachine<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        log: Vec<String>,
    }

    struct Loud(&'static str);

    impl PhaseHandler<Recorder> for Loud {
        fn enter(&mut self, ctx: &mut Recorder) {
            ctx.log.push(format!("{}:enter", self.0));
        }

        fn exit(&mut self, ctx: &mut Recorder) {
            ctx.log.push(format!("{}:exit", self.0));
        }

        fn tick(&mut self, ctx: &mut Recorder, dt: f32) {
            ctx.log.push(format!("{}:tick:{dt}", self.0));
        }
    }

    fn machine_with_intro_and_playing() -> PhaseMachine<Recorder> {
        let mut machine = PhaseMachine::new();
        machine.register(GamePhase::Intro, Box::new(Loud("intro")));
        machine.register(GamePhase::Playing, Box::new(Loud("playing")));
        machine
    }

    #[test]
    fn starts_empty() {
        let machine: PhaseMachine<Recorder> = PhaseMachine::new();
        assert_eq!(machine.current(), GamePhase::Empty);
    }

    #[test]
    fn transition_runs_exit_then_enter() {
        let mut machine = machine_with_intro_and_playing();
        let mut ctx = Recorder::default();

        assert!(machine.transition(&mut ctx, GamePhase::Intro));
        assert!(machine.transition(&mut ctx, GamePhase::Playing));

        assert_eq!(ctx.log, vec!["intro:enter", "intro:exit", "playing:enter"]);
        assert_eq!(machine.current(), GamePhase::Playing);
    }

    #[test]
    fn same_phase_transition_is_silent() {
        let mut machine = machine_with_intro_and_playing();
        let mut ctx = Recorder::default();

        machine.transition(&mut ctx, GamePhase::Intro);
        ctx.log.clear();

        assert!(
            !machine.transition(&mut ctx, GamePhase::Intro),
            "re-entering the current phase must report no change"
        );
        assert!(ctx.log.is_empty(), "no handler hooks on a same-phase request");
    }

    #[test]
    fn unregistered_phase_is_still_a_real_change() {
        let mut machine = machine_with_intro_and_playing();
        let mut ctx = Recorder::default();

        machine.transition(&mut ctx, GamePhase::Intro);
        ctx.log.clear();

        // Victory has no handler here, but the change still counts.
        assert!(machine.transition(&mut ctx, GamePhase::Victory));
        assert_eq!(machine.current(), GamePhase::Victory);
        assert_eq!(ctx.log, vec!["intro:exit"]);
    }

    #[test]
    fn tick_reaches_only_the_current_handler() {
        let mut machine = machine_with_intro_and_playing();
        let mut ctx = Recorder::default();

        machine.transition(&mut ctx, GamePhase::Playing);
        ctx.log.clear();

        machine.tick(&mut ctx, 0.5);
        assert_eq!(ctx.log, vec!["playing:tick:0.5"]);
    }

    #[test]
    fn tick_without_handler_is_a_no_op() {
        let mut machine = machine_with_intro_and_playing();
        let mut ctx = Recorder::default();

        machine.transition(&mut ctx, GamePhase::Victory);
        ctx.log.clear();

        machine.tick(&mut ctx, 0.5);
        assert!(ctx.log.is_empty());
    }

    #[test]
    fn restore_skips_handler_hooks() {
        let mut machine = machine_with_intro_and_playing();
        let mut ctx = Recorder::default();

        machine.restore(GamePhase::Playing);
        assert_eq!(machine.current(), GamePhase::Playing);
        assert!(ctx.log.is_empty());

        // the restored phase's handler is live for subsequent changes
        machine.transition(&mut ctx, GamePhase::Intro);
        assert_eq!(ctx.log, vec!["playing:exit", "intro:enter"]);
    }

    #[test]
    fn terminal_and_in_round_predicates() {
        assert!(GamePhase::Victory.is_terminal());
        assert!(GamePhase::Eliminated.is_terminal());
        assert!(!GamePhase::Playing.is_terminal());

        assert!(GamePhase::Playing.in_round());
        assert!(GamePhase::RoundComplete.in_round());
        assert!(!GamePhase::Tutorial.in_round());
    }

    #[test]
    fn phase_serde_rename() {
        assert_eq!(
            serde_json::to_string(&GamePhase::RoundComplete).unwrap(),
            "\"round_complete\""
        );
        let back: GamePhase = serde_json::from_str("\"matchmaking\"").unwrap();
        assert_eq!(back, GamePhase::Matchmaking);
    }
}
