use serde::{Deserialize, Serialize};

/// Fan-in tracker for one round's animation completions.
///
/// A round schedules N independently timed animations and must advance
/// exactly once, after all N have reported in, regardless of arrival
/// order. `complete_one` returns `true` on the completion that crosses
/// the threshold and `false` forever after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionJoin {
    expected: u32,
    completed: u32,
    fired: bool,
}

impl CompletionJoin {
    pub fn new(expected: u32) -> Self {
        Self {
            expected,
            completed: 0,
            fired: false,
        }
    }

    /// Record one completion. Returns `true` exactly once, when the final
    /// expected completion arrives.
    pub fn complete_one(&mut self) -> bool {
        self.completed += 1;
        if self.fired || self.completed < self.expected {
            return false;
        }
        self.fired = true;
        true
    }

    pub fn is_done(&self) -> bool {
        self.fired
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    pub fn expected(&self) -> u32 {
        self.expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_on_final_completion_only() {
        let mut join = CompletionJoin::new(3);
        assert!(!join.complete_one());
        assert!(!join.complete_one());
        assert!(!join.is_done());
        assert!(join.complete_one());
        assert!(join.is_done());
    }

    #[test]
    fn never_fires_twice() {
        let mut join = CompletionJoin::new(2);
        join.complete_one();
        assert!(join.complete_one());
        // late stragglers must not re-trigger the round transition
        assert!(!join.complete_one());
        assert!(!join.complete_one());
        assert!(join.is_done());
    }

    #[test]
    fn single_completion_round() {
        let mut join = CompletionJoin::new(1);
        assert!(join.complete_one());
    }

    #[test]
    fn tracks_progress() {
        let mut join = CompletionJoin::new(4);
        join.complete_one();
        join.complete_one();
        assert_eq!(join.completed(), 2);
        assert_eq!(join.expected(), 4);
    }
}
