use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Non-repeating draws over an opponent art roster.
///
/// Draws hand out each roster index exactly once, in shuffled order.
/// When the pool runs dry it refills and reshuffles on the next draw,
/// so callers never observe exhaustion, only that repeats cannot occur
/// within one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentPool {
    roster_len: usize,
    remaining: Vec<usize>,
}

impl OpponentPool {
    /// A pool over `roster_len` entries. Starts empty; the first draw
    /// triggers the initial fill and shuffle.
    pub fn new(roster_len: usize) -> Self {
        Self {
            roster_len,
            remaining: Vec::new(),
        }
    }

    /// Discard any partial pass and reshuffle the full roster.
    pub fn reset_selection(&mut self, rng: &mut impl Rng) {
        self.remaining.clear();
        self.remaining.extend(0..self.roster_len);
        self.remaining.shuffle(rng);
    }

    /// Draw the next roster index. Returns `None` only for an empty
    /// roster.
    pub fn draw_next(&mut self, rng: &mut impl Rng) -> Option<usize> {
        if self.roster_len == 0 {
            return None;
        }

        if self.remaining.is_empty() {
            self.reset_selection(rng);
        }

        let pick = rng.random_range(0..self.remaining.len());
        Some(self.remaining.swap_remove(pick))
    }

    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    pub fn roster_len(&self) -> usize {
        self.roster_len
    }
}
