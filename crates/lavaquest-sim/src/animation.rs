use serde::{Deserialize, Serialize};

use lavaquest_core::identity::AvatarId;

/// What an in-flight animation will have done to its avatar when it
/// lands: hopped to the next platform, or fallen out of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationKind {
    Advance,
    Fall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PendingAnimation {
    avatar: AvatarId,
    kind: AnimationKind,
    remaining: f32,
}

/// Stand-in for the tween layer: tracks when each dispatched animation
/// finishes, in simulated seconds. The session only cares about
/// completions; everything between dispatch and completion is the
/// presentation layer's business.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationScheduler {
    pending: Vec<PendingAnimation>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, avatar: AvatarId, kind: AnimationKind, completes_in: f32) {
        self.pending.push(PendingAnimation {
            avatar,
            kind,
            remaining: completes_in,
        });
    }

    /// Advance simulated time and return every animation that finished,
    /// in schedule order among those due this update.
    pub fn update(&mut self, dt: f32) -> Vec<(AvatarId, AnimationKind)> {
        for anim in &mut self.pending {
            anim.remaining -= dt;
        }

        let mut done = Vec::new();
        self.pending.retain(|anim| {
            if anim.remaining <= 0.0 {
                done.push((anim.avatar, anim.kind));
                false
            } else {
                true
            }
        });
        done
    }

    /// Finish everything immediately, regardless of time remaining.
    pub fn drain_all(&mut self) -> Vec<(AvatarId, AnimationKind)> {
        self.pending
            .drain(..)
            .map(|anim| (anim.avatar, anim.kind))
            .collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}
