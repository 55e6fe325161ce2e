use serde::{Deserialize, Serialize};

use lavaquest_core::identity::{AvatarId, AvatarStyle};

/// One on-screen participant. The `eliminated` flag is monotonic: it is
/// set once and never cleared for the lifetime of the avatar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    pub id: AvatarId,
    pub style: AvatarStyle,
    pub is_player: bool,
    pub platform_index: usize,
    pub eliminated: bool,
    pub position: (f32, f32),
}

/// Owns every live avatar in the session, plus the paint order used by
/// the presentation layer (last id draws front-most).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvatarRegistry {
    avatars: Vec<Avatar>,
    next_id: AvatarId,
    display_order: Vec<AvatarId>,
}

impl AvatarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a live avatar and return its id. Ids are never reused,
    /// even across resets, so a stale completion for a removed avatar
    /// simply fails its lookup.
    pub fn spawn(
        &mut self,
        style: AvatarStyle,
        is_player: bool,
        platform_index: usize,
        position: (f32, f32),
    ) -> AvatarId {
        debug_assert!(
            !(is_player && self.player().is_some()),
            "a session holds a single player avatar"
        );
        let id = self.next_id;
        self.next_id += 1;
        self.avatars.push(Avatar {
            id,
            style,
            is_player,
            platform_index,
            eliminated: false,
            position,
        });
        self.display_order.push(id);
        id
    }

    pub fn get(&self, id: AvatarId) -> Option<&Avatar> {
        self.avatars.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: AvatarId) -> Option<&mut Avatar> {
        self.avatars.iter_mut().find(|a| a.id == id)
    }

    pub fn player(&self) -> Option<&Avatar> {
        self.avatars.iter().find(|a| a.is_player)
    }

    pub fn player_id(&self) -> Option<AvatarId> {
        self.player().map(|a| a.id)
    }

    pub fn len(&self) -> usize {
        self.avatars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.avatars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Avatar> {
        self.avatars.iter()
    }

    /// Flag an avatar as eliminated. Returns true only the first time;
    /// repeat calls and unknown ids are no-ops.
    pub fn mark_eliminated(&mut self, id: AvatarId) -> bool {
        match self.get_mut(id) {
            Some(avatar) if !avatar.eliminated => {
                avatar.eliminated = true;
                true
            }
            _ => false,
        }
    }

    /// Drop an avatar entirely. Returns false for unknown ids.
    pub fn remove(&mut self, id: AvatarId) -> bool {
        let before = self.avatars.len();
        self.avatars.retain(|a| a.id != id);
        self.display_order.retain(|&d| d != id);
        self.avatars.len() != before
    }

    /// Raise an avatar in the paint order. The player is re-asserted
    /// front-most afterward, so nothing ever draws over the player.
    pub fn bring_to_front(&mut self, id: AvatarId) {
        let is_player = self.get(id).is_some_and(|a| a.is_player);
        if !is_player
            && let Some(pos) = self.display_order.iter().position(|&d| d == id)
        {
            let id = self.display_order.remove(pos);
            self.display_order.push(id);
        }
        self.update_display_order();
    }

    /// Re-assert the player as front-most.
    pub fn update_display_order(&mut self) {
        if let Some(player_id) = self.player_id()
            && let Some(pos) = self.display_order.iter().position(|&d| d == player_id)
        {
            let id = self.display_order.remove(pos);
            self.display_order.push(id);
        }
    }

    pub fn display_order(&self) -> &[AvatarId] {
        &self.display_order
    }

    /// Remove every avatar. The id counter keeps advancing so ids stay
    /// unique across sessions.
    pub fn clear(&mut self) {
        self.avatars.clear();
        self.display_order.clear();
    }
}
