use serde::{Deserialize, Serialize};

/// Session-scoped avatar id. Ids are never reused within a session, so a
/// stale animation completion can be ignored by lookup failure alone.
pub type AvatarId = u64;

/// Visual identity for one avatar: sprite sheet icon plus frame art.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarStyle {
    pub icon: u8,
    pub frame: u8,
}

impl Default for AvatarStyle {
    fn default() -> Self {
        Self::PLAYER
    }
}

impl AvatarStyle {
    /// The player's own avatar art.
    pub const PLAYER: AvatarStyle = AvatarStyle { icon: 0, frame: 0 };

    /// Opponent roster the pool draws from. Frames cycle so neighboring
    /// icons do not share a border color.
    pub const ROSTER: &[AvatarStyle] = &[
        AvatarStyle { icon: 1, frame: 0 },
        AvatarStyle { icon: 2, frame: 1 },
        AvatarStyle { icon: 3, frame: 2 },
        AvatarStyle { icon: 4, frame: 3 },
        AvatarStyle { icon: 5, frame: 0 },
        AvatarStyle { icon: 6, frame: 1 },
        AvatarStyle { icon: 7, frame: 2 },
        AvatarStyle { icon: 8, frame: 3 },
        AvatarStyle { icon: 9, frame: 0 },
        AvatarStyle { icon: 10, frame: 1 },
        AvatarStyle { icon: 11, frame: 2 },
        AvatarStyle { icon: 12, frame: 3 },
        AvatarStyle { icon: 13, frame: 0 },
        AvatarStyle { icon: 14, frame: 1 },
        AvatarStyle { icon: 15, frame: 2 },
        AvatarStyle { icon: 16, frame: 3 },
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_icons_are_unique() {
        let mut icons: Vec<u8> = AvatarStyle::ROSTER.iter().map(|s| s.icon).collect();
        icons.sort_unstable();
        icons.dedup();
        assert_eq!(icons.len(), AvatarStyle::ROSTER.len());
    }

    #[test]
    fn roster_excludes_player_art() {
        assert!(
            AvatarStyle::ROSTER
                .iter()
                .all(|s| s.icon != AvatarStyle::PLAYER.icon)
        );
    }

    #[test]
    fn default_style_is_player() {
        assert_eq!(AvatarStyle::default(), AvatarStyle::PLAYER);
    }
}
