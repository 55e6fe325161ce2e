use serde::{Deserialize, Serialize};

use lavaquest_core::identity::AvatarId;

/// Geometry for one platform: its reference position and the fixed
/// standing positions on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub position: (f32, f32),
    pub slots: Vec<(f32, f32)>,
}

/// The authored course, ordered from the starting platform upward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformLayout {
    pub platforms: Vec<PlatformSpec>,
}

impl PlatformLayout {
    pub const PLATFORM_SPACING: f32 = 240.0;
    pub const SLOT_SPACING: f32 = 44.0;
    pub const DEFAULT_SLOTS_PER_PLATFORM: usize = 6;

    /// A zig-zag tower of `count` platforms, alternating left and right
    /// of center, with a centered row of `slots_per_platform` standing
    /// positions on each. Odd slots sit slightly higher so crowded
    /// platforms read as a loose cluster rather than a straight line.
    pub fn generate(count: usize, slots_per_platform: usize) -> Self {
        let platforms = (0..count)
            .map(|i| {
                let x = if i % 2 == 0 { -90.0 } else { 90.0 };
                let y = i as f32 * Self::PLATFORM_SPACING;
                let half_span = (slots_per_platform.saturating_sub(1)) as f32 / 2.0;
                let slots = (0..slots_per_platform)
                    .map(|s| {
                        let sx = x + (s as f32 - half_span) * Self::SLOT_SPACING;
                        let sy = if s % 2 == 1 { y + 14.0 } else { y };
                        (sx, sy)
                    })
                    .collect();
                PlatformSpec {
                    position: (x, y),
                    slots,
                }
            })
            .collect();
        Self { platforms }
    }
}

/// Occupancy tracking over a fixed course.
///
/// Each platform hands out standing positions round-robin over its slot
/// list and keeps a list of who is currently on it. Occupant lists hold
/// ids only; the registry owns the avatars themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformTopology {
    specs: Vec<PlatformSpec>,
    occupants: Vec<Vec<AvatarId>>,
    cursors: Vec<usize>,
}

impl PlatformTopology {
    pub fn new(layout: PlatformLayout) -> Self {
        let count = layout.platforms.len();
        Self {
            specs: layout.platforms,
            occupants: vec![Vec::new(); count],
            cursors: vec![0; count],
        }
    }

    pub fn platform_count(&self) -> usize {
        self.specs.len()
    }

    /// Reference position of a platform. Panics if `index` is off the
    /// course.
    pub fn anchor_position(&self, index: usize) -> (f32, f32) {
        assert!(
            index < self.specs.len(),
            "platform index {index} out of range ({} platforms)",
            self.specs.len()
        );
        self.specs[index].position
    }

    /// Hand out the next standing position on a platform, wrapping over
    /// its slot list. A platform with no slots yields its reference
    /// position. Panics if `index` is off the course.
    pub fn reserve_next_slot(&mut self, index: usize) -> (f32, f32) {
        assert!(
            index < self.specs.len(),
            "platform index {index} out of range ({} platforms)",
            self.specs.len()
        );
        let spec = &self.specs[index];
        if spec.slots.is_empty() {
            return spec.position;
        }
        let position = spec.slots[self.cursors[index] % spec.slots.len()];
        self.cursors[index] += 1;
        position
    }

    /// Record `id` as standing on a platform. Adding an id twice is a
    /// no-op.
    pub fn add_occupant(&mut self, index: usize, id: AvatarId) {
        let list = &mut self.occupants[index];
        if !list.contains(&id) {
            list.push(id);
        }
    }

    pub fn occupants(&self, index: usize) -> &[AvatarId] {
        &self.occupants[index]
    }

    /// Empty a platform and rewind its slot cursor.
    pub fn clear_platform(&mut self, index: usize) {
        self.occupants[index].clear();
        self.cursors[index] = 0;
    }

    pub fn clear_all(&mut self) {
        for index in 0..self.specs.len() {
            self.clear_platform(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_slot_course() -> PlatformTopology {
        PlatformTopology::new(PlatformLayout::generate(4, 3))
    }

    #[test]
    fn generate_shapes_the_course() {
        let layout = PlatformLayout::generate(8, 6);
        assert_eq!(layout.platforms.len(), 8);
        for (i, platform) in layout.platforms.iter().enumerate() {
            assert_eq!(platform.slots.len(), 6);
            let expected_x = if i % 2 == 0 { -90.0 } else { 90.0 };
            assert_eq!(platform.position.0, expected_x);
            assert_eq!(platform.position.1, i as f32 * PlatformLayout::PLATFORM_SPACING);
        }
    }

    #[test]
    fn slots_wrap_round_robin() {
        let mut topology = three_slot_course();

        let first = topology.reserve_next_slot(0);
        let second = topology.reserve_next_slot(0);
        let third = topology.reserve_next_slot(0);
        assert_ne!(first, second);
        assert_ne!(second, third);

        // fourth reservation wraps back to the first slot
        assert_eq!(topology.reserve_next_slot(0), first);
        assert_eq!(topology.reserve_next_slot(0), second);
    }

    #[test]
    fn platform_without_slots_yields_anchor() {
        let mut topology = PlatformTopology::new(PlatformLayout {
            platforms: vec![PlatformSpec {
                position: (10.0, 20.0),
                slots: Vec::new(),
            }],
        });

        assert_eq!(topology.reserve_next_slot(0), (10.0, 20.0));
        assert_eq!(topology.reserve_next_slot(0), (10.0, 20.0));
    }

    #[test]
    fn clear_resets_the_cursor() {
        let mut topology = three_slot_course();

        let first = topology.reserve_next_slot(2);
        topology.reserve_next_slot(2);
        topology.add_occupant(2, 9);
        topology.clear_platform(2);

        assert!(topology.occupants(2).is_empty());
        assert_eq!(
            topology.reserve_next_slot(2),
            first,
            "cursor must rewind to the first slot after a clear"
        );
    }

    #[test]
    fn occupants_deduplicate() {
        let mut topology = three_slot_course();

        topology.add_occupant(1, 5);
        topology.add_occupant(1, 5);
        topology.add_occupant(1, 6);

        assert_eq!(topology.occupants(1), &[5, 6]);
    }

    #[test]
    fn clear_all_empties_every_platform() {
        let mut topology = three_slot_course();
        topology.add_occupant(0, 1);
        topology.add_occupant(3, 2);

        topology.clear_all();

        for index in 0..topology.platform_count() {
            assert!(topology.occupants(index).is_empty());
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn reserving_off_the_course_is_fatal() {
        let mut topology = three_slot_course();
        topology.reserve_next_slot(99);
    }
}
