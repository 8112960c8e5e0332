//! Evidence pinboard layout.
//!
//! Photos sit at a fixed table of positions with a slight tilt so the board
//! looks hand-pinned. The table is indexed by slot, never by entry identity,
//! so the same board always looks the same.

use egui::{Color32, Vec2};

/// Board background and photo frame colors.
pub const BOARD_COLOR: Color32 = Color32::from_rgb(0x63, 0x37, 0x2C);
pub const FRAME_COLOR: Color32 = Color32::from_rgb(0x49, 0x11, 0x1C);
pub const PIN_COLOR: Color32 = Color32::from_rgb(0xFA, 0xCC, 0x15);
pub const STRING_COLOR: Color32 = Color32::from_rgb(0xDC, 0x26, 0x26);

/// A pin position: `top`/`left` as fractions of the board, `rotation` in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinSlot {
    pub top: f32,
    pub left: f32,
    pub rotation: f32,
}

const fn slot(top: f32, left: f32, rotation: f32) -> PinSlot {
    PinSlot {
        top,
        left,
        rotation,
    }
}

pub const PIN_SLOTS: [PinSlot; 9] = [
    slot(0.08, 0.10, -3.0),
    slot(0.05, 0.45, 2.0),
    slot(0.12, 0.75, -2.0),
    slot(0.35, 0.08, 4.0),
    slot(0.38, 0.52, -4.0),
    slot(0.42, 0.82, 3.0),
    slot(0.65, 0.15, -2.0),
    slot(0.68, 0.55, 2.0),
    slot(0.70, 0.85, -3.0),
];

impl PinSlot {
    pub fn for_index(index: usize) -> PinSlot {
        PIN_SLOTS[index % PIN_SLOTS.len()]
    }

    /// Top-left corner in board coordinates.
    pub fn offset(&self, board_size: Vec2) -> Vec2 {
        Vec2::new(self.left * board_size.x, self.top * board_size.y)
    }

    pub fn rotation_radians(&self) -> f32 {
        self.rotation.to_radians()
    }
}

/// Where one entry is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub index: usize,
    pub slot: PinSlot,
    /// Later entries are painted on top.
    pub z: usize,
}

pub fn layout(count: usize) -> Vec<Placement> {
    (0..count)
        .map(|index| Placement {
            index,
            slot: PinSlot::for_index(index),
            z: index,
        })
        .collect()
}

/// Pairs of placements joined by a red string, one between each
/// consecutive pair of entries.
pub fn connections(count: usize) -> Vec<(usize, usize)> {
    (1..count).map(|i| (i - 1, i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_wrap_by_index() {
        assert_eq!(PinSlot::for_index(0), PIN_SLOTS[0]);
        assert_eq!(PinSlot::for_index(9), PIN_SLOTS[0]);
        assert_eq!(PinSlot::for_index(13), PIN_SLOTS[4]);
    }

    #[test]
    fn layout_is_deterministic() {
        assert_eq!(layout(5), layout(5));
        let l = layout(5);
        assert_eq!(l.len(), 5);
        assert_eq!(l[4].slot, PIN_SLOTS[4]);
        assert_eq!(l[4].z, 4);
    }

    #[test]
    fn offsets_scale_with_board() {
        let off = PIN_SLOTS[1].offset(Vec2::new(200.0, 600.0));
        assert!((off.x - 90.0).abs() < 1e-4);
        assert!((off.y - 30.0).abs() < 1e-4);
    }

    #[test]
    fn strings_link_consecutive_pins() {
        assert!(connections(0).is_empty());
        assert!(connections(1).is_empty());
        assert_eq!(connections(4), vec![(0, 1), (1, 2), (2, 3)]);
    }
}
