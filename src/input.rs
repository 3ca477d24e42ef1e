//! Input-to-intent mapping
//!
//! The simulation never sees devices. Whatever polls the keyboard reduces it to
//! one [`RawInput`] per player slot, and [`map_intent`] turns that into an
//! [`Intent`] for the tick.

use serde::{Deserialize, Serialize};

/// Logical keys a device layer can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    A,
    D,
    W,
    F,
    H,
    T,
    J,
    L,
    I,
    Numpad4,
    Numpad6,
    Numpad8,
}

/// Per-slot bindings as (left, right, jump)
///
/// Slots past the end of the table share slot 0.
pub const BINDINGS: [[Key; 3]; 5] = [
    [Key::ArrowLeft, Key::ArrowRight, Key::ArrowUp],
    [Key::A, Key::D, Key::W],
    [Key::F, Key::H, Key::T],
    [Key::J, Key::L, Key::I],
    [Key::Numpad4, Key::Numpad6, Key::Numpad8],
];

/// Binding for a player slot
pub fn binding_for(slot: usize) -> [Key; 3] {
    BINDINGS.get(slot).copied().unwrap_or(BINDINGS[0])
}

/// Held state of one player's controls for a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl RawInput {
    /// Reduce the set of currently held keys to this slot's booleans
    pub fn from_pressed(slot: usize, pressed: &[Key]) -> Self {
        let [left, right, jump] = binding_for(slot);
        Self {
            left: pressed.contains(&left),
            right: pressed.contains(&right),
            jump: pressed.contains(&jump),
        }
    }
}

/// Horizontal movement intent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Horizontal {
    MoveLeft,
    MoveRight,
    #[default]
    Idle,
}

/// Vertical movement intent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vertical {
    Jump,
    #[default]
    NoJump,
}

/// Device-independent intent for one player for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub horizontal: Horizontal,
    pub vertical: Vertical,
}

/// Map held controls to an intent. Left wins when both directions are held.
pub fn map_intent(raw: RawInput) -> Intent {
    let horizontal = if raw.left {
        Horizontal::MoveLeft
    } else if raw.right {
        Horizontal::MoveRight
    } else {
        Horizontal::Idle
    };
    let vertical = if raw.jump {
        Vertical::Jump
    } else {
        Vertical::NoJump
    };
    Intent {
        horizontal,
        vertical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_beats_right() {
        let intent = map_intent(RawInput {
            left: true,
            right: true,
            jump: false,
        });
        assert_eq!(intent.horizontal, Horizontal::MoveLeft);
        assert_eq!(intent.vertical, Vertical::NoJump);
    }

    #[test]
    fn test_idle_and_jump() {
        assert_eq!(map_intent(RawInput::default()), Intent::default());

        let intent = map_intent(RawInput {
            right: true,
            jump: true,
            ..Default::default()
        });
        assert_eq!(intent.horizontal, Horizontal::MoveRight);
        assert_eq!(intent.vertical, Vertical::Jump);
    }

    #[test]
    fn test_from_pressed_uses_slot_binding() {
        let pressed = [Key::A, Key::W, Key::ArrowRight];

        let slot1 = RawInput::from_pressed(1, &pressed);
        assert!(slot1.left && slot1.jump && !slot1.right);

        let slot0 = RawInput::from_pressed(0, &pressed);
        assert!(slot0.right && !slot0.left && !slot0.jump);
    }

    #[test]
    fn test_slots_past_table_share_arrows() {
        assert_eq!(binding_for(7), BINDINGS[0]);
        let raw = RawInput::from_pressed(9, &[Key::ArrowUp]);
        assert!(raw.jump);
    }
}
