//=========================================================================
// Input Event Types
//
// Defines the engine's representation of the raw per-frame input batch.
//
// The platform layer (winit) or any other driver converts OS input into
// these events; scenes receive them as an ordered slice each frame and
// the EventManager routes them to subscribed objects by `EventKind`.
//
// Design:
// - `MouseButton`, `KeyCode`, `Modifiers`, `EventKind` are Copy
// - Button events carry the pointer position at the time of the press
// - Equality/hash ignore pointer coordinates so the input buffer can
//   coalesce motion (last position wins) and drop repeated presses
//
// Event Flow:
// ```text
// Platform Layer (winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    Scene::events → ObjectManager → EventManager
//         ↓
//    Subscribed GameObjects
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::hash::{Hash, Hasher};

//=== Internal Dependencies ===============================================

use crate::core::geometry::Point;

//=== MouseButton =========================================================

/// Physical mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button (side buttons, thumb buttons).
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Fallback for keys the input layer does not map.
    Unidentified,
}

//=== EventKind ===========================================================

/// Subscription key for the EventManager: the event's type without
/// its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    KeyDown,
    KeyUp,
    MouseButtonDown,
    MouseButtonUp,
    MouseMoved,
    Quit,
    Unidentified,
}

//=== InputEvent ==========================================================

/// One raw input event from the driver's per-frame batch.
///
/// # Equality & Hashing Semantics
///
/// ```text
/// KeyDown{A, CTRL}           == KeyDown{A, CTRL}            ✓
/// KeyDown{A, CTRL}           == KeyDown{A, SHIFT}           ✗
/// MouseButtonDown{L, @10,10} == MouseButtonDown{L, @90,90}  ✓ (position ignored)
/// MouseMoved{...}            == MouseMoved{...}             ✓
/// ```
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Key pressed down.
    KeyDown {
        key: KeyCode,
        modifiers: Modifiers,
    },

    /// Key released.
    KeyUp {
        key: KeyCode,
        modifiers: Modifiers,
    },

    /// Mouse button pressed at `position`.
    MouseButtonDown {
        button: MouseButton,
        position: Point,
        modifiers: Modifiers,
    },

    /// Mouse button released at `position`.
    MouseButtonUp {
        button: MouseButton,
        position: Point,
        modifiers: Modifiers,
    },

    /// Cursor moved to a new position (screen space, top-left origin).
    MouseMoved { x: f32, y: f32 },

    /// The user or OS asked the program to close.
    Quit,

    /// Unrecognized or unsupported event; no listener ever receives it
    /// unless explicitly subscribed.
    Unidentified,
}

//--- Implementation ------------------------------------------------------

impl InputEvent {
    /// Returns the payload-free kind used for subscriptions.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::KeyDown { .. } => EventKind::KeyDown,
            Self::KeyUp { .. } => EventKind::KeyUp,
            Self::MouseButtonDown { .. } => EventKind::MouseButtonDown,
            Self::MouseButtonUp { .. } => EventKind::MouseButtonUp,
            Self::MouseMoved { .. } => EventKind::MouseMoved,
            Self::Quit => EventKind::Quit,
            Self::Unidentified => EventKind::Unidentified,
        }
    }

    /// Pointer position carried by button and motion events.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::MouseButtonDown { position, .. } | Self::MouseButtonUp { position, .. } => {
                Some(*position)
            }
            Self::MouseMoved { x, y } => Some(Point::new(*x, *y)),
            _ => None,
        }
    }

    /// Convenience constructor for a button press without modifiers.
    pub fn mouse_down(button: MouseButton, x: f32, y: f32) -> Self {
        Self::MouseButtonDown {
            button,
            position: Point::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    /// Returns a new event with updated modifiers (consumes self).
    ///
    /// Has no effect on `MouseMoved`, `Quit` and `Unidentified`.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        match &mut self {
            Self::KeyDown { modifiers: m, .. }
            | Self::KeyUp { modifiers: m, .. }
            | Self::MouseButtonDown { modifiers: m, .. }
            | Self::MouseButtonUp { modifiers: m, .. } => {
                *m = modifiers;
            }
            _ => {}
        }
        self
    }
}

//--- Trait Implementations -----------------------------------------------

impl PartialEq for InputEvent {
    fn eq(&self, other: &Self) -> bool {
        use InputEvent::*;
        match (self, other) {
            (KeyDown { key: a, modifiers: ma }, KeyDown { key: b, modifiers: mb })
            | (KeyUp { key: a, modifiers: ma }, KeyUp { key: b, modifiers: mb }) => {
                a == b && ma == mb
            }
            (
                MouseButtonDown { button: a, modifiers: ma, .. },
                MouseButtonDown { button: b, modifiers: mb, .. },
            )
            | (
                MouseButtonUp { button: a, modifiers: ma, .. },
                MouseButtonUp { button: b, modifiers: mb, .. },
            ) => a == b && ma == mb,
            (MouseMoved { .. }, MouseMoved { .. }) => true,
            (Quit, Quit) => true,
            (Unidentified, Unidentified) => true,
            _ => false,
        }
    }
}

impl Eq for InputEvent {}

/// Hashes discriminant + key/button + modifiers. Coordinates are never
/// hashed (consistent with equality).
impl Hash for InputEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);

        match self {
            Self::KeyDown { key, modifiers } | Self::KeyUp { key, modifiers } => {
                key.hash(state);
                modifiers.hash(state);
            }
            Self::MouseButtonDown { button, modifiers, .. }
            | Self::MouseButtonUp { button, modifiers, .. } => {
                button.hash(state);
                modifiers.hash(state);
            }
            _ => {}
        }
    }
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt), left/right not distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };

    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    //--- Test Helpers -----------------------------------------------------

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn key_down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    //=====================================================================
    // Kind Tests
    //=====================================================================

    #[test]
    fn kind_strips_payload() {
        assert_eq!(key_down(KeyCode::KeyA).kind(), EventKind::KeyDown);
        assert_eq!(
            InputEvent::mouse_down(MouseButton::Right, 1.0, 2.0).kind(),
            EventKind::MouseButtonDown
        );
        assert_eq!(InputEvent::MouseMoved { x: 0.0, y: 0.0 }.kind(), EventKind::MouseMoved);
        assert_eq!(InputEvent::Quit.kind(), EventKind::Quit);
    }

    #[test]
    fn position_only_for_pointer_events() {
        let click = InputEvent::mouse_down(MouseButton::Left, 3.0, 4.0);
        assert_eq!(click.position(), Some(Point::new(3.0, 4.0)));
        assert_eq!(key_down(KeyCode::Space).position(), None);
    }

    //=====================================================================
    // Equality & Hashing Tests
    //=====================================================================

    #[test]
    fn equality_same_key_different_modifiers() {
        let a = key_down(KeyCode::KeyA);
        let b = key_down(KeyCode::KeyA).with_modifiers(Modifiers::CTRL);
        assert_ne!(a, b);
        assert_ne!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn button_events_ignore_position() {
        let a = InputEvent::mouse_down(MouseButton::Left, 10.0, 10.0);
        let b = InputEvent::mouse_down(MouseButton::Left, 90.0, 90.0);
        let c = InputEvent::mouse_down(MouseButton::Right, 10.0, 10.0);

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, c);
    }

    #[test]
    fn mouse_moved_ignores_coordinates() {
        let a = InputEvent::MouseMoved { x: 1.0, y: 2.0 };
        let b = InputEvent::MouseMoved { x: 300.0, y: 400.0 };
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn with_modifiers_ignores_quit() {
        let updated = InputEvent::Quit.with_modifiers(Modifiers::ALT);
        assert_eq!(updated, InputEvent::Quit);
    }

    #[test]
    fn modifiers_default_is_none() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
    }
}
