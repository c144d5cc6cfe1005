//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use rogue_core::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder, EngineConfig};
pub use crate::error::{EngineError, Result};

// Scene system
pub use crate::core::scene::{FrameControl, Scene, SceneManager, TransitionQueue};

// Objects
pub use crate::core::objects::{
    Clickable, Context, Drawable, DrawableObject, GameObject, ObjectGroup, ObjectId, ObjectManager, Timer,
};

// Input system
pub use crate::core::input::{EventKind, InputEvent, KeyCode, Modifiers, MouseButton};

// Values
pub use crate::core::clock::{Clock, ManualClock, SystemClock};
pub use crate::core::geometry::{Point, Rect};
pub use crate::core::render::{Canvas, Color, RecordingCanvas, Sprite};

// Widgets
pub use crate::ui::{Button, ButtonState};
