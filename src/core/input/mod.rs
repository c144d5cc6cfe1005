//=========================================================================
// Input
//=========================================================================
//
// Raw input vocabulary shared by the platform layer, scenes and the
// object event registry. There is no polling here: the driver hands a
// complete per-frame batch to `Scene::events`.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;

//=== Public API ==========================================================

pub use event::{EventKind, InputEvent, KeyCode, Modifiers, MouseButton};
