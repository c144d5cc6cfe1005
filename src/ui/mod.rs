//=========================================================================
// UI
//=========================================================================
//
// Ready-made widgets built on the object model.
//
//=========================================================================

//=== Module Declarations =================================================

mod button;

//=== Public API ==========================================================

pub use button::{Button, ButtonAction, ButtonState};
