//=========================================================================
// Core
//
// Everything that runs inside a frame, independent of any window.
//
// Layout:
// - `scene`    active scene, deferred transitions, saved scenes
// - `objects`  object arena, event registry, groups, timers
// - `input`    per-frame input vocabulary
// - `clock`, `geometry`, `render`  small shared value types
//
//=========================================================================

pub mod clock;
pub mod geometry;
pub mod input;
pub mod objects;
pub mod render;
pub mod scene;
