//=========================================================================
// Rogue Core: Library Root
//
// Scene, object and event runtime for small 2D games.
//
// Responsibilities:
// - Expose the scene and object model (`core`)
// - Expose ready-made widgets (`ui`)
// - Keep the Winit driver (`platform`) hidden behind `Engine::run`
//
// Typical usage:
// ```no_run
// use rogue_core::prelude::*;
//
// struct Title;
// impl Scene for Title {}
//
// fn main() -> Result<()> {
//     EngineBuilder::new()
//         .build(|_| Title)?
//         .run(RecordingCanvas::new())
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------

pub mod core;
pub mod error;
pub mod prelude;
pub mod ui;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the window and event loop; `engine` is the facade that
// starts it.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineConfig};
pub use error::{EngineError, Result};
