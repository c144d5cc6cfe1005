//=========================================================================
// Scene System
//=========================================================================
//
// Scenes and the deferred scene-transition state machine.
//
// Architecture:
//   SceneManager
//     ├─ active: Option<(Box<dyn Scene>, ObjectManager)>
//     ├─ queue: TransitionQueue
//     │    ├─ pending: Option<PendingTransition>   (one per frame)
//     │    └─ saved: HashMap<String, SuspendedScene>
//     └─ clock: Box<dyn Clock>
//
// Frame:
//   events() → update() → render() → end_frame()
//
// Only end_frame swaps the active scene, so passes never see the object
// collection change underneath them.
//
//=========================================================================

//=== Module Declarations =================================================

mod scene_manager;
mod transition_queue;

//=== Public API ==========================================================

pub use scene_manager::{FrameControl, SceneManager};
pub use transition_queue::{SuspendedScene, TransitionQueue};

//=== Internal Dependencies ===============================================

use crate::core::input::{EventKind, InputEvent};
use crate::core::objects::{AsAny, Context, ObjectManager};
use crate::core::render::{Canvas, Color};
use crate::error::Result;

//=== Scene Trait =========================================================

/// Controller for one screen of the program.
///
/// Every hook has a default: events go to subscribed objects (and
/// `Quit` requests program exit), update runs the object update pass and
/// render fills the background then draws the objects.
///
/// # Minimal Implementation
///
/// ```rust
/// # use rogue_core::prelude::*;
/// struct Menu;
///
/// impl Scene for Menu {
///     fn start(&mut self, ctx: &mut Context<'_>) -> Result<()> {
///         let sprite = Sprite::new(1, 64, 32);
///         ctx.objects.spawn(
///             DrawableObject::new(sprite, Rect::new(10.0, 10.0, 64.0, 32.0)),
///             Some("ui"),
///         );
///         Ok(())
///     }
///
///     fn background(&self) -> Option<Color> {
///         Some(Color::LIGHT_GRAY)
///     }
/// }
/// ```
pub trait Scene: AsAny {
    /// Called once after construction, never on restore.
    fn start(&mut self, _ctx: &mut Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Receives the frame's raw event batch.
    fn events(&mut self, events: &[InputEvent], ctx: &mut Context<'_>) -> Result<()> {
        if events.iter().any(|e| e.kind() == EventKind::Quit) {
            ctx.scenes.request_quit();
        }
        ctx.object_events(events)
    }

    /// Per-frame update.
    fn update(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        ctx.object_update()
    }

    /// Color the default render fills the target with.
    fn background(&self) -> Option<Color> {
        None
    }

    fn render(&self, canvas: &mut dyn Canvas, objects: &ObjectManager) -> Result<()> {
        if let Some(color) = self.background() {
            canvas.fill(color);
        }
        objects.object_render(canvas);
        Ok(())
    }

    /// Called before the scene is replaced by a new one built on the same
    /// object manager. Not called when the scene is parked or discarded
    /// by a restore.
    fn end(&mut self, _ctx: &mut Context<'_>) -> Result<()> {
        Ok(())
    }
}

/// Builds a scene once its object manager is ready.
///
/// Arguments a scene needs are captured by the closure.
pub type SceneFactory = Box<dyn FnOnce(&mut Context<'_>) -> Box<dyn Scene>>;
