//=========================================================================
// Object System
//=========================================================================
//
// Game objects, their registry and the per-hook context.
//
// Architecture:
//   ObjectManager (arena, one per scene session)
//     ├─ entries: HashMap<ObjectId, Entry { Box<dyn GameObject>, tree links }>
//     ├─ objects: Vec<ObjectId>          (live, stable layer order)
//     ├─ event_manager: EventManager     (EventKind → listener ids)
//     └─ groups: HashMap<String, ObjectGroup>
//
// Ownership:
//   Objects are owned by the arena. Parent → child links are ordered
//   keys to ids; the child → parent link is a plain id and is cleared
//   when the parent goes away, so the tree never owns upward.
//
// Hooks:
//   While a hook runs, its object is checked out of the arena and the
//   hook gets `&mut Context` (object manager, scene requests, clock).
//   Passes walk a snapshot of ids and skip ids that vanished mid-pass.
//
//=========================================================================

//=== Module Declarations =================================================

mod context;
mod drawable;
mod event_manager;
mod group;
mod manager;
mod timer;
mod typed;

//=== Public API ==========================================================

pub use context::Context;
pub use drawable::{route_click, Clickable, Drawable, DrawableObject, DEFAULT_LAYER};
pub use event_manager::{EventManager, EventSink};
pub use group::ObjectGroup;
pub use manager::ObjectManager;
pub use timer::{Timer, TimerAction};
pub use typed::TypedCursor;

//=== External Dependencies ===============================================

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

//=== Internal Dependencies ===============================================

use crate::core::input::{EventKind, InputEvent};
use crate::error::Result;

//=== ObjectId ============================================================

/// Handle to an object registered in an [`ObjectManager`].
///
/// Ids are unique for the whole process, so an id taken from a parked
/// scene can never alias an object of the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, for logging.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//=== AsAny ===============================================================

/// Downcasting support for objects and scenes.
///
/// Blanket-implemented for every sized `'static` type; never implement
/// it by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=== GameObject Trait ====================================================

/// Base entity of the runtime.
///
/// Every hook is optional. Capabilities (drawable, clickable, initial
/// subscriptions) are queried once, when the object is inserted into an
/// [`ObjectManager`], and cached there.
///
/// # Minimal Implementation
///
/// ```rust
/// # use rogue_core::prelude::*;
/// struct Spawner {
///     spawned: u32,
/// }
///
/// impl GameObject for Spawner {
///     fn update(&mut self, _this: ObjectId, _ctx: &mut Context<'_>) -> Result<()> {
///         self.spawned += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait GameObject: AsAny {
    /// Per-frame update, called in layer order by the update pass.
    fn update(&mut self, _this: ObjectId, _ctx: &mut Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Receives events of every kind this object is subscribed to.
    ///
    /// The default routes pointer presses to the [`Clickable`] hooks when
    /// the object is clickable. Overrides that still want click routing
    /// call [`route_click`] themselves.
    fn on_event(&mut self, this: ObjectId, event: &InputEvent, ctx: &mut Context<'_>) -> Result<()> {
        match self.as_clickable_mut() {
            Some(clickable) => route_click(clickable, this, event, ctx),
            None => Ok(()),
        }
    }

    /// Called on every live object when its scene is parked.
    fn save_object(&mut self, _now: u64) {}

    /// Called on every live object when its parked scene is restored.
    fn load_object(&mut self, _now: u64) {}

    /// Event kinds to subscribe to when the object is registered.
    fn subscriptions(&self) -> &'static [EventKind] {
        &[]
    }

    /// Visual capability. Drawables take part in the render pass and
    /// sort by their layer; everything else sorts as layer 0.
    fn as_drawable(&self) -> Option<&dyn Drawable> {
        None
    }

    /// Pointer capability. Clickables are subscribed to button presses
    /// when registered.
    fn as_clickable_mut(&mut self) -> Option<&mut dyn Clickable> {
        None
    }
}
