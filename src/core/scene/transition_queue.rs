//=========================================================================
// Transition Queue
//=========================================================================
//
// Pending-transition slot and suspended-scene snapshots.
//
// Scenes and objects request transitions here during a frame (through
// `Context::scenes`); the scene manager consumes the slot in
// `end_frame`. The slot holds at most one request: later requests in the
// same frame are ignored until it is consumed.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Standard Library Imports ============================================

use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::{Scene, SceneFactory};
use crate::core::objects::{Context, ObjectManager};
use crate::error::{EngineError, Result};

//=== SuspendedScene ======================================================

/// A parked scene together with its object manager.
pub struct SuspendedScene {
    pub(crate) scene: Box<dyn Scene>,
    pub(crate) objects: ObjectManager,
}

//=== PendingTransition ===================================================

/// Where a newly constructed scene gets its objects from.
pub(crate) enum ObjectSource {
    /// Reuse the outgoing scene's manager (cleared first).
    Current,

    /// Park the outgoing scene under `save_as`, start on an empty manager.
    Fresh { save_as: String },
}

pub(crate) enum PendingTransition {
    Construct {
        factory: SceneFactory,
        objects: ObjectSource,
    },
    Restore {
        name: String,
        snapshot: SuspendedScene,
    },
}

//=== TransitionQueue =====================================================

#[derive(Default)]
pub struct TransitionQueue {
    pending: Option<PendingTransition>,
    saved: HashMap<String, SuspendedScene>,
    quit_requested: bool,
}

impl TransitionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Requests ---------------------------------------------------------

    /// Requests a switch to the scene built by `build`, reusing the
    /// current object manager.
    ///
    /// Returns `false` if a transition is already pending this frame.
    pub fn go_to<S, F>(&mut self, build: F) -> bool
    where
        S: Scene,
        F: FnOnce(&mut Context<'_>) -> S + 'static,
    {
        self.request(PendingTransition::Construct {
            factory: boxed_factory(build),
            objects: ObjectSource::Current,
        })
    }

    /// Requests a switch to the scene built by `build` on a fresh object
    /// manager, parking the current scene and its objects under `name`.
    ///
    /// Returns `false` if a transition is already pending this frame.
    pub fn go_to_with_save<S, F>(&mut self, name: impl Into<String>, build: F) -> bool
    where
        S: Scene,
        F: FnOnce(&mut Context<'_>) -> S + 'static,
    {
        self.request(PendingTransition::Construct {
            factory: boxed_factory(build),
            objects: ObjectSource::Fresh {
                save_as: name.into(),
            },
        })
    }

    /// Requests a switch back to the scene parked under `name`.
    ///
    /// The snapshot is taken out of the table immediately. Returns
    /// `Ok(false)` if a transition is already pending, and
    /// [`EngineError::UnknownSavedScene`] if nothing is parked under
    /// `name`.
    pub fn load_scene(&mut self, name: &str) -> Result<bool> {
        if self.pending.is_some() {
            warn!(target: "scene", "Ignoring load_scene('{}'): transition already pending", name);
            return Ok(false);
        }

        let snapshot = self
            .saved
            .remove(name)
            .ok_or_else(|| EngineError::UnknownSavedScene(name.to_string()))?;

        debug!(target: "scene", "Queued restore of '{}'", name);
        self.pending = Some(PendingTransition::Restore {
            name: name.to_string(),
            snapshot,
        });
        Ok(true)
    }

    /// Asks the driver to stop after the current frame.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    //--- Queries ----------------------------------------------------------

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn has_saved(&self, name: &str) -> bool {
        self.saved.contains_key(name)
    }

    /// Names of parked scenes, sorted.
    pub fn saved_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.saved.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    //--- Scene Manager Side -----------------------------------------------

    pub(crate) fn take_pending(&mut self) -> Option<PendingTransition> {
        self.pending.take()
    }

    /// Puts a request back, e.g. when it could not be applied yet.
    pub(crate) fn restore_pending(&mut self, pending: PendingTransition) {
        self.pending = Some(pending);
    }

    /// Parks `snapshot` under `name`, replacing any earlier snapshot.
    pub(crate) fn park(&mut self, name: String, snapshot: SuspendedScene) {
        if self.saved.insert(name.clone(), snapshot).is_some() {
            warn!(target: "scene", "Saved scene '{}' was overwritten", name);
        } else {
            debug!(target: "scene", "Parked scene as '{}'", name);
        }
    }

    /// Takes back a snapshot parked by a transition that then failed.
    pub(crate) fn unpark(&mut self, name: &str) -> Option<SuspendedScene> {
        self.saved.remove(name)
    }

    fn request(&mut self, transition: PendingTransition) -> bool {
        if self.pending.is_some() {
            warn!(target: "scene", "Ignoring scene request: transition already pending");
            return false;
        }
        self.pending = Some(transition);
        true
    }
}

//--- Helpers -------------------------------------------------------------

fn boxed_factory<S, F>(build: F) -> SceneFactory
where
    S: Scene,
    F: FnOnce(&mut Context<'_>) -> S + 'static,
{
    Box::new(move |ctx: &mut Context<'_>| -> Box<dyn Scene> { Box::new(build(ctx)) })
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Blank;
    impl Scene for Blank {}

    fn suspended() -> SuspendedScene {
        SuspendedScene {
            scene: Box::new(Blank),
            objects: ObjectManager::new(),
        }
    }

    #[test]
    fn slot_accepts_only_first_request() {
        let mut queue = TransitionQueue::new();
        assert!(!queue.has_pending());

        assert!(queue.go_to(|_| Blank));
        assert!(!queue.go_to(|_| Blank));
        assert!(!queue.go_to_with_save("menu", |_| Blank));
        assert!(queue.has_pending());

        assert!(queue.take_pending().is_some());
        assert!(!queue.has_pending());
    }

    #[test]
    fn load_scene_pops_snapshot() {
        let mut queue = TransitionQueue::new();
        queue.park("paused".to_string(), suspended());
        assert_eq!(queue.saved_names(), vec!["paused"]);

        assert!(queue.load_scene("paused").unwrap());
        assert!(!queue.has_saved("paused"));
        assert!(matches!(
            queue.take_pending(),
            Some(PendingTransition::Restore { ref name, .. }) if name == "paused"
        ));
    }

    #[test]
    fn load_scene_unknown_name_fails() {
        let mut queue = TransitionQueue::new();
        let err = queue.load_scene("missing").err().unwrap();
        assert!(matches!(err, EngineError::UnknownSavedScene(name) if name == "missing"));
    }

    #[test]
    fn load_scene_ignored_while_pending() {
        let mut queue = TransitionQueue::new();
        queue.park("paused".to_string(), suspended());
        queue.go_to(|_| Blank);

        assert!(!queue.load_scene("paused").unwrap());
        assert!(queue.has_saved("paused"));
    }

    #[test]
    fn quit_flag_is_sticky() {
        let mut queue = TransitionQueue::new();
        assert!(!queue.quit_requested());
        queue.request_quit();
        assert!(queue.quit_requested());
    }
}
