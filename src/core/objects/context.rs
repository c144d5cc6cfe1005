//=========================================================================
// Context
//=========================================================================
//
// Services handed to every scene and object hook: the active object
// manager, the scene request queue and the clock. Also hosts the
// hook-running passes (events, update, save, load) because those need
// all three at once while an object is checked out of the arena.
//
// Pass policy:
//   Each pass snapshots the live ids first. Objects removed during the
//   pass are skipped when their turn comes; objects added during the
//   pass are first visited by the next pass.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::{EventManager, EventSink, GameObject, ObjectId, ObjectManager};
use crate::core::clock::Clock;
use crate::core::geometry::Point;
use crate::core::input::InputEvent;
use crate::core::scene::TransitionQueue;
use crate::error::Result;

//=== Context =============================================================

/// Services available to hooks for the duration of one call.
pub struct Context<'a> {
    /// Object registry of the scene session being driven.
    pub objects: &'a mut ObjectManager,

    /// Scene change requests (`go_to`, `go_to_with_save`, `load_scene`)
    /// and the quit flag. Applied at the end of the frame.
    pub scenes: &'a mut TransitionQueue,

    clock: &'a dyn Clock,
    dt: f32,
    pointer: Option<Point>,
}

impl<'a> Context<'a> {
    //--- Construction -----------------------------------------------------

    pub fn new(
        objects: &'a mut ObjectManager,
        scenes: &'a mut TransitionQueue,
        clock: &'a dyn Clock,
        dt: f32,
    ) -> Self {
        Self {
            objects,
            scenes,
            clock,
            dt,
            pointer: None,
        }
    }

    /// Seeds the last known pointer position.
    pub fn with_pointer(mut self, pointer: Option<Point>) -> Self {
        self.pointer = pointer;
        self
    }

    //--- Time -------------------------------------------------------------

    /// Current clock reading in milliseconds.
    pub fn now(&self) -> u64 {
        self.clock.ticks()
    }

    /// Seconds elapsed since the previous frame (0 on the first frame).
    pub fn dt(&self) -> f32 {
        self.dt
    }

    //--- Pointer ----------------------------------------------------------

    /// Last known pointer position, whether or not anyone listened to
    /// the event that carried it. `None` until the pointer is first seen.
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    //--- Passes -----------------------------------------------------------

    /// Dispatches a frame's events to subscribed objects.
    ///
    /// The pointer position advances event by event, so a listener sees
    /// the position of the event it is handling.
    pub fn object_events(&mut self, events: &[InputEvent]) -> Result<()> {
        for event in events {
            if let Some(position) = event.position() {
                self.pointer = Some(position);
            }
            EventManager::check_events(self, std::slice::from_ref(event))?;
        }
        Ok(())
    }

    /// Runs `update` on every live object in layer order.
    pub fn object_update(&mut self) -> Result<()> {
        for id in self.objects.live_snapshot() {
            self.run_hook(id, |object, ctx| object.update(id, ctx))?;
        }
        Ok(())
    }

    /// Runs every live object's suspend hook.
    pub fn save_objects(&mut self) {
        let now = self.now();
        for id in self.objects.live_snapshot() {
            if let Some(object) = self.objects.object_mut(id) {
                object.save_object(now);
            }
        }
    }

    /// Runs every live object's resume hook.
    pub fn load_objects(&mut self) {
        let now = self.now();
        for id in self.objects.live_snapshot() {
            if let Some(object) = self.objects.object_mut(id) {
                object.load_object(now);
            }
        }
    }

    //--- Internal Helpers -------------------------------------------------

    /// Checks `id` out of the arena, runs `hook`, and checks it back in.
    ///
    /// The object is returned to the arena even when the hook fails, so
    /// the error can propagate without losing it. Absent or already
    /// checked-out ids are skipped.
    fn run_hook<F>(&mut self, id: ObjectId, hook: F) -> Result<()>
    where
        F: FnOnce(&mut Box<dyn GameObject>, &mut Self) -> Result<()>,
    {
        let Some(mut object) = self.objects.checkout(id) else {
            trace!(target: "objects", "Skipping {}: no longer available", id);
            return Ok(());
        };

        let result = hook(&mut object, self);
        self.objects.checkin(id, object);
        result
    }
}

//=== Event Dispatch ======================================================

impl EventSink for Context<'_> {
    fn event_manager(&self) -> &EventManager {
        self.objects.event_manager()
    }

    fn notify(&mut self, listener: ObjectId, event: &InputEvent) -> Result<()> {
        self.run_hook(listener, |object, ctx| object.on_event(listener, event, ctx))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::error::EngineError;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        log: Log,
    }

    impl GameObject for Recorder {
        fn update(&mut self, _this: ObjectId, _ctx: &mut Context<'_>) -> Result<()> {
            self.log.borrow_mut().push(format!("update {}", self.name));
            Ok(())
        }

        fn save_object(&mut self, now: u64) {
            self.log.borrow_mut().push(format!("save {} @{}", self.name, now));
        }

        fn load_object(&mut self, now: u64) {
            self.log.borrow_mut().push(format!("load {} @{}", self.name, now));
        }
    }

    /// Destroys a victim the first time it updates, then spawns a newcomer.
    struct Culler {
        victim: ObjectId,
        log: Log,
    }

    impl GameObject for Culler {
        fn update(&mut self, _this: ObjectId, ctx: &mut Context<'_>) -> Result<()> {
            if ctx.objects.contains(self.victim) {
                ctx.objects.destroy_object(self.victim);
                ctx.objects.spawn(
                    Recorder {
                        name: "newcomer",
                        log: self.log.clone(),
                    },
                    None,
                );
            }
            Ok(())
        }
    }

    struct SelfDestruct;

    impl GameObject for SelfDestruct {
        fn update(&mut self, this: ObjectId, ctx: &mut Context<'_>) -> Result<()> {
            ctx.objects.destroy_object(this);
            Ok(())
        }
    }

    struct Failing;

    impl GameObject for Failing {
        fn update(&mut self, _this: ObjectId, _ctx: &mut Context<'_>) -> Result<()> {
            Err(EngineError::hook("failing update", "always"))
        }
    }

    fn recorder(name: &'static str, log: &Log) -> Recorder {
        Recorder {
            name,
            log: log.clone(),
        }
    }

    #[test]
    fn update_pass_skips_removed_and_defers_new_objects() {
        let log: Log = Rc::default();
        let mut objects = ObjectManager::new();
        let mut scenes = TransitionQueue::new();
        let clock = ManualClock::new(0);

        objects.spawn(recorder("first", &log), None);
        let victim = objects.insert(recorder("victim", &log));
        let culler = objects.insert(Culler {
            victim,
            log: log.clone(),
        });
        objects.add_object(culler, None);
        objects.add_object(victim, None);

        let mut ctx = Context::new(&mut objects, &mut scenes, &clock, 0.0);
        ctx.object_update().unwrap();
        assert_eq!(*log.borrow(), vec!["update first".to_string()]);

        ctx.object_update().unwrap();
        assert_eq!(
            *log.borrow(),
            vec![
                "update first".to_string(),
                "update first".to_string(),
                "update newcomer".to_string(),
            ]
        );
    }

    #[test]
    fn object_may_destroy_itself_during_update() {
        let mut objects = ObjectManager::new();
        let mut scenes = TransitionQueue::new();
        let clock = ManualClock::new(0);
        let id = objects.spawn(SelfDestruct, Some("doomed"));

        let mut ctx = Context::new(&mut objects, &mut scenes, &clock, 0.0);
        ctx.object_update().unwrap();

        assert!(!objects.contains(id));
        assert!(objects.is_empty());
        assert!(objects.group("doomed").unwrap().is_empty());
    }

    #[test]
    fn failing_hook_propagates_and_keeps_object() {
        let mut objects = ObjectManager::new();
        let mut scenes = TransitionQueue::new();
        let clock = ManualClock::new(0);
        let id = objects.spawn(Failing, None);

        let mut ctx = Context::new(&mut objects, &mut scenes, &clock, 0.0);
        let err = ctx.object_update().unwrap_err();

        assert!(matches!(err, EngineError::Hook { .. }));
        assert!(objects.get::<Failing>(id).is_some());
    }

    #[test]
    fn pointer_tracks_unheard_events() {
        let mut objects = ObjectManager::new();
        let mut scenes = TransitionQueue::new();
        let clock = ManualClock::new(0);

        let mut ctx = Context::new(&mut objects, &mut scenes, &clock, 0.0)
            .with_pointer(Some(Point::new(1.0, 1.0)));
        assert_eq!(ctx.pointer(), Some(Point::new(1.0, 1.0)));

        ctx.object_events(&[
            InputEvent::MouseMoved { x: 20.0, y: 30.0 },
            InputEvent::Quit,
        ])
        .unwrap();
        assert_eq!(ctx.pointer(), Some(Point::new(20.0, 30.0)));
    }

    #[test]
    fn save_and_load_reach_every_live_object() {
        let log: Log = Rc::default();
        let mut objects = ObjectManager::new();
        let mut scenes = TransitionQueue::new();
        let clock = ManualClock::new(40);
        objects.spawn(recorder("a", &log), None);
        objects.spawn(recorder("b", &log), None);

        let mut ctx = Context::new(&mut objects, &mut scenes, &clock, 0.0);
        ctx.save_objects();
        clock.set(90);
        ctx.load_objects();

        assert_eq!(
            *log.borrow(),
            vec!["save a @40", "save b @40", "load a @90", "load b @90"]
        );
    }
}
