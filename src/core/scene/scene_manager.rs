//=========================================================================
// Scene Manager
//=========================================================================
//
// Owns the active scene and its object manager, and applies at most one
// pending transition per frame in `end_frame`.
//
// Transitions:
// ```text
//   go_to            Construct on the current manager:
//                      outgoing.end() → clear_objects → build → start
//   go_to_with_save  Construct on a fresh manager:
//                      save_objects → park outgoing → build → start
//   load_scene       Restore a parked scene:
//                      drop outgoing → swap in snapshot → load_objects
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::transition_queue::{ObjectSource, PendingTransition};
use super::{Scene, SceneFactory, SuspendedScene, TransitionQueue};
use crate::core::clock::Clock;
use crate::core::geometry::Point;
use crate::core::input::InputEvent;
use crate::core::objects::{Context, ObjectManager};
use crate::core::render::Canvas;
use crate::error::{EngineError, Result};

//=== FrameControl ========================================================

/// What the driver should do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Exit,
}

//=== ActiveScene =========================================================

struct ActiveScene {
    scene: Box<dyn Scene>,
    objects: ObjectManager,
}

//=== SceneManager ========================================================

pub struct SceneManager {
    active: Option<ActiveScene>,
    queue: TransitionQueue,
    clock: Box<dyn Clock>,
    last_frame: Option<u64>,
    dt: f32,
    pointer: Option<Point>,
}

impl SceneManager {
    //--- Construction -----------------------------------------------------

    /// Creates a manager with no active scene.
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self::with_boxed_clock(Box::new(clock))
    }

    pub(crate) fn with_boxed_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            active: None,
            queue: TransitionQueue::new(),
            clock,
            last_frame: None,
            dt: 0.0,
            pointer: None,
        }
    }

    /// Builds and starts the first scene on a fresh object manager.
    ///
    /// Bypasses the pending slot. Calling it again replaces the running
    /// program without ending the old scene.
    pub fn start_program<S, F>(&mut self, build: F) -> Result<()>
    where
        S: Scene,
        F: FnOnce(&mut Context<'_>) -> S + 'static,
    {
        if self.active.is_some() {
            warn!(target: "scene", "start_program called again; replacing the active scene");
        }

        let factory: SceneFactory =
            Box::new(move |ctx: &mut Context<'_>| -> Box<dyn Scene> { Box::new(build(ctx)) });
        let mut objects = ObjectManager::new();
        let scene = self.construct(factory, &mut objects)?;

        info!(target: "scene", "Program started");
        self.active = Some(ActiveScene { scene, objects });
        Ok(())
    }

    //--- Requests ---------------------------------------------------------

    /// See [`TransitionQueue::go_to`].
    pub fn go_to<S, F>(&mut self, build: F) -> bool
    where
        S: Scene,
        F: FnOnce(&mut Context<'_>) -> S + 'static,
    {
        self.queue.go_to(build)
    }

    /// See [`TransitionQueue::go_to_with_save`].
    pub fn go_to_with_save<S, F>(&mut self, name: impl Into<String>, build: F) -> bool
    where
        S: Scene,
        F: FnOnce(&mut Context<'_>) -> S + 'static,
    {
        self.queue.go_to_with_save(name, build)
    }

    /// See [`TransitionQueue::load_scene`].
    pub fn load_scene(&mut self, name: &str) -> Result<bool> {
        self.queue.load_scene(name)
    }

    //--- Frame ------------------------------------------------------------

    /// Runs one full frame: events, update, render, then the deferred
    /// transition.
    pub fn run_frame(&mut self, events: &[InputEvent], canvas: &mut dyn Canvas) -> Result<FrameControl> {
        self.tick();
        self.handle_events(events)?;
        self.update()?;
        self.render(canvas)?;
        self.end_frame()?;

        if self.queue.quit_requested() {
            info!(target: "scene", "Quit requested");
            Ok(FrameControl::Exit)
        } else {
            Ok(FrameControl::Continue)
        }
    }

    /// Hands the batch to the active scene, then records the latest
    /// pointer position it carried.
    pub fn handle_events(&mut self, events: &[InputEvent]) -> Result<()> {
        let result = self.with_active(|scene, ctx| scene.events(events, ctx));
        if let Some(position) = events.iter().rev().find_map(InputEvent::position) {
            self.pointer = Some(position);
        }
        result
    }

    pub fn update(&mut self) -> Result<()> {
        self.with_active(|scene, ctx| scene.update(ctx))
    }

    pub fn render(&self, canvas: &mut dyn Canvas) -> Result<()> {
        let active = self.active.as_ref().ok_or(EngineError::NotStarted)?;
        active.scene.render(canvas, &active.objects)
    }

    /// Applies the pending transition, if any. Call once per frame after
    /// rendering.
    ///
    /// When the outgoing `end()` or the incoming construction fails, the
    /// outgoing scene stays active and the error is returned. After a
    /// failed construction on the reused manager its objects are gone.
    pub fn end_frame(&mut self) -> Result<()> {
        let Some(pending) = self.queue.take_pending() else {
            return Ok(());
        };
        let Some(outgoing) = self.active.take() else {
            self.queue.restore_pending(pending);
            return Err(EngineError::NotStarted);
        };

        match pending {
            PendingTransition::Construct {
                factory,
                objects: ObjectSource::Current,
            } => {
                info!(target: "scene", "Switching scene on the current object manager");
                let ActiveScene { mut scene, mut objects } = outgoing;
                if let Err(e) = self.context_for(&mut objects, |ctx| scene.end(ctx)) {
                    self.active = Some(ActiveScene { scene, objects });
                    return Err(e);
                }
                objects.clear_objects();

                match self.construct(factory, &mut objects) {
                    Ok(incoming) => self.active = Some(ActiveScene { scene: incoming, objects }),
                    Err(e) => {
                        warn!(target: "scene", "Scene construction failed; keeping the outgoing scene");
                        objects.clear_objects();
                        self.active = Some(ActiveScene { scene, objects });
                        return Err(e);
                    }
                }
            }

            PendingTransition::Construct {
                factory,
                objects: ObjectSource::Fresh { save_as },
            } => {
                info!(target: "scene", "Switching scene, parking current as '{}'", save_as);
                let ActiveScene { scene, mut objects } = outgoing;
                self.context_for(&mut objects, |ctx| {
                    ctx.save_objects();
                    Ok(())
                })?;
                self.queue.park(save_as.clone(), SuspendedScene { scene, objects });

                let mut objects = ObjectManager::new();
                match self.construct(factory, &mut objects) {
                    Ok(scene) => self.active = Some(ActiveScene { scene, objects }),
                    Err(e) => {
                        warn!(target: "scene", "Scene construction failed; resuming '{}'", save_as);
                        if let Some(SuspendedScene { scene, mut objects }) = self.queue.unpark(&save_as) {
                            self.context_for(&mut objects, |ctx| {
                                ctx.load_objects();
                                Ok(())
                            })?;
                            self.active = Some(ActiveScene { scene, objects });
                        }
                        return Err(e);
                    }
                }
            }

            PendingTransition::Restore { name, snapshot } => {
                info!(target: "scene", "Restoring scene '{}'", name);
                drop(outgoing);

                let SuspendedScene { scene, mut objects } = snapshot;
                self.context_for(&mut objects, |ctx| {
                    ctx.load_objects();
                    Ok(())
                })?;
                debug!(target: "scene", "Restored {} live object(s)", objects.len());
                self.active = Some(ActiveScene { scene, objects });
            }
        }
        Ok(())
    }

    //--- Accessors --------------------------------------------------------

    /// Active scene downcast to `T`.
    pub fn scene<T: Scene>(&self) -> Option<&T> {
        let scene: &dyn Scene = &*self.active.as_ref()?.scene;
        scene.as_any().downcast_ref::<T>()
    }

    pub fn scene_mut<T: Scene>(&mut self) -> Option<&mut T> {
        let scene: &mut dyn Scene = &mut *self.active.as_mut()?.scene;
        scene.as_any_mut().downcast_mut::<T>()
    }

    pub fn object_manager(&self) -> Option<&ObjectManager> {
        self.active.as_ref().map(|a| &a.objects)
    }

    pub fn object_manager_mut(&mut self) -> Option<&mut ObjectManager> {
        self.active.as_mut().map(|a| &mut a.objects)
    }

    pub fn is_started(&self) -> bool {
        self.active.is_some()
    }

    pub fn has_pending(&self) -> bool {
        self.queue.has_pending()
    }

    pub fn has_saved(&self, name: &str) -> bool {
        self.queue.has_saved(name)
    }

    pub fn quit_requested(&self) -> bool {
        self.queue.quit_requested()
    }

    /// Seconds between the last two frames.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Last pointer position seen in any batch.
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Runs `f` with the active scene and a context over its objects.
    pub fn with_active<R, F>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Box<dyn Scene>, &mut Context<'_>) -> Result<R>,
    {
        let active = self.active.as_mut().ok_or(EngineError::NotStarted)?;
        let mut ctx = Context::new(&mut active.objects, &mut self.queue, self.clock.as_ref(), self.dt)
            .with_pointer(self.pointer);
        f(&mut active.scene, &mut ctx)
    }

    //--- Internal Helpers -------------------------------------------------

    fn tick(&mut self) {
        let now = self.clock.ticks();
        self.dt = self
            .last_frame
            .map_or(0.0, |last| now.saturating_sub(last) as f32 / 1000.0);
        self.last_frame = Some(now);
    }

    fn context_for<R, F>(&mut self, objects: &mut ObjectManager, f: F) -> Result<R>
    where
        F: FnOnce(&mut Context<'_>) -> Result<R>,
    {
        let mut ctx =
            Context::new(objects, &mut self.queue, self.clock.as_ref(), self.dt).with_pointer(self.pointer);
        f(&mut ctx)
    }

    fn construct(&mut self, factory: SceneFactory, objects: &mut ObjectManager) -> Result<Box<dyn Scene>> {
        self.context_for(objects, |ctx| {
            let mut scene = factory(&mut *ctx);
            scene.start(ctx)?;
            Ok(scene)
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
