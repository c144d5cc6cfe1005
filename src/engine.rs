//=========================================================================
// Engine
//
// Configuration and frame driver around the SceneManager.
//
// Architecture:
// ```text
//     EngineBuilder  ──build(start)──>  Engine  ──run(canvas)──>  [Winit loop]
//         │                               │
//         ├─ with_fps()                   ├─ run_frame(events, canvas)
//         ├─ with_window_size()           └─ scenes() / scenes_mut()
//         ├─ with_title()
//         └─ with_clock()
// ```
//
// `run_frame` is the headless entry point: any driver that can produce a
// per-frame event batch and a canvas can step the engine itself.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::info;

//=== Standard Library Imports ============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::clock::{Clock, SystemClock};
use crate::core::input::InputEvent;
use crate::core::objects::Context;
use crate::core::render::Canvas;
use crate::core::scene::{FrameControl, Scene, SceneManager};
use crate::error::Result;
use crate::platform::Platform;

//=== Defaults ============================================================

const DEFAULT_FPS: u32 = 60;
const DEFAULT_WINDOW_SIZE: (u32, u32) = (800, 600);
const DEFAULT_TITLE: &str = "rogue";

//=== EngineConfig ========================================================

/// Settings fixed at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub fps: u32,
    pub window_size: (u32, u32),
    pub title: String,
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **FPS**: 60
/// - **Window size**: 800x600
/// - **Title**: "rogue"
/// - **Clock**: [`SystemClock`]
///
/// # Examples
///
/// ```no_run
/// use rogue_core::prelude::*;
///
/// struct Menu;
/// impl Scene for Menu {}
///
/// # fn main() -> Result<()> {
/// EngineBuilder::new()
///     .with_fps(30)
///     .with_title("demo")
///     .build(|_| Menu)?
///     .run(RecordingCanvas::new())
/// # }
/// ```
pub struct EngineBuilder {
    fps: u32,
    window_size: (u32, u32),
    title: String,
    clock: Option<Box<dyn Clock>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            fps: DEFAULT_FPS,
            window_size: DEFAULT_WINDOW_SIZE,
            title: DEFAULT_TITLE.to_string(),
            clock: None,
        }
    }

    /// Sets the target frames per second.
    ///
    /// # Panics
    ///
    /// Panics if `fps == 0`.
    pub fn with_fps(mut self, fps: u32) -> Self {
        assert!(fps > 0, "FPS must be positive, got {}", fps);
        self.fps = fps;
        self
    }

    /// Sets the window's logical size.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be non-zero, got {}x{}", width, height);
        self.window_size = (width, height);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Replaces the system clock, e.g. with a `ManualClock` in tests.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Builds the engine and starts the program with the scene made by
    /// `start`.
    ///
    /// # Errors
    ///
    /// Propagates a failure from the first scene's construction or
    /// `start` hook.
    pub fn build<S, F>(self, start: F) -> Result<Engine>
    where
        S: Scene,
        F: FnOnce(&mut Context<'_>) -> S + 'static,
    {
        info!("Building engine ({} FPS, {}x{}, '{}')", self.fps, self.window_size.0, self.window_size.1, self.title);

        let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock::new()) as Box<dyn Clock>);
        let mut scenes = SceneManager::with_boxed_clock(clock);
        scenes.start_program(start)?;

        Ok(Engine {
            scenes,
            config: EngineConfig {
                fps: self.fps,
                window_size: self.window_size,
                title: self.title,
            },
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// A started program: the scene manager plus its configuration.
pub struct Engine {
    scenes: SceneManager,
    config: EngineConfig,
}

impl Engine {
    //--- Frames -----------------------------------------------------------

    /// Runs one frame over `events` and draws into `canvas`.
    pub fn run_frame(&mut self, events: &[InputEvent], canvas: &mut dyn Canvas) -> Result<FrameControl> {
        self.scenes.run_frame(events, canvas)
    }

    /// Target time per frame.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.config.fps))
    }

    //--- Execution --------------------------------------------------------

    /// Opens a window and drives frames until the program quits.
    ///
    /// `canvas` receives each frame's draw calls; presenting them is up to
    /// the canvas implementation.
    ///
    /// # Errors
    ///
    /// Returns the hook error that stopped the loop, or
    /// [`EngineError::Platform`](crate::error::EngineError::Platform) if
    /// the window or event loop failed.
    pub fn run<C: Canvas>(self, canvas: C) -> Result<()> {
        info!("Starting engine runtime ({} FPS)", self.config.fps);
        let result = Platform::new(self, canvas).run();
        info!("Engine shutdown complete");
        result
    }

    //--- Accessors --------------------------------------------------------

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::core::render::RecordingCanvas;
    use crate::error::EngineError;

    struct Idle;
    impl Scene for Idle {}

    struct Refuses;
    impl Scene for Refuses {
        fn start(&mut self, _ctx: &mut Context<'_>) -> Result<()> {
            Err(EngineError::hook("Refuses::start", "no"))
        }
    }

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.fps, 60);
        assert_eq!(builder.window_size, (800, 600));
        assert_eq!(builder.title, "rogue");
        assert!(builder.clock.is_none());
    }

    #[test]
    fn builder_with_fps() {
        let builder = EngineBuilder::new().with_fps(120);
        assert_eq!(builder.fps, 120);
    }

    #[test]
    #[should_panic(expected = "FPS must be positive")]
    fn builder_with_fps_panics_on_zero() {
        EngineBuilder::new().with_fps(0);
    }

    #[test]
    #[should_panic(expected = "Window size must be non-zero")]
    fn builder_with_window_size_panics_on_zero() {
        EngineBuilder::new().with_window_size(0, 600);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let engine = EngineBuilder::new()
            .with_fps(30)
            .with_window_size(640, 480)
            .with_title("rogue demo")
            .with_clock(ManualClock::new(0))
            .build(|_| Idle)
            .unwrap();

        assert_eq!(
            engine.config(),
            &EngineConfig {
                fps: 30,
                window_size: (640, 480),
                title: "rogue demo".to_string(),
            }
        );
        assert!(engine.scenes().is_started());
    }

    #[test]
    fn build_propagates_start_failure() {
        let result = EngineBuilder::new().build(|_| Refuses);
        assert!(matches!(result, Err(EngineError::Hook { .. })));
    }

    //=====================================================================
    // Engine Tests
    //=====================================================================

    #[test]
    fn frame_duration_matches_fps() {
        let engine = EngineBuilder::new().with_fps(50).build(|_| Idle).unwrap();
        assert_eq!(engine.frame_duration(), Duration::from_millis(20));
    }

    #[test]
    fn run_frame_steps_active_scene() {
        let mut engine = EngineBuilder::new()
            .with_clock(ManualClock::new(0))
            .build(|_| Idle)
            .unwrap();
        let mut canvas = RecordingCanvas::new();

        assert_eq!(engine.run_frame(&[], &mut canvas).unwrap(), FrameControl::Continue);
        assert_eq!(
            engine.run_frame(&[InputEvent::Quit], &mut canvas).unwrap(),
            FrameControl::Exit
        );
    }
}
