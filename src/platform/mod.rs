//=========================================================================
// Platform Subsystem
//
// Drives the engine from a Winit window on the main thread.
//
// Architecture:
// ```text
//  Winit Event Loop
//   ↓
//  InputProcessor
//   ├─ Converts Winit → InputEvent
//   └─ Tracks modifiers + cursor
//   ↓
//  InputBuffer
//   ├─ events: Vec<>            (arrival order)
//   ├─ discrete                 (consecutive dupes dropped)
//   └─ continuous               (latest motion only, at its arrival slot)
//   ↓
//  RedrawRequested  ── frame boundary ──►  Engine::run_frame(batch, canvas)
//                                            ├─ Continue → pace, redraw
//                                            └─ Exit / Err → leave loop
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: the whole batch is handed to
//   the active scene at once, so scenes never see a partial frame
// - **CloseRequested = Quit event**: closing the window is delivered to
//   the scene like any other input; the default scene handler exits
// - **Errors stop the loop**: a hook failure is stored and returned from
//   `run()` once the event loop has exited
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use log::*;
use std::thread;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::input::InputEvent;
use crate::core::render::Canvas;
use crate::core::scene::FrameControl;
use crate::engine::Engine;
use crate::error::{EngineError, Result};
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== Platform ============================================================

/// Window owner and frame driver.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(engine, canvas)`
/// 2. **Execution**: `platform.run()` blocks in the Winit event loop
/// 3. **Frames**: every `RedrawRequested` runs one engine frame
/// 4. **Shutdown**: the scene requests quit, or a hook fails
pub(crate) struct Platform<C: Canvas> {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    /// Buffers input until the next frame boundary.
    buffer: InputBuffer,

    /// Converts Winit events to engine InputEvents.
    input_processor: InputProcessor,

    engine: Engine,
    canvas: C,

    /// Earliest time the next frame may start.
    next_frame: Instant,

    /// First hook failure; returned from `run()`.
    error: Option<EngineError>,
}

impl<C: Canvas> Platform<C> {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(engine: Engine, canvas: C) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            buffer: InputBuffer::new(),
            input_processor: InputProcessor::new(),
            engine,
            canvas,
            next_frame: Instant::now(),
            error: None,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the Winit event loop until the program exits.
    ///
    /// # Errors
    ///
    /// [`EngineError::Platform`] if the event loop cannot be created or
    /// fails, otherwise the hook error that stopped the loop, if any.
    pub(crate) fn run(mut self) -> Result<()> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new()
            .map_err(|e| EngineError::Platform(format!("event loop creation failed: {e}")))?;

        event_loop
            .run_app(&mut self)
            .map_err(|e| EngineError::Platform(format!("event loop error: {e}")))?;

        info!(target: "platform", "Event loop exited");
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    //--- Frame ------------------------------------------------------------

    /// Flushes buffered input into one engine frame.
    ///
    /// Returns `false` when the loop should stop.
    fn step_frame(&mut self) -> bool {
        let events = self.buffer.drain();
        trace!(target: "platform::input", "Frame with {} event(s)", events.len());

        match self.engine.run_frame(&events, &mut self.canvas) {
            Ok(FrameControl::Continue) => true,
            Ok(FrameControl::Exit) => false,
            Err(e) => {
                error!(target: "platform", "Frame failed: {}", e);
                self.error = Some(e);
                false
            }
        }
    }

    /// Sleeps until the next frame slot.
    fn pace(&mut self) {
        let frame = self.engine.frame_duration();
        self.next_frame += frame;

        let now = Instant::now();
        if self.next_frame > now {
            thread::sleep(self.next_frame - now);
        } else {
            // fell behind; do not try to catch up
            self.next_frame = now;
        }
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl<C: Canvas> ApplicationHandler for Platform<C> {
    /// Creates the window on startup (and on mobile resume if needed).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let config = self.engine.config();
        let (width, height) = config.window_size;
        let attrs = WindowAttributes::default()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(width, height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.next_frame = Instant::now();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.error = Some(EngineError::Platform(format!("window creation failed: {e}")));
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.buffer.push_discrete(InputEvent::Quit);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            WindowEvent::ModifiersChanged(state) => {
                trace!(target: "platform::input", "Modifiers changed: {:?}", state);
                self.input_processor.update_modifiers(state.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self
                    .input_processor
                    .process_mouse_move(position.x as f32, position.y as f32);
                self.buffer.push_continuous(event);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(event) = self.input_processor.process_key_event(key_event) {
                    self.buffer.push_discrete(event);
                } else {
                    trace!(target: "platform::input", "Unmapped key ignored");
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.process_mouse_button(*button, *state);
                self.buffer.push_discrete(event);
            }

            WindowEvent::RedrawRequested => {
                if !self.step_frame() {
                    event_loop.exit();
                    return;
                }

                self.pace();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
