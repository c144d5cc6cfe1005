//=========================================================================
// Input Buffer
//
// Collects one frame of converted input between RedrawRequested events.
//
// Responsibilities:
// - Keep events in arrival order
// - Drop consecutive duplicate discrete events (keys, buttons, quit)
// - Coalesce continuous events (mouse motion) to the latest one, placed
//   where it arrived
// - Hand the frame's batch to the scene manager via `drain()`
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== InputBuffer =========================================================

pub(crate) struct InputBuffer {
    events: Vec<InputEvent>,
    last_discrete: Option<InputEvent>,
}

impl InputBuffer {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        const BASE_CAPACITY: usize = 64;

        Self {
            events: Vec::with_capacity(BASE_CAPACITY),
            last_discrete: None,
        }
    }

    //--- Push -------------------------------------------------------------

    /// Drops any earlier event of the same kind and appends this one.
    /// `InputEvent` equality ignores coordinates, so the latest motion
    /// wins and keeps its arrival position.
    pub(crate) fn push_continuous(&mut self, event: InputEvent) {
        self.events.retain(|queued| *queued != event);
        self.events.push(event);
    }

    /// Appends unless identical to the previous discrete event.
    pub(crate) fn push_discrete(&mut self, event: InputEvent) {
        if self.last_discrete.as_ref() == Some(&event) {
            return;
        }
        self.last_discrete = Some(event.clone());
        self.events.push(event);
    }

    //--- Drain ------------------------------------------------------------

    /// The frame's events in arrival order.
    pub(crate) fn drain(&mut self) -> Vec<InputEvent> {
        self.last_discrete = None;
        self.events.drain(..).collect()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
