//=========================================================================
// Button
//=========================================================================
//
// Clickable widget with three looks: active, hovered, inactive.
//
// State machine:
// ```text
//            pointer enters rect
//   Active ─────────────────────► Hovered
//     ▲  ◄─────────────────────     │
//     │     pointer leaves rect     │
//     │                             │ set_activity(false)
//     │ set_activity(true)          ▼
//     └──────────────────────── Inactive
// ```
//
// Hover tracking needs pointer motion, so the button is subscribed to
// `MouseMoved` only while it is not inactive. Presses are always routed
// (every clickable is subscribed to them) but do nothing while inactive.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::geometry::{Point, Rect};
use crate::core::input::{EventKind, InputEvent};
use crate::core::objects::{
    route_click, Clickable, Context, Drawable, EventManager, GameObject, ObjectId,
};
use crate::core::render::Sprite;
use crate::error::Result;

//=== ButtonState =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Active,
    Hovered,
    Inactive,
}

impl ButtonState {
    fn index(self) -> usize {
        match self {
            Self::Active => 0,
            Self::Hovered => 1,
            Self::Inactive => 2,
        }
    }
}

//=== Button ==============================================================

/// Action run on a left click while the button is not inactive.
///
/// Receives the button itself, so the action may call
/// [`Button::set_activity`] on it.
pub type ButtonAction = Box<dyn FnMut(&mut Button, ObjectId, &mut Context<'_>) -> Result<()>>;

pub struct Button {
    state: ButtonState,
    images: [Sprite; 3],
    rect: Rect,
    action: Option<ButtonAction>,
}

impl Button {
    /// Creates an active button centered on `center`, sized after the
    /// active image.
    ///
    /// `images` are the active, hovered and inactive looks, in that order.
    pub fn new<F>(images: [Sprite; 3], center: Point, action: F) -> Self
    where
        F: FnMut(&mut Button, ObjectId, &mut Context<'_>) -> Result<()> + 'static,
    {
        let [active, ..] = images;
        Self {
            state: ButtonState::Active,
            images,
            rect: Rect::from_center(center, active.width as f32, active.height as f32),
            action: Some(Box::new(action)),
        }
    }

    /// Starts the button inactive. Use before the button is registered.
    pub fn inactive(mut self) -> Self {
        self.state = ButtonState::Inactive;
        self
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    //--- Activity ---------------------------------------------------------

    /// Enables or disables this button, registered as `this`, updating
    /// its pointer-motion subscription. Hover is re-checked against the
    /// context's pointer. Returns `false` when nothing changed.
    ///
    /// Use this from the button's own hooks and action.
    pub fn set_activity(&mut self, this: ObjectId, active: bool, ctx: &mut Context<'_>) -> bool {
        let changed = self.switch(active, ctx.pointer());
        if changed {
            Self::resubscribe(ctx.objects.event_manager_mut(), this, active);
        }
        changed
    }

    /// Enables or disables the registered button `id` from elsewhere
    /// (another object, a scene).
    ///
    /// Returns `false` when nothing changed, when `id` is not a button, or
    /// when the button is checked out because one of its own hooks is
    /// running; use [`set_activity`](Self::set_activity) there instead.
    pub fn set_activity_of(ctx: &mut Context<'_>, id: ObjectId, active: bool) -> bool {
        let pointer = ctx.pointer();
        let Some(button) = ctx.objects.get_mut::<Button>(id) else {
            if ctx.objects.is_type::<Button>(id) {
                warn!(target: "objects", "Button {} is busy in its own hook; activity unchanged", id);
            }
            return false;
        };

        let changed = button.switch(active, pointer);
        if changed {
            Self::resubscribe(ctx.objects.event_manager_mut(), id, active);
        }
        changed
    }

    fn switch(&mut self, active: bool, pointer: Option<Point>) -> bool {
        match (self.state, active) {
            (ButtonState::Inactive, true) => {
                self.state = ButtonState::Active;
                self.check_state(pointer);
            }
            (ButtonState::Active | ButtonState::Hovered, false) => {
                self.state = ButtonState::Inactive;
            }
            _ => return false,
        }
        true
    }

    fn resubscribe(events: &mut EventManager, id: ObjectId, active: bool) {
        if active {
            events.subscribe(EventKind::MouseMoved, id);
        } else {
            events.unsubscribe(EventKind::MouseMoved, id);
        }
        debug!(target: "objects", "Button {} active: {}", id, active);
    }

    /// Re-evaluates hover against `pointer`.
    fn check_state(&mut self, pointer: Option<Point>) {
        let over = pointer.is_some_and(|p| self.rect.contains_point(p));
        self.state = match (self.state, over) {
            (ButtonState::Active, true) => ButtonState::Hovered,
            (ButtonState::Hovered, false) => ButtonState::Active,
            (state, _) => state,
        };
    }
}

impl GameObject for Button {
    fn on_event(&mut self, this: ObjectId, event: &InputEvent, ctx: &mut Context<'_>) -> Result<()> {
        route_click(self, this, event, ctx)?;
        if let InputEvent::MouseMoved { x, y } = event {
            self.check_state(Some(Point::new(*x, *y)));
        }
        Ok(())
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        match self.state {
            ButtonState::Inactive => &[],
            _ => &[EventKind::MouseMoved],
        }
    }

    fn as_drawable(&self) -> Option<&dyn Drawable> {
        Some(self)
    }

    fn as_clickable_mut(&mut self) -> Option<&mut dyn Clickable> {
        Some(self)
    }
}

impl Drawable for Button {
    fn image(&self) -> Option<&Sprite> {
        Some(&self.images[self.state.index()])
    }

    fn rect(&self) -> Option<Rect> {
        Some(self.rect)
    }
}

impl Clickable for Button {
    fn click_function(&mut self, this: ObjectId, ctx: &mut Context<'_>) -> Result<()> {
        if self.state == ButtonState::Inactive {
            return Ok(());
        }
        // the action borrows the button while it runs
        let Some(mut action) = self.action.take() else {
            return Ok(());
        };
        let result = action(self, this, ctx);
        self.action = Some(action);
        result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
