//=========================================================================
// Drawable & Clickable Capabilities
//=========================================================================
//
// Capability traits exposed through `GameObject::as_drawable` and
// `GameObject::as_clickable_mut`. The manager queries them once at
// insertion and caches layer / drawable / clickable in the arena entry.
//
// Click routing (button presses only):
// ```text
//                 inside rect            outside (or no rect)
//   Left      →   click_function         clicked_outside
//   Right     →   click_function_right   clicked_outside_right
//   other     →   ignored
// ```
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{Context, GameObject, ObjectId};
use crate::core::geometry::Rect;
use crate::core::input::{InputEvent, MouseButton};
use crate::core::render::{Canvas, Sprite};
use crate::error::Result;

//=== Constants ===========================================================

/// Layer given to drawables that do not pick one.
pub const DEFAULT_LAYER: i32 = 1;

//=== Drawable ============================================================

pub trait Drawable {
    fn image(&self) -> Option<&Sprite>;

    fn rect(&self) -> Option<Rect>;

    /// Render layer. Lower layers draw first.
    fn layer(&self) -> i32 {
        DEFAULT_LAYER
    }

    /// Blits the image at the rectangle's top-left corner. Draws nothing
    /// until both are set.
    fn render(&self, canvas: &mut dyn Canvas) {
        if let (Some(image), Some(rect)) = (self.image(), self.rect()) {
            canvas.blit(image, rect.x, rect.y);
        }
    }
}

//=== Clickable ===========================================================

/// Pointer hooks. Only `click_function` must be provided.
pub trait Clickable: Drawable {
    /// Left press inside the rectangle.
    fn click_function(&mut self, this: ObjectId, ctx: &mut Context<'_>) -> Result<()>;

    /// Right press inside the rectangle.
    fn click_function_right(&mut self, _this: ObjectId, _ctx: &mut Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Left press outside the rectangle.
    fn clicked_outside(&mut self, _this: ObjectId, _ctx: &mut Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Right press outside the rectangle.
    fn clicked_outside_right(&mut self, _this: ObjectId, _ctx: &mut Context<'_>) -> Result<()> {
        Ok(())
    }
}

/// Routes a button press to the matching [`Clickable`] hook.
///
/// Any other event is ignored.
pub fn route_click(
    target: &mut dyn Clickable,
    this: ObjectId,
    event: &InputEvent,
    ctx: &mut Context<'_>,
) -> Result<()> {
    let InputEvent::MouseButtonDown {
        button, position, ..
    } = event
    else {
        return Ok(());
    };

    let inside = target.rect().is_some_and(|r| r.contains_point(*position));
    match (button, inside) {
        (MouseButton::Left, true) => target.click_function(this, ctx),
        (MouseButton::Right, true) => target.click_function_right(this, ctx),
        (MouseButton::Left, false) => target.clicked_outside(this, ctx),
        (MouseButton::Right, false) => target.clicked_outside_right(this, ctx),
        _ => Ok(()),
    }
}

//=== DrawableObject ======================================================

/// Plain sprite-in-a-box object: drawn, never updated.
#[derive(Debug, Clone, Default)]
pub struct DrawableObject {
    pub image: Option<Sprite>,
    pub rect: Option<Rect>,
    pub layer: i32,
}

impl DrawableObject {
    pub fn new(image: Sprite, rect: Rect) -> Self {
        Self {
            image: Some(image),
            rect: Some(rect),
            layer: DEFAULT_LAYER,
        }
    }

    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }
}

impl GameObject for DrawableObject {
    fn as_drawable(&self) -> Option<&dyn Drawable> {
        Some(self)
    }
}

impl Drawable for DrawableObject {
    fn image(&self) -> Option<&Sprite> {
        self.image.as_ref()
    }

    fn rect(&self) -> Option<Rect> {
        self.rect
    }

    fn layer(&self) -> i32 {
        self.layer
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::core::objects::ObjectManager;
    use crate::core::render::RecordingCanvas;
    use crate::core::scene::TransitionQueue;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Clickable that logs which hook fired.
    struct Probe {
        rect: Option<Rect>,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl GameObject for Probe {
        fn as_drawable(&self) -> Option<&dyn Drawable> {
            Some(self)
        }

        fn as_clickable_mut(&mut self) -> Option<&mut dyn Clickable> {
            Some(self)
        }
    }

    impl Drawable for Probe {
        fn image(&self) -> Option<&Sprite> {
            None
        }

        fn rect(&self) -> Option<Rect> {
            self.rect
        }
    }

    impl Clickable for Probe {
        fn click_function(&mut self, _this: ObjectId, _ctx: &mut Context<'_>) -> Result<()> {
            self.log.borrow_mut().push("left");
            Ok(())
        }

        fn click_function_right(&mut self, _this: ObjectId, _ctx: &mut Context<'_>) -> Result<()> {
            self.log.borrow_mut().push("right");
            Ok(())
        }

        fn clicked_outside(&mut self, _this: ObjectId, _ctx: &mut Context<'_>) -> Result<()> {
            self.log.borrow_mut().push("outside");
            Ok(())
        }

        fn clicked_outside_right(&mut self, _this: ObjectId, _ctx: &mut Context<'_>) -> Result<()> {
            self.log.borrow_mut().push("outside right");
            Ok(())
        }
    }

    fn press(objects: &mut ObjectManager, batch: &[InputEvent]) {
        let mut scenes = TransitionQueue::new();
        let clock = ManualClock::new(0);
        let mut ctx = Context::new(objects, &mut scenes, &clock, 0.0);
        ctx.object_events(batch).unwrap();
    }

    #[test]
    fn presses_route_by_button_and_containment() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut objects = ObjectManager::new();
        objects.spawn(
            Probe {
                rect: Some(Rect::new(0.0, 0.0, 10.0, 10.0)),
                log: log.clone(),
            },
            None,
        );

        press(
            &mut objects,
            &[
                InputEvent::mouse_down(MouseButton::Left, 5.0, 5.0),
                InputEvent::mouse_down(MouseButton::Right, 5.0, 5.0),
                InputEvent::mouse_down(MouseButton::Left, 50.0, 5.0),
                InputEvent::mouse_down(MouseButton::Right, 5.0, 50.0),
                InputEvent::mouse_down(MouseButton::Middle, 5.0, 5.0),
            ],
        );

        assert_eq!(*log.borrow(), vec!["left", "right", "outside", "outside right"]);
    }

    #[test]
    fn rectless_clickable_treats_press_as_outside() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut objects = ObjectManager::new();
        objects.spawn(
            Probe {
                rect: None,
                log: log.clone(),
            },
            None,
        );

        press(&mut objects, &[InputEvent::mouse_down(MouseButton::Left, 0.0, 0.0)]);
        assert_eq!(*log.borrow(), vec!["outside"]);
    }

    #[test]
    fn destroyed_clickable_stops_receiving_presses() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut objects = ObjectManager::new();
        let id = objects.spawn(
            Probe {
                rect: Some(Rect::new(0.0, 0.0, 10.0, 10.0)),
                log: log.clone(),
            },
            None,
        );

        objects.destroy_object(id);
        press(&mut objects, &[InputEvent::mouse_down(MouseButton::Left, 1.0, 1.0)]);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn drawable_renders_only_when_complete() {
        let mut canvas = RecordingCanvas::new();

        DrawableObject::default().render(&mut canvas);
        DrawableObject {
            image: Some(Sprite::new(1, 2, 2)),
            rect: None,
            layer: 1,
        }
        .render(&mut canvas);
        assert!(canvas.calls().is_empty());

        DrawableObject::new(Sprite::new(9, 2, 2), Rect::new(3.0, 4.0, 2.0, 2.0)).render(&mut canvas);
        assert_eq!(canvas.blitted(), vec![9]);
        assert_eq!(DrawableObject::default().with_layer(4).layer(), 4);
    }
}
