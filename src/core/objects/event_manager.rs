//=========================================================================
// Event Manager
//=========================================================================
//
// Subscription registry: event kind -> ordered listener ids.
//
// Dispatch order is batch order, then subscription order within a kind.
// Listener lists are snapshotted per event, so handlers may subscribe or
// unsubscribe freely while an event is being delivered; a listener that
// was unsubscribed before its turn is skipped.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== Standard Library Imports ============================================

use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::ObjectId;
use crate::core::input::{EventKind, InputEvent};
use crate::error::Result;

//=== EventSink ===========================================================

/// Delivery side of dispatch: owns the registry and knows how to hand an
/// event to one listener.
pub trait EventSink {
    fn event_manager(&self) -> &EventManager;

    fn notify(&mut self, listener: ObjectId, event: &InputEvent) -> Result<()>;
}

//=== EventManager ========================================================

#[derive(Debug, Default)]
pub struct EventManager {
    listeners: HashMap<EventKind, Vec<ObjectId>>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Subscriptions ----------------------------------------------------

    /// Appends `listener` to `kind`'s list. Duplicates are kept.
    pub fn subscribe(&mut self, kind: EventKind, listener: ObjectId) {
        debug!(target: "events", "Subscribing {} to {:?}", listener, kind);
        self.listeners.entry(kind).or_default().push(listener);
    }

    /// Removes the first occurrence of `listener` under `kind`, dropping
    /// the kind once its list is empty. Absent kinds or listeners are
    /// ignored.
    pub fn unsubscribe(&mut self, kind: EventKind, listener: ObjectId) -> bool {
        let Some(list) = self.listeners.get_mut(&kind) else {
            return false;
        };
        let Some(pos) = list.iter().position(|id| *id == listener) else {
            return false;
        };

        list.remove(pos);
        if list.is_empty() {
            self.listeners.remove(&kind);
        }
        debug!(target: "events", "Unsubscribed {} from {:?}", listener, kind);
        true
    }

    /// Unsubscribes `listener` from every kind.
    pub fn remove_object(&mut self, listener: ObjectId) {
        self.listeners.retain(|_, list| {
            list.retain(|id| *id != listener);
            !list.is_empty()
        });
    }

    //--- Queries ----------------------------------------------------------

    /// Listeners of `kind` in dispatch order.
    pub fn listeners(&self, kind: EventKind) -> &[ObjectId] {
        self.listeners.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `kind` has an entry (i.e. at least one listener).
    pub fn has_kind(&self, kind: EventKind) -> bool {
        self.listeners.contains_key(&kind)
    }

    pub fn is_subscribed(&self, kind: EventKind, listener: ObjectId) -> bool {
        self.listeners(kind).contains(&listener)
    }

    //--- Dispatch ---------------------------------------------------------

    /// Delivers each event of `batch` to its kind's listeners.
    ///
    /// A failing listener aborts dispatch and the error propagates; the
    /// remaining listeners and events are not visited.
    pub fn check_events<S>(sink: &mut S, batch: &[InputEvent]) -> Result<()>
    where
        S: EventSink + ?Sized,
    {
        for event in batch {
            let kind = event.kind();
            let targets = sink.event_manager().listeners(kind).to_vec();
            if targets.is_empty() {
                continue;
            }

            trace!(target: "events", "{:?} -> {} listener(s)", kind, targets.len());
            for listener in targets {
                if !sink.event_manager().is_subscribed(kind, listener) {
                    continue;
                }
                sink.notify(listener, event)?;
            }
        }
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{KeyCode, Modifiers, MouseButton};
    use crate::error::EngineError;

    //--- Test Sink --------------------------------------------------------

    /// Records deliveries; optionally unsubscribes or fails on delivery.
    #[derive(Default)]
    struct Sink {
        events: EventManager,
        delivered: Vec<(ObjectId, EventKind)>,
        unsubscribe_on_delivery: Option<(ObjectId, ObjectId)>,
        fail_for: Option<ObjectId>,
    }

    impl EventSink for Sink {
        fn event_manager(&self) -> &EventManager {
            &self.events
        }

        fn notify(&mut self, listener: ObjectId, event: &InputEvent) -> Result<()> {
            if self.fail_for == Some(listener) {
                return Err(EngineError::hook("test listener", "refused"));
            }
            self.delivered.push((listener, event.kind()));
            if let Some((trigger, victim)) = self.unsubscribe_on_delivery {
                if trigger == listener {
                    self.events.remove_object(victim);
                }
            }
            Ok(())
        }
    }

    fn key(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    //=====================================================================
    // Registry Tests
    //=====================================================================

    #[test]
    fn subscribe_and_unsubscribe_in_order() {
        let (l1, l2) = (ObjectId::next(), ObjectId::next());
        let mut sink = Sink::default();
        sink.events.subscribe(EventKind::KeyDown, l1);
        sink.events.subscribe(EventKind::KeyDown, l2);

        EventManager::check_events(&mut sink, &[key(KeyCode::KeyA)]).unwrap();
        assert_eq!(
            sink.delivered,
            vec![(l1, EventKind::KeyDown), (l2, EventKind::KeyDown)]
        );

        sink.delivered.clear();
        assert!(sink.events.unsubscribe(EventKind::KeyDown, l1));
        EventManager::check_events(&mut sink, &[key(KeyCode::KeyA)]).unwrap();
        assert_eq!(sink.delivered, vec![(l2, EventKind::KeyDown)]);

        sink.delivered.clear();
        assert!(sink.events.unsubscribe(EventKind::KeyDown, l2));
        assert!(!sink.events.has_kind(EventKind::KeyDown));
        EventManager::check_events(&mut sink, &[key(KeyCode::KeyA)]).unwrap();
        assert!(sink.delivered.is_empty());
    }

    #[test]
    fn unsubscribing_absent_listener_is_noop() {
        let mut events = EventManager::new();
        let listener = ObjectId::next();

        assert!(!events.unsubscribe(EventKind::Quit, listener));
        events.subscribe(EventKind::Quit, listener);
        assert!(!events.unsubscribe(EventKind::Quit, ObjectId::next()));
        assert_eq!(events.listeners(EventKind::Quit), &[listener]);
    }

    #[test]
    fn unsubscribe_removes_first_occurrence_only() {
        let mut events = EventManager::new();
        let listener = ObjectId::next();
        events.subscribe(EventKind::KeyUp, listener);
        events.subscribe(EventKind::KeyUp, listener);

        events.unsubscribe(EventKind::KeyUp, listener);
        assert_eq!(events.listeners(EventKind::KeyUp), &[listener]);
    }

    #[test]
    fn remove_object_clears_every_kind() {
        let mut events = EventManager::new();
        let (a, b) = (ObjectId::next(), ObjectId::next());
        events.subscribe(EventKind::KeyDown, a);
        events.subscribe(EventKind::MouseMoved, a);
        events.subscribe(EventKind::MouseMoved, b);

        events.remove_object(a);
        events.remove_object(a);

        assert!(!events.has_kind(EventKind::KeyDown));
        assert_eq!(events.listeners(EventKind::MouseMoved), &[b]);
    }

    //=====================================================================
    // Dispatch Tests
    //=====================================================================

    #[test]
    fn dispatch_follows_batch_order_and_kind() {
        let (keys, mouse) = (ObjectId::next(), ObjectId::next());
        let mut sink = Sink::default();
        sink.events.subscribe(EventKind::KeyDown, keys);
        sink.events.subscribe(EventKind::MouseButtonDown, mouse);

        let batch = [
            InputEvent::mouse_down(MouseButton::Left, 0.0, 0.0),
            InputEvent::MouseMoved { x: 1.0, y: 1.0 },
            key(KeyCode::Space),
        ];
        EventManager::check_events(&mut sink, &batch).unwrap();

        assert_eq!(
            sink.delivered,
            vec![(mouse, EventKind::MouseButtonDown), (keys, EventKind::KeyDown)]
        );
    }

    #[test]
    fn listener_removed_mid_dispatch_is_skipped() {
        let (first, second) = (ObjectId::next(), ObjectId::next());
        let mut sink = Sink {
            unsubscribe_on_delivery: Some((first, second)),
            ..Sink::default()
        };
        sink.events.subscribe(EventKind::KeyDown, first);
        sink.events.subscribe(EventKind::KeyDown, second);

        EventManager::check_events(&mut sink, &[key(KeyCode::KeyQ)]).unwrap();
        assert_eq!(sink.delivered, vec![(first, EventKind::KeyDown)]);
    }

    #[test]
    fn failing_listener_stops_dispatch() {
        let (first, second) = (ObjectId::next(), ObjectId::next());
        let mut sink = Sink {
            fail_for: Some(first),
            ..Sink::default()
        };
        sink.events.subscribe(EventKind::KeyDown, first);
        sink.events.subscribe(EventKind::KeyDown, second);

        let result = EventManager::check_events(&mut sink, &[key(KeyCode::KeyQ)]);
        assert!(result.is_err());
        assert!(sink.delivered.is_empty());
    }
}
