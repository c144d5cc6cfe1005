//=========================================================================
// Object Manager
//=========================================================================
//
// Arena owning every object of one scene session, plus the live
// layer-sorted list, the event registry and the named groups.
//
// Object lifecycle:
// ```text
//   insert ──► standalone (in arena, not live)
//                │ add_object
//                ▼
//              live (sorted by layer, subscribed, grouped)
//                │ remove_object / destroy_object
//                ▼
//              dropped
// ```
//
// Children are owned through the arena; a parent only records ordered
// `key -> id` links. Destroying a parent destroys its children first.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Standard Library Imports ============================================

use std::any::{type_name, TypeId};
use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::{EventManager, GameObject, ObjectGroup, ObjectId, TypedCursor};
use crate::core::geometry::Rect;
use crate::core::input::EventKind;
use crate::core::render::Canvas;

//=== Entry ===============================================================

/// Arena slot. `object` is `None` while the object is checked out for
/// a hook.
struct Entry {
    object: Option<Box<dyn GameObject>>,
    type_id: TypeId,
    type_name: &'static str,
    name: Option<String>,
    parent: Option<ObjectId>,
    children: Vec<(String, ObjectId)>,
    layer: i32,
    drawable: bool,
    clickable: bool,
    subscriptions: &'static [EventKind],
    registered: bool,
}

//=== ObjectManager =======================================================

/// Registry of one scene session's objects.
pub struct ObjectManager {
    entries: HashMap<ObjectId, Entry>,
    objects: Vec<ObjectId>,
    event_manager: EventManager,
    groups: HashMap<String, ObjectGroup>,
}

impl ObjectManager {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            objects: Vec::new(),
            event_manager: EventManager::new(),
            groups: HashMap::new(),
        }
    }

    //=====================================================================
    // Structural Operations
    //=====================================================================

    /// Moves `object` into the arena without registering it.
    ///
    /// The object is not updated, drawn or dispatched to until
    /// [`add_object`](Self::add_object) is called for it (or for an
    /// ancestor it was attached to with [`add_child`](Self::add_child)).
    pub fn insert<T: GameObject>(&mut self, mut object: T) -> ObjectId {
        let id = ObjectId::next();
        let drawable = object.as_drawable();
        let layer = drawable.map_or(0, |d| d.layer());
        let is_drawable = drawable.is_some();
        let clickable = object.as_clickable_mut().is_some();
        let subscriptions = object.subscriptions();

        self.entries.insert(
            id,
            Entry {
                object: Some(Box::new(object)),
                type_id: TypeId::of::<T>(),
                type_name: type_name::<T>(),
                name: None,
                parent: None,
                children: Vec::new(),
                layer,
                drawable: is_drawable,
                clickable,
                subscriptions,
                registered: false,
            },
        );
        id
    }

    /// Inserts and registers `object` in one step.
    pub fn spawn<T: GameObject>(&mut self, object: T, group: Option<&str>) -> ObjectId {
        let id = self.insert(object);
        self.add_object(id, group)
    }

    /// Registers `id` and, recursively, every child not yet registered.
    ///
    /// Registration appends to the live list and re-sorts it by layer
    /// (stable), subscribes clickables to button presses plus the
    /// object's declared subscriptions, and joins `group` (created on
    /// first use). Only `id` itself joins the group. Returns `id` so
    /// calls can be chained.
    pub fn add_object(&mut self, id: ObjectId, group: Option<&str>) -> ObjectId {
        if !self.entries.contains_key(&id) {
            warn!(target: "objects", "add_object on unknown object {}", id);
            return id;
        }

        self.register(id);
        if let Some(name) = group {
            self.add_to_group(id, name);
        }
        id
    }

    fn register(&mut self, id: ObjectId) {
        let Some(entry) = self.entries.get_mut(&id) else {
            return;
        };

        if !entry.registered {
            entry.registered = true;
            let clickable = entry.clickable;
            let subscriptions = entry.subscriptions;
            debug!(target: "objects", "Adding {} {} (layer {})", entry.type_name, id, entry.layer);

            self.objects.push(id);
            self.sort_live();

            if clickable {
                self.event_manager.subscribe(EventKind::MouseButtonDown, id);
            }
            for kind in subscriptions {
                self.event_manager.subscribe(*kind, id);
            }
        }

        let children: Vec<ObjectId> = self.entries[&id]
            .children
            .iter()
            .map(|(_, child)| *child)
            .collect();
        for child in children {
            self.register(child);
        }
    }

    fn sort_live(&mut self) {
        let entries = &self.entries;
        self.objects
            .sort_by_key(|id| entries.get(id).map_or(0, |e| e.layer));
    }

    /// Attaches `child` under `parent` with key `name`, or an automatic
    /// key when `name` is `None`.
    ///
    /// The automatic key is the smallest integer, starting at the current
    /// child count, whose string form is not already taken. An explicit
    /// key that already exists replaces the previous child, which stays
    /// in the arena but loses its parent link. Returns the key used, or
    /// `None` if either id is unknown or `child` is `parent` or one of its
    /// ancestors.
    pub fn add_child(
        &mut self,
        parent: ObjectId,
        child: ObjectId,
        name: Option<&str>,
    ) -> Option<String> {
        if !self.entries.contains_key(&child) {
            return None;
        }
        if self.is_ancestor_or_self(child, parent) {
            warn!(target: "objects", "Refusing to attach {} under its own descendant {}", child, parent);
            return None;
        }
        let siblings = &self.entries.get(&parent)?.children;

        let key = match name {
            Some(name) => name.to_string(),
            None => {
                let mut n = siblings.len();
                while siblings.iter().any(|(k, _)| *k == n.to_string()) {
                    n += 1;
                }
                n.to_string()
            }
        };

        if let Some(old_parent) = self.entries[&child].parent {
            self.unlink_child(old_parent, child);
        }

        let children = &mut self.entries.get_mut(&parent)?.children;
        let replaced = match children.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => Some(std::mem::replace(&mut slot.1, child)),
            None => {
                children.push((key.clone(), child));
                None
            }
        };

        if let Some(old) = replaced.filter(|old| *old != child) {
            if let Some(entry) = self.entries.get_mut(&old) {
                entry.parent = None;
            }
        }
        if let Some(entry) = self.entries.get_mut(&child) {
            entry.parent = Some(parent);
        }
        Some(key)
    }

    fn is_ancestor_or_self(&self, candidate: ObjectId, mut id: ObjectId) -> bool {
        loop {
            if id == candidate {
                return true;
            }
            match self.parent(id) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    fn unlink_child(&mut self, parent: ObjectId, child: ObjectId) {
        if let Some(entry) = self.entries.get_mut(&parent) {
            entry.children.retain(|(_, id)| *id != child);
        }
    }

    /// Removes `id` from the arena, the live list, every group, the event
    /// registry and its parent's children.
    ///
    /// Children are not removed; they lose their parent link. Returns the
    /// object, or `None` when the id is unknown or currently checked out
    /// (a checked-out object is dropped when its hook returns).
    pub fn remove_object(&mut self, id: ObjectId) -> Option<Box<dyn GameObject>> {
        let entry = self.entries.remove(&id)?;
        debug!(target: "objects", "Removing {} {}", entry.type_name, id);

        self.event_manager.remove_object(id);
        self.objects.retain(|live| *live != id);
        for group in self.groups.values_mut() {
            group.remove(id);
        }

        if let Some(parent) = entry.parent {
            self.unlink_child(parent, id);
        }
        for (_, child) in &entry.children {
            if let Some(child) = self.entries.get_mut(child) {
                child.parent = None;
            }
        }

        entry.object
    }

    /// Destroys `id` and all of its descendants, children first.
    ///
    /// Returns the removed ids in removal order.
    pub fn destroy_object(&mut self, id: ObjectId) -> Vec<ObjectId> {
        let mut removed = Vec::new();
        self.destroy_into(id, &mut removed);
        removed
    }

    fn destroy_into(&mut self, id: ObjectId, removed: &mut Vec<ObjectId>) {
        let Some(entry) = self.entries.get(&id) else {
            return;
        };

        let children: Vec<ObjectId> = entry.children.iter().map(|(_, c)| *c).collect();
        for child in children {
            self.destroy_into(child, removed);
        }

        self.remove_object(id);
        removed.push(id);
    }

    /// Removes every object, live ones first. Safe on an empty manager.
    pub fn clear_objects(&mut self) {
        for id in self.objects.clone() {
            self.remove_object(id);
        }
        let rest: Vec<ObjectId> = self.entries.keys().copied().collect();
        for id in rest {
            self.remove_object(id);
        }
    }

    //=====================================================================
    // Render Pass
    //=====================================================================

    /// Draws every live drawable in layer order.
    pub fn object_render(&self, canvas: &mut dyn Canvas) {
        for id in &self.objects {
            let Some(entry) = self.entries.get(id) else {
                continue;
            };
            if !entry.drawable {
                continue;
            }
            if let Some(drawable) = entry.object.as_deref().and_then(|o| o.as_drawable()) {
                drawable.render(canvas);
            }
        }
    }

    //=====================================================================
    // Lookup
    //=====================================================================

    /// Downcasts `id` to `T`.
    pub fn get<T: GameObject>(&self, id: ObjectId) -> Option<&T> {
        let object = self.entries.get(&id)?.object.as_deref()?;
        object.as_any().downcast_ref::<T>()
    }

    /// Downcasts `id` to `T`, mutably.
    pub fn get_mut<T: GameObject>(&mut self, id: ObjectId) -> Option<&mut T> {
        let object = self.entries.get_mut(&id)?.object.as_deref_mut()?;
        object.as_any_mut().downcast_mut::<T>()
    }

    /// Untyped access to an object in the arena.
    pub fn object(&self, id: ObjectId) -> Option<&dyn GameObject> {
        self.entries.get(&id)?.object.as_deref()
    }

    /// Untyped mutable access to an object in the arena.
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut dyn GameObject> {
        self.entries.get_mut(&id)?.object.as_deref_mut()
    }

    /// Whether `id` was inserted as a `T`. Holds while checked out.
    pub fn is_type<T: GameObject>(&self, id: ObjectId) -> bool {
        self.entries
            .get(&id)
            .is_some_and(|e| e.type_id == TypeId::of::<T>())
    }

    /// Live objects of type `T`, in layer order.
    pub fn iter_of_type<T: GameObject>(&self) -> impl Iterator<Item = (ObjectId, &T)> + '_ {
        self.objects
            .iter()
            .filter_map(move |id| self.get::<T>(*id).map(|object| (*id, object)))
    }

    /// Detached cursor over live objects of type `T`.
    ///
    /// Unlike [`iter_of_type`](Self::iter_of_type) the cursor does not
    /// borrow the manager, so objects may be mutated or removed between
    /// steps. See [`TypedCursor`].
    pub fn cursor_of_type<T: GameObject>(&self) -> TypedCursor<T> {
        TypedCursor::new(self.objects.len())
    }

    /// Bounding rectangle of a drawable, if it has one.
    pub fn rect_of(&self, id: ObjectId) -> Option<Rect> {
        self.object(id)?.as_drawable()?.rect()
    }

    /// Cached render layer (0 for non-drawables).
    pub fn layer_of(&self, id: ObjectId) -> Option<i32> {
        self.entries.get(&id).map(|e| e.layer)
    }

    /// Whether `id` is in the arena (live or standalone).
    pub fn contains(&self, id: ObjectId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Whether `id` is registered and part of the live list.
    pub fn is_live(&self, id: ObjectId) -> bool {
        self.entries.get(&id).is_some_and(|e| e.registered)
    }

    /// Live ids in layer order.
    pub fn live(&self) -> &[ObjectId] {
        &self.objects
    }

    pub(crate) fn live_snapshot(&self) -> Vec<ObjectId> {
        self.objects.clone()
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    //=====================================================================
    // Names & Tree
    //=====================================================================

    pub fn name(&self, id: ObjectId) -> Option<&str> {
        self.entries.get(&id)?.name.as_deref()
    }

    pub fn set_name(&mut self, id: ObjectId, name: impl Into<String>) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.name = Some(name.into());
        }
    }

    /// First live object carrying `name`.
    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .copied()
            .find(|id| self.name(*id) == Some(name))
    }

    /// Children of `id` as `(key, child)` in insertion order.
    pub fn children(&self, id: ObjectId) -> &[(String, ObjectId)] {
        self.entries
            .get(&id)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn child(&self, id: ObjectId, key: &str) -> Option<ObjectId> {
        self.children(id)
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, child)| *child)
    }

    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.entries.get(&id)?.parent
    }

    //=====================================================================
    // Groups
    //=====================================================================

    pub fn group(&self, name: &str) -> Option<&ObjectGroup> {
        self.groups.get(name)
    }

    /// Group names, sorted.
    pub fn group_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.groups.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Adds `id` to `name`, creating the group on first use. Existing
    /// members are not added twice.
    pub fn add_to_group(&mut self, id: ObjectId, name: &str) {
        let group = self
            .groups
            .entry(name.to_string())
            .or_insert_with(|| ObjectGroup::new(name));
        if !group.contains(id) {
            group.add(id);
        }
    }

    /// Removes `id` from `name`. No-op when either is absent.
    pub fn remove_from_group(&mut self, id: ObjectId, name: &str) -> bool {
        self.groups.get_mut(name).is_some_and(|g| g.remove(id))
    }

    //=====================================================================
    // Events
    //=====================================================================

    pub fn event_manager(&self) -> &EventManager {
        &self.event_manager
    }

    /// Runtime subscription changes (e.g. a widget toggling hover
    /// tracking) go through here.
    pub fn event_manager_mut(&mut self) -> &mut EventManager {
        &mut self.event_manager
    }

    //=====================================================================
    // Hook Checkout
    //=====================================================================

    pub(crate) fn checkout(&mut self, id: ObjectId) -> Option<Box<dyn GameObject>> {
        self.entries.get_mut(&id)?.object.take()
    }

    /// Returns a checked-out object. Drops it if it was removed meanwhile.
    pub(crate) fn checkin(&mut self, id: ObjectId, object: Box<dyn GameObject>) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.object = Some(object);
        }
    }
}

impl Default for ObjectManager {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
