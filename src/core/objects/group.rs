//=========================================================================
// Object Group
//=========================================================================
//
// Named bag of object ids with point/box collision queries. Groups are
// owned by an ObjectManager and emptied by `remove_object`, so members
// never outlive their objects.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{ObjectId, ObjectManager};
use crate::core::geometry::{Point, Rect};

//=== ObjectGroup =========================================================

#[derive(Debug, Clone, Default)]
pub struct ObjectGroup {
    name: String,
    members: Vec<ObjectId>,
}

impl ObjectGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    //--- Membership -------------------------------------------------------

    /// Appends `id`. Duplicates are not checked.
    pub fn add(&mut self, id: ObjectId) {
        self.members.push(id);
    }

    /// Removes every occurrence of `id`; `false` when absent.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| *m != id);
        self.members.len() != before
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn ids(&self) -> &[ObjectId] {
        &self.members
    }

    //--- Collision --------------------------------------------------------

    /// Members whose rectangle contains `point`. Members without a
    /// rectangle never collide.
    ///
    /// An object checked out for a hook has no readable rectangle, so a
    /// query made from its own hook never reports the caller.
    pub fn collide_point(&self, objects: &ObjectManager, point: Point) -> Vec<ObjectId> {
        self.members
            .iter()
            .copied()
            .filter(|id| objects.rect_of(*id).is_some_and(|r| r.contains_point(point)))
            .collect()
    }

    /// Members whose rectangle overlaps `rect`. Same checkout caveat as
    /// [`collide_point`](Self::collide_point).
    pub fn collide_rect(&self, objects: &ObjectManager, rect: Rect) -> Vec<ObjectId> {
        self.members
            .iter()
            .copied()
            .filter(|id| objects.rect_of(*id).is_some_and(|r| r.intersects(&rect)))
            .collect()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::objects::{DrawableObject, GameObject};

    struct Marker;
    impl GameObject for Marker {}

    fn boxed(x: f32, y: f32) -> DrawableObject {
        DrawableObject {
            image: None,
            rect: Some(Rect::new(x, y, 10.0, 10.0)),
            layer: 1,
        }
    }

    #[test]
    fn membership_and_noop_removal() {
        let mut group = ObjectGroup::new("enemies");
        let (a, b) = (ObjectId::next(), ObjectId::next());
        group.add(a);

        assert!(group.contains(a));
        assert!(!group.remove(b));
        assert!(group.remove(a));
        assert!(!group.remove(a));
        assert!(group.is_empty());
        assert_eq!(group.name(), "enemies");
    }

    #[test]
    fn remove_drops_every_copy() {
        let mut group = ObjectGroup::new("pickups");
        let id = ObjectId::next();
        group.add(id);
        group.add(id);

        assert!(group.remove(id));
        assert!(!group.contains(id));
        assert!(group.is_empty());
    }

    #[test]
    fn collision_from_own_hook_skips_caller() {
        let mut objects = ObjectManager::new();
        let a = objects.spawn(boxed(0.0, 0.0), Some("walls"));
        let b = objects.spawn(boxed(0.0, 0.0), Some("walls"));

        let checked_out = objects.checkout(a).unwrap();
        let hits = objects.group("walls").unwrap().collide_point(&objects, Point::new(5.0, 5.0));
        objects.checkin(a, checked_out);

        assert_eq!(hits, vec![b]);
    }

    #[test]
    fn collision_queries_use_object_rects() {
        let mut objects = ObjectManager::new();
        let near = objects.spawn(boxed(0.0, 0.0), Some("walls"));
        let far = objects.spawn(boxed(100.0, 100.0), Some("walls"));
        let marker = objects.spawn(Marker, Some("walls"));
        let walls = objects.group("walls").unwrap();

        assert_eq!(walls.len(), 3);
        assert_eq!(walls.collide_point(&objects, Point::new(5.0, 5.0)), vec![near]);
        assert_eq!(
            walls.collide_point(&objects, Point::new(105.0, 101.0)),
            vec![far]
        );
        assert!(walls.collide_point(&objects, Point::new(50.0, 50.0)).is_empty());

        let sweep = Rect::new(5.0, 5.0, 100.0, 100.0);
        assert_eq!(walls.collide_rect(&objects, sweep), vec![near, far]);
        assert!(!walls.collide_rect(&objects, sweep).contains(&marker));
    }
}
