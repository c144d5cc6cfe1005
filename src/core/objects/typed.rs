//=========================================================================
// Typed Iteration
//=========================================================================
//
// Detached cursor over the live list filtered by concrete type.
//
// The cursor stores only an index and the live length captured when it
// was created. Each step re-reads the manager, so between steps objects
// may be mutated, added or removed:
//
//   - the cursor never reads past the captured length
//   - it also stops at the current end if the list shrank
//   - entries that are no longer of type `T` are skipped
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::marker::PhantomData;

//=== Internal Dependencies ===============================================

use super::{GameObject, ObjectId, ObjectManager};

//=== TypedCursor =========================================================

/// Forward cursor yielding ids of live `T` objects in layer order.
///
/// Created by [`ObjectManager::cursor_of_type`].
///
/// ```rust
/// # use rogue_core::prelude::*;
/// struct Coin {
///     value: u32,
/// }
/// impl GameObject for Coin {}
///
/// let mut objects = ObjectManager::new();
/// objects.spawn(Coin { value: 1 }, None);
/// objects.spawn(Coin { value: 5 }, None);
///
/// let mut coins = objects.cursor_of_type::<Coin>();
/// while let Some(id) = coins.next(&objects) {
///     if let Some(coin) = objects.get_mut::<Coin>(id) {
///         coin.value *= 2;
///     }
/// }
/// let total: u32 = objects.iter_of_type::<Coin>().map(|(_, c)| c.value).sum();
/// assert_eq!(total, 12);
/// ```
#[derive(Debug)]
pub struct TypedCursor<T> {
    index: usize,
    end: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T: GameObject> TypedCursor<T> {
    pub(crate) fn new(end: usize) -> Self {
        Self {
            index: 0,
            end,
            _marker: PhantomData,
        }
    }

    /// Next live `T`, or `None` once the captured range is exhausted.
    pub fn next(&mut self, objects: &ObjectManager) -> Option<ObjectId> {
        let live = objects.live();
        let end = self.end.min(live.len());

        while self.index < end {
            let id = live[self.index];
            self.index += 1;
            if objects.is_type::<T>(id) {
                return Some(id);
            }
        }
        None
    }

    /// Restarts from the front of the captured range.
    pub fn reset(&mut self) {
        self.index = 0;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Coin;
    impl GameObject for Coin {}

    struct Rock;
    impl GameObject for Rock {}

    #[test]
    fn yields_only_matching_type() {
        let mut objects = ObjectManager::new();
        let a = objects.spawn(Coin, None);
        objects.spawn(Rock, None);
        let b = objects.spawn(Coin, None);

        let mut cursor = objects.cursor_of_type::<Coin>();
        assert_eq!(cursor.next(&objects), Some(a));
        assert_eq!(cursor.next(&objects), Some(b));
        assert_eq!(cursor.next(&objects), None);

        cursor.reset();
        assert_eq!(cursor.next(&objects), Some(a));
    }

    #[test]
    fn does_not_read_past_captured_length() {
        let mut objects = ObjectManager::new();
        let a = objects.spawn(Coin, None);

        let mut cursor = objects.cursor_of_type::<Coin>();
        objects.spawn(Coin, None);

        assert_eq!(cursor.next(&objects), Some(a));
        assert_eq!(cursor.next(&objects), None);
    }

    #[test]
    fn reflects_removals_between_steps() {
        let mut objects = ObjectManager::new();
        let a = objects.spawn(Coin, None);
        let b = objects.spawn(Coin, None);
        let c = objects.spawn(Coin, None);

        let mut cursor = objects.cursor_of_type::<Coin>();
        assert_eq!(cursor.next(&objects), Some(a));
        objects.remove_object(b);
        // live list shifted left: c now sits where b was
        assert_eq!(cursor.next(&objects), Some(c));
        assert_eq!(cursor.next(&objects), None);
    }

    #[test]
    fn empty_manager_yields_nothing() {
        let objects = ObjectManager::new();
        let mut cursor = objects.cursor_of_type::<Rock>();
        assert_eq!(cursor.next(&objects), None);
    }
}
