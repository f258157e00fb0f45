//! Forward cursor with in-place erasure.

use colony_core::{Handle, StableStorage};

use crate::colony::PointerColony;

/// Mutable cursor over a [`PointerColony`], front to back.
///
/// The cursor sits on a position. Erasing the current element leaves the
/// cursor where it is, which now names the element that followed; this is
/// how elements are dropped mid-walk without invalidating the walk.
///
/// # Example
///
/// ```
/// use colony::PointerColony;
///
/// let mut colony: PointerColony<u32> = (1..=5).collect();
/// let mut cursor = colony.cursor_front_mut();
/// while let Some(&v) = cursor.current() {
///     if v % 2 == 0 {
///         cursor.erase_current();
///     } else {
///         cursor.move_next();
///     }
/// }
/// assert_eq!(colony.iter().copied().collect::<Vec<_>>(), vec![1, 3, 5]);
/// ```
pub struct CursorMut<'a, T, S> {
    colony: &'a mut PointerColony<T, S>,
    position: usize,
}

impl<'a, T, S: StableStorage<T>> CursorMut<'a, T, S> {
    pub(crate) fn new(colony: &'a mut PointerColony<T, S>, position: usize) -> Self {
        Self { colony, position }
    }

    /// The element under the cursor, `None` past the end.
    pub fn current(&self) -> Option<&T> {
        self.colony.get(self.position)
    }

    /// Mutable access to the element under the cursor.
    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.colony.get_mut(self.position)
    }

    /// Handle of the element under the cursor.
    pub fn handle(&self) -> Option<Handle> {
        self.colony.handle_at(self.position)
    }

    /// The element after the cursor.
    pub fn peek_next(&self) -> Option<&T> {
        self.colony.get(self.position + 1)
    }

    /// Current position; equals `len()` once exhausted.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether the cursor has walked past the last element.
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.colony.len()
    }

    /// Step to the next element. No-op once exhausted.
    pub fn move_next(&mut self) {
        if !self.is_exhausted() {
            self.position += 1;
        }
    }

    /// Erase the element under the cursor and return it.
    ///
    /// The cursor then points at the element that followed.
    pub fn erase_current(&mut self) -> Option<T> {
        if self.is_exhausted() {
            return None;
        }
        Some(self.colony.remove(self.position))
    }

    /// Insert `value` before the cursor. The cursor keeps pointing at the
    /// same element.
    pub fn insert_before(&mut self, value: T) -> Handle {
        let handle = self.colony.insert(self.position, value);
        self.position += 1;
        handle
    }
}
