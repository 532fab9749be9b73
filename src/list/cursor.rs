use std::cell::Ref;
use std::fmt::{self, Debug, Formatter};
use std::mem;
use std::rc::Rc;

use crate::error::{ListError, Result};
use crate::list::{insert_after, next_link, prev_link, unlink, Link, List, Slot};

/// A bidirectional cursor over a [`List`], with fail-fast invalidation.
///
/// A `Cursor` never points *at* an element; it sits in one of the `len + 1`
/// gaps between elements, indexed `0..=len`, where position 0 is before the
/// first element and position `len` is after the last. Traversal steps move
/// the gap and return the element that was stepped over; that element stays
/// *pending* and is the one acted on by [`remove`](Cursor::remove) and
/// [`set`](Cursor::set).
///
/// Every cursor snapshots the list's modification counter when it is created
/// and re-checks it before anything else on **every** operation, pure queries
/// included. A structural mutation through one cursor bumps the counter and
/// thereby invalidates all the others, permanently: each of their subsequent
/// operations fails with
/// [`ConcurrentModification`](ListError::ConcurrentModification). The check
/// is a plain integer comparison — a fail-fast correctness aid against
/// same-thread misuse, not a synchronization primitive.
///
/// # Examples
///
/// Here is a simple example showing how the gap moves. (The sentinel node of
/// the list is denoted by `#`.)
/// ```
/// use cursor_list::List;
/// use std::iter::FromIterator;
///
/// // Create a list: [ A B C #]
/// let list = List::from_iter(['A', 'B', 'C']);
///
/// // A fresh cursor sits in the front gap: [|A B C #] (position = 0)
/// let mut cursor = list.cursor();
/// assert!(cursor.has_next().unwrap());
/// assert!(!cursor.has_previous().unwrap());
///
/// // Step over 'A': [ A|B C #] (position = 1, pending = 'A')
/// assert_eq!(*cursor.next().unwrap(), 'A');
///
/// // Step back over it again: [|A B C #] (position = 0, pending = 'A')
/// assert_eq!(*cursor.previous().unwrap(), 'A');
/// ```
///
/// Mutating through one cursor invalidates every other cursor on the list:
/// ```
/// use cursor_list::{List, ListError};
/// use std::iter::FromIterator;
///
/// let list = List::from_iter([1, 2, 3]);
/// let mut c1 = list.cursor();
/// let mut c2 = list.cursor();
///
/// c1.add(0).unwrap();
///
/// // `c1` performed the mutation and stays valid; `c2` is dead for good.
/// assert_eq!(*c1.next().unwrap(), 1);
/// assert!(matches!(
///     c2.next(),
///     Err(ListError::ConcurrentModification { .. })
/// ));
/// ```
pub struct Cursor<'a, T: 'a> {
    list: &'a List<T>,
    /// Logical index of the gap, in `0..=list.len()`.
    position: usize,
    /// The node immediately before the gap (possibly the sentinel).
    left: Link<T>,
    /// The node immediately after the gap (possibly the sentinel).
    right: Link<T>,
    /// The node most recently stepped over, eligible for `remove`/`set`.
    pending: Option<Link<T>>,
    /// Snapshot of the list version, taken at creation and refreshed on
    /// every structural mutation this cursor performs itself.
    observed_version: u64,
}

// Private methods
impl<'a, T: 'a> Cursor<'a, T> {
    pub(crate) fn new(list: &'a List<T>) -> Self {
        Self {
            position: 0,
            left: list.sentinel_node(),
            right: list.front_node(),
            pending: None,
            observed_version: list.current_version(),
            list,
        }
    }

    /// The fail-fast gate: run before any other logic in every operation.
    fn check_modified(&self) -> Result<()> {
        let current = self.list.current_version();
        if self.observed_version != current {
            return Err(ListError::ConcurrentModification {
                observed: self.observed_version,
                current,
            });
        }
        Ok(())
    }

    /// Record a structural mutation made through this cursor, keeping it
    /// valid while invalidating every other cursor on the list.
    fn mark_modified(&mut self) {
        self.observed_version = self.list.bump_version();
    }

    /// Elements left ahead of the gap, or `None` if the cursor is stale.
    pub(crate) fn remaining(&self) -> Option<usize> {
        if self.is_valid() {
            Some(self.list.len() - self.position)
        } else {
            None
        }
    }
}

impl<'a, T: 'a> Cursor<'a, T> {
    /// Returns `true` while this cursor's view of the list is current.
    ///
    /// This is the same comparison every operation performs up front; it is
    /// exposed so callers can probe a cursor without consuming an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::List;
    ///
    /// let list: List<i32> = List::new();
    /// let mut c1 = list.cursor();
    /// let c2 = list.cursor();
    ///
    /// c1.add(1).unwrap();
    /// assert!(c1.is_valid());
    /// assert!(!c2.is_valid());
    /// ```
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.observed_version == self.list.current_version()
    }

    /// Returns `true` if there is an element after the gap, i.e. the
    /// position is still short of `len`.
    ///
    /// # Errors
    ///
    /// Fails with [`ListError::ConcurrentModification`] if the list was
    /// mutated through another cursor.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let list = List::from_iter([1]);
    /// let mut cursor = list.cursor();
    ///
    /// assert!(cursor.has_next().unwrap());
    /// cursor.next().unwrap();
    /// assert!(!cursor.has_next().unwrap());
    /// ```
    pub fn has_next(&self) -> Result<bool> {
        self.check_modified()?;
        Ok(self.position < self.list.len())
    }

    /// Returns `true` if there is an element before the gap, i.e. the
    /// position is greater than 0.
    ///
    /// # Errors
    ///
    /// Fails with [`ListError::ConcurrentModification`] if the list was
    /// mutated through another cursor.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let list = List::from_iter([1]);
    /// let mut cursor = list.cursor();
    ///
    /// assert!(!cursor.has_previous().unwrap());
    /// cursor.next().unwrap();
    /// assert!(cursor.has_previous().unwrap());
    /// ```
    pub fn has_previous(&self) -> Result<bool> {
        self.check_modified()?;
        Ok(self.position > 0)
    }

    /// Step over the element after the gap and return it; that element
    /// becomes the pending one.
    ///
    /// The returned guard borrows the cursor, so it must be dropped before
    /// the cursor can move or mutate again.
    ///
    /// # Errors
    ///
    /// Fails with [`ListError::NoSuchElement`] at the end of the list, or
    /// [`ListError::ConcurrentModification`] if the cursor is stale.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::{List, ListError};
    /// use std::iter::FromIterator;
    ///
    /// let list = List::from_iter(['a', 'b']);
    /// let mut cursor = list.cursor();
    ///
    /// assert_eq!(*cursor.next().unwrap(), 'a');
    /// assert_eq!(*cursor.next().unwrap(), 'b');
    /// assert_eq!(cursor.next().unwrap_err(), ListError::NoSuchElement);
    /// ```
    pub fn next(&mut self) -> Result<Ref<'_, T>> {
        if !self.has_next()? {
            return Err(ListError::NoSuchElement);
        }
        let visited = self.right.clone();
        self.right = next_link(&visited);
        self.left = visited.clone();
        self.position += 1;
        let pending = self.pending.insert(visited);
        Ok(Ref::map(pending.borrow(), |node| node.slot.value()))
    }

    /// Step over the element before the gap and return it; that element
    /// becomes the pending one.
    ///
    /// # Errors
    ///
    /// Fails with [`ListError::NoSuchElement`] at the front of the list, or
    /// [`ListError::ConcurrentModification`] if the cursor is stale.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::{List, ListError};
    /// use std::iter::FromIterator;
    ///
    /// let list = List::from_iter(['a', 'b']);
    /// let mut cursor = list.cursor();
    ///
    /// cursor.next().unwrap();
    /// cursor.next().unwrap();
    ///
    /// assert_eq!(*cursor.previous().unwrap(), 'b');
    /// assert_eq!(*cursor.previous().unwrap(), 'a');
    /// assert_eq!(cursor.previous().unwrap_err(), ListError::NoSuchElement);
    /// ```
    pub fn previous(&mut self) -> Result<Ref<'_, T>> {
        if !self.has_previous()? {
            return Err(ListError::NoSuchElement);
        }
        let visited = self.left.clone();
        self.left = prev_link(&visited);
        self.right = visited.clone();
        self.position -= 1;
        let pending = self.pending.insert(visited);
        Ok(Ref::map(pending.borrow(), |node| node.slot.value()))
    }

    /// Insert `value` immediately to the left of the gap.
    ///
    /// Afterwards the gap sits between the new element and the old right
    /// neighbor, so the position grows by one, and there is no pending
    /// element (an insertion defines nothing to `remove`/`set`). This is a
    /// structural mutation: it bumps the list version, keeping this cursor
    /// valid and invalidating all others.
    ///
    /// # Errors
    ///
    /// Fails with [`ListError::ConcurrentModification`] if the cursor is
    /// stale; never fails otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::List;
    ///
    /// let list = List::new();
    /// let mut cursor = list.cursor();
    ///
    /// cursor.add(1).unwrap();
    /// cursor.add(2).unwrap();
    ///
    /// assert_eq!(list.len(), 2);
    /// assert_eq!(cursor.index().unwrap(), 2);
    /// // The gap is after the new elements; they are behind the cursor.
    /// assert_eq!(*cursor.previous().unwrap(), 2);
    /// ```
    pub fn add(&mut self, value: T) -> Result<()> {
        self.check_modified()?;
        self.left = insert_after(&self.left, value);
        self.pending = None;
        self.position += 1;
        self.list.set_len(self.list.len() + 1);
        self.mark_modified();
        Ok(())
    }

    /// Remove the pending element (the one most recently stepped over).
    ///
    /// The gap is fixed up before the node is unlinked: if the pending node
    /// was to the right of the gap the gap slides onto its successor, and if
    /// it was to the left the gap slides onto its predecessor and the
    /// position shrinks by one. This is a structural mutation: it bumps the
    /// list version, keeping this cursor valid and invalidating all others.
    ///
    /// # Errors
    ///
    /// Fails with [`ListError::NoPendingElement`] if no traversal step
    /// happened since the last `remove`/`set`/`add`, or
    /// [`ListError::ConcurrentModification`] if the cursor is stale.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::{List, ListError};
    /// use std::iter::FromIterator;
    ///
    /// let list = List::from_iter(['a', 'b', 'c']);
    /// let mut cursor = list.cursor();
    ///
    /// cursor.next().unwrap();
    /// cursor.next().unwrap(); // pending = 'b', position = 2
    ///
    /// cursor.remove().unwrap(); // list is now [a, c]
    /// assert_eq!(list.len(), 2);
    /// assert_eq!(cursor.index().unwrap(), 1);
    /// assert_eq!(*cursor.next().unwrap(), 'c');
    ///
    /// // A second remove needs another traversal step first.
    /// cursor.remove().unwrap();
    /// assert_eq!(cursor.remove().unwrap_err(), ListError::NoPendingElement);
    /// ```
    pub fn remove(&mut self) -> Result<()> {
        self.check_modified()?;
        let pending = self.pending.take().ok_or(ListError::NoPendingElement)?;
        // Fix up the gap first: once the node is unlinked, its own links
        // must not be read again.
        if Rc::ptr_eq(&self.right, &pending) {
            self.right = next_link(&pending);
        }
        if Rc::ptr_eq(&self.left, &pending) {
            self.left = prev_link(&pending);
            self.position -= 1;
        }
        unlink(&pending);
        self.list.set_len(self.list.len() - 1);
        self.mark_modified();
        Ok(())
    }

    /// Replace the pending element's value in place, returning the value it
    /// held before.
    ///
    /// This is **not** a structural mutation: neither the size nor any
    /// version counter changes, so other cursors stay valid across a `set`.
    /// The pending element is cleared afterwards, which forbids a second
    /// `set` (or a `remove`) without an intervening traversal step. That
    /// restriction mirrors the behavior this container is modelled on and is
    /// kept for compatibility; it is arguably stricter than it needs to be.
    ///
    /// # Errors
    ///
    /// Fails with [`ListError::NoPendingElement`] if no traversal step
    /// happened since the last `remove`/`set`/`add`, or
    /// [`ListError::ConcurrentModification`] if the cursor is stale.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::{List, ListError};
    /// use std::iter::FromIterator;
    ///
    /// let list = List::from_iter([1, 2, 3]);
    /// let mut cursor = list.cursor();
    ///
    /// cursor.next().unwrap();
    /// assert_eq!(cursor.set(10).unwrap(), 1);
    ///
    /// // No pending element anymore: a second set fails.
    /// assert_eq!(cursor.set(20).unwrap_err(), ListError::NoPendingElement);
    ///
    /// assert_eq!(*cursor.previous().unwrap(), 10);
    /// ```
    pub fn set(&mut self, value: T) -> Result<T> {
        self.check_modified()?;
        let pending = self.pending.take().ok_or(ListError::NoPendingElement)?;
        let replaced = mem::replace(&mut pending.borrow_mut().slot, Slot::Value(value));
        Ok(replaced.into_value())
    }

    /// Return the logical index of the gap, in `0..=len`.
    ///
    /// This is also the index the element returned by a subsequent
    /// [`next`](Cursor::next) would have.
    ///
    /// # Errors
    ///
    /// Fails with [`ListError::ConcurrentModification`] if the cursor is
    /// stale.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let list = List::from_iter([1, 2]);
    /// let mut cursor = list.cursor();
    ///
    /// assert_eq!(cursor.index().unwrap(), 0);
    /// cursor.next().unwrap();
    /// assert_eq!(cursor.index().unwrap(), 1);
    /// ```
    pub fn index(&self) -> Result<usize> {
        self.check_modified()?;
        Ok(self.position)
    }

    /// Return the index of the element a subsequent
    /// [`previous`](Cursor::previous) would return, or `None` at the front
    /// gap.
    ///
    /// # Errors
    ///
    /// Fails with [`ListError::ConcurrentModification`] if the cursor is
    /// stale.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let list = List::from_iter([1, 2]);
    /// let mut cursor = list.cursor();
    ///
    /// assert_eq!(cursor.previous_index().unwrap(), None);
    /// cursor.next().unwrap();
    /// assert_eq!(cursor.previous_index().unwrap(), Some(0));
    /// ```
    pub fn previous_index(&self) -> Result<Option<usize>> {
        self.check_modified()?;
        Ok(self.position.checked_sub(1))
    }
}

/// A clone shares the original's position and validity state; like any two
/// cursors on one list, a structural mutation through either one
/// invalidates the other.
impl<'a, T: 'a> Clone for Cursor<'a, T> {
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            position: self.position,
            left: self.left.clone(),
            right: self.right.clone(),
            pending: self.pending.clone(),
            observed_version: self.observed_version,
        }
    }
}

impl<'a, T: 'a> Debug for Cursor<'a, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position)
            .field("pending", &self.pending.is_some())
            .field("observed_version", &self.observed_version)
            .field("valid", &self.is_valid())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{List, ListError};
    use std::iter::FromIterator;

    #[test]
    fn adds_preserve_insertion_order() {
        let list = List::new();
        let mut cursor = list.cursor();
        for i in 0..5 {
            cursor.add(i).unwrap();
        }
        assert_eq!(list.len(), 5);
        assert_eq!(Vec::from_iter(list.iter()), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn round_trip_forward_and_backward() {
        let list = List::from_iter(['a', 'b', 'c']);
        let mut cursor = list.cursor();

        let mut forward = Vec::new();
        while cursor.has_next().unwrap() {
            forward.push(*cursor.next().unwrap());
        }
        assert_eq!(forward, vec!['a', 'b', 'c']);

        let mut backward = Vec::new();
        while cursor.has_previous().unwrap() {
            backward.push(*cursor.previous().unwrap());
        }
        assert_eq!(backward, vec!['c', 'b', 'a']);
    }

    #[test]
    fn queries_are_idempotent() {
        let list = List::from_iter([1, 2]);
        let mut cursor = list.cursor();
        cursor.next().unwrap();

        for _ in 0..3 {
            assert!(cursor.has_next().unwrap());
            assert!(cursor.has_previous().unwrap());
            assert_eq!(cursor.index().unwrap(), 1);
            assert_eq!(cursor.previous_index().unwrap(), Some(0));
        }
        // The pending element survived the queries.
        cursor.remove().unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn mutation_invalidates_other_cursors() {
        let list = List::new();
        let mut c1 = list.cursor();
        let mut c2 = list.cursor();

        c1.add('x').unwrap();

        // Every operation on c2 fails now, pure queries included.
        let stale = ListError::ConcurrentModification {
            observed: 0,
            current: 1,
        };
        assert_eq!(c2.has_next().unwrap_err(), stale);
        assert_eq!(c2.has_previous().unwrap_err(), stale);
        assert_eq!(c2.index().unwrap_err(), stale);
        assert_eq!(c2.previous_index().unwrap_err(), stale);
        assert_eq!(c2.next().unwrap_err(), stale);
        assert_eq!(c2.previous().unwrap_err(), stale);
        assert_eq!(c2.add('y').unwrap_err(), stale);
        assert_eq!(c2.remove().unwrap_err(), stale);
        assert_eq!(c2.set('z').unwrap_err(), stale);

        // Invalidation is permanent; the mutating cursor keeps working.
        assert!(!c2.is_valid());
        assert_eq!(*c1.previous().unwrap(), 'x');
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn removal_fixes_up_gap_and_position() {
        let list = List::from_iter(['a', 'b', 'c']);
        let mut cursor = list.cursor();
        cursor.next().unwrap();
        cursor.next().unwrap(); // pending = 'b', position = 2

        cursor.remove().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(cursor.index().unwrap(), 1);
        assert_eq!(*cursor.next().unwrap(), 'c');
        assert_eq!(Vec::from_iter(list.iter()), vec!['a', 'c']);
    }

    #[test]
    fn removal_after_previous_keeps_position() {
        let list = List::from_iter(['a', 'b', 'c']);
        let mut cursor = list.cursor();
        cursor.next().unwrap();
        cursor.next().unwrap();
        cursor.previous().unwrap(); // pending = 'b', right = 'b', position = 1

        cursor.remove().unwrap();
        assert_eq!(cursor.index().unwrap(), 1);
        assert_eq!(*cursor.next().unwrap(), 'c');
        assert_eq!(*cursor.previous().unwrap(), 'c');
        assert_eq!(*cursor.previous().unwrap(), 'a');
    }

    #[test]
    fn remove_requires_pending() {
        let list = List::from_iter([1, 2]);
        let mut cursor = list.cursor();
        assert_eq!(cursor.remove().unwrap_err(), ListError::NoPendingElement);

        cursor.next().unwrap();
        cursor.remove().unwrap();
        // No double remove without an intervening traversal step.
        assert_eq!(cursor.remove().unwrap_err(), ListError::NoPendingElement);

        // `add` defines no pending element either.
        cursor.add(3).unwrap();
        assert_eq!(cursor.remove().unwrap_err(), ListError::NoPendingElement);
    }

    #[test]
    fn set_replaces_in_place() {
        let list = List::from_iter([1, 2, 3]);
        let mut cursor = list.cursor();

        assert_eq!(cursor.set(10).unwrap_err(), ListError::NoPendingElement);

        cursor.next().unwrap();
        assert_eq!(cursor.set(10).unwrap(), 1);
        // `set` clears the pending element: no double set.
        assert_eq!(cursor.set(20).unwrap_err(), ListError::NoPendingElement);

        cursor.next().unwrap();
        assert_eq!(cursor.set(20).unwrap(), 2);

        assert_eq!(Vec::from_iter(list.iter()), vec![10, 20, 3]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn set_is_not_structural() {
        let list = List::from_iter([1, 2]);
        let mut c1 = list.cursor();
        let mut c2 = list.cursor();

        c1.next().unwrap();
        c1.set(10).unwrap();

        // A `set` through c1 does not invalidate c2.
        assert!(c2.is_valid());
        assert_eq!(*c2.next().unwrap(), 10);
    }

    #[test]
    fn empty_list_boundaries() {
        let list = List::new();
        let mut cursor = list.cursor();

        assert!(!cursor.has_next().unwrap());
        assert!(!cursor.has_previous().unwrap());
        assert_eq!(cursor.next().unwrap_err(), ListError::NoSuchElement);
        assert_eq!(cursor.previous().unwrap_err(), ListError::NoSuchElement);

        cursor.add(1).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(*cursor.previous().unwrap(), 1);
    }

    #[test]
    fn zigzag_returns_same_element() {
        let list = List::from_iter([1, 2, 3]);
        let mut cursor = list.cursor();
        cursor.next().unwrap();
        for _ in 0..3 {
            assert_eq!(*cursor.next().unwrap(), 2);
            assert_eq!(*cursor.previous().unwrap(), 2);
        }
        assert_eq!(cursor.index().unwrap(), 1);
    }

    #[test]
    fn self_mutations_keep_cursor_valid() {
        let list = List::new();
        let mut cursor = list.cursor();

        cursor.add(1).unwrap();
        cursor.add(2).unwrap();
        assert_eq!(*cursor.previous().unwrap(), 2);
        cursor.remove().unwrap();
        cursor.add(3).unwrap();

        assert!(cursor.is_valid());
        assert_eq!(Vec::from_iter(list.iter()), vec![1, 3]);
    }

    #[test]
    fn cloned_cursors_invalidate_each_other() {
        let list = List::from_iter([1, 2, 3]);
        let mut original = list.cursor();
        original.next().unwrap();

        let mut cloned = original.clone();
        assert_eq!(cloned.index().unwrap(), 1);

        original.remove().unwrap();
        assert!(original.is_valid());
        assert!(matches!(
            cloned.has_next(),
            Err(ListError::ConcurrentModification { .. })
        ));
    }
}
