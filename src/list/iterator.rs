use std::fmt::{self, Debug, Formatter};
use std::iter::{FromIterator, FusedIterator};

use crate::error::ListError;
use crate::list::cursor::Cursor;
use crate::list::List;

/// A forward-only view over a [`List`], yielding cloned elements in order.
///
/// `Iter` is a thin wrapper around a fresh [`Cursor`]: traversal and the
/// fail-fast version check both come from it rather than being duplicated
/// here. The view is restartable — call [`List::iter`] again for a new pass.
///
/// # Panics
///
/// The `Iterator` contract leaves no room for a recoverable error, so if the
/// list is structurally mutated through a cursor while an `Iter` is in
/// flight, the next call to [`next`](Iterator::next) panics with the
/// [`ConcurrentModification`](ListError::ConcurrentModification) message.
///
/// # Examples
///
/// ```
/// use cursor_list::List;
/// use std::iter::FromIterator;
///
/// let list = List::from_iter([1, 2, 3]);
///
/// assert_eq!(Vec::from_iter(list.iter()), vec![1, 2, 3]);
/// // Restartable: a second pass sees the same elements.
/// assert_eq!(list.iter().count(), 3);
/// ```
pub struct Iter<'a, T: 'a> {
    cursor: Cursor<'a, T>,
}

impl<'a, T: 'a> Iter<'a, T> {
    pub(crate) fn new(list: &'a List<T>) -> Self {
        Self {
            cursor: list.cursor(),
        }
    }
}

impl<'a, T: 'a + Clone> Iterator for Iter<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match self.cursor.next() {
            Ok(value) => Some(value.clone()),
            Err(ListError::NoSuchElement) => None,
            Err(err) => panic!("{}", err),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.cursor.remaining() {
            Some(remaining) => (remaining, Some(remaining)),
            // Stale view: the next call panics, so any hint is permissible.
            None => (0, None),
        }
    }
}

impl<'a, T: 'a + Clone> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T: 'a + Clone> FusedIterator for Iter<'a, T> {}

impl<'a, T: 'a> Debug for Iter<'a, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.cursor).finish()
    }
}

/// An owning iterator over a [`List`], draining elements from either end.
///
/// Obtained by calling `into_iter` on a `List` by value. Since the iterator
/// owns the list, no cursor can exist alongside it and iteration can never
/// observe a concurrent modification.
///
/// # Examples
///
/// ```
/// use cursor_list::List;
/// use std::iter::FromIterator;
///
/// let list = List::from_iter([1, 2, 3]);
/// let mut iter = list.into_iter();
///
/// assert_eq!(iter.next(), Some(1));
/// assert_eq!(iter.next_back(), Some(3));
/// assert_eq!(iter.next(), Some(2));
/// assert_eq!(iter.next(), None);
/// ```
pub struct IntoIter<T> {
    list: List<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.list.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: Debug> Debug for IntoIter<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.list).finish()
    }
}

impl<T> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { list: self }
    }
}

impl<'a, T: 'a + Clone> IntoIterator for &'a List<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> FromIterator<T> for List<T> {
    /// # Examples
    ///
    /// ```
    /// use cursor_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let list = List::from_iter([1, 2, 3]);
    /// assert_eq!(format!("{:?}", list), "[1, 2, 3]");
    /// ```
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = List::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for List<T> {
    /// # Examples
    ///
    /// ```
    /// use cursor_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([1]);
    /// list.extend([2, 3]);
    /// assert_eq!(format!("{:?}", list), "[1, 2, 3]");
    /// ```
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elt in iter {
            self.push_back(elt);
        }
    }
}
