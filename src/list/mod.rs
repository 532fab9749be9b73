use std::cell::{Cell, RefCell};
use std::fmt::{self, Debug, Formatter};
use std::rc::{Rc, Weak};

use crate::list::cursor::Cursor;
use crate::Iter;

pub mod cursor;
pub mod iterator;

/// The `List` is a circular doubly-linked list built around a sentinel node,
/// traversed and mutated through fail-fast [`Cursor`]s.
///
/// The `List` owns the sentinel node and, transitively through the circular
/// chain, every content node. Besides the chain it tracks:
/// - `len`: the number of elements (sentinel excluded);
/// - `version`: a counter bumped on every structural mutation (insert or
///   remove). Each cursor snapshots it at creation and compares on every
///   operation, which is how a cursor detects that the list was mutated
///   behind its back. This is optimistic versioning — a correctness aid
///   against same-thread misuse, **not** a thread-safety mechanism.
///
/// Node handles are reference-counted: `next` links are strong and `prev`
/// links are weak, so the only strong cycle is the `next` ring, which
/// `Drop` severs iteratively.
///
/// # Examples
///
/// ```
/// use cursor_list::List;
/// use std::iter::FromIterator;
///
/// let mut list = List::new();
/// list.push_back(1);
/// list.push_back(2);
/// list.push_front(0);
///
/// assert_eq!(list.len(), 3);
/// assert_eq!(Vec::from_iter(list), vec![0, 1, 2]);
/// ```
pub struct List<T> {
    sentinel: Link<T>,
    len: Cell<usize>,
    version: Cell<u64>,
}

pub(crate) type Link<T> = Rc<RefCell<Node<T>>>;

pub(crate) struct Node<T> {
    pub(crate) slot: Slot<T>,
    /// Strong forward link; always `Some` while the node is in the chain.
    pub(crate) next: Option<Link<T>>,
    /// Weak backward link, upgradable while the node is in the chain.
    pub(crate) prev: Weak<RefCell<Node<T>>>,
}

/// What a node stores. The sentinel carries no element, and modelling that
/// as a variant keeps `T` free of any default-value requirement.
pub(crate) enum Slot<T> {
    Sentinel,
    Value(T),
}

impl<T> Slot<T> {
    pub(crate) fn value(&self) -> &T {
        match self {
            Slot::Value(value) => value,
            Slot::Sentinel => unreachable!("the sentinel node holds no element"),
        }
    }

    pub(crate) fn into_value(self) -> T {
        match self {
            Slot::Value(value) => value,
            Slot::Sentinel => unreachable!("the sentinel node holds no element"),
        }
    }
}

/// Follow a node's forward link.
pub(crate) fn next_link<T>(node: &Link<T>) -> Link<T> {
    node.borrow()
        .next
        .clone()
        .expect("node is linked into the chain")
}

/// Follow a node's backward link.
pub(crate) fn prev_link<T>(node: &Link<T>) -> Link<T> {
    node.borrow()
        .prev
        .upgrade()
        .expect("node is linked into the chain")
}

/// Splice a fresh node holding `value` directly after `node`, and return it.
///
/// Works on any node of the chain, the sentinel included. The four-pointer
/// invariant (`n.next.prev == n` and `n.prev.next == n` for every node)
/// holds again by the time this returns.
pub(crate) fn insert_after<T>(node: &Link<T>, value: T) -> Link<T> {
    let next = next_link(node);
    let new = Rc::new(RefCell::new(Node {
        slot: Slot::Value(value),
        next: Some(next.clone()),
        prev: Rc::downgrade(node),
    }));
    next.borrow_mut().prev = Rc::downgrade(&new);
    node.borrow_mut().next = Some(new.clone());
    #[cfg(debug_assertions)]
    {
        assert_adjacent(node, &new);
        assert_adjacent(&new, &next);
    }
    new
}

/// Splice `node` out of the chain by linking its neighbors to each other.
///
/// Must not be called on the sentinel; the callers enforce that. The removed
/// node keeps its stale backward link but is no longer reachable from the
/// chain. Its forward link is cleared so that a stale handle to the removed
/// node cannot pin the rest of the chain alive.
pub(crate) fn unlink<T>(node: &Link<T>) {
    let prev = prev_link(node);
    let next = node
        .borrow_mut()
        .next
        .take()
        .expect("node is linked into the chain");
    next.borrow_mut().prev = Rc::downgrade(&prev);
    prev.borrow_mut().next = Some(next.clone());
    #[cfg(debug_assertions)]
    assert_adjacent(&prev, &next);
}

fn new_sentinel<T>() -> Link<T> {
    let sentinel = Rc::new(RefCell::new(Node {
        slot: Slot::Sentinel,
        next: None,
        prev: Weak::new(),
    }));
    sentinel.borrow_mut().next = Some(sentinel.clone());
    sentinel.borrow_mut().prev = Rc::downgrade(&sentinel);
    sentinel
}

#[cfg(debug_assertions)]
fn assert_adjacent<T>(prev: &Link<T>, next: &Link<T>) {
    assert!(Rc::ptr_eq(&next_link(prev), next));
    assert!(Rc::ptr_eq(&prev_link(next), prev));
}

// private methods
impl<T> List<T> {
    pub(crate) fn sentinel_node(&self) -> Link<T> {
        self.sentinel.clone()
    }

    pub(crate) fn front_node(&self) -> Link<T> {
        next_link(&self.sentinel)
    }

    pub(crate) fn back_node(&self) -> Link<T> {
        prev_link(&self.sentinel)
    }

    pub(crate) fn current_version(&self) -> u64 {
        self.version.get()
    }

    /// Record one structural mutation and return the new version.
    pub(crate) fn bump_version(&self) -> u64 {
        let version = self.version.get() + 1;
        self.version.set(version);
        version
    }

    pub(crate) fn set_len(&self, len: usize) {
        self.len.set(len);
    }

    /// Unlink `node` and return its element by value.
    ///
    /// Requires `&mut self`: with the list mutably borrowed no cursor can be
    /// alive, so after unlinking, the handle passed in is the only strong
    /// reference left and the element can be extracted without cloning.
    fn take_node(&mut self, node: Link<T>) -> T {
        unlink(&node);
        self.len.set(self.len.get() - 1);
        self.bump_version();
        let node = Rc::try_unwrap(node)
            .ok()
            .expect("detached node is uniquely owned");
        node.into_inner().slot.into_value()
    }
}

impl<T> List<T> {
    /// Create an empty `List`: size 0, version 0, sentinel self-linked.
    ///
    /// # Examples
    /// ```
    /// use cursor_list::List;
    /// let list: List<u32> = List::new();
    /// assert!(list.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self {
            sentinel: new_sentinel(),
            len: Cell::new(0),
            version: Cell::new(0),
        }
    }

    /// Returns the number of elements in the `List`, sentinel excluded.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::List;
    ///
    /// let mut list = List::new();
    /// assert_eq!(list.len(), 0);
    ///
    /// list.push_back(2);
    /// assert_eq!(list.len(), 1);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.len.get()
    }

    /// Returns `true` if the `List` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::List;
    ///
    /// let mut list = List::new();
    /// assert!(list.is_empty());
    ///
    /// list.push_front("foo");
    /// assert!(!list.is_empty());
    /// ```
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len.get() == 0
    }

    /// Provides a new cursor at the gap before the first element
    /// (position 0), bound to the list's current version.
    ///
    /// Any number of cursors may coexist for traversal, but after a
    /// structural mutation only the cursor that performed it remains valid:
    /// every operation on the others fails with
    /// [`ConcurrentModification`](crate::ListError::ConcurrentModification).
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::List;
    /// use std::iter::FromIterator;
    ///
    /// let list = List::from_iter([1, 2, 3]);
    /// let mut cursor = list.cursor();
    ///
    /// assert_eq!(*cursor.next().unwrap(), 1);
    /// assert_eq!(*cursor.next().unwrap(), 2);
    /// assert_eq!(cursor.index().unwrap(), 2);
    /// ```
    pub fn cursor(&self) -> Cursor<'_, T> {
        Cursor::new(self)
    }

    /// Provides a forward-only, restartable view over the list, built on a
    /// fresh cursor each call.
    ///
    /// The iterator clones the elements it yields; see [`Iter`] for the
    /// fail-fast behavior during iteration.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::List;
    ///
    /// let mut list = List::new();
    ///
    /// list.push_back(0);
    /// list.push_back(1);
    ///
    /// let mut iter = list.iter();
    /// assert_eq!(iter.next(), Some(0));
    /// assert_eq!(iter.next(), Some(1));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Adds an element first in the list.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::List;
    ///
    /// let mut list = List::new();
    ///
    /// list.push_front(2);
    /// list.push_front(1);
    /// assert_eq!(list.pop_front(), Some(1));
    /// ```
    pub fn push_front(&mut self, elt: T) {
        insert_after(&self.sentinel, elt);
        self.len.set(self.len.get() + 1);
        self.bump_version();
    }

    /// Appends an element to the back of the list.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::List;
    ///
    /// let mut list = List::new();
    /// list.push_back(1);
    /// list.push_back(3);
    /// assert_eq!(list.pop_back(), Some(3));
    /// ```
    pub fn push_back(&mut self, elt: T) {
        insert_after(&self.back_node(), elt);
        self.len.set(self.len.get() + 1);
        self.bump_version();
    }

    /// Removes the first element and returns it, or `None` if the list is
    /// empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::List;
    ///
    /// let mut list = List::new();
    /// assert_eq!(list.pop_front(), None);
    ///
    /// list.push_front(1);
    /// list.push_front(3);
    /// assert_eq!(list.pop_front(), Some(3));
    /// assert_eq!(list.pop_front(), Some(1));
    /// assert_eq!(list.pop_front(), None);
    /// ```
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let front = self.front_node();
        Some(self.take_node(front))
    }

    /// Removes the last element and returns it, or `None` if the list is
    /// empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::List;
    ///
    /// let mut list = List::new();
    /// assert_eq!(list.pop_back(), None);
    /// list.push_back(1);
    /// list.push_back(3);
    /// assert_eq!(list.pop_back(), Some(3));
    /// ```
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let back = self.back_node();
        Some(self.take_node(back))
    }

    /// Removes all elements from the `List`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cursor_list::List;
    ///
    /// let mut list = List::new();
    ///
    /// list.push_front(2);
    /// list.push_front(1);
    /// assert_eq!(list.len(), 2);
    ///
    /// list.clear();
    /// assert_eq!(list.len(), 0);
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }
}

impl<T: Debug> Debug for List<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        let mut node = self.front_node();
        while !Rc::ptr_eq(&node, &self.sentinel) {
            list.entry(node.borrow().slot.value());
            node = next_link(&node);
        }
        list.finish()
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for List<T> {
    fn clone(&self) -> Self {
        self.iter().collect()
    }
}

impl<T: PartialEq> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mut a = self.front_node();
        let mut b = other.front_node();
        while !Rc::ptr_eq(&a, &self.sentinel) {
            if a.borrow().slot.value() != b.borrow().slot.value() {
                return false;
            }
            a = next_link(&a);
            b = next_link(&b);
        }
        true
    }
}

impl<T: Eq> Eq for List<T> {}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        // Sever every forward link so the strong `next` ring unwinds one
        // node per iteration instead of recursing through nested drops.
        let mut next = self.sentinel.borrow_mut().next.take();
        while let Some(node) = next {
            next = node.borrow_mut().next.take();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{next_link, Rc};
    use crate::List;
    use std::cell::RefCell;
    use std::iter::FromIterator;

    #[test]
    fn list_create() {
        let mut list = List::<i32>::new();
        assert!(list.is_empty());
        list.push_back(1);
        assert!(!list.is_empty());
        assert_eq!(list.pop_back(), Some(1));
        assert!(list.is_empty());
    }

    #[test]
    fn list_push_and_pop() {
        let mut list = List::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);

        assert_eq!(list.pop_front(), None);
        assert_eq!(list.pop_back(), None);

        list.push_back(1);
        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(list.pop_back(), None);
        assert!(list.is_empty());

        list.push_front(1);
        list.push_front(2);
        list.push_back(3);
        assert_eq!(list.len(), 3);
        assert_eq!(list.pop_front(), Some(2));
        assert_eq!(list.pop_back(), Some(3));
        assert_eq!(list.pop_front(), Some(1));
        assert!(list.is_empty());
    }

    #[test]
    fn list_version_counts_structural_mutations() {
        let mut list = List::new();
        assert_eq!(list.current_version(), 0);
        list.push_back(1);
        list.push_front(0);
        assert_eq!(list.current_version(), 2);
        list.pop_back();
        assert_eq!(list.current_version(), 3);
    }

    #[test]
    fn list_drop() {
        #[derive(Debug)]
        struct DropChecker<'a, T: Copy> {
            value: T,
            dropped: &'a RefCell<Vec<T>>,
        }
        impl<'a, T: Copy> DropChecker<'a, T> {
            fn new(value: T, dropped: &'a RefCell<Vec<T>>) -> Self {
                Self { value, dropped }
            }
        }
        impl<'a, T: Copy> Drop for DropChecker<'a, T> {
            fn drop(&mut self) {
                self.dropped.borrow_mut().push(self.value);
            }
        }
        let dropped = RefCell::new(Vec::<i32>::new());
        let mut list = List::new();
        list.push_back(DropChecker::new(1, &dropped));
        list.push_back(DropChecker::new(2, &dropped));
        list.push_back(DropChecker::new(3, &dropped));
        drop(list);
        assert_eq!(dropped.borrow().as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn chain_stays_circular() {
        let mut list = List::from_iter(0..5);
        {
            let mut cursor = list.cursor();
            cursor.next().unwrap();
            cursor.next().unwrap();
            cursor.remove().unwrap();
            cursor.add(7).unwrap();
            cursor.add(8).unwrap();
        }
        list.pop_front();

        // Walking `next` from the sentinel `len` times and once more must
        // come back to the sentinel.
        let mut node = list.sentinel_node();
        for _ in 0..list.len() {
            node = next_link(&node);
            assert!(!Rc::ptr_eq(&node, &list.sentinel));
        }
        node = next_link(&node);
        assert!(Rc::ptr_eq(&node, &list.sentinel));
    }

    #[test]
    fn list_eq_and_clone() {
        let list = List::from_iter([1, 2, 3]);
        let cloned = list.clone();
        assert_eq!(list, cloned);
        assert_ne!(list, List::from_iter([1, 2]));
        assert_ne!(list, List::from_iter([1, 2, 4]));
        assert_eq!(List::<i32>::new(), List::new());
    }

    #[test]
    fn list_debug() {
        let list = List::from_iter([1, 2, 3]);
        assert_eq!(format!("{:?}", list), "[1, 2, 3]");
        assert_eq!(format!("{:?}", List::<i32>::new()), "[]");
    }
}
