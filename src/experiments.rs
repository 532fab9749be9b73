//! A compile-time-checked rendition of the version-counted chain, built on
//! `GhostCell` branding and `StaticRc` half-ownership instead of runtime
//! reference counting. Kept private as a testbed while the `Rc<RefCell<_>>`
//! chain remains the public implementation.

use ghost_cell::{GhostCell, GhostToken};
use static_rc::StaticRc;
use std::ops::Deref;

/// A doubly-linked chain whose every node is owned by exactly two
/// `StaticRc` halves: one held by its predecessor's `next` link (or by
/// `head`), the other by its successor's `prev` link (or by `tail`).
pub struct Chain<'id, T> {
    head: Option<NodePtr<'id, T>>,
    tail: Option<NodePtr<'id, T>>,
    version: u64,
}

struct Node<'id, T> {
    elem: T,
    prev: Option<NodePtr<'id, T>>,
    next: Option<NodePtr<'id, T>>,
}

type NodePtr<'id, T> = Half<GhostCell<'id, Node<'id, T>>>;

type Half<T> = StaticRc<T, 1, 2>;
type Full<T> = StaticRc<T, 2, 2>;

/// A snapshot of a chain's modification counter: the compile-time-safe
/// analogue of the version a cursor observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    observed: u64,
}

impl Stamp {
    /// Whether the chain is still in the state this stamp was taken in.
    pub fn is_current<T>(&self, chain: &Chain<'_, T>) -> bool {
        self.observed == chain.version
    }
}

impl<'id, T> Node<'id, T> {
    fn new(elem: T) -> (NodePtr<'id, T>, NodePtr<'id, T>) {
        Full::split(Full::new(GhostCell::new(Self {
            elem,
            prev: None,
            next: None,
        })))
    }
}

impl<'id, T> Default for Chain<'id, T> {
    fn default() -> Self {
        Self {
            head: None,
            tail: None,
            version: 0,
        }
    }
}

impl<'id, T> Chain<'id, T> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn stamp(&self) -> Stamp {
        Stamp {
            observed: self.version,
        }
    }

    pub fn push_back(&mut self, elem: T, token: &mut GhostToken<'id>) {
        let (fore, aft) = Node::new(elem);
        match self.tail.take() {
            Some(old_tail) => {
                old_tail.deref().borrow_mut(token).next = Some(fore);
                aft.deref().borrow_mut(token).prev = Some(old_tail);
            }
            None => self.head = Some(fore),
        }
        self.tail = Some(aft);
        self.version += 1;
    }

    pub fn push_front(&mut self, elem: T, token: &mut GhostToken<'id>) {
        let (fore, aft) = Node::new(elem);
        match self.head.take() {
            Some(old_head) => {
                old_head.deref().borrow_mut(token).prev = Some(aft);
                fore.deref().borrow_mut(token).next = Some(old_head);
            }
            None => self.tail = Some(aft),
        }
        self.head = Some(fore);
        self.version += 1;
    }

    pub fn pop_back(&mut self, token: &mut GhostToken<'id>) -> Option<T> {
        let aft = self.tail.take()?;
        let fore = match aft.deref().borrow_mut(token).prev.take() {
            Some(prev) => {
                let fore = prev
                    .deref()
                    .borrow_mut(token)
                    .next
                    .take()
                    .expect("predecessor of the tail links forward");
                self.tail = Some(prev);
                fore
            }
            None => self
                .head
                .take()
                .expect("a sole node is held at both ends"),
        };
        self.version += 1;
        Some(Full::into_box(Full::join(fore, aft)).into_inner().elem)
    }

    pub fn pop_front(&mut self, token: &mut GhostToken<'id>) -> Option<T> {
        let fore = self.head.take()?;
        let aft = match fore.deref().borrow_mut(token).next.take() {
            Some(next) => {
                let aft = next
                    .deref()
                    .borrow_mut(token)
                    .prev
                    .take()
                    .expect("successor of the head links backward");
                self.head = Some(next);
                aft
            }
            None => self
                .tail
                .take()
                .expect("a sole node is held at both ends"),
        };
        self.version += 1;
        Some(Full::into_box(Full::join(fore, aft)).into_inner().elem)
    }
}

#[cfg(test)]
mod tests {
    use crate::experiments::Chain;
    use ghost_cell::GhostToken;

    #[test]
    fn chain_push_pop() {
        GhostToken::new(|mut token| {
            let mut chain = Chain::new();
            assert!(chain.is_empty());
            chain.push_back(1, &mut token);
            chain.push_back(2, &mut token);
            chain.push_front(0, &mut token);
            assert!(!chain.is_empty());
            assert_eq!(chain.pop_front(&mut token), Some(0));
            assert_eq!(chain.pop_back(&mut token), Some(2));
            assert_eq!(chain.pop_front(&mut token), Some(1));
            assert_eq!(chain.pop_front(&mut token), None);
            assert!(chain.is_empty());
        })
    }

    #[test]
    fn stamp_detects_mutation() {
        GhostToken::new(|mut token| {
            let mut chain = Chain::new();
            let before = chain.stamp();
            assert!(before.is_current(&chain));

            chain.push_back('a', &mut token);
            assert!(!before.is_current(&chain));
            assert_eq!(chain.version(), 1);

            let after = chain.stamp();
            chain.pop_back(&mut token);
            assert!(!after.is_current(&chain));
            assert_eq!(chain.version(), 2);
        })
    }
}
