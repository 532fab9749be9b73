//! This crate provides a circular doubly-linked list built around a sentinel
//! node, traversed and mutated through fail-fast bidirectional cursors.
//!
//! The [`List`] allows inserting and removing elements at the cursor position
//! in constant time. Any number of [`Cursor`]s may coexist on one list; after
//! a structural mutation only the cursor that performed it remains usable,
//! and every operation on the others fails with
//! [`ConcurrentModification`](ListError::ConcurrentModification).
//!
//! Here is a quick example showing how the list works.
//!
//! ```
//! use cursor_list::List;
//! use std::iter::FromIterator;
//!
//! let list = List::from_iter([1, 2, 3, 4]);
//!
//! let mut cursor = list.cursor();
//!
//! assert_eq!(*cursor.next().unwrap(), 1); // visit 1, which becomes pending
//! cursor.remove().unwrap(); // remove it: [2, 3, 4]
//!
//! assert_eq!(*cursor.next().unwrap(), 2);
//! assert_eq!(cursor.set(20).unwrap(), 2); // replace 2 in place: [20, 3, 4]
//!
//! cursor.add(0).unwrap(); // insert before the gap: [20, 0, 3, 4]
//!
//! assert_eq!(Vec::from_iter(list.iter()), vec![20, 0, 3, 4]);
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the list is like the following graph:
//! ```text
//!          ┌─────────────────────────────────────────────────────────────────┐
//!          ↓  strong `next` ring                          sentinel           │
//!    ╔═══════════╗           ╔═══════════╗             ┌───────────┐         │
//!    ║   next    ║ ────────→ ║   next    ║ ──→ ┄┄ ──→  │   next    │ ────────┘
//!    ╟───────────╢           ╟───────────╢             ├───────────┤
//! ┌─ ║   prev    ║ ←╌╌╌╌╌╌╌╌ ║   prev    ║ ←╌╌ ┄┄ ←╌╌  │   prev    │ (weak)
//! │  ╟───────────╢           ╟───────────╢             ├───────────┤
//! │  ║ element T ║           ║ element T ║             ┊no element ┊
//! │  ╚═══════════╝           ╚═══════════╝             └╌╌╌╌╌╌╌╌╌╌╌┘
//! │      Node 0                  Node 1                      ↑
//! └╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌┤
//! ╔═══════════╗                                              │
//! ║ sentinel  ║ ─────────────────────────────────────────────┘
//! ╟───────────╢
//! ║ len       ║
//! ╟───────────╢
//! ║ version   ║
//! ╚═══════════╝
//!     List
//! ```
//! The `List` contains:
//! - a handle to the sentinel node, which carries no element and closes the
//!   circle: `sentinel.next` is the first element and `sentinel.prev` the
//!   last, both pointing back at the sentinel when the list is empty;
//! - a `len` field counting the elements (sentinel excluded);
//! - a `version` counter bumped on every structural mutation.
//!
//! `next` links are strong (reference-counted) and `prev` links are weak, so
//! the only strong cycle is the forward ring, which the list's `Drop` severs
//! iteratively. For every node `n` in the chain, `n.next.prev == n` and
//! `n.prev.next == n`.
//!
//! # Fail-Fast Cursors
//!
//! A [`Cursor`] never points at an element: it sits in one of the `len + 1`
//! gaps between elements. Moving it with [`next`](Cursor::next) or
//! [`previous`](Cursor::previous) returns the element stepped over, which
//! stays *pending* and is what [`remove`](Cursor::remove) and
//! [`set`](Cursor::set) act on.
//!
//! Every cursor snapshots the list's version when created, and every cursor
//! operation (pure queries included) compares that snapshot against the list
//! first. A structural mutation through one cursor bumps the version and
//! refreshes only that cursor's snapshot, so all other cursors fail from
//! then on — permanently, though the list itself stays fully usable through
//! new cursors. The check is a plain counter comparison on a single thread,
//! a misuse detector rather than a synchronization mechanism.
//!
//! ## Examples
//!
//! ```
//! use cursor_list::{List, ListError};
//! use std::iter::FromIterator;
//!
//! let list = List::from_iter([1, 2, 3]);
//! let mut c1 = list.cursor();
//! let mut c2 = list.cursor();
//!
//! assert_eq!(*c2.next().unwrap(), 1); // both cursors work...
//! c1.add(0).unwrap(); // ...until one of them mutates the list.
//!
//! assert!(matches!(
//!     c2.has_next(), // even pure queries fail on the stale cursor
//!     Err(ListError::ConcurrentModification { .. })
//! ));
//! assert!(c1.is_valid());
//!
//! // The list is unharmed; a fresh cursor sees the new state.
//! assert_eq!(*list.cursor().next().unwrap(), 0);
//! ```
//!
//! # Iteration
//!
//! [`List::iter`] builds a forward-only, restartable [`Iter`] on top of a
//! fresh cursor, cloning the elements it yields; a structural mutation during
//! iteration makes the next step panic (the `Iterator` contract has no error
//! channel). Consuming the list with `into_iter` gives a double-ended,
//! exact-size [`IntoIter`] that can never observe a concurrent modification,
//! because it owns the list.
//!
//! ## Examples
//!
//! ```
//! use cursor_list::List;
//! use std::iter::FromIterator;
//!
//! let list = List::from_iter([1, 2, 3]);
//! assert_eq!(list.iter().sum::<i32>(), 6);
//! assert_eq!(list.iter().sum::<i32>(), 6); // restartable
//!
//! assert_eq!(Vec::from_iter(list.into_iter().rev()), vec![3, 2, 1]);
//! ```

#[doc(inline)]
pub use error::{ListError, Result};
#[doc(inline)]
pub use list::cursor::Cursor;
#[doc(inline)]
pub use list::iterator::{IntoIter, Iter};
#[doc(inline)]
pub use list::List;

pub mod error;
pub mod list;

mod experiments;
