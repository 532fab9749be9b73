use thiserror::Error;

/// The ways a cursor operation can fail.
///
/// Every failure is raised synchronously at the offending call, before any
/// mutation of the chain begins, so a failed operation never leaves the list
/// in an inconsistent state.
///
/// # Examples
///
/// ```
/// use cursor_list::{List, ListError};
///
/// let list: List<i32> = List::new();
/// let mut cursor = list.cursor();
///
/// // Nothing to visit in an empty list.
/// assert_eq!(cursor.next().unwrap_err(), ListError::NoSuchElement);
///
/// // Nothing was visited, so there is nothing to remove.
/// assert_eq!(cursor.remove().unwrap_err(), ListError::NoPendingElement);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ListError {
    /// The list was structurally modified through another cursor since this
    /// cursor last observed it. The cursor is permanently unusable and must
    /// be discarded; the list itself remains fully usable via a new cursor.
    #[error("list modified through another cursor (observed version {observed}, list version {current})")]
    ConcurrentModification {
        /// The version snapshot held by the failing cursor.
        observed: u64,
        /// The version of the list at the time of the call.
        current: u64,
    },

    /// `next` or `previous` was called with no element left in the requested
    /// direction. Check [`has_next`]/[`has_previous`] first, or turn around.
    ///
    /// [`has_next`]: crate::Cursor::has_next
    /// [`has_previous`]: crate::Cursor::has_previous
    #[error("no element in the requested direction")]
    NoSuchElement,

    /// `remove` or `set` was called with no pending element: either no
    /// traversal step happened yet, or the last visited element was already
    /// consumed by a prior `remove`/`set`, or the most recent operation was
    /// an `add` (which defines no pending element).
    #[error("no pending element: call next or previous before remove/set")]
    NoPendingElement,
}

/// A specialized result type for cursor operations.
pub type Result<T> = std::result::Result<T, ListError>;
