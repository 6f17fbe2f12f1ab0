//! Move-and-renumber for indexed collections.
//!
//! Relocates one element of an ordered list to a new position and reassigns
//! every element's position field so the indices are a contiguous `0..N-1`
//! permutation matching array order. The caller persists the result through
//! the repository's update/batch operations.

use crate::error::{ErrorObject, Severity};

/// A record carrying a zero-based position within a logical ordered list.
pub trait Indexed {
    fn index(&self) -> usize;
    fn set_index(&mut self, index: usize);
}

/// Moves the element at `source_index` to `target_index` and renumbers.
///
/// Standard move semantics, not a swap: the element is removed and
/// reinserted, shifting the elements in between by one position. Afterwards
/// every element's index equals its array offset.
///
/// `target_index == source_index` is a legal no-op that still reassigns all
/// indices, so the call is idempotent. For a single-element list only
/// `(0, 0)` is valid.
///
/// Inputs are validated before anything is touched: on an empty list or an
/// out-of-range index the list is returned unmodified alongside an error
/// with code `"Wrong Inputs"`.
///
/// # Example
///
/// ```
/// use doclink_types::{reorder, Indexed};
///
/// #[derive(Debug, PartialEq)]
/// struct Item { index: usize, name: &'static str }
///
/// impl Indexed for Item {
///     fn index(&self) -> usize { self.index }
///     fn set_index(&mut self, index: usize) { self.index = index; }
/// }
///
/// let mut items = vec![
///     Item { index: 0, name: "A" },
///     Item { index: 1, name: "B" },
///     Item { index: 2, name: "C" },
/// ];
///
/// reorder(&mut items, 2, 0).unwrap();
///
/// let order: Vec<_> = items.iter().map(|i| (i.index, i.name)).collect();
/// assert_eq!(order, vec![(0, "B"), (1, "C"), (2, "A")]);
/// ```
pub fn reorder<T: Indexed>(
    items: &mut Vec<T>,
    target_index: usize,
    source_index: usize,
) -> Result<(), ErrorObject> {
    let len = items.len();
    if len == 0 || target_index >= len || source_index >= len {
        return Err(ErrorObject::custom(
            "Wrong Inputs",
            "Invalid Reorder Input",
            "The Given Indexes Are Out of Range for the List",
            Severity::Error,
        ));
    }

    let moved = items.remove(source_index);
    items.insert(target_index, moved);
    for (offset, item) in items.iter_mut().enumerate() {
        item.set_index(offset);
    }
    Ok(())
}
