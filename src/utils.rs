use std::fmt::Debug;

use crate::error::ReorderError;

/// Removes value at `source_idx` and places it at `target_idx`, shifting everything in between by
/// one. Does nothing if `source_idx` is equal to `target_idx` or if either index is outside the vec
/// bounds.
pub fn move_item<T>(source_idx: usize, target_idx: usize, vec: &mut Vec<T>) {
    if source_idx == target_idx || source_idx >= vec.len() || target_idx >= vec.len() {
        return;
    }

    let item = vec.remove(source_idx);
    vec.insert(target_idx, item);
}

/// Same as [`move_item`] but leaves `items` alone and returns the moved copy.
pub fn moved<T: Clone>(items: &[T], source_idx: usize, target_idx: usize) -> Vec<T> {
    let mut vec = items.to_vec();
    move_item(source_idx, target_idx, &mut vec);
    vec
}

/// Where the dragged item is taken from and where it ends up, as indices into the list.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragIndices {
    pub source: usize,
    pub target: usize,
}

/// Locates `active` and `over` in `items`.
///
/// Returns `Ok(None)` when both are the same item, since dropping an item onto itself changes
/// nothing. Either id missing from `items` is an error; callers decide whether that is fatal.
pub fn drop_indices<T: PartialEq + Debug>(
    items: &[T],
    active: &T,
    over: &T,
) -> Result<Option<DragIndices>, ReorderError> {
    if active == over {
        return Ok(None);
    }

    let source = items
        .iter()
        .position(|item| item == active)
        .ok_or_else(|| ReorderError::UnknownActive(format!("{active:?}")))?;
    let target = items
        .iter()
        .position(|item| item == over)
        .ok_or_else(|| ReorderError::UnknownTarget(format!("{over:?}")))?;

    Ok(Some(DragIndices { source, target }))
}

/// Computes the order produced by dropping `active` onto `over`, see [`drop_indices`].
pub fn reorder<T: PartialEq + Clone + Debug>(
    items: &[T],
    active: &T,
    over: &T,
) -> Result<Option<Vec<T>>, ReorderError> {
    Ok(drop_indices(items, active, over)?
        .map(|indices| moved(items, indices.source, indices.target)))
}
