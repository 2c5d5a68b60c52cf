//! First-match position lookup over slices.

/// Returns the index of the first element equal to `value`.
///
/// On duplicates the lowest index wins. An empty slice never matches.
pub fn find<T: PartialEq>(items: &[T], value: &T) -> Option<usize> {
    items.iter().position(|item| item == value)
}

/// Returns the index of the first element matching `predicate`.
///
/// Useful for searching structured records by an extracted key.
pub fn find_by<T, P>(items: &[T], predicate: P) -> Option<usize>
where
    P: FnMut(&T) -> bool,
{
    items.iter().position(predicate)
}
