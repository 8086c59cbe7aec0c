//! Order-preserving partition of a track list into bounded groups.

/// Splits `ids` into consecutive groups of at most `group_size` (the last
/// group may be shorter). Order is preserved exactly; concatenating the
/// groups reproduces the input. A `group_size` of 0 is treated as 1.
pub fn partition_groups<T: Clone>(ids: &[T], group_size: usize) -> Vec<Vec<T>> {
    let group_size = group_size.max(1);
    ids.chunks(group_size).map(<[T]>::to_vec).collect()
}
