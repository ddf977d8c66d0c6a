//! Literal substring removal applied to raw feed text.

/// Removes every literal, non-overlapping occurrence of `target` from `source`,
/// scanning left to right. Not a pattern match.
///
/// An empty `target` leaves `source` unchanged.
pub fn remove_substring(source: &str, target: &str) -> String {
    if target.is_empty() {
        return source.to_string();
    }
    source.split(target).collect()
}
