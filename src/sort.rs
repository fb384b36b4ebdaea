use crate::date::{CanonicalDate, SortKey};
use crate::types::DateContextMap;

/// Sort key for a canonical date string. Keys that do not parse sit at
/// year zero instead of failing the sort.
pub fn sort_key_for(key: &str) -> SortKey {
    match key.parse::<CanonicalDate>() {
        Ok(date) => date.sort_key(),
        Err(_) => {
            tracing::debug!(key, "unparseable date key, sorting as year zero");
            (0, 0, 0)
        }
    }
}

/// Reorder by (signed year, month, day). Stable, so entries with equal
/// keys keep their acceptance order.
pub fn sort_chronologically(mut map: DateContextMap) -> DateContextMap {
    map.sort_by_key(sort_key_for);
    map
}
