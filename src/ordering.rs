//! Deterministic ordering of images by capture time

use std::collections::HashMap;

/// Order file names by their timestamp, ties broken by name.
///
/// Pure function of the map; nothing is re-read from disk. Names are unique
/// map keys, so `(time, name)` is a total order and the result is
/// reproducible regardless of the map's iteration order.
pub fn order<T: Ord>(entries: &HashMap<String, T>) -> Vec<String> {
    let mut keyed: Vec<(&T, &String)> = entries.iter().map(|(name, t)| (t, name)).collect();
    keyed.sort_unstable();
    keyed.into_iter().map(|(_, name)| name.clone()).collect()
}
