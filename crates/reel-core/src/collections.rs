//! Hash map backing the runtime's task table.

/// Keyed by task id. `std-hash` swaps the fast hasher for the standard one.
#[cfg(feature = "std-hash")]
pub type HashMap<K, V> = std::collections::HashMap<K, V>;

#[cfg(not(feature = "std-hash"))]
pub type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;
