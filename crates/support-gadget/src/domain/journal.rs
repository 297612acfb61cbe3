//! Undo journal for keyed state
//!
//! While open, every write notes the value its key held before, so a block
//! that fails halfway through its votes can be unwound to where it started.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Clone, Debug)]
pub struct Journal<K, V> {
    entries: Option<Vec<(K, Option<V>)>>,
}

impl<K, V> Default for Journal<K, V> {
    fn default() -> Self {
        Self { entries: None }
    }
}

impl<K: Copy + Eq + Hash, V: Copy> Journal<K, V> {
    /// Start recording. Anything recorded earlier is discarded.
    pub fn open(&mut self) {
        self.entries = Some(Vec::new());
    }

    /// Note that `key` held `previous` before a write. No-op while closed.
    pub fn record(&mut self, key: K, previous: Option<V>) {
        if let Some(entries) = self.entries.as_mut() {
            entries.push((key, previous));
        }
    }

    /// Keep every write since `open` and stop recording
    pub fn commit(&mut self) {
        self.entries = None;
    }

    /// Restore `map` to its state at `open`, newest write first
    pub fn rollback(&mut self, map: &mut HashMap<K, V>) {
        for (key, previous) in self.entries.take().into_iter().flatten().rev() {
            match previous {
                Some(value) => {
                    map.insert(key, value);
                }
                None => {
                    map.remove(&key);
                }
            }
        }
    }
}
