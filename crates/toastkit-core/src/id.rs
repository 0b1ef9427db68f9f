//! Toast identifier generation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Opaque toast identifier. Rendered as a decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToastId(u64);

impl ToastId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic id source.
///
/// Ids start at 1 and wrap back to 1 after `u64::MAX`; 0 is never issued.
#[derive(Debug)]
pub struct IdGenerator {
    last: AtomicU64,
}

impl IdGenerator {
    pub const fn new() -> Self {
        Self::starting_after(0)
    }

    /// Generator whose first id is the successor of `last`.
    pub const fn starting_after(last: u64) -> Self {
        Self {
            last: AtomicU64::new(last),
        }
    }

    pub fn next(&self) -> ToastId {
        let prev = self
            .last
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| Some(successor(n)))
            .unwrap_or_else(|n| n);
        ToastId(successor(prev))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn successor(n: u64) -> u64 {
    if n == u64::MAX {
        1
    } else {
        n + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_sequential_and_distinct() {
        let ids = IdGenerator::new();
        let issued: Vec<_> = (0..100).map(|_| ids.next()).collect();
        assert_eq!(issued[0].as_u64(), 1);
        assert_eq!(issued[99].as_u64(), 100);
        let unique: HashSet<_> = issued.iter().collect();
        assert_eq!(unique.len(), 100);
    }

    #[test]
    fn wraps_without_issuing_zero() {
        let ids = IdGenerator::starting_after(u64::MAX - 1);
        assert_eq!(ids.next().as_u64(), u64::MAX);
        assert_eq!(ids.next().as_u64(), 1);
        assert_eq!(ids.next().as_u64(), 2);
    }

    #[test]
    fn distinct_across_threads() {
        let ids = std::sync::Arc::new(IdGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = ids.clone();
                std::thread::spawn(move || (0..250).map(|_| ids.next()).collect::<Vec<_>>())
            })
            .collect();
        let mut all = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(all.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(all.len(), 1000);
    }

    #[test]
    fn displays_as_decimal_string() {
        assert_eq!(ToastId::from_raw(42).to_string(), "42");
        assert_eq!(serde_json::to_string(&ToastId::from_raw(7)).unwrap(), "7");
    }
}
