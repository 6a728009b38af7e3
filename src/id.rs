//! Unique identifiers for parameter names.
//!
//! Every leaf that binds a value takes its identifier from an [`IdGenerator`]
//! at construction time. Generators are injected, so tests can use a
//! deterministic source while applications share one across threads.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An identifier appended to a field name to form a parameter key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UniqueId(String);

impl UniqueId {
    /// Wrap an already-unique token.
    ///
    /// The token is used verbatim inside parameter names, so it should only
    /// contain identifier characters.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for UniqueId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// Source of identifiers that never repeat for the lifetime of the generator.
///
/// Implementations must stay unique when called from several threads at once.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> UniqueId;
}

impl<G: IdGenerator + ?Sized> IdGenerator for &G {
    fn next_id(&self) -> UniqueId {
        (**self).next_id()
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for std::sync::Arc<G> {
    fn next_id(&self) -> UniqueId {
        (**self).next_id()
    }
}

/// Monotonic counter shared between threads.
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub const fn new() -> Self {
        Self::starting_at(1)
    }

    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> UniqueId {
        UniqueId::from(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// Random v4 UUIDs rendered without hyphens.
///
/// Useful when criteria built by independent generators end up in one tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> UniqueId {
        UniqueId(Uuid::new_v4().simple().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::starting_at(7);
        assert_eq!(ids.next_id().as_str(), "7");
        assert_eq!(ids.next_id().as_str(), "8");
    }

    #[test]
    fn test_random_ids_are_identifiers() {
        let id = RandomIds.next_id();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_sequential_ids_unique_across_threads() {
        let ids = Arc::new(SequentialIds::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ids = Arc::clone(&ids);
                thread::spawn(move || (0..500).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "id issued twice");
            }
        }
        assert_eq!(seen.len(), 4000);
    }
}
