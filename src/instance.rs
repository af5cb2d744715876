//! Instance identifiers for namespacing element ids.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Allocates unique instance ids.
///
/// Cloned counters share the same sequence.
#[derive(Debug, Clone, Default)]
pub struct InstanceCounter {
    next: Arc<AtomicU64>,
}

impl InstanceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide counter used by the JavaScript bindings.
    pub fn global() -> &'static InstanceCounter {
        static GLOBAL: OnceLock<InstanceCounter> = OnceLock::new();
        GLOBAL.get_or_init(InstanceCounter::new)
    }

    pub fn allocate(&self) -> InstanceId {
        InstanceId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identifier of one viewer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    pub fn value(self) -> u64 {
        self.0
    }

    /// `storyview-{id}__{part}`
    pub fn element_id(self, part: &str) -> String {
        format!("storyview-{}__{part}", self.0)
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_shared_between_clones() {
        let counter = InstanceCounter::new();
        let other = counter.clone();
        let a = counter.allocate();
        let b = other.allocate();
        assert_ne!(a, b);
        assert_eq!(a.element_id("previous"), "storyview-0__previous");
        assert_eq!(b.element_id("next"), "storyview-1__next");
    }
}
