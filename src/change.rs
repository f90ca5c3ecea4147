//! ChangeDetector: content-hash skip detection
//!
//! Debounced triggers fire far more often than the body text actually
//! changes (the overlay's own mount/teardown is itself a mutation batch).
//! Hashing the scanned text lets an evaluation bail out before any pattern
//! work when nothing it depends on moved.
//!
//! Must be reset whenever the settings snapshot changes: the hash only
//! covers the text, not the vocabulary matched against it.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Content-addressable change detector.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    last_hash: Option<u64>,
    check_count: u64,
    skip_count: u64,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the text against the previous snapshot, updating the snapshot.
    /// The first check after construction or [`reset`](Self::reset) always
    /// reports a change.
    pub fn has_changed(&mut self, text: &str) -> bool {
        self.check_count += 1;
        let hash = compute_hash(text);
        let changed = self.last_hash != Some(hash);
        if !changed {
            self.skip_count += 1;
        }
        self.last_hash = Some(hash);
        changed
    }

    /// Forget the previous snapshot so the next check re-processes.
    pub fn reset(&mut self) {
        self.last_hash = None;
    }

    pub fn check_count(&self) -> u64 {
        self.check_count
    }

    pub fn skip_count(&self) -> u64 {
        self.skip_count
    }
}

fn compute_hash(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}
