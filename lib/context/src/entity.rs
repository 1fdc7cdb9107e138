//! Insertion-ordered capped string sets.
//!
//! Mentioned speakers, session titles, and search terms are tracked in
//! sets whose iteration order is their insertion order. That order is a
//! contract here, not an accident of the backing collection: "that
//! speaker" resolves to the most recently inserted member, and overflow
//! evicts the oldest.

use serde::{Deserialize, Serialize};

/// A capped set of lowercased strings with first-class insertion order.
///
/// Membership is set-like: re-inserting an existing value keeps its
/// original position. When the cap is exceeded the oldest members are
/// dropped. Caps are small (at most 20), so membership checks stay
/// linear over a `Vec`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedSet {
    items: Vec<String>,
    cap: usize,
}

impl OrderedSet {
    /// Creates an empty set with the given cap.
    #[must_use]
    pub fn with_cap(cap: usize) -> Self {
        Self {
            items: Vec::new(),
            cap,
        }
    }

    /// Inserts a value, lowercasing it first.
    ///
    /// Existing members are left in place. Oldest members are evicted
    /// until the set is back under its cap.
    pub fn insert(&mut self, value: impl AsRef<str>) {
        let value = value.as_ref().trim().to_lowercase();
        if value.is_empty() || self.items.contains(&value) {
            return;
        }
        self.items.push(value);
        while self.items.len() > self.cap {
            self.items.remove(0);
        }
    }

    /// Returns true if the lowercased value is a member.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        let needle = value.to_lowercase();
        self.items.contains(&needle)
    }

    /// Returns the most recently inserted member.
    #[must_use]
    pub fn most_recent(&self) -> Option<&str> {
        self.items.last().map(String::as_str)
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates members oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// Returns the members as a vector, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.items.clone()
    }
}
