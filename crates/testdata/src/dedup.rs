//! Concurrent ordered set of postal addresses.
//!
//! The geographic pipeline can deliver features from several reader threads
//! at once, so [`AddressSet`] is backed by a lock-free skip list. Iteration
//! follows the key order of [`KeyedAddress`], not insertion order.

use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_skiplist::SkipSet;

use crate::address::{KeyStyle, KeyedAddress, PostalAddress};

/// A thread-safe, key-ordered, duplicate-free collection of addresses.
///
/// # Example
///
/// ```
/// use testdata::{AddressSet, PostalAddress};
///
/// let set = AddressSet::new();
/// let address = PostalAddress::new("DE", "Bonn", "53111", "Markt", "1");
/// set.add(address.clone());
/// set.add(address);
///
/// assert_eq!(set.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct AddressSet {
    entries: SkipSet<KeyedAddress>,
    style: KeyStyle,
    offered: AtomicUsize,
}

impl AddressSet {
    /// Creates an empty set keyed by plain field concatenation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set using the given key style.
    #[must_use]
    pub fn with_key_style(style: KeyStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Returns the key style used by this set.
    #[must_use]
    pub const fn key_style(&self) -> KeyStyle {
        self.style
    }

    /// Inserts `address` unless an address with an equal key is present.
    ///
    /// The first address inserted under a key is kept. Safe to call from
    /// many threads at once through a shared reference.
    pub fn add(&self, address: PostalAddress) {
        self.offered.fetch_add(1, Ordering::Relaxed);
        drop(
            self.entries
                .get_or_insert(KeyedAddress::new(address, self.style)),
        );
    }

    /// Returns `true` if an address with the same key is present.
    #[must_use]
    pub fn contains(&self, address: &PostalAddress) -> bool {
        self.entries
            .contains(&KeyedAddress::new(address.clone(), self.style))
    }

    /// Returns the number of distinct addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the set holds no addresses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns how many insertions were attempted, duplicates included.
    #[must_use]
    pub fn offered(&self) -> usize {
        self.offered.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of the addresses in key order.
    #[must_use]
    pub fn to_sorted_vec(&self) -> Vec<PostalAddress> {
        self.entries
            .iter()
            .map(|entry| entry.value().address().clone())
            .collect()
    }
}
