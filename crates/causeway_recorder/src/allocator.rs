//! Ref allocation.
//!
//! Each ref kind has its own counter starting at zero. Counters only move
//! forward, so every ref ever handed out stays addressable. A counter that
//! reaches `u32::MAX` stops minting instead of wrapping.

use causeway_foundation::{Error, Kind, Ref, RefKind, Result};

/// Mints fresh, typed refs.
#[derive(Clone, Debug, Default)]
pub struct RefAllocator {
    counters: [u32; RefKind::ALL.len()],
}

impl RefAllocator {
    /// Creates an allocator with all counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints the next ref of kind `K`.
    ///
    /// # Errors
    ///
    /// Returns an error once every id of kind `K` has been minted; the
    /// counter is left unchanged.
    pub fn next<K: Kind>(&mut self) -> Result<Ref<K>> {
        let counter = &mut self.counters[K::KIND.index()];
        let id = *counter;
        *counter = id
            .checked_add(1)
            .ok_or_else(|| Error::ids_exhausted(K::KIND))?;
        Ok(Ref::from_raw(id))
    }

    #[cfg(test)]
    pub(crate) fn set_count(&mut self, kind: RefKind, count: u32) {
        self.counters[kind.index()] = count;
    }

    /// Returns the ref that the next call to [`next`](Self::next) would mint.
    #[must_use]
    pub fn peek<K: Kind>(&self) -> Ref<K> {
        Ref::from_raw(self.counters[K::KIND.index()])
    }

    /// Returns how many refs of `kind` have been minted.
    #[must_use]
    pub fn count(&self, kind: RefKind) -> u32 {
        self.counters[kind.index()]
    }

    /// Returns true if `reference` was minted by this allocator.
    #[must_use]
    pub fn contains<K: Kind>(&self, reference: Ref<K>) -> bool {
        reference.id() < self.counters[K::KIND.index()]
    }
}
