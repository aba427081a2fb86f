//! Identity correlation between live pipeline objects and graph refs.
//!
//! The registry is a side table keyed by the address of an `Rc` allocation.
//! It holds only `Weak` pointers, so registering an object never extends its
//! lifetime. While any `Weak` to an allocation exists the allocation itself is
//! not freed, which means an address in the table cannot be reused by a
//! different object until [`IdentityRegistry::sweep`] drops the entry.

use std::any::Any;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use causeway_foundation::{Kind, Ref};

/// Address of an `Rc` allocation, used as the identity key.
fn address_of<T: ?Sized>(object: &Rc<T>) -> usize {
    Rc::as_ptr(object).cast::<()>() as usize
}

struct Entry<K: Kind> {
    object: Weak<dyn Any>,
    reference: Ref<K>,
}

/// Associates live objects with refs of kind `K` without owning them.
pub struct IdentityRegistry<K: Kind> {
    by_address: HashMap<usize, Entry<K>>,
    by_ref: HashMap<Ref<K>, Weak<dyn Any>>,
    sweep_threshold: usize,
    attached_since_sweep: usize,
}

impl<K: Kind> IdentityRegistry<K> {
    /// Creates an empty registry that sweeps dead entries every
    /// `sweep_threshold` attachments (zero disables automatic sweeps).
    #[must_use]
    pub fn new(sweep_threshold: usize) -> Self {
        Self {
            by_address: HashMap::new(),
            by_ref: HashMap::new(),
            sweep_threshold,
            attached_since_sweep: 0,
        }
    }

    /// Returns the ref attached to `object`, or mints one with `create` and
    /// attaches it.
    ///
    /// `create` runs at most once per live object.
    pub fn resolve_or_create<T, F>(&mut self, object: &Rc<T>, create: F) -> Ref<K>
    where
        T: Any,
        F: FnOnce() -> Ref<K>,
    {
        if let Some(existing) = self.get(object) {
            return existing;
        }
        let reference = create();
        self.attach(object, reference);
        reference
    }

    /// Returns the ref attached to `object`, if any.
    #[must_use]
    pub fn get<T: Any>(&self, object: &Rc<T>) -> Option<Ref<K>> {
        let entry = self.by_address.get(&address_of(object))?;
        // A dead entry at this address belongs to a dropped object.
        let live = entry.object.upgrade()?;
        (address_of(&live) == address_of(object)).then_some(entry.reference)
    }

    /// Attaches `reference` to `object`, replacing any earlier attachment.
    pub fn attach<T: Any>(&mut self, object: &Rc<T>, reference: Ref<K>) {
        let weak: Weak<T> = Rc::downgrade(object);
        let weak: Weak<dyn Any> = weak;
        self.by_ref.insert(reference, weak.clone());
        self.by_address.insert(
            address_of(object),
            Entry {
                object: weak,
                reference,
            },
        );

        self.attached_since_sweep += 1;
        if self.sweep_threshold > 0 && self.attached_since_sweep >= self.sweep_threshold {
            self.sweep();
        }
    }

    /// Returns the live object behind `reference`.
    ///
    /// Returns `None` if nothing was attached, if the object has been
    /// dropped, or if it is not a `T`.
    #[must_use]
    pub fn upgrade<T: Any>(&self, reference: Ref<K>) -> Option<Rc<T>> {
        let object = self.by_ref.get(&reference)?.upgrade()?;
        object.downcast::<T>().ok()
    }

    /// Returns true if the object behind `reference` is still alive.
    #[must_use]
    pub fn is_live(&self, reference: Ref<K>) -> bool {
        self.by_ref
            .get(&reference)
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Returns the number of entries whose object is still alive.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.by_ref
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Returns the number of entries, including dead ones not yet swept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    /// Returns true if the registry has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }

    /// Drops entries whose object has been dropped. Returns how many were
    /// removed.
    pub fn sweep(&mut self) -> usize {
        let before = self.by_address.len();
        self.by_address
            .retain(|_, entry| entry.object.strong_count() > 0);
        self.by_ref.retain(|_, weak| weak.strong_count() > 0);
        self.attached_since_sweep = 0;

        let removed = before - self.by_address.len();
        if removed > 0 {
            tracing::debug!(kind = %K::KIND, removed, "swept released objects");
        }
        removed
    }
}

impl<K: Kind> Default for IdentityRegistry<K> {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_SWEEP_THRESHOLD)
    }
}

impl<K: Kind> std::fmt::Debug for IdentityRegistry<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityRegistry")
            .field("kind", &K::KIND)
            .field("entries", &self.by_address.len())
            .field("live", &self.live_count())
            .finish()
    }
}
