//! Write-once cells for values that resolve after recording.
//!
//! A declaration's source locations are looked up lazily by the host. The
//! recorder stores a [`Deferred`] and hands the matching [`Resolver`] to
//! whoever performs the lookup. Readers see `None` until it resolves.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

/// A shared cell that starts empty and is filled at most once.
pub struct Deferred<T> {
    cell: Rc<OnceCell<T>>,
}

impl<T> Deferred<T> {
    /// Creates an unresolved cell and the handle that can fill it.
    #[must_use]
    pub fn pending() -> (Self, Resolver<T>) {
        let cell = Rc::new(OnceCell::new());
        (
            Self {
                cell: Rc::clone(&cell),
            },
            Resolver { cell },
        )
    }

    /// Creates a cell that is already resolved.
    #[must_use]
    pub fn resolved(value: T) -> Self {
        Self {
            cell: Rc::new(OnceCell::from(value)),
        }
    }

    /// Creates a cell that will never resolve.
    #[must_use]
    pub fn absent() -> Self {
        Self {
            cell: Rc::new(OnceCell::new()),
        }
    }

    /// Returns the value if it has resolved.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// Returns true if the value has not resolved yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.cell.get().is_none()
    }
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self::absent()
    }
}

impl<T: fmt::Debug> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(value) => f.debug_tuple("Resolved").field(value).finish(),
            None => f.write_str("Pending"),
        }
    }
}

/// The write side of a [`Deferred`].
pub struct Resolver<T> {
    cell: Rc<OnceCell<T>>,
}

impl<T> Resolver<T> {
    /// Fills the cell. Returns false if it had already been filled, in which
    /// case the earlier value is kept.
    pub fn resolve(self, value: T) -> bool {
        self.cell.set(value).is_ok()
    }
}

impl<T> fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("resolved", &self.cell.get().is_some())
            .finish()
    }
}
