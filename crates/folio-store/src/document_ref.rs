use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared handle to the live instance of a document inside a session.
///
/// A session hands out at most one live instance per id; every load of that
/// id returns a clone of the same handle. Edits made through
/// [`DocumentRef::write`] are what the session's dirty check sees at flush.
pub struct DocumentRef<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> DocumentRef<T> {
    pub fn new(document: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(document)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.read().expect("lock poisoned")
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.inner.write().expect("lock poisoned")
    }

    /// Returns `true` if both handles point at the same live instance.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl<T: Clone> DocumentRef<T> {
    /// Owned copy of the current content.
    pub fn snapshot(&self) -> T {
        self.read().clone()
    }
}

impl<T> Clone for DocumentRef<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for DocumentRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DocumentRef").field(&*self.read()).finish()
    }
}
