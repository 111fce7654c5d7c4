//! Per-session, per-type document cache with fingerprint dirty checking.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use folio_types::{Document, Fingerprint};

use crate::document_ref::DocumentRef;
use crate::error::{StoreError, StoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryState {
    /// Loaded from storage; the fingerprint is the one captured at load.
    Origin(Fingerprint),
    /// Created in this session.
    Added,
    /// Tombstoned: reads see nothing, flush removes it from storage.
    Deleted,
}

struct Entry<T> {
    document: DocumentRef<T>,
    state: EntryState,
}

/// Outcome of a bulk [`IdentityMap::resolve_many`].
#[derive(Debug)]
pub struct Resolved<T> {
    /// Ids with a live cached instance.
    pub found: HashMap<String, DocumentRef<T>>,
    /// Ids tombstoned in this session.
    pub deleted: Vec<String>,
    /// Ids the map has never seen.
    pub unknown: Vec<String>,
}

/// Changes drained from an identity map by [`IdentityMap::pop_changes`].
#[derive(Debug)]
pub struct ChangeSet<T> {
    /// Snapshots of added or modified documents, ordered by id.
    pub writes: Vec<T>,
    /// Ids of deleted documents, ordered.
    pub deletes: Vec<String>,
}

impl<T> ChangeSet<T> {
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.deletes.is_empty()
    }
}

/// Session cache for documents of type `T`.
///
/// Invariants:
/// - At most one entry, and so at most one live instance, per id.
/// - A document is dirty when it was added, or when its fingerprint differs
///   from the one captured when it was first registered as loaded. There
///   is no explicit "mark dirty".
/// - [`pop_changes`](Self::pop_changes) clears the map; the next cycle
///   starts empty.
pub struct IdentityMap<T> {
    entries: RwLock<HashMap<String, Entry<T>>>,
}

impl<T: Document> IdentityMap<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Register a document read from storage.
    ///
    /// Returns the cached instance for its id (the given document if the id
    /// was unseen, the existing instance otherwise) and whether that id is
    /// tombstoned.
    pub fn register_origin(&self, document: T) -> StoreResult<(DocumentRef<T>, bool)> {
        if !document.has_identity() {
            return Err(StoreError::EmptyIdentity {
                type_name: T::type_name(),
            });
        }
        let mut entries = self.entries.write().expect("lock poisoned");
        let entry = entries
            .entry(document.id().to_string())
            .or_insert_with(|| Entry {
                state: EntryState::Origin(document.fingerprint()),
                document: DocumentRef::new(document),
            });
        Ok((entry.document.clone(), entry.state == EntryState::Deleted))
    }

    /// Register a new document. Fails if the id is already tracked.
    pub fn register_new(&self, document: T) -> StoreResult<DocumentRef<T>> {
        if !document.has_identity() {
            return Err(StoreError::EmptyIdentity {
                type_name: T::type_name(),
            });
        }
        let mut entries = self.entries.write().expect("lock poisoned");
        if entries.contains_key(document.id()) {
            return Err(StoreError::DuplicateIdentity {
                type_name: T::type_name(),
                id: document.id().to_string(),
            });
        }
        let id = document.id().to_string();
        let document = DocumentRef::new(document);
        entries.insert(
            id,
            Entry {
                document: document.clone(),
                state: EntryState::Added,
            },
        );
        Ok(document)
    }

    /// Tombstone a document, tracked or not.
    pub fn register_deleted(&self, document: &DocumentRef<T>) -> StoreResult<()> {
        let id = document.read().id().to_string();
        if id.is_empty() {
            return Err(StoreError::EmptyIdentity {
                type_name: T::type_name(),
            });
        }
        let mut entries = self.entries.write().expect("lock poisoned");
        entries
            .entry(id)
            .and_modify(|entry| entry.state = EntryState::Deleted)
            .or_insert_with(|| Entry {
                document: document.clone(),
                state: EntryState::Deleted,
            });
        Ok(())
    }

    /// Cached instance for `id`, and whether `id` is tombstoned. A
    /// tombstoned id never yields an instance.
    pub fn resolve(&self, id: &str) -> (Option<DocumentRef<T>>, bool) {
        let entries = self.entries.read().expect("lock poisoned");
        match entries.get(id) {
            Some(entry) if entry.state == EntryState::Deleted => (None, true),
            Some(entry) => (Some(entry.document.clone()), false),
            None => (None, false),
        }
    }

    /// Partition `ids` into cached, tombstoned and unseen.
    pub fn resolve_many(&self, ids: &[String]) -> Resolved<T> {
        let entries = self.entries.read().expect("lock poisoned");
        let mut resolved = Resolved {
            found: HashMap::new(),
            deleted: Vec::new(),
            unknown: Vec::new(),
        };
        for id in ids {
            match entries.get(id) {
                Some(entry) if entry.state == EntryState::Deleted => {
                    resolved.deleted.push(id.clone())
                }
                Some(entry) => {
                    resolved.found.insert(id.clone(), entry.document.clone());
                }
                None => resolved.unknown.push(id.clone()),
            }
        }
        resolved
    }

    /// Drain everything that must reach storage and clear the map.
    pub fn pop_changes(&self) -> ChangeSet<T> {
        let drained: Vec<(String, Entry<T>)> = {
            let mut entries = self.entries.write().expect("lock poisoned");
            entries.drain().collect()
        };

        let mut changes = ChangeSet {
            writes: Vec::new(),
            deletes: Vec::new(),
        };
        for (id, entry) in drained {
            match entry.state {
                EntryState::Added => changes.writes.push(entry.document.snapshot()),
                EntryState::Origin(captured) => {
                    let current = entry.document.read();
                    let fingerprint = current.fingerprint();
                    if fingerprint != captured {
                        debug!(
                            document_type = T::type_name(),
                            id = %id,
                            from = %captured.short_hex(),
                            to = %fingerprint.short_hex(),
                            "document modified"
                        );
                        changes.writes.push(current.clone());
                    }
                }
                EntryState::Deleted => changes.deletes.push(id),
            }
        }
        changes.writes.sort_by(|a, b| a.id().cmp(b.id()));
        changes.deletes.sort();
        changes
    }

    /// Number of tracked ids.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Document> Default for IdentityMap<T> {
    fn default() -> Self {
        Self::new()
    }
}
