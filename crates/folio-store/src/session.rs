//! Unit-of-work session with an identity map per document type.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use futures_util::future;
use futures_util::stream::{BoxStream, StreamExt};
use serde::Serialize;
use tracing::{debug, warn};

use folio_types::Document;

use crate::data_session::DataSession;
use crate::document_ref::DocumentRef;
use crate::error::StoreResult;
use crate::identity_map::IdentityMap;

/// What a flush pushed to storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlushReport {
    /// Documents written (added or modified).
    pub written: usize,
    /// Documents removed from storage.
    pub deleted: usize,
}

impl FlushReport {
    pub fn is_empty(&self) -> bool {
        self.written == 0 && self.deleted == 0
    }

    fn merge(&mut self, other: FlushReport) {
        self.written += other.written;
        self.deleted += other.deleted;
    }
}

/// An identity map the session can flush without knowing its document
/// type.
#[async_trait]
pub trait FlushableMap<S: DataSession>: Send + Sync {
    /// Drain the map and push its changes through `data`.
    async fn pop_and_flush(&self, data: &S) -> StoreResult<FlushReport>;

    /// Number of tracked ids.
    fn len(&self) -> usize;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

#[async_trait]
impl<S: DataSession, T: Document> FlushableMap<S> for IdentityMap<T> {
    async fn pop_and_flush(&self, data: &S) -> StoreResult<FlushReport> {
        let changes = self.pop_changes();
        let mut report = FlushReport::default();
        if !changes.writes.is_empty() {
            report.written = data.write_batch(&changes.writes).await?;
        }
        if !changes.deletes.is_empty() {
            report.deleted = data.delete_batch::<T>(&changes.deletes).await?;
        }
        debug!(
            document_type = T::type_name(),
            written = report.written,
            deleted = report.deleted,
            "identity map flushed"
        );
        Ok(report)
    }

    fn len(&self) -> usize {
        IdentityMap::len(self)
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// A unit of work over a [`DataSession`].
///
/// Per id, a session moves through: unseen → loaded (by `load`, `load_many`
/// or `query`) or added (by `add`); loaded or added → deleted (by
/// `delete`). Loaded documents are edited in place through their
/// [`DocumentRef`]. Nothing reaches storage until
/// [`save_changes`](Self::save_changes), which writes added and modified
/// documents once, removes deleted ones, and starts a fresh cycle.
///
/// Within one session every id has at most one live instance.
pub struct CacheableSession<S: DataSession> {
    data: S,
    maps: RwLock<HashMap<TypeId, Arc<dyn FlushableMap<S>>>>,
}

impl<S: DataSession + 'static> CacheableSession<S> {
    pub fn new(data: S) -> Self {
        Self {
            data,
            maps: RwLock::new(HashMap::new()),
        }
    }

    /// The underlying data session.
    pub fn data_session(&self) -> &S {
        &self.data
    }

    fn map<T: Document>(&self) -> Arc<IdentityMap<T>> {
        let key = TypeId::of::<T>();
        let existing = self.maps.read().expect("lock poisoned").get(&key).cloned();
        let map = match existing {
            Some(map) => map,
            None => self
                .maps
                .write()
                .expect("lock poisoned")
                .entry(key)
                .or_insert_with(|| Arc::new(IdentityMap::<T>::new()) as Arc<dyn FlushableMap<S>>)
                .clone(),
        };
        map.into_any()
            .downcast::<IdentityMap<T>>()
            .expect("identity maps are keyed by their document TypeId")
    }

    /// Load document `id`.
    ///
    /// A tombstoned id is `None` without touching storage; a cached id
    /// returns the cached instance.
    pub async fn load<T: Document>(&self, id: &str) -> Option<DocumentRef<T>> {
        let map = self.map::<T>();
        match map.resolve(id) {
            (_, true) => return None,
            (Some(cached), false) => return Some(cached),
            (None, false) => {}
        }
        let document = self.data.load::<T>(id).await?;
        register_loaded(&map, document)
    }

    /// Load every id in `ids` that resolves. Tombstoned ids are left out.
    ///
    /// Results are keyed by each document's own id, the key the identity
    /// map tracks it under. A stored document whose content id differs
    /// from its location is returned under its content id.
    pub async fn load_many<T: Document>(&self, ids: &[String]) -> HashMap<String, DocumentRef<T>> {
        let map = self.map::<T>();
        let resolved = map.resolve_many(ids);
        let mut found = resolved.found;
        if !resolved.unknown.is_empty() {
            let loaded = self.data.load_many::<T>(&resolved.unknown).await;
            for document in loaded.into_values() {
                if let Some(cached) = register_loaded(&map, document) {
                    let id = cached.read().id().to_string();
                    found.insert(id, cached);
                }
            }
        }
        found
    }

    /// Stream every stored document, through the identity map.
    ///
    /// Repeated queries yield the same instances; tombstoned ids are
    /// filtered out.
    pub fn query<T: Document>(&self) -> BoxStream<'_, DocumentRef<T>> {
        let map = self.map::<T>();
        self.data
            .query::<T>()
            .filter_map(move |document| future::ready(register_loaded(&map, document)))
            .boxed()
    }

    /// Track a new document. Written on the next flush.
    pub fn add<T: Document>(&self, document: T) -> StoreResult<DocumentRef<T>> {
        self.map::<T>().register_new(document)
    }

    /// Tombstone a document. Removed from storage on the next flush.
    pub fn delete<T: Document>(&self, document: &DocumentRef<T>) -> StoreResult<()> {
        self.map::<T>().register_deleted(document)
    }

    /// Flush every pending change and clear the session's maps.
    ///
    /// Maps are flushed one type at a time; on error, maps already flushed
    /// stay flushed.
    pub async fn save_changes(&self) -> StoreResult<FlushReport> {
        let maps: Vec<Arc<dyn FlushableMap<S>>> = self
            .maps
            .read()
            .expect("lock poisoned")
            .values()
            .filter(|map| map.len() > 0)
            .cloned()
            .collect();

        let mut report = FlushReport::default();
        for map in maps {
            report.merge(map.pop_and_flush(&self.data).await?);
        }
        if !report.is_empty() {
            debug!(written = report.written, deleted = report.deleted, "session saved");
        }
        Ok(report)
    }

    /// Number of ids tracked across every document type.
    pub fn pending(&self) -> usize {
        self.maps
            .read()
            .expect("lock poisoned")
            .values()
            .map(|map| map.len())
            .sum()
    }
}

fn register_loaded<T: Document>(map: &IdentityMap<T>, document: T) -> Option<DocumentRef<T>> {
    match map.register_origin(document) {
        Ok((cached, false)) => Some(cached),
        Ok((_, true)) => None,
        Err(e) => {
            warn!(document_type = T::type_name(), error = %e, "ignoring stored document");
            None
        }
    }
}
