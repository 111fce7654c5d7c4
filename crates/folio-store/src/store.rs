//! The store: an immutable table of bound collections.

use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::info;

use folio_types::Document;
use folio_vfs::Directory;

use crate::binder::CollectionBinder;
use crate::collection::{BoundCollection, DocumentCollection};
use crate::data_session::StoreSession;
use crate::error::{BindError, StoreResult};
use crate::options::StoreOptions;
use crate::registry::ModelRegistry;
use crate::session::CacheableSession;

/// The session type handed out by [`Store::open_session`].
pub type Session = CacheableSession<StoreSession>;

/// A database opened from a root directory.
///
/// The collection table is built once by [`Store::open`] and never changes
/// afterwards. Directories that fail to bind are kept as diagnostics.
pub struct Store {
    root: Directory,
    options: StoreOptions,
    by_name: BTreeMap<String, Arc<dyn BoundCollection>>,
    by_type: HashMap<TypeId, Arc<dyn BoundCollection>>,
    diagnostics: Vec<BindError>,
}

impl Store {
    /// Scan `root` and bind every recognisable collection.
    ///
    /// Fails only if `root` itself cannot be listed. A missing root opens
    /// as an empty store.
    pub async fn open(
        root: Directory,
        registry: ModelRegistry,
        options: StoreOptions,
    ) -> StoreResult<Arc<Self>> {
        let report = CollectionBinder::new(&registry, &options).bind(&root).await?;

        let mut by_name = BTreeMap::new();
        let mut by_type = HashMap::new();
        for collection in report.collections {
            by_type.insert(collection.document_type(), collection.clone());
            by_name.insert(collection.name().to_string(), collection);
        }
        info!(
            root = %root.full_name(),
            collections = by_name.len(),
            failures = report.failures.len(),
            "store opened"
        );
        Ok(Arc::new(Self {
            root,
            options,
            by_name,
            by_type,
            diagnostics: report.failures,
        }))
    }

    /// Start a unit of work.
    pub fn open_session(self: &Arc<Self>) -> Session {
        CacheableSession::new(StoreSession::new(Arc::clone(self)))
    }

    pub fn root(&self) -> &Directory {
        &self.root
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Bound collections, ordered by name.
    pub fn collections(&self) -> impl Iterator<Item = &Arc<dyn BoundCollection>> {
        self.by_name.values()
    }

    /// Bound collection called `name`.
    pub fn collection_named(&self, name: &str) -> Option<&Arc<dyn BoundCollection>> {
        self.by_name.get(name)
    }

    /// Typed collection for `T`, if one is bound.
    pub fn collection<T: Document>(&self) -> Option<&DocumentCollection<T>> {
        self.by_type
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<DocumentCollection<T>>()
    }

    /// Directories that did not bind, with the reason.
    pub fn diagnostics(&self) -> &[BindError] {
        &self.diagnostics
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("root", &self.root)
            .field("collections", &self.by_name.keys().collect::<Vec<_>>())
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}
