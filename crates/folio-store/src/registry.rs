//! Document type registry: which type lives in which collection.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use folio_codec::DocumentSerializer;
use folio_types::Document;
use folio_vfs::Directory;

use crate::collection::{BoundCollection, CollectionStructure, DocumentCollection};
use crate::error::{StoreError, StoreResult};
use crate::options::{CollectionNaming, StoreOptions};

type BindFn =
    Box<dyn Fn(&str, CollectionStructure, Directory, bool) -> Arc<dyn BoundCollection> + Send + Sync>;

struct Model {
    type_name: &'static str,
    /// `Arc<dyn DocumentSerializer<T>>` for the registered `T`.
    serializer: Box<dyn Any + Send + Sync>,
    bind: BindFn,
}

/// Maps collection names to document types and their serializers.
///
/// Built once at startup and handed to [`crate::Store::open`].
pub struct ModelRegistry {
    naming: CollectionNaming,
    skip_hidden: bool,
    models: BTreeMap<String, Model>,
    names: HashMap<TypeId, String>,
}

impl ModelRegistry {
    pub fn new(naming: CollectionNaming) -> Self {
        Self {
            naming,
            skip_hidden: true,
            models: BTreeMap::new(),
            names: HashMap::new(),
        }
    }

    /// Registry following the naming and listing rules of `options`.
    pub fn with_options(options: &StoreOptions) -> Self {
        let mut registry = Self::new(options.naming);
        registry.skip_hidden = options.skip_hidden;
        registry
    }

    /// Register document type `T`. Its collection name is derived from
    /// `T::type_name()`.
    pub fn register<T: Document>(
        &mut self,
        serializer: Arc<dyn DocumentSerializer<T>>,
    ) -> StoreResult<&mut Self> {
        let name = self.naming.apply(T::type_name());
        if let Some(existing) = self.models.get(&name) {
            return Err(StoreError::DuplicateCollection {
                name,
                existing: existing.type_name,
            });
        }
        let bind_serializer = serializer.clone();
        let bind: BindFn = Box::new(move |name, structure, directory, skip_hidden| {
            let collection =
                DocumentCollection::new(name, structure, directory, bind_serializer.clone())
                    .with_skip_hidden(skip_hidden);
            Arc::new(collection) as Arc<dyn BoundCollection>
        });
        self.names.insert(TypeId::of::<T>(), name.clone());
        self.models.insert(
            name,
            Model {
                type_name: T::type_name(),
                serializer: Box::new(serializer),
                bind,
            },
        );
        Ok(self)
    }

    pub fn naming(&self) -> CollectionNaming {
        self.naming
    }

    /// Collection name of `T`, if registered.
    pub fn collection_name<T: Document>(&self) -> Option<&str> {
        self.names.get(&TypeId::of::<T>()).map(String::as_str)
    }

    /// Registered collection names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Bind `directory` as collection `name`, or `None` if no type is
    /// registered under that name.
    pub fn bind(
        &self,
        name: &str,
        structure: CollectionStructure,
        directory: Directory,
    ) -> Option<Arc<dyn BoundCollection>> {
        let model = self.models.get(name)?;
        Some((model.bind)(name, structure, directory, self.skip_hidden))
    }

    /// Typed collection for `T` under `root`, whether or not its directory
    /// exists yet. Used to seed an empty database.
    pub fn collection_for<T: Document>(
        &self,
        root: &Directory,
        structure: CollectionStructure,
    ) -> StoreResult<DocumentCollection<T>> {
        let name = self
            .collection_name::<T>()
            .ok_or(StoreError::MissingCollection(T::type_name()))?;
        let serializer = self
            .models
            .get(name)
            .and_then(|model| model.serializer.downcast_ref::<Arc<dyn DocumentSerializer<T>>>())
            .ok_or(StoreError::MissingCollection(T::type_name()))?;
        Ok(
            DocumentCollection::new(name, structure, root.directory(name)?, serializer.clone())
                .with_skip_hidden(self.skip_hidden),
        )
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("naming", &self.naming)
            .field("collections", &self.models.keys().collect::<Vec<_>>())
            .finish()
    }
}
