//! Typed document collections bound to a directory.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use folio_codec::layout::{self, INDEX_FILE_NAME};
use folio_codec::DocumentSerializer;
use folio_types::Document;
use folio_vfs::{Directory, File, VfsResult};

use crate::error::{StoreError, StoreResult};
use crate::options::is_hidden;

/// Physical layout of a collection directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionStructure {
    /// `<dir>/<id>.json`
    File,
    /// `<dir>/<id>/index.json`
    Directory,
}

impl fmt::Display for CollectionStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionStructure::File => f.write_str("file"),
            CollectionStructure::Directory => f.write_str("directory"),
        }
    }
}

/// A document that could not be read during an audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditFailure {
    pub id: String,
    pub reason: String,
}

/// Result of reading every document of a collection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditReport {
    pub collection: String,
    pub readable: Vec<String>,
    pub unreadable: Vec<AuditFailure>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.unreadable.is_empty()
    }
}

/// Documents of type `T` stored under one directory in one layout.
pub struct DocumentCollection<T> {
    name: String,
    structure: CollectionStructure,
    directory: Directory,
    serializer: Arc<dyn DocumentSerializer<T>>,
    skip_hidden: bool,
}

impl<T: Document> DocumentCollection<T> {
    pub fn new(
        name: impl Into<String>,
        structure: CollectionStructure,
        directory: Directory,
        serializer: Arc<dyn DocumentSerializer<T>>,
    ) -> Self {
        Self {
            name: name.into(),
            structure,
            directory,
            serializer,
            skip_hidden: true,
        }
    }

    /// Whether listings ignore entries whose name starts with `.`.
    pub fn with_skip_hidden(mut self, skip_hidden: bool) -> Self {
        self.skip_hidden = skip_hidden;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn structure(&self) -> CollectionStructure {
        self.structure
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// The file document `id` lives in.
    fn location(&self, id: &str) -> VfsResult<File> {
        match self.structure {
            CollectionStructure::File => self.directory.file(&layout::document_file_name(id)),
            CollectionStructure::Directory => self.directory.directory(id)?.file(INDEX_FILE_NAME),
        }
    }

    /// Every document location, keyed by id, in listing order.
    async fn locations(&self) -> StoreResult<Vec<(String, File)>> {
        let mut out = Vec::new();
        match self.structure {
            CollectionStructure::File => {
                for file in self.directory.files().await? {
                    if is_hidden(self.skip_hidden, file.name()) {
                        continue;
                    }
                    if let Some(id) = layout::id_from_file_name(file.name()) {
                        out.push((id.to_string(), file.clone()));
                    }
                }
            }
            CollectionStructure::Directory => {
                for dir in self.directory.directories().await? {
                    if is_hidden(self.skip_hidden, dir.name()) {
                        continue;
                    }
                    out.push((dir.name().to_string(), dir.file(INDEX_FILE_NAME)?));
                }
            }
        }
        Ok(out)
    }

    async fn read(&self, file: &File) -> StoreResult<Option<T>> {
        let data = file.read().await?;
        Ok(self.serializer.deserialize(&data)?)
    }

    /// Read a location, turning every failure into absence.
    async fn read_logged(&self, id: &str, file: &File) -> Option<T> {
        match self.read(file).await {
            Ok(Some(document)) => Some(document),
            Ok(None) => {
                debug!(collection = %self.name, id = %id, "location holds no document");
                None
            }
            Err(e) => {
                warn!(collection = %self.name, id = %id, error = %e, "skipping unreadable document");
                None
            }
        }
    }

    /// Load document `id`, or `None` if it is not stored or cannot be read.
    pub async fn load(&self, id: &str) -> Option<T> {
        let file = match self.location(id) {
            Ok(file) => file,
            Err(e) => {
                debug!(collection = %self.name, id = %id, error = %e, "id is not addressable");
                return None;
            }
        };
        match file.exists().await {
            Ok(true) => self.read_logged(id, &file).await,
            Ok(false) => None,
            Err(e) => {
                warn!(collection = %self.name, id = %id, error = %e, "cannot check document");
                None
            }
        }
    }

    /// Stream every readable document. Unreadable locations are skipped.
    pub fn query(&self) -> BoxStream<'_, T> {
        stream::once(self.locations())
            .flat_map(move |listed| {
                let locations = listed.unwrap_or_else(|e| {
                    warn!(collection = %self.name, error = %e, "cannot list collection");
                    Vec::new()
                });
                stream::iter(locations)
            })
            .filter_map(move |(id, file)| async move { self.read_logged(&id, &file).await })
            .boxed()
    }

    /// Ids of every stored document.
    pub async fn ids(&self) -> StoreResult<Vec<String>> {
        Ok(self
            .locations()
            .await?
            .into_iter()
            .map(|(id, _)| id)
            .collect())
    }

    /// Write a document, replacing any stored version.
    pub async fn write(&self, document: &T) -> StoreResult<()> {
        if !document.has_identity() {
            return Err(StoreError::EmptyIdentity {
                type_name: T::type_name(),
            });
        }
        let file = self.location(document.id())?;
        let writable = file
            .request_write_access()
            .await?
            .ok_or_else(|| StoreError::WriteDenied(file.full_name().to_string()))?;
        let data = self.serializer.serialize(document)?;
        writable.write(&data).await?;
        debug!(collection = %self.name, id = %document.id(), bytes = data.len(), "document written");
        Ok(())
    }

    /// Delete document `id`. Returns `true` if something was removed.
    pub async fn delete(&self, id: &str) -> bool {
        match self.try_delete(id).await {
            Ok(removed) => {
                debug!(collection = %self.name, id = %id, removed, "document delete");
                removed
            }
            Err(e) => {
                warn!(collection = %self.name, id = %id, error = %e, "delete failed");
                false
            }
        }
    }

    async fn try_delete(&self, id: &str) -> StoreResult<bool> {
        let file = self.location(id)?;
        let Some(writable) = file.request_write_access().await? else {
            return Ok(false);
        };
        let removed = writable.delete().await?;
        if removed && self.structure == CollectionStructure::Directory {
            // Leftover attachments keep the directory alive.
            self.directory.directory(id)?.delete_if_empty().await?;
        }
        Ok(removed)
    }

    /// Read every location and report which ids decode.
    pub async fn audit(&self) -> StoreResult<AuditReport> {
        let mut report = AuditReport {
            collection: self.name.clone(),
            ..AuditReport::default()
        };
        for (id, file) in self.locations().await? {
            match self.read(&file).await {
                Ok(Some(_)) => report.readable.push(id),
                Ok(None) => report.unreadable.push(AuditFailure {
                    id,
                    reason: "no document".to_string(),
                }),
                Err(e) => report.unreadable.push(AuditFailure {
                    id,
                    reason: e.to_string(),
                }),
            }
        }
        Ok(report)
    }

    /// Raw stored bytes of document `id`.
    pub async fn read_raw(&self, id: &str) -> StoreResult<Option<Vec<u8>>> {
        let file = self.location(id)?;
        if !file.exists().await? {
            return Ok(None);
        }
        Ok(Some(file.read().await?))
    }
}

impl<T> fmt::Debug for DocumentCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentCollection")
            .field("name", &self.name)
            .field("structure", &self.structure)
            .field("directory", &self.directory)
            .finish()
    }
}

/// A bound collection with its document type erased.
///
/// The store keeps collections of every type in one table. Typed access
/// goes through [`BoundCollection::as_any`] and a downcast to
/// `DocumentCollection<T>`.
#[async_trait]
pub trait BoundCollection: Send + Sync {
    fn name(&self) -> &str;

    fn structure(&self) -> CollectionStructure;

    /// `Document::type_name` of the stored type.
    fn type_name(&self) -> &'static str;

    /// `TypeId` of the stored type.
    fn document_type(&self) -> TypeId;

    fn directory(&self) -> &Directory;

    async fn ids(&self) -> StoreResult<Vec<String>>;

    async fn audit(&self) -> StoreResult<AuditReport>;

    async fn read_raw(&self, id: &str) -> StoreResult<Option<Vec<u8>>>;

    fn as_any(&self) -> &dyn Any;
}

#[async_trait]
impl<T: Document> BoundCollection for DocumentCollection<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn structure(&self) -> CollectionStructure {
        self.structure
    }

    fn type_name(&self) -> &'static str {
        T::type_name()
    }

    fn document_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn directory(&self) -> &Directory {
        &self.directory
    }

    async fn ids(&self) -> StoreResult<Vec<String>> {
        DocumentCollection::ids(self).await
    }

    async fn audit(&self) -> StoreResult<AuditReport> {
        DocumentCollection::audit(self).await
    }

    async fn read_raw(&self, id: &str) -> StoreResult<Option<Vec<u8>>> {
        DocumentCollection::read_raw(self, id).await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
