//! Cache-free access from a session to the store's collections.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;
use futures_util::stream::{self, BoxStream, StreamExt};

use folio_types::Document;

use crate::error::{StoreError, StoreResult};
use crate::store::Store;

/// Storage operations a [`crate::CacheableSession`] delegates to.
///
/// Reads never fail: a document that is missing, unreadable or of a type
/// with no bound collection is simply absent. Writes and deletes fail with
/// [`StoreError::MissingCollection`] when no collection is bound for `T`.
#[async_trait]
pub trait DataSession: Send + Sync {
    async fn load<T: Document>(&self, id: &str) -> Option<T>;

    /// Every id in `ids` that resolves to a document.
    async fn load_many<T: Document>(&self, ids: &[String]) -> HashMap<String, T>;

    fn query<T: Document>(&self) -> BoxStream<'_, T>;

    /// Write every document. Returns the number written.
    async fn write_batch<T: Document>(&self, documents: &[T]) -> StoreResult<usize>;

    /// Delete every id. Returns the number of documents actually removed.
    async fn delete_batch<T: Document>(&self, ids: &[String]) -> StoreResult<usize>;
}

/// [`DataSession`] over the collections of a [`Store`].
#[derive(Clone)]
pub struct StoreSession {
    store: Arc<Store>,
}

impl StoreSession {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }
}

#[async_trait]
impl DataSession for StoreSession {
    async fn load<T: Document>(&self, id: &str) -> Option<T> {
        self.store.collection::<T>()?.load(id).await
    }

    async fn load_many<T: Document>(&self, ids: &[String]) -> HashMap<String, T> {
        let Some(collection) = self.store.collection::<T>() else {
            return HashMap::new();
        };
        let loaded = join_all(ids.iter().map(|id| collection.load(id))).await;
        ids.iter()
            .zip(loaded)
            .filter_map(|(id, document)| document.map(|d| (id.clone(), d)))
            .collect()
    }

    fn query<T: Document>(&self) -> BoxStream<'_, T> {
        match self.store.collection::<T>() {
            Some(collection) => collection.query(),
            None => stream::empty().boxed(),
        }
    }

    async fn write_batch<T: Document>(&self, documents: &[T]) -> StoreResult<usize> {
        let collection = self
            .store
            .collection::<T>()
            .ok_or(StoreError::MissingCollection(T::type_name()))?;
        for document in documents {
            collection.write(document).await?;
        }
        Ok(documents.len())
    }

    async fn delete_batch<T: Document>(&self, ids: &[String]) -> StoreResult<usize> {
        let collection = self
            .store
            .collection::<T>()
            .ok_or(StoreError::MissingCollection(T::type_name()))?;
        let mut removed = 0;
        for id in ids {
            if collection.delete(id).await {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{note_store, Note, Task};
    use folio_vfs::MemoryFileSystem;

    #[tokio::test]
    async fn reads_from_bound_collection() {
        let fs = Arc::new(MemoryFileSystem::new());
        let data = StoreSession::new(note_store(&fs, &[Note::new("a", "A"), Note::new("b", "B")]).await);

        assert_eq!(data.load::<Note>("a").await.unwrap().title, "A");
        assert!(data.load::<Note>("zzz").await.is_none());

        let ids = vec!["a".to_string(), "zzz".to_string(), "b".to_string()];
        let many = data.load_many::<Note>(&ids).await;
        assert_eq!(many.len(), 2);
        assert_eq!(many["b"].title, "B");

        assert_eq!(data.query::<Note>().count().await, 2);
    }

    #[tokio::test]
    async fn unbound_type_reads_empty_and_rejects_writes() {
        let fs = Arc::new(MemoryFileSystem::new());
        let data = StoreSession::new(note_store(&fs, &[Note::new("a", "A")]).await);

        assert!(data.load::<Task>("a").await.is_none());
        assert!(data.load_many::<Task>(&["a".to_string()]).await.is_empty());
        assert_eq!(data.query::<Task>().count().await, 0);

        let err = data.write_batch(&[Task::new("t")]).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingCollection("Task")));
        let err = data.delete_batch::<Task>(&["t".to_string()]).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingCollection("Task")));
    }

    #[tokio::test]
    async fn batches_write_and_delete() {
        let fs = Arc::new(MemoryFileSystem::new());
        let data = StoreSession::new(note_store(&fs, &[Note::new("a", "A")]).await);

        let written = data
            .write_batch(&[Note::new("b", "B"), Note::new("c", "C")])
            .await
            .unwrap();
        assert_eq!(written, 2);
        assert!(fs.get("/db/notes/c.json").is_some());

        let ids = vec!["a".to_string(), "missing".to_string()];
        assert_eq!(data.delete_batch::<Note>(&ids).await.unwrap(), 1);
        assert!(fs.get("/db/notes/a.json").is_none());
    }
}
