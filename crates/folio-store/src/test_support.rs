//! Document types and fixtures shared by this crate's tests.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};

use folio_codec::JsonSerializer;
use folio_types::{Document, Fingerprint, FingerprintHasher};
use folio_vfs::MemoryFileSystem;

use crate::collection::{CollectionStructure, DocumentCollection};
use crate::data_session::DataSession;
use crate::error::{StoreError, StoreResult};
use crate::options::{CollectionNaming, StoreOptions};
use crate::registry::ModelRegistry;
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Note {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }
}

impl Document for Note {
    fn type_name() -> &'static str {
        "Note"
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> Option<&str> {
        Some(&self.title)
    }

    fn fingerprint(&self) -> Fingerprint {
        FingerprintHasher::new("note-v1")
            .str(&self.id)
            .str(&self.title)
            .strs(&self.tags)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub done: bool,
}

impl Task {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            done: false,
        }
    }
}

impl Document for Task {
    fn type_name() -> &'static str {
        "Task"
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn fingerprint(&self) -> Fingerprint {
        FingerprintHasher::new("task-v1").str(&self.id).bool(self.done).finish()
    }
}

pub fn note_collection(
    fs: &Arc<MemoryFileSystem>,
    path: &str,
    structure: CollectionStructure,
) -> DocumentCollection<Note> {
    let directory = fs.directory(path).unwrap();
    DocumentCollection::new(
        directory.name().to_string(),
        structure,
        directory,
        Arc::new(JsonSerializer::<Note>::new()),
    )
}

/// Registry knowing only [`Note`].
pub fn note_registry() -> ModelRegistry {
    let mut registry = ModelRegistry::new(CollectionNaming::LowerPlural);
    registry
        .register::<Note>(Arc::new(JsonSerializer::<Note>::new()))
        .unwrap();
    registry
}

/// Store at `/db` whose `notes` collection holds `notes` as files.
pub async fn note_store(fs: &Arc<MemoryFileSystem>, notes: &[Note]) -> Arc<Store> {
    let root = fs.directory("/db").unwrap();
    let registry = note_registry();
    let collection = registry
        .collection_for::<Note>(&root, CollectionStructure::File)
        .unwrap();
    for note in notes {
        collection.write(note).await.unwrap();
    }
    Store::open(root, registry, StoreOptions::default())
        .await
        .unwrap()
}

fn as_note<T: 'static>(document: &T) -> Option<&Note> {
    (document as &dyn Any).downcast_ref::<Note>()
}

fn from_note<T: 'static>(note: Note) -> Option<T> {
    let boxed: Box<dyn Any> = Box::new(note);
    boxed.downcast::<T>().ok().map(|b| *b)
}

/// In-memory [`DataSession`] holding notes and recording every call.
#[derive(Default)]
pub struct RecordingSession {
    notes: RwLock<BTreeMap<String, Note>>,
    load_calls: AtomicUsize,
    bulk: Mutex<Vec<Vec<String>>>,
    writes: Mutex<Vec<Vec<String>>>,
    deletes: Mutex<Vec<Vec<String>>>,
    fail_writes: AtomicBool,
}

impl RecordingSession {
    pub fn with_notes(notes: &[Note]) -> Self {
        let session = Self::default();
        {
            let mut stored = session.notes.write().unwrap();
            for note in notes {
                stored.insert(note.id.clone(), note.clone());
            }
        }
        session
    }

    /// Store `note` under `key`, which need not be its id.
    pub fn store_at(&self, key: &str, note: Note) {
        self.notes.write().unwrap().insert(key.to_string(), note);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    pub fn bulk_requests(&self) -> Vec<Vec<String>> {
        self.bulk.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Vec<String>> {
        self.writes.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<Vec<String>> {
        self.deletes.lock().unwrap().clone()
    }

    pub fn stored(&self, id: &str) -> Option<Note> {
        self.notes.read().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl DataSession for RecordingSession {
    async fn load<T: Document>(&self, id: &str) -> Option<T> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        let note = self.notes.read().unwrap().get(id).cloned()?;
        from_note(note)
    }

    async fn load_many<T: Document>(&self, ids: &[String]) -> HashMap<String, T> {
        self.bulk.lock().unwrap().push(ids.to_vec());
        let notes = self.notes.read().unwrap();
        ids.iter()
            .filter_map(|id| {
                let note = notes.get(id)?.clone();
                from_note(note).map(|d| (id.clone(), d))
            })
            .collect()
    }

    fn query<T: Document>(&self) -> BoxStream<'_, T> {
        let notes: Vec<Note> = self.notes.read().unwrap().values().cloned().collect();
        stream::iter(notes.into_iter().filter_map(from_note)).boxed()
    }

    async fn write_batch<T: Document>(&self, documents: &[T]) -> StoreResult<usize> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::MissingCollection(T::type_name()));
        }
        let ids = documents.iter().map(|d| d.id().to_string()).collect();
        self.writes.lock().unwrap().push(ids);
        let mut notes = self.notes.write().unwrap();
        for document in documents {
            if let Some(note) = as_note(document) {
                notes.insert(note.id.clone(), note.clone());
            }
        }
        Ok(documents.len())
    }

    async fn delete_batch<T: Document>(&self, ids: &[String]) -> StoreResult<usize> {
        self.deletes.lock().unwrap().push(ids.to_vec());
        if TypeId::of::<T>() != TypeId::of::<Note>() {
            return Ok(0);
        }
        let mut notes = self.notes.write().unwrap();
        Ok(ids.iter().filter(|id| notes.remove(*id).is_some()).count())
    }
}
