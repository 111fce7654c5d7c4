//! End-to-end behaviour of a community database.

use std::sync::Arc;

use futures_util::StreamExt;

use folio_codec::{DocumentSerializer, JsonSerializer};
use folio_store::{BindError, CollectionStructure, DocumentRef, Store, StoreOptions};
use folio_types::Document;
use folio_vfs::{MemoryFileSystem, PhysicalFileSystem};

use crate::{registry, Community, Meetup, MeetupSession, Speaker, Talk, Venue};

fn json<T: serde::Serialize + serde::de::DeserializeOwned>(doc: &T) -> Vec<u8> {
    JsonSerializer::<T>::new().serialize(doc).unwrap()
}

fn talk(id: &str, title: &str) -> Talk {
    Talk {
        id: id.into(),
        speaker_ids: vec!["s-1".into()],
        title: Some(title.into()),
        ..Talk::default()
    }
}

fn venue(id: &str, name: &str) -> Venue {
    Venue {
        id: id.into(),
        name: Some(name.into()),
        capacity: Some(80),
        ..Venue::default()
    }
}

/// Talks stored one file each, venues one directory each.
fn seeded() -> Arc<MemoryFileSystem> {
    let fs = Arc::new(MemoryFileSystem::new());
    fs.insert("/db/talks/t-1.json", json(&talk("t-1", "Span<T> in depth"))).unwrap();
    fs.insert("/db/talks/t-2.json", json(&talk("t-2", "Async streams"))).unwrap();
    fs.insert("/db/venues/v-1/index.json", json(&venue("v-1", "Main hall"))).unwrap();
    fs.insert("/db/venues/v-2/index.json", json(&venue("v-2", "Loft"))).unwrap();
    fs
}

async fn open(fs: &Arc<MemoryFileSystem>) -> Arc<Store> {
    Store::open(
        fs.directory("/db").unwrap(),
        registry(&StoreOptions::default()).unwrap(),
        StoreOptions::default(),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn file_structure_collection_is_queryable() {
    let store = open(&seeded()).await;
    let talks = store.collection::<Talk>().unwrap();
    assert_eq!(talks.structure(), CollectionStructure::File);
    assert_eq!(talks.query().count().await, 2);
}

#[tokio::test]
async fn directory_structure_collection_is_queryable() {
    let store = open(&seeded()).await;
    let venues = store.collection::<Venue>().unwrap();
    assert_eq!(venues.structure(), CollectionStructure::Directory);
    let mut names: Vec<_> = venues
        .query()
        .filter_map(|v| async move { v.name })
        .collect()
        .await;
    names.sort();
    assert_eq!(names, vec!["Loft", "Main hall"]);
}

#[tokio::test]
async fn mixed_directory_is_excluded() {
    let fs = seeded();
    fs.insert("/db/speakers/s-1.json", "{}").unwrap();
    fs.insert("/db/speakers/s-2/index.json", "{}").unwrap();

    let store = open(&fs).await;
    assert!(store.collection::<Speaker>().is_none());
    assert_eq!(store.collections().count(), 2);
    assert!(matches!(
        store.diagnostics(),
        [BindError::NoMatches { directory, .. }] if directory == "/db/speakers"
    ));
}

#[tokio::test]
async fn added_document_is_loaded_by_next_session() {
    let store = open(&seeded()).await;

    let session = store.open_session();
    assert!(session.load::<Talk>("t-3").await.is_none());
    let added = talk("t-3", "Source generators");
    session.add(added.clone()).unwrap();
    assert_eq!(session.save_changes().await.unwrap().written, 1);

    let next = store.open_session();
    let loaded = next.load::<Talk>("t-3").await.unwrap();
    assert_eq!(*loaded.read(), added);
}

#[tokio::test]
async fn modified_document_is_written_once() {
    let fs = seeded();
    let store = open(&fs).await;

    let session = store.open_session();
    let venue = session.load::<Venue>("v-1").await.unwrap();
    venue.write().capacity = Some(120);
    assert_eq!(session.save_changes().await.unwrap().written, 1);
    assert!(session.save_changes().await.unwrap().is_empty());

    let stored = fs.get("/db/venues/v-1/index.json").unwrap();
    let stored: Venue = serde_json::from_slice(&stored).unwrap();
    assert_eq!(stored.capacity, Some(120));
}

#[tokio::test]
async fn deleted_document_is_removed() {
    let fs = seeded();
    let store = open(&fs).await;

    let session = store.open_session();
    let doomed = session.load::<Talk>("t-1").await.unwrap();
    session.delete(&doomed).unwrap();
    assert!(session.load::<Talk>("t-1").await.is_none());
    assert_eq!(session.save_changes().await.unwrap().deleted, 1);

    assert!(fs.get("/db/talks/t-1.json").is_none());
    assert!(!store.collection::<Talk>().unwrap().delete("t-1").await);
}

#[tokio::test]
async fn unloaded_fields_survive_an_edit() {
    let fs = seeded();
    let store = open(&fs).await;
    let session = store.open_session();
    let t = session.load::<Talk>("t-2").await.unwrap();
    t.write().video_url = Some("https://example.org/v".into());
    session.save_changes().await.unwrap();

    let next = store.open_session();
    let reloaded = next.load::<Talk>("t-2").await.unwrap();
    let reloaded = reloaded.read();
    assert_eq!(reloaded.title.as_deref(), Some("Async streams"));
    assert_eq!(reloaded.speaker_ids, vec!["s-1"]);
}

#[tokio::test]
async fn query_and_load_share_instances() {
    let store = open(&seeded()).await;
    let session = store.open_session();
    let loaded = session.load::<Talk>("t-1").await.unwrap();
    let queried: Vec<DocumentRef<Talk>> = session.query::<Talk>().collect().await;
    let same = queried.iter().find(|t| t.read().id() == "t-1").unwrap();
    assert!(DocumentRef::ptr_eq(same, &loaded));
}

#[tokio::test]
async fn community_database_on_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let root = PhysicalFileSystem::open(tmp.path()).unwrap();
    let registry = registry(&StoreOptions::default()).unwrap();

    let communities = registry
        .collection_for::<Community>(&root, CollectionStructure::Directory)
        .unwrap();
    communities
        .write(&Community {
            id: "SpbDotNet".into(),
            name: Some("SPb .NET".into()),
            ..Community::default()
        })
        .await
        .unwrap();
    let meetups = registry
        .collection_for::<Meetup>(&root, CollectionStructure::File)
        .unwrap();
    meetups
        .write(&Meetup {
            id: "SpbDotNet-1".into(),
            community_id: Some("SpbDotNet".into()),
            sessions: vec![MeetupSession {
                talk_id: Some("t-1".into()),
                ..MeetupSession::default()
            }],
            ..Meetup::default()
        })
        .await
        .unwrap();

    let store = Store::open(root, registry, StoreOptions::default())
        .await
        .unwrap();
    assert!(store.diagnostics().is_empty());

    let session = store.open_session();
    let meetup = session.load::<Meetup>("SpbDotNet-1").await.unwrap();
    let community_id = meetup.read().community_id.clone().unwrap();
    let community = session.load::<Community>(&community_id).await.unwrap();
    assert_eq!(community.read().display_name(), Some("SPb .NET"));

    meetup.write().sessions.push(MeetupSession {
        talk_id: Some("t-2".into()),
        ..MeetupSession::default()
    });
    let report = session.save_changes().await.unwrap();
    assert_eq!(report.written, 1);

    let text = std::fs::read_to_string(tmp.path().join("meetups/SpbDotNet-1.json")).unwrap();
    assert!(text.contains("\"t-2\""));
    assert!(tmp.path().join("communities/SpbDotNet/index.json").is_file());
}
