//! Scans a database root and binds each top-level directory to a
//! collection.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, warn};

use folio_vfs::Directory;

use crate::collection::{BoundCollection, CollectionStructure};
use crate::error::{BindError, StoreResult};
use crate::matcher::{default_matchers, MatcherFactory};
use crate::options::{is_hidden, StoreOptions};
use crate::registry::ModelRegistry;

/// Outcome of a scan: what was bound and what was not.
#[derive(Default)]
pub struct BindReport {
    pub collections: Vec<Arc<dyn BoundCollection>>,
    pub failures: Vec<BindError>,
}

/// Binds directories under a database root to registered document types.
///
/// Candidate directories are processed one at a time. Within a directory,
/// every matcher sees every child, and the matchers run concurrently on
/// each child. A directory binds only when exactly one matcher accepts it
/// and a type is registered under its name; anything else is a
/// [`BindError`] that is logged, collected and skipped.
pub struct CollectionBinder<'a> {
    registry: &'a ModelRegistry,
    matchers: MatcherFactory,
    skip_hidden: bool,
}

impl<'a> CollectionBinder<'a> {
    pub fn new(registry: &'a ModelRegistry, options: &StoreOptions) -> Self {
        Self {
            registry,
            matchers: default_matchers(),
            skip_hidden: options.skip_hidden,
        }
    }

    /// Replace the stock matchers.
    pub fn with_matchers(mut self, matchers: MatcherFactory) -> Self {
        self.matchers = matchers;
        self
    }

    /// Bind every directory under `root`. Fails only if `root` itself
    /// cannot be listed.
    pub async fn bind(&self, root: &Directory) -> StoreResult<BindReport> {
        let mut report = BindReport::default();
        for directory in root.directories().await? {
            if is_hidden(self.skip_hidden, directory.name()) {
                debug!(directory = %directory.full_name(), "skipping hidden directory");
                continue;
            }
            match self.bind_one(&directory).await {
                Ok(collection) => {
                    debug!(
                        collection = %collection.name(),
                        structure = %collection.structure(),
                        document_type = collection.type_name(),
                        "collection bound"
                    );
                    report.collections.push(collection);
                }
                Err(e) => {
                    warn!(directory = %directory.full_name(), error = %e, "directory not bound");
                    report.failures.push(e);
                }
            }
        }
        Ok(report)
    }

    async fn bind_one(&self, directory: &Directory) -> Result<Arc<dyn BoundCollection>, BindError> {
        let structure = self.detect(directory).await?;
        self.registry
            .bind(directory.name(), structure, directory.clone())
            .ok_or_else(|| BindError::UnknownModel {
                directory: directory.full_name().to_string(),
            })
    }

    /// Decide which layout `directory` conforms to.
    pub async fn detect(&self, directory: &Directory) -> Result<CollectionStructure, BindError> {
        let io = |e: folio_vfs::VfsError| BindError::Io {
            directory: directory.full_name().to_string(),
            message: e.to_string(),
        };
        let mut matchers = (self.matchers)();

        for child in directory.directories().await.map_err(io)? {
            if is_hidden(self.skip_hidden, child.name()) {
                continue;
            }
            join_all(matchers.iter_mut().map(|m| m.visit_directory(&child))).await;
        }
        for file in directory.files().await.map_err(io)? {
            if is_hidden(self.skip_hidden, file.name()) {
                continue;
            }
            join_all(matchers.iter_mut().map(|m| m.visit_file(&file))).await;
        }

        let mut matched = Vec::new();
        let mut reasons = Vec::new();
        for matcher in &matchers {
            match matcher.finish() {
                Ok(structure) => matched.push(structure),
                Err(reason) => reasons.push(format!("{}: {reason}", matcher.structure())),
            }
        }
        match matched.as_slice() {
            [structure] => Ok(*structure),
            [] => Err(BindError::NoMatches {
                directory: directory.full_name().to_string(),
                reasons,
            }),
            _ => Err(BindError::Ambiguous {
                directory: directory.full_name().to_string(),
                structures: matched,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{FileMatcher, Matcher};
    use crate::test_support::note_registry;
    use folio_vfs::MemoryFileSystem;

    fn binder(registry: &ModelRegistry) -> CollectionBinder<'_> {
        CollectionBinder::new(registry, &StoreOptions::default())
    }

    #[tokio::test]
    async fn binds_file_structure() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.insert("/db/notes/a.json", "{\"id\":\"a\",\"title\":\"A\"}").unwrap();
        fs.insert("/db/notes/b.json", "{\"id\":\"b\",\"title\":\"B\"}").unwrap();
        let registry = note_registry();

        let report = binder(&registry).bind(&fs.directory("/db").unwrap()).await.unwrap();
        assert!(report.failures.is_empty());
        assert_eq!(report.collections.len(), 1);
        assert_eq!(report.collections[0].structure(), CollectionStructure::File);
    }

    #[tokio::test]
    async fn binds_directory_structure() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.insert("/db/notes/a/index.json", "{}").unwrap();
        fs.insert("/db/notes/b/index.json", "{}").unwrap();
        let registry = note_registry();
        let structure = binder(&registry)
            .detect(&fs.directory("/db/notes").unwrap())
            .await
            .unwrap();
        assert_eq!(structure, CollectionStructure::Directory);
    }

    #[tokio::test]
    async fn mixed_layout_matches_nothing() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.insert("/db/notes/a.json", "{}").unwrap();
        fs.insert("/db/notes/b/index.json", "{}").unwrap();
        let registry = note_registry();

        let report = binder(&registry).bind(&fs.directory("/db").unwrap()).await.unwrap();
        assert!(report.collections.is_empty());
        match &report.failures[..] {
            [BindError::NoMatches { directory, reasons }] => {
                assert_eq!(directory, "/db/notes");
                assert_eq!(reasons.len(), 2);
            }
            other => panic!("unexpected failures: {other:?}"),
        }
    }

    #[tokio::test]
    async fn miscased_extension_is_not_a_document_file() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.insert("/db/notes/a.json", "{}").unwrap();
        fs.insert("/db/notes/B.JSON", "{}").unwrap();
        let registry = note_registry();

        let err = binder(&registry)
            .detect(&fs.directory("/db/notes").unwrap())
            .await
            .unwrap_err();
        match err {
            BindError::NoMatches { reasons, .. } => {
                assert!(reasons.iter().any(|r| r.contains("unknown file format: B.JSON")), "{reasons:?}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_model_is_reported() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.insert("/db/widgets/w.json", "{}").unwrap();
        fs.insert("/db/notes/n.json", "{}").unwrap();
        let registry = note_registry();

        let report = binder(&registry).bind(&fs.directory("/db").unwrap()).await.unwrap();
        assert_eq!(report.collections.len(), 1);
        assert_eq!(
            report.failures,
            vec![BindError::UnknownModel {
                directory: "/db/widgets".into()
            }]
        );
    }

    fn with_dot_entries() -> Arc<MemoryFileSystem> {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.insert("/db/.git/HEAD", "ref").unwrap();
        fs.insert("/db/notes/a.json", "{}").unwrap();
        fs.insert("/db/notes/.DS_Store", "").unwrap();
        fs
    }

    #[tokio::test]
    async fn dot_entries_are_invisible_by_default() {
        let fs = with_dot_entries();
        let registry = note_registry();

        // A stray `.DS_Store` next to document files does not break the
        // file layout, and `.git` is not a candidate collection.
        let report = binder(&registry).bind(&fs.directory("/db").unwrap()).await.unwrap();
        assert!(report.failures.is_empty());
        assert_eq!(report.collections.len(), 1);
        assert_eq!(report.collections[0].structure(), CollectionStructure::File);
    }

    #[tokio::test]
    async fn without_skip_hidden_any_foreign_file_rejects_the_layout() {
        let fs = with_dot_entries();
        let registry = note_registry();
        let strict = StoreOptions {
            skip_hidden: false,
            ..StoreOptions::default()
        };

        let binder = CollectionBinder::new(&registry, &strict);
        let err = binder
            .detect(&fs.directory("/db/notes").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, BindError::NoMatches { ref reasons, .. }
            if reasons.iter().any(|r| r.contains("unknown file format: .DS_Store"))));

        let report = binder.bind(&fs.directory("/db").unwrap()).await.unwrap();
        assert!(report.collections.is_empty());
        assert_eq!(report.failures.len(), 2);
    }

    #[tokio::test]
    async fn two_matches_are_ambiguous() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.insert("/db/notes/a.json", "{}").unwrap();
        let registry = note_registry();
        let twice: MatcherFactory = Arc::new(|| {
            vec![
                Box::new(FileMatcher::default()) as Box<dyn Matcher>,
                Box::new(FileMatcher::default()),
            ]
        });

        let err = binder(&registry)
            .with_matchers(twice)
            .detect(&fs.directory("/db/notes").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, BindError::Ambiguous { ref structures, .. } if structures.len() == 2));
    }

    #[tokio::test]
    async fn empty_root_binds_nothing() {
        let fs = Arc::new(MemoryFileSystem::new());
        let registry = note_registry();
        let report = binder(&registry).bind(&fs.directory("/db").unwrap()).await.unwrap();
        assert!(report.collections.is_empty());
        assert!(report.failures.is_empty());
    }
}
