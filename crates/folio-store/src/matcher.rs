//! Layout detection for collection directories.
//!
//! A matcher is fed every direct child of one candidate directory and
//! decides whether the directory as a whole conforms to its layout.

use std::sync::Arc;

use async_trait::async_trait;

use folio_codec::layout::{self, INDEX_FILE_NAME};
use folio_vfs::{Directory, File};

use crate::collection::CollectionStructure;

/// Decides whether a directory conforms to one [`CollectionStructure`].
///
/// Every child is visited exactly once. After the last visit,
/// [`finish`](Matcher::finish) yields the structure on a match, or the
/// reason there is none. A matcher that accepted nothing never matches.
#[async_trait]
pub trait Matcher: Send {
    /// The layout this matcher recognises.
    fn structure(&self) -> CollectionStructure;

    async fn visit_file(&mut self, file: &File);

    async fn visit_directory(&mut self, directory: &Directory);

    fn finish(&self) -> Result<CollectionStructure, String>;
}

/// Builds a fresh set of matchers for each candidate directory.
pub type MatcherFactory = Arc<dyn Fn() -> Vec<Box<dyn Matcher>> + Send + Sync>;

/// The stock matchers: one per [`CollectionStructure`].
pub fn default_matchers() -> MatcherFactory {
    Arc::new(|| {
        vec![
            Box::new(FileMatcher::default()) as Box<dyn Matcher>,
            Box::new(DirectoryMatcher::default()),
        ]
    })
}

/// Shared accept/reject bookkeeping. The first error wins.
#[derive(Debug, Default)]
struct Tally {
    accepted: usize,
    error: Option<String>,
}

impl Tally {
    fn accept(&mut self) {
        self.accepted += 1;
    }

    fn reject(&mut self, reason: String) {
        self.error.get_or_insert(reason);
    }

    fn finish(&self, structure: CollectionStructure, empty: &str) -> Result<CollectionStructure, String> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        if self.accepted == 0 {
            return Err(empty.to_string());
        }
        Ok(structure)
    }
}

/// Matches one-file-per-document collections: only document files, no
/// subdirectories.
#[derive(Debug, Default)]
pub struct FileMatcher {
    tally: Tally,
}

#[async_trait]
impl Matcher for FileMatcher {
    fn structure(&self) -> CollectionStructure {
        CollectionStructure::File
    }

    async fn visit_file(&mut self, file: &File) {
        match file.exists().await {
            Ok(true) => {}
            Ok(false) => return self.tally.reject(format!("file {} not found", file.name())),
            Err(e) => return self.tally.reject(format!("file {}: {e}", file.name())),
        }
        if layout::has_document_extension(file.name()) {
            self.tally.accept();
        } else {
            self.tally
                .reject(format!("unknown file format: {}", file.name()));
        }
    }

    async fn visit_directory(&mut self, directory: &Directory) {
        self.tally.reject(format!(
            "file collection can't contain directory {}",
            directory.name()
        ));
    }

    fn finish(&self) -> Result<CollectionStructure, String> {
        self.tally.finish(self.structure(), "no document files found")
    }
}

/// Matches one-directory-per-document collections: only subdirectories,
/// each holding an index file.
#[derive(Debug, Default)]
pub struct DirectoryMatcher {
    tally: Tally,
}

#[async_trait]
impl Matcher for DirectoryMatcher {
    fn structure(&self) -> CollectionStructure {
        CollectionStructure::Directory
    }

    async fn visit_file(&mut self, file: &File) {
        self.tally.reject(format!(
            "directory collection can't contain file {}",
            file.name()
        ));
    }

    async fn visit_directory(&mut self, directory: &Directory) {
        let index = match directory.file(INDEX_FILE_NAME) {
            Ok(index) => index,
            Err(e) => return self.tally.reject(e.to_string()),
        };
        match index.exists().await {
            Ok(true) => self.tally.accept(),
            Ok(false) => self.tally.reject(format!(
                "directory {} has no {INDEX_FILE_NAME}",
                directory.name()
            )),
            Err(e) => self.tally.reject(format!("directory {}: {e}", directory.name())),
        }
    }

    fn finish(&self) -> Result<CollectionStructure, String> {
        self.tally
            .finish(self.structure(), "no document directories found")
    }
}
