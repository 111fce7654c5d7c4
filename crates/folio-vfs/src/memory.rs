//! In-memory filesystem backend.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::entry::Directory;
use crate::error::{VfsError, VfsResult};
use crate::path::AbsolutePath;
use crate::traits::FileSystem;

/// A filesystem held in a table of file path → content.
///
/// Directories are implicit: a directory exists while at least one file
/// lives somewhere below it. Listings come back in path order.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: RwLock<BTreeMap<AbsolutePath, Vec<u8>>>,
    read_only: AtomicBool,
}

impl MemoryFileSystem {
    /// Create an empty, writable filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deny (or grant again) write access to every path.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Directory handle on this filesystem.
    pub fn directory(self: &Arc<Self>, path: &str) -> VfsResult<Directory> {
        let fs: Arc<dyn FileSystem> = self.clone();
        Ok(Directory::new(fs, AbsolutePath::parse(path)?))
    }

    /// Store a file directly, bypassing write access checks.
    pub fn insert(&self, path: &str, data: impl Into<Vec<u8>>) -> VfsResult<()> {
        let path = AbsolutePath::parse(path)?;
        self.files
            .write()
            .expect("lock poisoned")
            .insert(path, data.into());
        Ok(())
    }

    /// Content of a file, if present.
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        let path = AbsolutePath::parse(path).ok()?;
        self.files.read().expect("lock poisoned").get(&path).cloned()
    }

    /// Number of files stored.
    pub fn file_count(&self) -> usize {
        self.files.read().expect("lock poisoned").len()
    }

    /// Split the files below `dir` into direct file children and direct
    /// directory children.
    fn children(&self, dir: &AbsolutePath) -> (Vec<AbsolutePath>, Vec<AbsolutePath>) {
        let files = self.files.read().expect("lock poisoned");
        let mut direct_files = Vec::new();
        let mut direct_dirs = BTreeSet::new();
        for path in files.keys().filter(|p| dir.is_ancestor_of(p)) {
            if path.depth() == dir.depth() + 1 {
                direct_files.push(path.clone());
            } else if let Some(sub) = path.take(dir.depth() + 1) {
                direct_dirs.insert(sub);
            }
        }
        (direct_files, direct_dirs.into_iter().collect())
    }
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn directory_exists(&self, path: &AbsolutePath) -> VfsResult<bool> {
        let files = self.files.read().expect("lock poisoned");
        Ok(files.keys().any(|p| path.is_ancestor_of(p)))
    }

    async fn file_exists(&self, path: &AbsolutePath) -> VfsResult<bool> {
        Ok(self.files.read().expect("lock poisoned").contains_key(path))
    }

    async fn list_directories(&self, path: &AbsolutePath) -> VfsResult<Vec<AbsolutePath>> {
        Ok(self.children(path).1)
    }

    async fn list_files(&self, path: &AbsolutePath) -> VfsResult<Vec<AbsolutePath>> {
        Ok(self.children(path).0)
    }

    async fn request_write_access(&self, _path: &AbsolutePath) -> VfsResult<bool> {
        Ok(!self.read_only.load(Ordering::SeqCst))
    }

    async fn read_file(&self, path: &AbsolutePath) -> VfsResult<Vec<u8>> {
        self.files
            .read()
            .expect("lock poisoned")
            .get(path)
            .cloned()
            .ok_or_else(|| VfsError::NotFound(path.to_string()))
    }

    async fn write_file(&self, path: &AbsolutePath, data: &[u8]) -> VfsResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(VfsError::WriteDenied(path.to_string()));
        }
        self.files
            .write()
            .expect("lock poisoned")
            .insert(path.clone(), data.to_vec());
        Ok(())
    }

    async fn delete_file(&self, path: &AbsolutePath) -> VfsResult<bool> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(VfsError::WriteDenied(path.to_string()));
        }
        Ok(self
            .files
            .write()
            .expect("lock poisoned")
            .remove(path)
            .is_some())
    }

    async fn delete_empty_directory(&self, _path: &AbsolutePath) -> VfsResult<bool> {
        // Empty directories never exist here.
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Arc<MemoryFileSystem> {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.insert("/db/talks/a.json", "{}").unwrap();
        fs.insert("/db/talks/b.json", "{}").unwrap();
        fs.insert("/db/venues/v-1/index.json", "{}").unwrap();
        fs.insert("/db/venues/v-1/photo.png", "png").unwrap();
        fs
    }

    #[tokio::test]
    async fn directories_are_implicit() {
        let fs = seeded();
        let db = fs.directory("/db").unwrap();
        assert!(db.exists().await.unwrap());
        assert!(db.directory("venues").unwrap().exists().await.unwrap());
        assert!(!db.directory("speakers").unwrap().exists().await.unwrap());
        assert!(!db.file("talks").unwrap().exists().await.unwrap());
    }

    #[tokio::test]
    async fn listings_return_direct_children() {
        let fs = seeded();
        let db = fs.directory("/db").unwrap();

        let dirs: Vec<_> = db.directories().await.unwrap();
        let names: Vec<_> = dirs.iter().map(|d| d.name().to_string()).collect();
        assert_eq!(names, vec!["talks", "venues"]);
        assert!(db.files().await.unwrap().is_empty());

        let venues = db.directory("venues").unwrap();
        let v1: Vec<_> = venues.directories().await.unwrap();
        assert_eq!(v1.len(), 1);
        assert_eq!(v1[0].files().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn missing_directory_lists_empty() {
        let fs = seeded();
        let nowhere = fs.directory("/elsewhere").unwrap();
        assert!(nowhere.files().await.unwrap().is_empty());
        assert!(nowhere.directories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn read_missing_file_is_not_found() {
        let fs = seeded();
        let file = fs.directory("/db").unwrap().file("nope.json").unwrap();
        assert!(matches!(file.read().await, Err(VfsError::NotFound(_))));
    }

    #[tokio::test]
    async fn write_creates_and_overwrites() {
        let fs = Arc::new(MemoryFileSystem::new());
        let file = fs.directory("/db/new").unwrap().file("x.json").unwrap();
        let writable = file.request_write_access().await.unwrap().unwrap();
        writable.write(b"one").await.unwrap();
        writable.write(b"two").await.unwrap();
        assert_eq!(file.read().await.unwrap(), b"two");
        assert!(fs.directory("/db").unwrap().exists().await.unwrap());
    }

    #[tokio::test]
    async fn delete_reports_presence() {
        let fs = seeded();
        let file = fs.directory("/db/talks").unwrap().file("a.json").unwrap();
        let writable = file.request_write_access().await.unwrap().unwrap();
        assert!(writable.delete().await.unwrap());
        assert!(!writable.delete().await.unwrap());
        assert_eq!(fs.file_count(), 3);
    }

    #[tokio::test]
    async fn read_only_denies_write_access() {
        let fs = seeded();
        fs.set_read_only(true);
        let file = fs.directory("/db/talks").unwrap().file("a.json").unwrap();
        assert!(file.request_write_access().await.unwrap().is_none());
        assert!(file.read().await.is_ok());
    }
}
