//! Directory and file handles.
//!
//! A handle is a path plus the backend it lives on. Creating one never
//! touches storage; only the `async` methods do.

use std::fmt;
use std::sync::Arc;

use crate::error::VfsResult;
use crate::path::AbsolutePath;
use crate::traits::FileSystem;

/// Handle to a directory.
#[derive(Clone)]
pub struct Directory {
    fs: Arc<dyn FileSystem>,
    path: AbsolutePath,
}

impl Directory {
    pub fn new(fs: Arc<dyn FileSystem>, path: AbsolutePath) -> Self {
        Self { fs, path }
    }

    pub fn name(&self) -> &str {
        self.path.name()
    }

    pub fn full_name(&self) -> &str {
        self.path.full_name()
    }

    pub fn path(&self) -> &AbsolutePath {
        &self.path
    }

    pub async fn exists(&self) -> VfsResult<bool> {
        self.fs.directory_exists(&self.path).await
    }

    /// Handle to the child directory `name`.
    pub fn directory(&self, name: &str) -> VfsResult<Directory> {
        Ok(Directory::new(self.fs.clone(), self.path.child(name)?))
    }

    /// Handle to the child file `name`.
    pub fn file(&self, name: &str) -> VfsResult<File> {
        Ok(File::new(self.fs.clone(), self.path.child(name)?))
    }

    /// Direct subdirectories.
    pub async fn directories(&self) -> VfsResult<Vec<Directory>> {
        let paths = self.fs.list_directories(&self.path).await?;
        Ok(paths
            .into_iter()
            .map(|p| Directory::new(self.fs.clone(), p))
            .collect())
    }

    /// Direct files.
    pub async fn files(&self) -> VfsResult<Vec<File>> {
        let paths = self.fs.list_files(&self.path).await?;
        Ok(paths
            .into_iter()
            .map(|p| File::new(self.fs.clone(), p))
            .collect())
    }

    /// Remove this directory if it is empty.
    pub async fn delete_if_empty(&self) -> VfsResult<bool> {
        self.fs.delete_empty_directory(&self.path).await
    }
}

impl fmt::Debug for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Directory({})", self.path)
    }
}

/// Handle to a file.
#[derive(Clone)]
pub struct File {
    fs: Arc<dyn FileSystem>,
    path: AbsolutePath,
}

impl File {
    pub fn new(fs: Arc<dyn FileSystem>, path: AbsolutePath) -> Self {
        Self { fs, path }
    }

    pub fn name(&self) -> &str {
        self.path.name()
    }

    pub fn full_name(&self) -> &str {
        self.path.full_name()
    }

    pub fn path(&self) -> &AbsolutePath {
        &self.path
    }

    pub async fn exists(&self) -> VfsResult<bool> {
        self.fs.file_exists(&self.path).await
    }

    pub async fn read(&self) -> VfsResult<Vec<u8>> {
        self.fs.read_file(&self.path).await
    }

    /// Ask the backend for write access. `None` means access is denied.
    pub async fn request_write_access(&self) -> VfsResult<Option<WritableFile>> {
        if self.fs.request_write_access(&self.path).await? {
            Ok(Some(WritableFile { file: self.clone() }))
        } else {
            Ok(None)
        }
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "File({})", self.path)
    }
}

/// A file the backend has granted write access to.
#[derive(Debug, Clone)]
pub struct WritableFile {
    file: File,
}

impl WritableFile {
    pub fn file(&self) -> &File {
        &self.file
    }

    /// Replace the file content, creating the file if needed.
    pub async fn write(&self, data: &[u8]) -> VfsResult<()> {
        self.file.fs.write_file(&self.file.path, data).await
    }

    /// Delete the file. Returns `false` if it did not exist.
    pub async fn delete(&self) -> VfsResult<bool> {
        self.file.fs.delete_file(&self.file.path).await
    }
}
