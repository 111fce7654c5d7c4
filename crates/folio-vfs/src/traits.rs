use async_trait::async_trait;

use crate::error::VfsResult;
use crate::path::AbsolutePath;

/// Storage backend addressed by absolute paths.
///
/// Implementations must satisfy these invariants:
/// - Existence checks and listings never fail just because a path is
///   missing: they report `false` or an empty list.
/// - `read_file` on a missing file returns [`crate::VfsError::NotFound`].
/// - `write_file` creates missing parent directories and overwrites
///   existing content.
/// - Listings return direct children only.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Returns `true` if `path` is an existing directory.
    async fn directory_exists(&self, path: &AbsolutePath) -> VfsResult<bool>;

    /// Returns `true` if `path` is an existing file.
    async fn file_exists(&self, path: &AbsolutePath) -> VfsResult<bool>;

    /// Direct subdirectories of `path`.
    async fn list_directories(&self, path: &AbsolutePath) -> VfsResult<Vec<AbsolutePath>>;

    /// Direct files of `path`.
    async fn list_files(&self, path: &AbsolutePath) -> VfsResult<Vec<AbsolutePath>>;

    /// Returns `true` if `path` may be written (created, overwritten or
    /// deleted).
    async fn request_write_access(&self, path: &AbsolutePath) -> VfsResult<bool>;

    /// Read the full content of a file.
    async fn read_file(&self, path: &AbsolutePath) -> VfsResult<Vec<u8>>;

    /// Replace the content of a file, creating it if needed.
    async fn write_file(&self, path: &AbsolutePath, data: &[u8]) -> VfsResult<()>;

    /// Delete a file. Returns `false` if there was nothing to delete.
    async fn delete_file(&self, path: &AbsolutePath) -> VfsResult<bool>;

    /// Remove a directory if it is empty. Returns `true` if it was removed.
    async fn delete_empty_directory(&self, path: &AbsolutePath) -> VfsResult<bool>;
}
