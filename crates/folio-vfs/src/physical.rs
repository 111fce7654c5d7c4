//! Filesystem backend over the host filesystem.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::entry::Directory;
use crate::error::{VfsError, VfsResult};
use crate::path::AbsolutePath;
use crate::traits::FileSystem;

/// Host filesystem accessed through `tokio::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhysicalFileSystem;

impl PhysicalFileSystem {
    /// Open `root` as a directory handle. `root` must be absolute; it does
    /// not have to exist yet.
    pub fn open(root: impl AsRef<Path>) -> VfsResult<Directory> {
        let root = root.as_ref();
        if !root.is_absolute() {
            return Err(VfsError::NotAbsolute(root.display().to_string()));
        }
        let text = root
            .to_str()
            .ok_or_else(|| VfsError::InvalidPath(root.display().to_string()))?;
        let fs: Arc<dyn FileSystem> = Arc::new(PhysicalFileSystem);
        Ok(Directory::new(fs, AbsolutePath::parse(text)?))
    }

    fn host(path: &AbsolutePath) -> PathBuf {
        PathBuf::from(path.full_name())
    }

    async fn list(&self, path: &AbsolutePath, dirs: bool) -> VfsResult<Vec<AbsolutePath>> {
        let mut entries = match tokio::fs::read_dir(Self::host(path)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut out = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            let is_dir = if file_type.is_symlink() {
                tokio::fs::metadata(entry.path())
                    .await
                    .map(|m| m.is_dir())
                    .unwrap_or(false)
            } else {
                file_type.is_dir()
            };
            if is_dir != dirs {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                debug!(entry = %entry.path().display(), "skipping non-UTF-8 entry");
                continue;
            };
            match path.child(name) {
                Ok(child) => out.push(child),
                Err(e) => debug!(entry = %name, error = %e, "skipping unaddressable entry"),
            }
        }
        Ok(out)
    }
}

async fn metadata(path: &AbsolutePath) -> VfsResult<Option<std::fs::Metadata>> {
    match tokio::fs::metadata(PhysicalFileSystem::host(path)).await {
        Ok(m) => Ok(Some(m)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl FileSystem for PhysicalFileSystem {
    async fn directory_exists(&self, path: &AbsolutePath) -> VfsResult<bool> {
        Ok(metadata(path).await?.is_some_and(|m| m.is_dir()))
    }

    async fn file_exists(&self, path: &AbsolutePath) -> VfsResult<bool> {
        Ok(metadata(path).await?.is_some_and(|m| m.is_file()))
    }

    async fn list_directories(&self, path: &AbsolutePath) -> VfsResult<Vec<AbsolutePath>> {
        self.list(path, true).await
    }

    async fn list_files(&self, path: &AbsolutePath) -> VfsResult<Vec<AbsolutePath>> {
        self.list(path, false).await
    }

    async fn request_write_access(&self, path: &AbsolutePath) -> VfsResult<bool> {
        Ok(match metadata(path).await? {
            Some(m) => m.is_file() && !m.permissions().readonly(),
            None => true,
        })
    }

    async fn read_file(&self, path: &AbsolutePath) -> VfsResult<Vec<u8>> {
        match tokio::fs::read(Self::host(path)).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(VfsError::NotFound(path.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_file(&self, path: &AbsolutePath, data: &[u8]) -> VfsResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(Self::host(&parent)).await?;
        }
        tokio::fs::write(Self::host(path), data).await?;
        Ok(())
    }

    async fn delete_file(&self, path: &AbsolutePath) -> VfsResult<bool> {
        match tokio::fs::remove_file(Self::host(path)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_empty_directory(&self, path: &AbsolutePath) -> VfsResult<bool> {
        let mut entries = match tokio::fs::read_dir(Self::host(path)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        if entries.next_entry().await?.is_some() {
            return Ok(false);
        }
        tokio::fs::remove_dir(Self::host(path)).await?;
        Ok(true)
    }
}
