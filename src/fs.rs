//! Filesystem collaborator
//!
//! Actions never touch the disk directly; they go through [`FileSystem`] so the write and
//! template-loading actions share one set of primitives.

use crate::error::{ActionError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Filesystem primitives consumed by actions
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Every regular file under `root`, depth-first. Directories are recursed into, never returned.
    async fn walk_files(&self, root: &Path) -> Result<Vec<PathBuf>>;

    async fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Create or overwrite `path`, creating parent directories as needed.
    async fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;

    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Remove a file or a whole directory tree.
    async fn remove_all(&self, path: &Path) -> Result<()>;
}

/// [`FileSystem`] backed by the local disk
#[derive(Debug, Clone, Default)]
pub struct LocalFs {
    follow_symlinks: bool,
}

impl LocalFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }
}

#[async_trait]
impl FileSystem for LocalFs {
    async fn walk_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let root = root.to_path_buf();
        let follow = self.follow_symlinks;
        tokio::task::spawn_blocking(move || walk_blocking(&root, follow))
            .await
            .map_err(|e| ActionError::Walk(e.to_string()))?
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(path).await?)
    }

    async fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(path, contents).await?;
        Ok(())
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Ok(());
        }
        Ok(tokio::fs::create_dir_all(path).await?)
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        Ok(tokio::fs::try_exists(path).await?)
    }

    async fn remove_all(&self, path: &Path) -> Result<()> {
        let metadata = match tokio::fs::symlink_metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        if metadata.is_dir() {
            tokio::fs::remove_dir_all(path).await?;
        } else {
            tokio::fs::remove_file(path).await?;
        }
        Ok(())
    }
}

/// Sorted by file name at each level so discovery order is stable across platforms.
fn walk_blocking(root: &Path, follow_symlinks: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(follow_symlinks)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| ActionError::Walk(format!("{}: {}", root.display(), e)))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
