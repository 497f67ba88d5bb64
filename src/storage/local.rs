//! Local filesystem storage backend.
//!
//! Keeps the collection in memory and rewrites a JSON snapshot after every
//! successful write. A write only takes effect in memory once its snapshot
//! is on disk. The snapshot is a plain array of books, the same shape
//! `GET /api/books` returns.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::error::{AppError, Result};
use crate::models::{Book, BookPatch, NewBook};
use crate::storage::{BookStorage, Collection};

/// File-backed book storage.
#[derive(Debug)]
pub struct LocalStorage {
    path: PathBuf,
    collection: RwLock<Collection>,
}

impl LocalStorage {
    /// Open the snapshot at `path`, starting empty if it does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let books: Vec<Book> = read_json(&path).await?.unwrap_or_default();
        log::info!("Loaded {} books from {}", books.len(), path.display());

        Ok(Self {
            path,
            collection: RwLock::new(Collection::from_books(books)),
        })
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, collection: &Collection) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&collection.list())?;
        write_bytes(&self.path, &bytes).await?;
        log::debug!(
            "Wrote {} books to {}",
            collection.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Write bytes atomically (write to temp, then rename).
async fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = path.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

/// Read JSON data, returning None if the file doesn't exist.
async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AppError::Io(e)),
    }
}

#[async_trait]
impl BookStorage for LocalStorage {
    async fn list(&self) -> Result<Vec<Book>> {
        Ok(self.collection.read().await.list())
    }

    async fn get(&self, id: u64) -> Result<Book> {
        self.collection.read().await.get(id)
    }

    async fn insert(&self, new: NewBook) -> Result<Book> {
        let mut collection = self.collection.write().await;
        let mut next = collection.clone();
        let book = next.insert(new)?;
        self.persist(&next).await?;
        *collection = next;
        Ok(book)
    }

    async fn update(&self, id: u64, patch: &BookPatch) -> Result<Book> {
        let mut collection = self.collection.write().await;
        let mut next = collection.clone();
        let book = next.update(id, patch)?;
        self.persist(&next).await?;
        *collection = next;
        Ok(book)
    }

    async fn delete(&self, id: u64) -> Result<()> {
        let mut collection = self.collection.write().await;
        let mut next = collection.clone();
        next.delete(id)?;
        self.persist(&next).await?;
        *collection = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn new_book(title: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: "Author".to_string(),
            isbn: None,
            publication_year: None,
        }
    }

    #[tokio::test]
    async fn test_open_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::open(tmp.path().join("books.json")).await.unwrap();
        assert!(storage.list().await.unwrap().is_empty());
        assert!(!storage.path().exists());
    }

    #[tokio::test]
    async fn test_reopen_restores_books_and_ids() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data/books.json");

        let storage = LocalStorage::open(&path).await.unwrap();
        storage.insert(new_book("A")).await.unwrap();
        let b = storage.insert(new_book("B")).await.unwrap();
        storage.delete(1).await.unwrap();
        drop(storage);

        let reopened = LocalStorage::open(&path).await.unwrap();
        assert_eq!(reopened.list().await.unwrap(), vec![b.clone()]);
        let c = reopened.insert(new_book("C")).await.unwrap();
        assert_eq!(c.id, b.id + 1);
    }

    #[tokio::test]
    async fn test_rejected_write_leaves_snapshot_untouched() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("books.json");
        let storage = LocalStorage::open(&path).await.unwrap();
        storage.insert(new_book("A")).await.unwrap();
        let before = std::fs::read(&path).unwrap();

        assert!(storage.delete(99).await.is_err());
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_unwritable_snapshot_rolls_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("books.json");
        let storage = LocalStorage::open(&path).await.unwrap();
        let kept = storage.insert(new_book("A")).await.unwrap();

        // a directory in place of the snapshot makes the rename fail
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(storage.insert(new_book("B")).await.is_err());
        assert!(storage.delete(kept.id).await.is_err());
        assert_eq!(storage.list().await.unwrap(), vec![kept.clone()]);

        // the failed insert did not consume an id
        std::fs::remove_dir(&path).unwrap();
        let next = storage.insert(new_book("C")).await.unwrap();
        assert_eq!(next.id, kept.id + 1);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("books.json");
        std::fs::write(&path, b"{not json").unwrap();
        assert!(matches!(
            LocalStorage::open(&path).await,
            Err(AppError::Json(_))
        ));
    }
}
