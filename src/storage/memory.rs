//! In-memory storage backend.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::{Book, BookPatch, NewBook};
use crate::storage::{BookStorage, Collection};

/// Book storage that lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    collection: RwLock<Collection>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStorage for MemoryStorage {
    async fn list(&self) -> Result<Vec<Book>> {
        Ok(self.collection.read().await.list())
    }

    async fn get(&self, id: u64) -> Result<Book> {
        self.collection.read().await.get(id)
    }

    async fn insert(&self, new: NewBook) -> Result<Book> {
        self.collection.write().await.insert(new)
    }

    async fn update(&self, id: u64, patch: &BookPatch) -> Result<Book> {
        self.collection.write().await.update(id, patch)
    }

    async fn delete(&self, id: u64) -> Result<()> {
        self.collection.write().await.delete(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[tokio::test]
    async fn test_insert_list_delete() {
        let storage = MemoryStorage::new();
        let book = storage
            .insert(NewBook {
                title: "Dune".to_string(),
                author: "Frank Herbert".to_string(),
                isbn: None,
                publication_year: Some(1965),
            })
            .await
            .unwrap();

        assert_eq!(storage.list().await.unwrap(), vec![book.clone()]);
        storage.delete(book.id).await.unwrap();
        assert!(storage.list().await.unwrap().is_empty());
        assert!(matches!(
            storage.get(book.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
