//! Storage backends for the book collection served by the backend.
//!
//! - `MemoryStorage`: process-lifetime collection
//! - `LocalStorage`: same collection, snapshotted to a JSON file after every
//!   write
//!
//! Both enforce the same rules through `Collection`: field bounds, ISBN
//! uniqueness, and ids that are never reused.

pub mod local;
pub mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{Book, BookPatch, NewBook};

// Re-export for convenience
pub use local::LocalStorage;
pub use memory::MemoryStorage;

/// Trait for book storage backends.
#[async_trait]
pub trait BookStorage: Send + Sync {
    /// All books, ordered by id.
    async fn list(&self) -> Result<Vec<Book>>;

    /// One book, or `NotFound`.
    async fn get(&self, id: u64) -> Result<Book>;

    /// Store a new book and assign its id.
    async fn insert(&self, new: NewBook) -> Result<Book>;

    /// Apply a patch to a stored book.
    async fn update(&self, id: u64, patch: &BookPatch) -> Result<Book>;

    /// Remove a book, or `NotFound`.
    async fn delete(&self, id: u64) -> Result<()>;
}

/// In-memory collection shared by the storage backends.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    books: BTreeMap<u64, Book>,
    next_id: u64,
}

impl Collection {
    /// Rebuild a collection from stored books.
    ///
    /// The id counter continues after the largest stored id.
    pub fn from_books(books: Vec<Book>) -> Self {
        let next_id = books.iter().map(|b| b.id).max().unwrap_or(0);
        Self {
            books: books.into_iter().map(|b| (b.id, b)).collect(),
            next_id,
        }
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn list(&self) -> Vec<Book> {
        self.books.values().cloned().collect()
    }

    pub fn get(&self, id: u64) -> Result<Book> {
        self.books.get(&id).cloned().ok_or(AppError::NotFound(id))
    }

    pub fn insert(&mut self, new: NewBook) -> Result<Book> {
        new.validate()?;
        if let Some(isbn) = &new.isbn {
            self.ensure_isbn_free(isbn, None)?;
        }

        self.next_id += 1;
        let book = Book::from_new(self.next_id, new);
        self.books.insert(book.id, book.clone());
        Ok(book)
    }

    pub fn update(&mut self, id: u64, patch: &BookPatch) -> Result<Book> {
        if !self.books.contains_key(&id) {
            return Err(AppError::NotFound(id));
        }
        patch.validate()?;
        if let Some(Some(isbn)) = &patch.isbn {
            self.ensure_isbn_free(isbn, Some(id))?;
        }

        let book = self.books.get_mut(&id).ok_or(AppError::NotFound(id))?;
        patch.apply(book);
        Ok(book.clone())
    }

    pub fn delete(&mut self, id: u64) -> Result<()> {
        self.books
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound(id))
    }

    fn ensure_isbn_free(&self, isbn: &str, except: Option<u64>) -> Result<()> {
        let taken = self
            .books
            .values()
            .any(|b| Some(b.id) != except && b.isbn.as_deref() == Some(isbn));
        if taken {
            return Err(AppError::conflict(format!("ISBN {isbn} already exists")));
        }
        Ok(())
    }
}
