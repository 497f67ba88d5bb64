//! Service layer for the bookshelf client.
//!
//! This module contains the REST seam used by the controller:
//! - The `BookApi` trait describing the book collection operations
//! - `HttpBookApi`, its implementation over HTTP

mod http;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Book, BookPatch, NewBook};

pub use http::HttpBookApi;

/// Operations on the remote book collection.
#[async_trait]
pub trait BookApi: Send + Sync {
    /// Read the whole collection.
    async fn list_books(&self) -> Result<Vec<Book>>;

    /// Read one book.
    async fn get_book(&self, id: u64) -> Result<Book>;

    /// Create a book. Any success status counts; the stored record is
    /// returned when the response body carries one.
    async fn create_book(&self, book: &NewBook) -> Result<Option<Book>>;

    /// Patch a book, returning the stored record.
    async fn update_book(&self, id: u64, patch: &BookPatch) -> Result<Book>;

    /// Delete a book. Any success status counts.
    async fn delete_book(&self, id: u64) -> Result<()>;
}
