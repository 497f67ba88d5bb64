// src/models/mod.rs

//! Domain models for the bookshelf application.

mod book;
mod config;

// Re-export all public types
pub use book::{AUTHOR_MAX_LEN, Book, BookPatch, ISBN_MAX_LEN, NewBook, TITLE_MAX_LEN};
pub use config::{API_URL_ENV, ApiConfig, Config, ServerConfig};
