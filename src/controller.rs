// src/controller.rs

//! The single owner of the frontend's transient state.
//!
//! `BookController` holds the displayed list, the loading flag, the error
//! banner and the add-book form. Every operation awaits one request at a time;
//! failures are collapsed into the error banner and never propagate.
//!
//! Write policy: every confirmed write is followed by a full re-read. A
//! confirmed delete is also applied to the local list first, so a failed
//! re-read still shows the delete.

use crate::error::AppError;
use crate::form::BookForm;
use crate::models::{Book, BookPatch};
use crate::services::BookApi;

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Accepts every prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Controller over a `BookApi`.
pub struct BookController<A> {
    api: A,
    books: Vec<Book>,
    loading: bool,
    error: Option<String>,
    form: BookForm,
}

impl<A: BookApi> BookController<A> {
    /// Create a controller with an empty list.
    ///
    /// Starts in the loading state, since nothing has been fetched yet.
    pub fn new(api: A) -> Self {
        Self {
            api,
            books: Vec::new(),
            loading: true,
            error: None,
            form: BookForm::default(),
        }
    }

    /// Books from the last successful read.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// True while a list read is in flight or before the first one.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Current error banner, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Dismiss the error banner.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Current form contents.
    pub fn form(&self) -> &BookForm {
        &self.form
    }

    pub fn set_title(&mut self, value: impl Into<String>) {
        self.form.title = value.into();
    }

    pub fn set_author(&mut self, value: impl Into<String>) {
        self.form.author = value.into();
    }

    pub fn set_isbn(&mut self, value: impl Into<String>) {
        self.form.isbn = value.into();
    }

    pub fn set_publication_year(&mut self, value: impl Into<String>) {
        self.form.publication_year = value.into();
    }

    /// Re-read the whole collection.
    ///
    /// On failure the previous list is kept. Returns whether the read
    /// succeeded.
    pub async fn refresh(&mut self) -> bool {
        self.loading = true;
        self.error = None;

        let result = self.api.list_books().await;
        self.loading = false;

        match result {
            Ok(books) => {
                log::debug!("Loaded {} books", books.len());
                self.books = books;
                true
            }
            Err(e) => {
                self.fail("loading books", e);
                false
            }
        }
    }

    /// Submit the form as a new book.
    ///
    /// Invalid input issues no request. The form is cleared only after the
    /// server confirms the create; on failure it is kept for correction.
    pub async fn submit(&mut self) -> bool {
        let new = match self.form.validate() {
            Ok(new) => new,
            Err(e) => {
                self.error = Some(e.to_string());
                return false;
            }
        };

        match self.api.create_book(&new).await {
            Ok(created) => {
                match created {
                    Some(book) => log::info!("Added book {} ({})", book.id, book.title),
                    None => log::info!("Added book ({})", new.title),
                }
                self.form.clear();
                self.refresh().await;
                true
            }
            Err(e) => {
                self.fail("adding book", e);
                false
            }
        }
    }

    /// Delete a book after confirmation.
    ///
    /// Declining issues no request. Returns whether the book was deleted.
    pub async fn delete(&mut self, id: u64, confirm: &mut impl Confirm) -> bool {
        if !confirm.confirm(&format!("Really delete the book with ID {id}?")) {
            log::debug!("Delete of book {} cancelled", id);
            return false;
        }

        match self.api.delete_book(id).await {
            Ok(()) => {
                log::info!("Deleted book {}", id);
                self.books.retain(|book| book.id != id);
                self.refresh().await;
                true
            }
            Err(e) => {
                self.fail("deleting book", e);
                false
            }
        }
    }

    /// Fetch one book.
    pub async fn show(&mut self, id: u64) -> Option<Book> {
        match self.api.get_book(id).await {
            Ok(book) => Some(book),
            Err(e) => {
                self.fail("loading book", e);
                None
            }
        }
    }

    /// Patch a book and re-read the collection.
    pub async fn update(&mut self, id: u64, patch: &BookPatch) -> Option<Book> {
        if patch.is_empty() {
            self.error = Some("Nothing to update.".to_string());
            return None;
        }
        if let Err(e) = patch.validate() {
            self.error = Some(e.to_string());
            return None;
        }

        match self.api.update_book(id, patch).await {
            Ok(book) => {
                log::info!("Updated book {}", id);
                self.refresh().await;
                Some(book)
            }
            Err(e) => {
                self.fail("updating book", e);
                None
            }
        }
    }

    fn fail(&mut self, action: &str, error: AppError) {
        log::error!("Error while {}: {}", action, error);
        self.error = Some(error.to_string());
    }
}
