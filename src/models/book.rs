//! Book record and its write payloads.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, Result};

/// Maximum title length in characters.
pub const TITLE_MAX_LEN: usize = 150;

/// Maximum author length in characters.
pub const AUTHOR_MAX_LEN: usize = 100;

/// Maximum ISBN length in characters (ISBN-13).
pub const ISBN_MAX_LEN: usize = 13;

/// A book as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    /// Server-assigned identifier
    pub id: u64,

    /// Book title
    pub title: String,

    /// Author name
    pub author: String,

    /// ISBN, `null` when unknown
    #[serde(default)]
    pub isbn: Option<String>,

    /// Year of publication, `null` when unknown
    #[serde(default)]
    pub publication_year: Option<i32>,
}

impl Book {
    /// Build a stored book from a create payload.
    pub fn from_new(id: u64, new: NewBook) -> Self {
        Self {
            id,
            title: new.title,
            author: new.author,
            isbn: new.isbn,
            publication_year: new.publication_year,
        }
    }
}

/// Payload of a create request.
///
/// Optional fields are always sent, as `null` when absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i32>,
}

impl NewBook {
    /// Check the field bounds the backend enforces.
    pub fn validate(&self) -> Result<()> {
        check_title(&self.title)?;
        check_author(&self.author)?;
        if let Some(isbn) = &self.isbn {
            check_isbn(isbn)?;
        }
        Ok(())
    }
}

/// Payload of an update request.
///
/// A missing key keeps the stored value. For the optional fields an explicit
/// `null` clears the value, hence the nested `Option`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub isbn: Option<Option<String>>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub publication_year: Option<Option<i32>>,
}

impl BookPatch {
    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.isbn.is_none()
            && self.publication_year.is_none()
    }

    /// Check the bounds of every field the patch sets.
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            check_title(title)?;
        }
        if let Some(author) = &self.author {
            check_author(author)?;
        }
        if let Some(Some(isbn)) = &self.isbn {
            check_isbn(isbn)?;
        }
        Ok(())
    }

    /// Apply the patch to a stored book.
    pub fn apply(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title = title.clone();
        }
        if let Some(author) = &self.author {
            book.author = author.clone();
        }
        if let Some(isbn) = &self.isbn {
            book.isbn = isbn.clone();
        }
        if let Some(year) = self.publication_year {
            book.publication_year = year;
        }
    }
}

/// Maps a present key (even `null`) to `Some`, so that `null` and a missing
/// key stay distinguishable.
fn present<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn check_title(title: &str) -> Result<()> {
    check_required("title", title, TITLE_MAX_LEN)
}

fn check_author(author: &str) -> Result<()> {
    check_required("author", author, AUTHOR_MAX_LEN)
}

fn check_required(field: &str, value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    if value.chars().count() > max {
        return Err(AppError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

fn check_isbn(isbn: &str) -> Result<()> {
    if isbn.chars().count() > ISBN_MAX_LEN {
        return Err(AppError::validation(format!(
            "isbn must be at most {ISBN_MAX_LEN} characters"
        )));
    }
    Ok(())
}
