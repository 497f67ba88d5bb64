// src/form.rs

//! The add-book form.
//!
//! Holds raw input exactly as typed and turns it into a `NewBook` payload.

use crate::error::{AppError, Result};
use crate::models::{ISBN_MAX_LEN, NewBook};

/// Message shown when a required field is missing.
pub const MISSING_REQUIRED: &str = "Please fill in at least the title and the author.";

/// Raw form input for a new book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_year: String,
}

impl BookForm {
    /// Validate the input and build the create payload.
    ///
    /// Title and author are required after trimming. An empty ISBN is sent as
    /// absent. The year is read like a leading-integer parse; anything that
    /// yields no number (or zero) is sent as absent.
    pub fn validate(&self) -> Result<NewBook> {
        let title = self.title.trim();
        let author = self.author.trim();
        if title.is_empty() || author.is_empty() {
            return Err(AppError::validation(MISSING_REQUIRED));
        }

        let isbn = Some(self.isbn.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        if let Some(isbn) = &isbn {
            if isbn.chars().count() > ISBN_MAX_LEN {
                return Err(AppError::validation(format!(
                    "ISBN must be at most {ISBN_MAX_LEN} characters."
                )));
            }
        }

        let new = NewBook {
            title: title.to_string(),
            author: author.to_string(),
            isbn,
            publication_year: parse_year(&self.publication_year),
        };
        new.validate()?;
        Ok(new)
    }

    /// Reset every field.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when nothing has been typed.
    pub fn is_blank(&self) -> bool {
        self.title.is_empty()
            && self.author.is_empty()
            && self.isbn.is_empty()
            && self.publication_year.is_empty()
    }
}

/// Parse an optional sign followed by leading digits, ignoring the rest.
fn parse_year(input: &str) -> Option<i32> {
    let s = input.trim();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i32 = digits[..end].parse().ok()?;
    let value = if negative { -value } else { value };
    (value != 0).then_some(value)
}
