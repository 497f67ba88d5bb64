// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

use crate::error::{AppError, Result};

/// Append path segments to a base URL.
///
/// A trailing slash on the base is ignored, so `http://host/api` and
/// `http://host/api/` resolve to the same endpoint. Segments are
/// percent-encoded.
///
/// # Examples
/// ```
/// use bookshelf::utils::url::endpoint;
///
/// let base = url::Url::parse("http://localhost:5000/api/").unwrap();
/// assert_eq!(
///     endpoint(&base, &["books", "3"]).unwrap().as_str(),
///     "http://localhost:5000/api/books/3"
/// );
/// ```
pub fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| AppError::config(format!("URL cannot be a base: {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
