// src/services/http.rs

//! REST client for the book collection.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::Result;
use crate::models::{ApiConfig, Book, BookPatch, NewBook};
use crate::services::BookApi;
use crate::utils::http::{create_client, ensure_success};
use crate::utils::url::endpoint;

/// `BookApi` over HTTP against `{base}/books`.
#[derive(Debug, Clone)]
pub struct HttpBookApi {
    client: Client,
    base: Url,
}

impl HttpBookApi {
    /// Create a client from configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self {
            client: create_client(config)?,
            base: config.base_url()?,
        })
    }

    fn collection(&self) -> Result<Url> {
        endpoint(&self.base, &["books"])
    }

    fn item(&self, id: u64) -> Result<Url> {
        endpoint(&self.base, &["books", &id.to_string()])
    }
}

#[async_trait]
impl BookApi for HttpBookApi {
    async fn list_books(&self) -> Result<Vec<Book>> {
        let url = self.collection()?;
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let response = ensure_success(response, "failed to load books")?;
        Ok(response.json().await?)
    }

    async fn get_book(&self, id: u64) -> Result<Book> {
        let url = self.item(id)?;
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let response = ensure_success(response, "failed to load book")?;
        Ok(response.json().await?)
    }

    async fn create_book(&self, book: &NewBook) -> Result<Option<Book>> {
        let url = self.collection()?;
        log::debug!("POST {}", url);
        let response = self.client.post(url).json(book).send().await?;
        let response = ensure_success(response, "failed to add book")?;
        let body = response.bytes().await?;
        match serde_json::from_slice(&body) {
            Ok(created) => Ok(Some(created)),
            Err(e) => {
                log::debug!("Create response carried no book: {}", e);
                Ok(None)
            }
        }
    }

    async fn update_book(&self, id: u64, patch: &BookPatch) -> Result<Book> {
        let url = self.item(id)?;
        log::debug!("PUT {}", url);
        let response = self.client.put(url).json(patch).send().await?;
        let response = ensure_success(response, "failed to update book")?;
        Ok(response.json().await?)
    }

    async fn delete_book(&self, id: u64) -> Result<()> {
        let url = self.item(id)?;
        log::debug!("DELETE {}", url);
        let response = self.client.delete(url).send().await?;
        ensure_success(response, "failed to delete book")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_url_tolerates_trailing_slash() {
        let config = ApiConfig {
            base_url: "http://localhost:5000/api/".to_string(),
            ..ApiConfig::default()
        };
        let api = HttpBookApi::new(&config).unwrap();
        assert_eq!(
            api.item(42).unwrap().as_str(),
            "http://localhost:5000/api/books/42"
        );
        assert_eq!(
            api.collection().unwrap().as_str(),
            "http://localhost:5000/api/books"
        );
    }

    #[test]
    fn test_new_rejects_bad_base_url() {
        let config = ApiConfig {
            base_url: "localhost:5000".to_string(),
            ..ApiConfig::default()
        };
        // "localhost:5000" parses as a cannot-be-a-base URL with scheme "localhost"
        assert!(HttpBookApi::new(&config).is_err());
    }
}
