// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::{Response, StatusCode};

use crate::error::{AppError, Result};
use crate::models::ApiConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &ApiConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Turn a non-success response into a status error.
///
/// The message is the status' canonical reason, or `fallback` when the
/// status has none.
pub fn ensure_success(response: Response, fallback: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(status_error(status, fallback))
}

/// Build the error for a non-success status.
pub fn status_error(status: StatusCode, fallback: &str) -> AppError {
    let message = status
        .canonical_reason()
        .filter(|reason| !reason.is_empty())
        .unwrap_or(fallback);
    AppError::status(status.as_u16(), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_uses_reason() {
        let err = status_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to load books");
        assert_eq!(err.to_string(), "Error 500: Internal Server Error");
    }

    #[test]
    fn test_status_error_falls_back_without_reason() {
        let status = StatusCode::from_u16(599).unwrap();
        let err = status_error(status, "failed to load books");
        assert_eq!(err.to_string(), "Error 599: failed to load books");
    }

    #[test]
    fn test_create_client_from_default_config() {
        assert!(create_client(&ApiConfig::default()).is_ok());
    }
}
