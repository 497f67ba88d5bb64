// src/server/mod.rs

//! HTTP backend for the book collection.
//!
//! Serves `/api/books` over axum on top of a `BookStorage`:
//!
//! | Method | Path              | Success        |
//! |--------|-------------------|----------------|
//! | GET    | `/api/books`      | 200 `[Book]`   |
//! | POST   | `/api/books`      | 201 `Book`     |
//! | GET    | `/api/books/{id}` | 200 `Book`     |
//! | PUT    | `/api/books/{id}` | 200 `Book`     |
//! | DELETE | `/api/books/{id}` | 204            |
//!
//! Errors answer `{"error": ..., "message": ...}` with 400, 404, 409 or 500.

use std::future::Future;
use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{Span, info, instrument, warn};

use crate::error::{AppError, Result};
use crate::models::{Book, BookPatch, NewBook, ServerConfig};
use crate::storage::{BookStorage, LocalStorage, MemoryStorage};

/// Storage shared by all handlers.
pub type SharedStorage = Arc<dyn BookStorage>;

/// Open the storage the configuration asks for.
pub async fn open_storage(config: &ServerConfig) -> Result<SharedStorage> {
    match &config.data_file {
        Some(path) => Ok(Arc::new(LocalStorage::open(path).await?)),
        None => {
            info!("No data file configured, books are kept in memory");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}

/// Build the `/api/books` router.
pub fn router(storage: SharedStorage) -> Router {
    Router::new()
        .route("/api/books", get(list_books).post(create_book))
        .route(
            "/api/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(storage)
}

/// Serve the router on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, storage: SharedStorage, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("Serving books on http://{}/api/books", addr);
    axum::serve(listener, router(storage))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("Server stopped");
    Ok(())
}

#[instrument(skip_all)]
async fn list_books(State(storage): State<SharedStorage>) -> Result<Json<Vec<Book>>> {
    Ok(Json(storage.list().await?))
}

#[instrument(skip_all, fields(id))]
async fn get_book(
    State(storage): State<SharedStorage>,
    path: std::result::Result<Path<u64>, PathRejection>,
) -> Result<Json<Book>> {
    let id = book_id(path)?;
    Ok(Json(storage.get(id).await?))
}

#[instrument(skip_all)]
async fn create_book(
    State(storage): State<SharedStorage>,
    body: std::result::Result<Json<NewBook>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>)> {
    let Json(new) = body.map_err(|e| AppError::validation(e.body_text()))?;
    let book = storage.insert(new).await?;
    info!(id = book.id, title = %book.title, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

#[instrument(skip_all, fields(id))]
async fn update_book(
    State(storage): State<SharedStorage>,
    path: std::result::Result<Path<u64>, PathRejection>,
    body: std::result::Result<Json<BookPatch>, JsonRejection>,
) -> Result<Json<Book>> {
    let id = book_id(path)?;
    let Json(patch) = body.map_err(|e| AppError::validation(e.body_text()))?;
    let book = storage.update(id, &patch).await?;
    info!(id, "book updated");
    Ok(Json(book))
}

#[instrument(skip_all, fields(id))]
async fn delete_book(
    State(storage): State<SharedStorage>,
    path: std::result::Result<Path<u64>, PathRejection>,
) -> Result<StatusCode> {
    let id = book_id(path)?;
    storage.delete(id).await?;
    info!(id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Extract the `{id}` segment and attach it to the handler span.
fn book_id(path: std::result::Result<Path<u64>, PathRejection>) -> Result<u64> {
    let Path(id) = path.map_err(|e| AppError::validation(e.body_text()))?;
    Span::current().record("id", id);
    Ok(id)
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!("Request failed: {}", self);
        }
        let error = status.canonical_reason().unwrap_or("Error");
        let body = json!({ "error": error, "message": self.to_string() });
        (status, Json(body)).into_response()
    }
}
