//! Catalog handlers

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, CatalogEvent};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shelfscan_core::error::PipelineError;
use shelfscan_core::export::{export_to_string, import_from_str, EXPORT_FILE_NAME};
use shelfscan_core::pipeline::Committed;
use shelfscan_core::Book;
use uuid::Uuid;

/// Query parameters for listing books
#[derive(Debug, Deserialize)]
pub struct ListBooksQuery {
    /// Case-insensitive substring of title or author
    pub filter: Option<String>,
}

/// List response
#[derive(Debug, Serialize)]
pub struct ListBooksResponse {
    pub books: Vec<Book>,
    /// Matching books
    pub count: usize,
    /// Books in the catalog
    pub total: usize,
}

/// List books in display order
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<ListBooksQuery>,
) -> Json<ListBooksResponse> {
    let catalog = state.catalog.read().await;

    let books: Vec<Book> = catalog
        .filter(query.filter.as_deref().unwrap_or_default())
        .into_iter()
        .cloned()
        .collect();

    Json(ListBooksResponse {
        count: books.len(),
        total: catalog.len(),
        books,
    })
}

#[derive(Debug, Deserialize)]
pub struct AddByIsbnRequest {
    pub isbn: String,
}

#[derive(Debug, Deserialize)]
pub struct AddByTitleRequest {
    pub title: String,
}

/// The stored book and where it landed
#[derive(Debug, Serialize)]
pub struct AddBookResponse {
    pub book: Book,
    pub position: usize,
    pub total: usize,
}

/// Look up an ISBN and add the book
pub async fn add_by_isbn(
    State(state): State<AppState>,
    Json(request): Json<AddByIsbnRequest>,
) -> ApiResult<(StatusCode, Json<AddBookResponse>)> {
    let token = state.pipeline.begin();
    let result = state.pipeline.add_by_isbn(&request.isbn, token).await;
    finish_add(&state, result)
}

/// Search for a title and add the first match
pub async fn add_by_title(
    State(state): State<AppState>,
    Json(request): Json<AddByTitleRequest>,
) -> ApiResult<(StatusCode, Json<AddBookResponse>)> {
    let token = state.pipeline.begin();
    let result = state.pipeline.add_by_title(&request.title, token).await;
    finish_add(&state, result)
}

fn finish_add(
    state: &AppState,
    result: Result<Committed, PipelineError>,
) -> ApiResult<(StatusCode, Json<AddBookResponse>)> {
    match result {
        Ok(committed) => {
            state.broadcast(CatalogEvent::BookAdded {
                id: committed.book.id,
                title: committed.book.title.clone(),
                position: committed.position,
            });
            Ok((
                StatusCode::CREATED,
                Json(AddBookResponse {
                    book: committed.book,
                    position: committed.position,
                    total: committed.len,
                }),
            ))
        }
        // The request that superseded this one reports its own outcome
        Err(e @ PipelineError::Superseded) => Err(e.into()),
        Err(e) => {
            tracing::warn!("Add failed: {}", e);
            state.broadcast(CatalogEvent::Error {
                message: e.to_string(),
            });
            Err(e.into())
        }
    }
}

/// Delete a book by id
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::BadRequest(format!("Invalid book id: {}", id)))?;

    let removed = {
        let mut catalog = state.catalog.write().await;
        catalog.delete(id).await?
    };

    tracing::info!(%id, title = %removed.title, "Deleted book");
    state.broadcast(CatalogEvent::BookDeleted {
        id,
        title: removed.title,
    });

    Ok(StatusCode::NO_CONTENT)
}

/// Download the catalog as a JSON file
pub async fn export_catalog(State(state): State<AppState>) -> ApiResult<Response> {
    let catalog = state.catalog.read().await;
    let body = export_to_string(catalog.books()).map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        body,
    )
        .into_response())
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub replaced: usize,
}

/// Replace the catalog with an uploaded export
///
/// The body is read as text so malformed uploads get the import error, not a generic
/// extractor rejection.
pub async fn import_catalog(
    State(state): State<AppState>,
    body: String,
) -> ApiResult<Json<ImportResponse>> {
    let books = import_from_str(&body)?;
    let imported = books.len();

    // An add still in flight must not land on top of the imported list
    state.pipeline.begin();

    let replaced = {
        let mut catalog = state.catalog.write().await;
        let replaced = catalog.len();
        catalog.replace_all(books).await?;
        replaced
    };

    tracing::info!(imported, replaced, "Imported catalog");
    state.broadcast(CatalogEvent::CatalogImported { count: imported });

    Ok(Json(ImportResponse { imported, replaced }))
}
