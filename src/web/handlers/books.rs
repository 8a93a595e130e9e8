//! # Book Handlers
//!
//! HTTP handlers for creating, listing, updating and deleting books.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::{Book, BookFilter, NewBook};
use crate::web::errors::ApiResult;
use crate::web::state::AppState;

/// Query parameters accepted by `GET /books`
#[derive(Debug, Default, Deserialize)]
pub struct BookListQuery {
    pub author: Option<String>,
    pub publication_year: Option<i32>,
}

impl From<BookListQuery> for BookFilter {
    fn from(query: BookListQuery) -> Self {
        Self {
            // `?author=` means no author filter
            author: query.author.filter(|author| !author.is_empty()),
            publication_year: query.publication_year,
        }
    }
}

/// Acknowledgement body for delete endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    pub id: i64,
    pub cascaded_reviews: usize,
}

/// Create a book: POST /books
pub async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Book>)> {
    let Json(new_book) = payload?;
    let book = state.catalog.add_book(new_book).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// List books with optional filters: GET /books?author=&publication_year=
pub async fn list_books(
    State(state): State<AppState>,
    query: Result<Query<BookListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Book>>> {
    let Query(query) = query?;
    let books = state.catalog.list_books(query.into()).await?;
    Ok(Json(books))
}

/// Fetch one book: GET /books/{book_id}
pub async fn get_book(
    State(state): State<AppState>,
    book_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Book>> {
    let Path(book_id) = book_id?;
    Ok(Json(state.catalog.get_book(book_id).await?))
}

/// Replace a book's fields: PUT /books/{book_id}
pub async fn update_book(
    State(state): State<AppState>,
    book_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> ApiResult<Json<Book>> {
    let Path(book_id) = book_id?;
    let Json(fields) = payload?;
    Ok(Json(state.catalog.update_book(book_id, fields).await?))
}

/// Delete a book and its reviews: DELETE /books/{book_id}
pub async fn delete_book(
    State(state): State<AppState>,
    book_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<DeleteResponse>> {
    let Path(book_id) = book_id?;
    let ack = state.catalog.delete_book(book_id).await?;
    Ok(Json(DeleteResponse {
        message: "Book deleted successfully".to_string(),
        id: ack.id,
        cascaded_reviews: ack.cascaded_reviews,
    }))
}
