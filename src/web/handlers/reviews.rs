//! # Review Handlers
//!
//! HTTP handlers for submitting, listing, updating and deleting reviews.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::books::DeleteResponse;
use crate::models::{NewReview, Review};
use crate::web::errors::ApiResult;
use crate::web::state::AppState;

/// Submit a review for a book: POST /books/{book_id}/reviews
///
/// Responds as soon as the review is stored; the confirmation email is sent
/// in the background.
pub async fn submit_review(
    State(state): State<AppState>,
    book_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NewReview>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    let Path(book_id) = book_id?;
    let Json(new_review) = payload?;
    let review = state.catalog.submit_review(book_id, new_review).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// All reviews of a book: GET /books/{book_id}/reviews
pub async fn list_reviews_for_book(
    State(state): State<AppState>,
    book_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Vec<Review>>> {
    let Path(book_id) = book_id?;
    Ok(Json(state.catalog.list_reviews_for_book(book_id).await?))
}

/// Fetch one review: GET /reviews/{review_id}
pub async fn get_review(
    State(state): State<AppState>,
    review_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Review>> {
    let Path(review_id) = review_id?;
    Ok(Json(state.catalog.get_review(review_id).await?))
}

/// Replace a review's text and rating: PUT /reviews/{review_id}
pub async fn update_review(
    State(state): State<AppState>,
    review_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NewReview>, JsonRejection>,
) -> ApiResult<Json<Review>> {
    let Path(review_id) = review_id?;
    let Json(fields) = payload?;
    Ok(Json(state.catalog.update_review(review_id, fields).await?))
}

/// Delete a review: DELETE /reviews/{review_id}
pub async fn delete_review(
    State(state): State<AppState>,
    review_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<DeleteResponse>> {
    let Path(review_id) = review_id?;
    let ack = state.catalog.delete_review(review_id).await?;
    Ok(Json(DeleteResponse {
        message: "Review deleted successfully".to_string(),
        id: ack.id,
        cascaded_reviews: ack.cascaded_reviews,
    }))
}
