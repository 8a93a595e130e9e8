//! Input validation for books and reviews
//!
//! Structural and semantic checks that run before anything reaches the
//! entity store. Every violation is collected so the caller can correct the
//! whole request in one round trip.

use crate::constants::{MAX_RATING, MIN_RATING};
use crate::error::{Result, ValidationErrors};
use crate::models::{NewBook, NewReview};

/// Maximum length for a book title or author name
const MAX_NAME_LENGTH: usize = 1000;

/// Maximum length for review text
const MAX_REVIEW_TEXT_LENGTH: usize = 10000;

/// Validates book input for creation or full replacement
pub fn validate_new_book(book: &NewBook) -> Result<()> {
    let mut errors = ValidationErrors::new();

    check_text(&mut errors, "title", &book.title, MAX_NAME_LENGTH);
    check_text(&mut errors, "author", &book.author, MAX_NAME_LENGTH);

    errors.into_result()
}

/// Validates review input for submission or full replacement
pub fn validate_new_review(review: &NewReview) -> Result<()> {
    let mut errors = ValidationErrors::new();

    check_text(&mut errors, "text", &review.text, MAX_REVIEW_TEXT_LENGTH);
    check_rating(&mut errors, review.rating);

    errors.into_result()
}

/// Returns true when `rating` falls within the accepted bounds
pub fn is_valid_rating(rating: i32) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}

fn check_text(errors: &mut ValidationErrors, field: &str, value: &str, max_len: usize) {
    if value.trim().is_empty() {
        errors.push(field, "must not be empty");
    } else if value.chars().count() > max_len {
        errors.push(field, format!("must be at most {max_len} characters"));
    } else if value.contains('\0') {
        // PostgreSQL TEXT cannot store NUL, so both backends refuse it here
        errors.push(field, "must not contain NUL characters");
    }
}

fn check_rating(errors: &mut ValidationErrors, rating: i32) {
    if !is_valid_rating(rating) {
        errors.push(
            "rating",
            format!("must be between {MIN_RATING} and {MAX_RATING}, got {rating}"),
        );
    }
}
