use proptest::prelude::*;

use book_review_core::models::{NewBook, NewReview};

/// Non-blank text with no surrounding whitespace
pub fn text_strategy(max_len: usize) -> impl Strategy<Value = String> {
    proptest::string::string_regex(&format!("[A-Za-z0-9][A-Za-z0-9 .,'!?-]{{0,{}}}", max_len - 1))
        .expect("valid regex")
        .prop_map(|s| s.trim_end().to_string())
}

/// Strings made only of whitespace, including the empty string
pub fn blank_strategy() -> impl Strategy<Value = String> {
    "[ \t\n]{0,8}"
}

pub fn publication_year_strategy() -> impl Strategy<Value = i32> {
    -3000i32..=2100
}

pub fn valid_rating_strategy() -> impl Strategy<Value = i32> {
    1i32..=5
}

pub fn invalid_rating_strategy() -> impl Strategy<Value = i32> {
    prop_oneof![i32::MIN..=0, 6i32..=i32::MAX]
}

pub fn author_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Frank Herbert".to_string()),
        Just("Ursula K. Le Guin".to_string()),
        Just("Octavia E. Butler".to_string()),
        Just("Iain M. Banks".to_string()),
    ]
}

pub fn new_book_strategy() -> impl Strategy<Value = NewBook> {
    (text_strategy(64), author_strategy(), 1900i32..=1910)
        .prop_map(|(title, author, year)| NewBook::new(title, author, year))
}

pub fn new_review_strategy() -> impl Strategy<Value = NewReview> {
    (text_strategy(200), valid_rating_strategy())
        .prop_map(|(text, rating)| NewReview::new(text, rating))
}
