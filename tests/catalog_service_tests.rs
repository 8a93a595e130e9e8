//! # Catalog Service Integration Tests
//!
//! End-to-end catalog scenarios over the in-memory store: referential
//! integrity, cascade deletes, filtering and review confirmations.

mod common;

use futures::future::join_all;
use std::sync::Arc;

use book_review_core::error::{CatalogError, EntityKind};
use book_review_core::models::{BookFilter, NewBook, NewReview};
use book_review_core::notifications::NotificationWorker;
use book_review_core::services::{CatalogService, DeleteAck};
use book_review_core::store::{EntityStore, InMemoryStore};
use book_review_core::test_utils::{in_memory_catalog, in_memory_catalog_with_notifier};

use common::{FailingSender, RecordingSender};

async fn seed_books(catalog: &CatalogService) {
    for (title, author, year) in [
        ("Dune", "Frank Herbert", 1965),
        ("Children of Dune", "Frank Herbert", 1976),
        ("The Left Hand of Darkness", "Ursula K. Le Guin", 1969),
        ("The Dispossessed", "Ursula K. Le Guin", 1974),
    ] {
        catalog
            .add_book(NewBook::new(title, author, year))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_review_lifecycle_scenario() {
    let (catalog, _) = in_memory_catalog();

    let book = catalog
        .add_book(NewBook::new("Dune", "Herbert", 1965))
        .await
        .unwrap();
    assert_eq!(book.id, 1);

    catalog
        .submit_review(1, NewReview::new("Great", 5))
        .await
        .unwrap();
    let reviews = catalog.list_reviews_for_book(1).await.unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].book_id, 1);
    assert_eq!(reviews[0].rating, 5);

    let err = catalog
        .submit_review(999, NewReview::new("x", 3))
        .await
        .unwrap_err();
    assert_eq!(err, CatalogError::BookNotFound(999));

    let ack = catalog.delete_book(1).await.unwrap();
    assert_eq!(
        ack,
        DeleteAck {
            id: 1,
            cascaded_reviews: 1
        }
    );

    let err = catalog.list_reviews_for_book(1).await.unwrap_err();
    assert_eq!(err, CatalogError::BookNotFound(1));
    assert!(catalog.get_review(reviews[0].id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_rejected_review_is_not_persisted() {
    let (catalog, store) = in_memory_catalog();
    let book = catalog
        .add_book(NewBook::new("Dune", "Herbert", 1965))
        .await
        .unwrap();

    for rating in [0, 6, -1] {
        let err = catalog
            .submit_review(book.id, NewReview::new("Great", rating))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::ValidationFailed(ref e) if e.has_field("rating")));
    }

    let err = catalog
        .submit_review(book.id, NewReview::new("   ", 3))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::ValidationFailed(ref e) if e.has_field("text")));

    assert_eq!(store.review_count(), 0);
    assert!(catalog.list_reviews_for_book(book.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_nul_characters_are_a_validation_failure() {
    let (catalog, store) = in_memory_catalog();
    let book = catalog
        .add_book(NewBook::new("Dune", "Herbert", 1965))
        .await
        .unwrap();

    let err = catalog
        .submit_review(book.id, NewReview::new("a\u{0}b", 5))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::ValidationFailed(ref e) if e.has_field("text")));
    assert_eq!(store.review_count(), 0);

    let err = catalog
        .add_book(NewBook::new("Du\u{0}ne", "Herbert", 1965))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::ValidationFailed(ref e) if e.has_field("title")));
    assert_eq!(store.book_count(), 1);
}

#[tokio::test]
async fn test_list_books_filters_combine_with_and() {
    let (catalog, _) = in_memory_catalog();
    seed_books(&catalog).await;

    let all = catalog.list_books(BookFilter::new()).await.unwrap();
    let ids: Vec<i64> = all.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);

    let herbert = catalog
        .list_books(BookFilter::new().with_author("Frank Herbert"))
        .await
        .unwrap();
    assert_eq!(herbert.len(), 2);
    assert!(herbert.iter().all(|b| b.author == "Frank Herbert"));

    let both = catalog
        .list_books(
            BookFilter::new()
                .with_author("Ursula K. Le Guin")
                .with_publication_year(1974),
        )
        .await
        .unwrap();
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].title, "The Dispossessed");

    let none = catalog
        .list_books(
            BookFilter::new()
                .with_author("Frank Herbert")
                .with_publication_year(1974),
        )
        .await
        .unwrap();
    assert!(none.is_empty());

    // Author matching is exact
    let partial = catalog
        .list_books(BookFilter::new().with_author("Herbert"))
        .await
        .unwrap();
    assert!(partial.is_empty());
}

#[tokio::test]
async fn test_update_book_replaces_fields_and_keeps_identity() {
    let (catalog, _) = in_memory_catalog();
    let book = catalog
        .add_book(NewBook::new("Dune", "Herbert", 1965))
        .await
        .unwrap();

    let updated = catalog
        .update_book(book.id, NewBook::new("Dune Messiah", "Frank Herbert", 1969))
        .await
        .unwrap();

    assert_eq!(updated.id, book.id);
    assert_eq!(updated.title, "Dune Messiah");
    assert_eq!(updated.author, "Frank Herbert");
    assert_eq!(updated.publication_year, 1969);
    assert_eq!(updated.created_at, book.created_at);
    assert!(updated.updated_at >= book.updated_at);
    assert_eq!(catalog.get_book(book.id).await.unwrap(), updated);

    let err = catalog
        .update_book(42, NewBook::new("Dune", "Herbert", 1965))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        CatalogError::NotFound {
            entity: EntityKind::Book,
            id: 42
        }
    );
}

#[tokio::test]
async fn test_update_review_keeps_book_reference() {
    let (catalog, _) = in_memory_catalog();
    let book = catalog
        .add_book(NewBook::new("Dune", "Herbert", 1965))
        .await
        .unwrap();
    let review = catalog
        .submit_review(book.id, NewReview::new("Good", 4))
        .await
        .unwrap();

    let updated = catalog
        .update_review(review.id, NewReview::new("Even better on reread", 5))
        .await
        .unwrap();

    assert_eq!(updated.id, review.id);
    assert_eq!(updated.book_id, book.id);
    assert_eq!(updated.text, "Even better on reread");
    assert_eq!(updated.rating, 5);

    let err = catalog
        .update_review(review.id, NewReview::new("Even better", 9))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::ValidationFailed(_)));
    assert_eq!(catalog.get_review(review.id).await.unwrap(), updated);
}

#[tokio::test]
async fn test_ids_are_never_reused_after_delete() {
    let (catalog, _) = in_memory_catalog();
    let first = catalog
        .add_book(NewBook::new("Dune", "Herbert", 1965))
        .await
        .unwrap();
    catalog.delete_book(first.id).await.unwrap();

    let second = catalog
        .add_book(NewBook::new("Dune", "Herbert", 1965))
        .await
        .unwrap();
    assert!(second.id > first.id);
}

#[tokio::test]
async fn test_deleted_book_stays_deleted() {
    let (catalog, _) = in_memory_catalog();
    let book = catalog
        .add_book(NewBook::new("Dune", "Herbert", 1965))
        .await
        .unwrap();
    catalog.delete_book(book.id).await.unwrap();

    let err = catalog
        .update_book(book.id, NewBook::new("Dune", "Herbert", 1965))
        .await
        .unwrap_err();
    assert_eq!(err, CatalogError::book_not_found(book.id));
    assert_eq!(
        catalog.delete_book(book.id).await.unwrap_err(),
        CatalogError::book_not_found(book.id)
    );
    assert_eq!(
        catalog.delete_review(12).await.unwrap_err(),
        CatalogError::review_not_found(12)
    );
}

#[tokio::test]
async fn test_delete_book_only_cascades_to_its_own_reviews() {
    let (catalog, store) = in_memory_catalog();
    seed_books(&catalog).await;

    for book_id in [1, 1, 2, 3] {
        catalog
            .submit_review(book_id, NewReview::new("Worth reading", 4))
            .await
            .unwrap();
    }

    let ack = catalog.delete_book(1).await.unwrap();
    assert_eq!(ack.cascaded_reviews, 2);
    assert_eq!(store.review_count(), 2);

    let remaining = store.list_reviews().await.unwrap();
    assert!(remaining.iter().all(|r| r.book_id != 1));
    assert_eq!(catalog.list_reviews_for_book(2).await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submit_and_delete_leave_no_orphans() {
    for _ in 0..50 {
        let (catalog, store) = in_memory_catalog();
        let book = catalog
            .add_book(NewBook::new("Dune", "Herbert", 1965))
            .await
            .unwrap();

        let book_id = book.id;
        let mut submits = Vec::new();
        for i in 0..8 {
            let catalog = catalog.clone();
            submits.push(tokio::spawn(async move {
                catalog
                    .submit_review(book_id, NewReview::new(format!("Review {i}"), 3))
                    .await
            }));
        }
        let deleter = {
            let catalog = catalog.clone();
            tokio::spawn(async move { catalog.delete_book(book_id).await })
        };

        for outcome in join_all(submits).await {
            match outcome.unwrap() {
                Ok(review) => assert_eq!(review.book_id, book.id),
                Err(err) => assert_eq!(err, CatalogError::BookNotFound(book.id)),
            }
        }
        deleter.await.unwrap().unwrap();

        // Whatever interleaving happened, no review outlives its book
        assert!(store.list_reviews().await.unwrap().is_empty());
        assert!(catalog.get_book(book.id).await.unwrap_err().is_not_found());
    }
}

#[tokio::test]
async fn test_confirmation_sent_after_review_is_committed() {
    let store = Arc::new(InMemoryStore::new());
    let sender = Arc::new(RecordingSender::new(store.clone() as Arc<dyn EntityStore>));
    let (notifier, worker) = NotificationWorker::spawn(sender.clone());
    let catalog = CatalogService::new(store.clone(), notifier);

    let book = catalog
        .add_book(NewBook::new("Dune", "Herbert", 1965))
        .await
        .unwrap();
    let review = catalog
        .submit_review(book.id, NewReview::new("Great", 5))
        .await
        .unwrap();

    drop(catalog);
    let stats = worker.shutdown().await;
    assert_eq!(stats.delivered, 1);

    let deliveries = sender.deliveries();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].notification.review_id, review.id);
    assert_eq!(deliveries[0].notification.book_id, book.id);
    assert_eq!(deliveries[0].notification.rating, 5);
    assert!(deliveries[0].review_visible);
}

#[tokio::test]
async fn test_rejected_submission_sends_no_confirmation() {
    let store = Arc::new(InMemoryStore::new());
    let sender = Arc::new(RecordingSender::new(store.clone() as Arc<dyn EntityStore>));
    let (notifier, worker) = NotificationWorker::spawn(sender.clone());
    let catalog = CatalogService::new(store, notifier);

    catalog
        .submit_review(999, NewReview::new("Great", 5))
        .await
        .unwrap_err();
    let book = catalog
        .add_book(NewBook::new("Dune", "Herbert", 1965))
        .await
        .unwrap();
    catalog
        .submit_review(book.id, NewReview::new("Great", 7))
        .await
        .unwrap_err();

    let stats = worker.shutdown().await;
    assert_eq!(stats.delivered, 0);
    assert!(sender.deliveries().is_empty());
}

#[tokio::test]
async fn test_failed_confirmation_does_not_affect_submission() {
    let (notifier, worker) = NotificationWorker::spawn(Arc::new(FailingSender));
    let (catalog, store) = in_memory_catalog_with_notifier(notifier);

    let book = catalog
        .add_book(NewBook::new("Dune", "Herbert", 1965))
        .await
        .unwrap();
    let review = catalog
        .submit_review(book.id, NewReview::new("Great", 5))
        .await
        .unwrap();

    let stats = worker.shutdown().await;
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.delivered, 0);
    assert_eq!(store.get_review(review.id).await.unwrap(), review);
}
