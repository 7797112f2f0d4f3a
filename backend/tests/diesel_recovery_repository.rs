//! Integration tests for `DieselRecoveryRepository` against embedded
//! PostgreSQL.
//!
//! These cover the staging lifecycle where the SQL matters: import runs in
//! one locking transaction, copies the staging timestamp, and a second or
//! concurrent import of the same row fails with `NotFound` instead of
//! publishing twice.

use rstest::{fixture, rstest};
use rust_decimal::Decimal;

use storefront::domain::ports::{
    CatalogueRepository, RecoveryRepository, RecoveryRepositoryError,
};
use storefront::domain::{BookingCode, NewRecoveryItem, RecoveryItemId, RecoveryStatus};
use storefront::outbound::persistence::{DieselCatalogueRepository, DieselRecoveryRepository};

#[path = "support/pg_embed.rs"]
mod pg_embed;

use pg_embed::{TestDatabase, test_database};

#[fixture]
fn db() -> Option<TestDatabase> {
    test_database()
}

fn staged(code: &str) -> NewRecoveryItem {
    NewRecoveryItem::from_booking_code(BookingCode::parse(code).expect("valid code"))
}

#[rstest]
fn staged_rows_start_pending_and_hidden(db: Option<TestDatabase>) {
    let Some(db) = db else { return };
    let recovery = DieselRecoveryRepository::new(db.pool.clone());

    db.runtime.block_on(async {
        let pending = recovery.create(staged("x7k2p")).await.expect("staged");
        let approved = recovery.create(staged("a1b2c")).await.expect("staged");
        recovery.approve(approved.id).await.expect("approved");

        assert_eq!(pending.status, RecoveryStatus::Pending);
        assert_eq!(pending.booking_code.as_ref(), "X7K2P");
        assert_eq!(pending.price, Decimal::ZERO);
        let visible: Vec<_> = recovery
            .list_approved()
            .await
            .expect("approved rows")
            .into_iter()
            .map(|item| item.id)
            .collect();
        assert_eq!(visible, vec![approved.id]);
        assert_eq!(recovery.list_all().await.expect("all rows").len(), 2);
    });
}

#[rstest]
fn import_copies_the_row_and_its_timestamp(db: Option<TestDatabase>) {
    let Some(db) = db else { return };
    let recovery = DieselRecoveryRepository::new(db.pool.clone());
    let catalogue = DieselCatalogueRepository::new(db.pool.clone());

    db.runtime.block_on(async {
        let row = recovery.create(staged("x7k2p")).await.expect("staged");
        let approved = recovery.approve(row.id).await.expect("approved");

        let published = recovery.import(row.id).await.expect("imported");

        assert_eq!(published.booking_code, approved.booking_code);
        assert_eq!(published.title, approved.title);
        assert_eq!(published.price, approved.price);
        assert_eq!(published.created_at, approved.created_at);
        assert!(recovery.list_all().await.expect("staging").is_empty());
        let listed = catalogue.list_newest_first().await.expect("catalogue");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, published.id);
        assert_eq!(listed[0].created_at, approved.created_at);

        assert_eq!(
            recovery.import(row.id).await,
            Err(RecoveryRepositoryError::not_found(row.id.get()))
        );
        assert_eq!(catalogue.list_newest_first().await.expect("catalogue").len(), 1);
    });
}

#[rstest]
fn pending_rows_are_not_imported(db: Option<TestDatabase>) {
    let Some(db) = db else { return };
    let recovery = DieselRecoveryRepository::new(db.pool.clone());
    let catalogue = DieselCatalogueRepository::new(db.pool.clone());

    db.runtime.block_on(async {
        let row = recovery.create(staged("x7k2p")).await.expect("staged");

        assert_eq!(
            recovery.import(row.id).await,
            Err(RecoveryRepositoryError::not_approved(row.id.get()))
        );
        let staging = recovery.list_all().await.expect("staging");
        assert_eq!(staging.len(), 1);
        assert_eq!(staging[0].status, RecoveryStatus::Pending);
        assert!(catalogue.list_newest_first().await.expect("catalogue").is_empty());
    });
}

#[rstest]
fn concurrent_imports_publish_once(db: Option<TestDatabase>) {
    let Some(db) = db else { return };
    let recovery = DieselRecoveryRepository::new(db.pool.clone());
    let catalogue = DieselCatalogueRepository::new(db.pool.clone());

    db.runtime.block_on(async {
        let row = recovery.create(staged("x7k2p")).await.expect("staged");
        recovery.approve(row.id).await.expect("approved");

        let (first, second) = tokio::join!(recovery.import(row.id), recovery.import(row.id));

        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
        assert!(
            outcomes
                .iter()
                .any(|outcome| outcome == &Err(RecoveryRepositoryError::not_found(row.id.get())))
        );
        assert_eq!(catalogue.list_newest_first().await.expect("catalogue").len(), 1);
    });
}

#[rstest]
#[case::approve("approve")]
#[case::import("import")]
#[case::delete("delete")]
fn unknown_rows_are_not_found(db: Option<TestDatabase>, #[case] action: &str) {
    let Some(db) = db else { return };
    let recovery = DieselRecoveryRepository::new(db.pool.clone());
    let missing = RecoveryItemId::new(4242);

    db.runtime.block_on(async {
        let outcome = match action {
            "approve" => recovery.approve(missing).await.map(|_| ()),
            "import" => recovery.import(missing).await.map(|_| ()),
            _ => recovery.delete(missing).await,
        };

        assert_eq!(outcome, Err(RecoveryRepositoryError::not_found(4242)));
    });
}

#[rstest]
fn deleted_rows_leave_staging(db: Option<TestDatabase>) {
    let Some(db) = db else { return };
    let recovery = DieselRecoveryRepository::new(db.pool.clone());

    db.runtime.block_on(async {
        let row = recovery.create(staged("x7k2p")).await.expect("staged");
        recovery.approve(row.id).await.expect("approved");

        recovery.delete(row.id).await.expect("deleted");

        assert!(recovery.list_all().await.expect("staging").is_empty());
        assert_eq!(
            recovery.delete(row.id).await,
            Err(RecoveryRepositoryError::not_found(row.id.get()))
        );
    });
}
