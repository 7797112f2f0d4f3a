//! Recovery staging lifecycle exercised end to end over HTTP.

use actix_web::http::StatusCode;
use rstest::rstest;
use serde_json::json;

use storefront::domain::RecoveryStatus;
use storefront::domain::ports::{CatalogueRepository, RecoveryRepository};

mod support;

use support::{Backend, stage_code};

#[rstest]
#[case("approve")]
#[case("import")]
#[case("delete")]
#[actix_web::test]
async fn unknown_ids_are_not_found(#[case] action: &str) {
    let backend = Backend::with_admin().await;
    let mut admin = backend.admin().await;

    let (status, body) = admin
        .post("/api/v1/recovery", json!({"action": action, "id": 9999}))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[actix_web::test]
async fn pending_rows_cannot_be_imported() {
    let backend = Backend::with_admin().await;
    let mut admin = backend.admin().await;
    let staged = stage_code(&mut admin, "x7k2p").await;

    let (status, body) = admin
        .post("/api/v1/recovery", json!({"action": "import", "id": staged}))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "not_approved");
    let staging = backend.store.list_all().await.expect("staging rows");
    assert_eq!(staging.len(), 1);
    assert_eq!(staging[0].status, RecoveryStatus::Pending);
    let catalogue = backend.store.list_newest_first().await.expect("catalogue");
    assert!(catalogue.is_empty());
}

#[actix_web::test]
async fn approved_rows_move_into_the_catalogue_once() {
    let backend = Backend::with_admin().await;
    let mut admin = backend.admin().await;
    let staged = stage_code(&mut admin, "x7k2p").await;

    let (status, _) = admin
        .post("/api/v1/recovery", json!({"action": "approve", "id": staged}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = admin
        .post("/api/v1/recovery", json!({"action": "import", "id": staged}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], staged);
    let catalogue_id = body["catalogueId"].as_i64().expect("catalogue id");

    let staging = backend.store.list_all().await.expect("staging rows");
    assert!(staging.is_empty());
    let (status, listing) = admin.get("/api/v1/admin/catalogue").await;
    assert_eq!(status, StatusCode::OK);
    let items = listing["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], catalogue_id);
    assert_eq!(items[0]["bookingCode"], "X7K2P");
    assert_eq!(items[0]["title"], "Booking Code: X7K2P");
    assert_eq!(items[0]["price"].as_f64(), Some(0.0));

    let (status, body) = admin
        .post("/api/v1/recovery", json!({"action": "import", "id": staged}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
    let catalogue = backend.store.list_newest_first().await.expect("catalogue");
    assert_eq!(catalogue.len(), 1);
}

#[rstest]
#[case(json!({"action": "add", "bookingCode": "q9w8e"}))]
#[case(json!({"action": "approve"}))]
#[case(json!({"action": "import"}))]
#[case(json!({"action": "delete"}))]
#[actix_web::test]
async fn customers_cannot_mutate_staging(#[case] payload: serde_json::Value) {
    let mut payload = payload;
    let backend = Backend::with_admin().await;
    let mut admin = backend.admin().await;
    let staged = stage_code(&mut admin, "x7k2p").await;
    if payload.get("bookingCode").is_none() {
        payload["id"] = json!(staged);
    }
    let mut customer = backend.customer("ada@example.com").await;
    let mut anonymous = backend.client().await;

    let (status, body) = customer.post("/api/v1/recovery", payload.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");
    let (status, _) = anonymous.post("/api/v1/recovery", payload).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let staging = backend.store.list_all().await.expect("staging rows");
    assert_eq!(staging.len(), 1);
    assert_eq!(staging[0].status, RecoveryStatus::Pending);
    let catalogue = backend.store.list_newest_first().await.expect("catalogue");
    assert!(catalogue.is_empty());
}

#[actix_web::test]
async fn customers_see_only_approved_previews() {
    let backend = Backend::with_admin().await;
    let mut admin = backend.admin().await;
    let approved = stage_code(&mut admin, "a1b2c").await;
    stage_code(&mut admin, "d3e4f").await;
    let (status, _) = admin
        .post("/api/v1/recovery", json!({"action": "approve", "id": approved}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let mut customer = backend.customer("ada@example.com").await;

    let (status, body) = customer.get("/api/v1/recovery").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["items"],
        json!([{"id": approved, "title": "Booking Code: A1B2C"}])
    );
}

#[actix_web::test]
async fn deleted_rows_disappear_from_staging() {
    let backend = Backend::with_admin().await;
    let mut admin = backend.admin().await;
    let staged = stage_code(&mut admin, "x7k2p").await;

    let (status, body) = admin
        .post("/api/v1/recovery", json!({"action": "delete", "id": staged}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "id": staged}));
    let (_, listing) = admin.get("/api/v1/recovery").await;
    assert_eq!(listing["items"], json!([]));
}
