//! Integration tests for `DieselOrderRepository` against embedded
//! PostgreSQL.
//!
//! The ledger is written in one transaction: a failing line insert leaves
//! no order behind, a reused payment reference is rejected by the unique
//! index, and ownership is read back through the order join. Withdrawing a
//! catalogue item never touches committed lines.

use diesel::QueryableByName;
use diesel::sql_types::{BigInt, Integer};
use diesel_async::RunQueryDsl;
use rstest::{fixture, rstest};
use rust_decimal::Decimal;

use storefront::domain::ports::{
    CatalogueRepository, CatalogueRepositoryError, NewUser, OrderRepository,
    OrderRepositoryError, UserRepository,
};
use storefront::domain::{
    Cart, CatalogueItemId, DisplayName, EmailAddress, NewCatalogueItem, NewOrder, OrderId,
    PasswordHash, PaymentReference, Role, UserId,
};
use storefront::outbound::persistence::{
    DbPool, DieselCatalogueRepository, DieselOrderRepository, DieselUserRepository,
};

#[path = "support/pg_embed.rs"]
mod pg_embed;

use pg_embed::{TestDatabase, test_database};

#[fixture]
fn db() -> Option<TestDatabase> {
    test_database()
}

#[derive(QueryableByName)]
struct LineCount {
    #[diesel(sql_type = BigInt)]
    lines: i64,
}

async fn seed_user(pool: &DbPool, email: &str) -> UserId {
    DieselUserRepository::new(pool.clone())
        .create(NewUser {
            name: DisplayName::parse("Ada").expect("valid name"),
            email: EmailAddress::parse(email).expect("valid email"),
            password_hash: PasswordHash::new("$argon2id$stub"),
            role: Role::User,
        })
        .await
        .expect("user created")
        .id
}

async fn seed_item(catalogue: &DieselCatalogueRepository, code: &str) -> CatalogueItemId {
    let item = NewCatalogueItem::from_admin_input(code, None, Decimal::new(5, 0), None, None)
        .expect("valid item");
    catalogue.create(item).await.expect("listed").id
}

fn order(user_id: UserId, reference: &str, lines: &[(CatalogueItemId, i32)]) -> NewOrder {
    NewOrder {
        user_id,
        total: Decimal::new(10, 0),
        payment_reference: PaymentReference::parse(reference).expect("valid reference"),
        cart: Cart::try_from_pairs(lines.iter().map(|(id, qty)| (id.get(), *qty)))
            .expect("valid cart"),
    }
}

async fn line_count(pool: &DbPool, order_id: OrderId) -> i64 {
    let mut conn = pool.get().await.expect("connection");
    let count: LineCount =
        diesel::sql_query("SELECT COUNT(*) AS lines FROM order_items WHERE order_id = $1")
            .bind::<Integer, _>(order_id.get())
            .get_result(&mut conn)
            .await
            .expect("line count");
    count.lines
}

#[rstest]
fn orders_commit_with_every_line(db: Option<TestDatabase>) {
    let Some(db) = db else { return };
    let catalogue = DieselCatalogueRepository::new(db.pool.clone());
    let orders = DieselOrderRepository::new(db.pool.clone());

    db.runtime.block_on(async {
        let user = seed_user(&db.pool, "ada@example.com").await;
        let first = seed_item(&catalogue, "aaa111").await;
        let second = seed_item(&catalogue, "bbb222").await;

        let id = orders
            .place(order(user, "T-100", &[(first, 2), (second, 1)]))
            .await
            .expect("placed");

        assert_eq!(line_count(&db.pool, id).await, 2);
        let reference = PaymentReference::parse("T-100").expect("valid reference");
        let summary = orders
            .find_by_reference(&reference)
            .await
            .expect("lookup")
            .expect("order exists");
        assert_eq!(summary.id, id);
        assert_eq!(summary.user_id, user);
    });
}

#[rstest]
fn reused_references_are_duplicates(db: Option<TestDatabase>) {
    let Some(db) = db else { return };
    let catalogue = DieselCatalogueRepository::new(db.pool.clone());
    let orders = DieselOrderRepository::new(db.pool.clone());

    db.runtime.block_on(async {
        let ada = seed_user(&db.pool, "ada@example.com").await;
        let bo = seed_user(&db.pool, "bo@example.com").await;
        let item = seed_item(&catalogue, "aaa111").await;
        let first = orders
            .place(order(ada, "T-200", &[(item, 1)]))
            .await
            .expect("placed");

        let second = orders.place(order(bo, "T-200", &[(item, 1)])).await;

        assert_eq!(
            second,
            Err(OrderRepositoryError::duplicate_reference("T-200".to_owned()))
        );
        assert!(orders.owned_item_ids(bo).await.expect("owned").is_empty());
        assert_eq!(line_count(&db.pool, first).await, 1);
    });
}

#[rstest]
fn unknown_items_write_nothing(db: Option<TestDatabase>) {
    let Some(db) = db else { return };
    let catalogue = DieselCatalogueRepository::new(db.pool.clone());
    let orders = DieselOrderRepository::new(db.pool.clone());

    db.runtime.block_on(async {
        let user = seed_user(&db.pool, "ada@example.com").await;
        let item = seed_item(&catalogue, "aaa111").await;

        let outcome = orders
            .place(order(user, "T-300", &[(item, 1), (CatalogueItemId::new(9999), 1)]))
            .await;

        assert_eq!(outcome, Err(OrderRepositoryError::unknown_item(9999)));
        let reference = PaymentReference::parse("T-300").expect("valid reference");
        assert_eq!(orders.find_by_reference(&reference).await.expect("lookup"), None);
    });
}

#[rstest]
fn failed_line_inserts_roll_back_the_order(db: Option<TestDatabase>) {
    let Some(db) = db else { return };
    let catalogue = DieselCatalogueRepository::new(db.pool.clone());
    let orders = DieselOrderRepository::new(db.pool.clone());

    db.runtime.block_on(async {
        let mut conn = db.pool.get().await.expect("connection");
        diesel::sql_query(
            "CREATE FUNCTION reject_bulk_lines() RETURNS trigger AS $$ \
             BEGIN \
               IF NEW.quantity > 100 THEN RAISE EXCEPTION 'bulk line rejected'; END IF; \
               RETURN NEW; \
             END; $$ LANGUAGE plpgsql",
        )
        .execute(&mut conn)
        .await
        .expect("function created");
        diesel::sql_query(
            "CREATE TRIGGER order_items_bulk_limit BEFORE INSERT ON order_items \
             FOR EACH ROW EXECUTE FUNCTION reject_bulk_lines()",
        )
        .execute(&mut conn)
        .await
        .expect("trigger created");
        drop(conn);

        let user = seed_user(&db.pool, "ada@example.com").await;
        let small = seed_item(&catalogue, "aaa111").await;
        let bulk = seed_item(&catalogue, "bbb222").await;

        let outcome = orders
            .place(order(user, "T-400", &[(small, 1), (bulk, 500)]))
            .await;

        assert!(matches!(outcome, Err(OrderRepositoryError::Query { .. })));
        let reference = PaymentReference::parse("T-400").expect("valid reference");
        assert_eq!(orders.find_by_reference(&reference).await.expect("lookup"), None);
        assert!(orders.owned_item_ids(user).await.expect("owned").is_empty());
    });
}

#[rstest]
fn ownership_is_distinct_per_user(db: Option<TestDatabase>) {
    let Some(db) = db else { return };
    let catalogue = DieselCatalogueRepository::new(db.pool.clone());
    let orders = DieselOrderRepository::new(db.pool.clone());

    db.runtime.block_on(async {
        let ada = seed_user(&db.pool, "ada@example.com").await;
        let bo = seed_user(&db.pool, "bo@example.com").await;
        let a = seed_item(&catalogue, "aaa111").await;
        let b = seed_item(&catalogue, "bbb222").await;
        let c = seed_item(&catalogue, "ccc333").await;
        orders
            .place(order(ada, "T-500", &[(a, 1), (b, 1)]))
            .await
            .expect("placed");
        orders
            .place(order(ada, "T-501", &[(b, 3)]))
            .await
            .expect("placed");
        orders
            .place(order(bo, "T-502", &[(c, 1)]))
            .await
            .expect("placed");

        let mut owned = orders.owned_item_ids(ada).await.expect("owned");
        owned.sort_unstable();

        assert_eq!(owned, vec![a, b]);
        assert_eq!(orders.owned_item_ids(bo).await.expect("owned"), vec![c]);
    });
}

#[rstest]
fn withdrawn_items_keep_their_order_lines(db: Option<TestDatabase>) {
    let Some(db) = db else { return };
    let catalogue = DieselCatalogueRepository::new(db.pool.clone());
    let orders = DieselOrderRepository::new(db.pool.clone());

    db.runtime.block_on(async {
        let user = seed_user(&db.pool, "ada@example.com").await;
        let gone = seed_item(&catalogue, "aaa111").await;
        let kept = seed_item(&catalogue, "bbb222").await;
        let id = orders
            .place(order(user, "T-600", &[(gone, 1), (kept, 1)]))
            .await
            .expect("placed");

        catalogue.delete(gone).await.expect("withdrawn");

        assert_eq!(line_count(&db.pool, id).await, 2);
        let mut owned = orders.owned_item_ids(user).await.expect("owned");
        owned.sort_unstable();
        assert_eq!(owned, vec![gone, kept]);
        let listed: Vec<_> = catalogue
            .list_newest_first()
            .await
            .expect("catalogue")
            .into_iter()
            .map(|item| item.id)
            .collect();
        assert_eq!(listed, vec![kept]);
        assert_eq!(
            catalogue.delete(gone).await,
            Err(CatalogueRepositoryError::not_found(gone.get()))
        );
        assert_eq!(
            orders.place(order(user, "T-601", &[(gone, 1)])).await,
            Err(OrderRepositoryError::unknown_item(gone.get()))
        );
    });
}
