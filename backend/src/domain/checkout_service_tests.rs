//! Tests for the checkout orchestrator.

use super::*;
use crate::domain::ports::{MockOrderRepository, MockPaymentGateway};
use crate::domain::{
    Cart, CatalogueItemId, ErrorCode, OrderId, OrderSummary, PaymentReference, ProviderTransaction,
    Role, UserId,
};
use rstest::rstest;
use rust_decimal::Decimal;

const REFERENCE: &str = "T685312";

fn customer() -> Caller {
    Caller::authenticated(UserId::new(5), Role::User)
}

fn report(status: &str, amount: i64, currency: &str) -> ProviderTransaction {
    ProviderTransaction {
        status: status.to_owned(),
        amount,
        currency: Some(currency.to_owned()),
    }
}

fn expectation(amount: i64) -> PaymentExpectation {
    PaymentExpectation::try_new(REFERENCE, amount, "NGN").expect("valid expectation")
}

fn verified(amount: i64) -> VerifiedPayment {
    VerifiedPayment {
        reference: PaymentReference::parse(REFERENCE).expect("reference"),
        amount,
        currency: "NGN".to_owned(),
    }
}

fn request(total: Decimal) -> OrderRequest {
    let cart = Cart::try_from_pairs([(1, 2), (2, 1)]).expect("cart");
    OrderRequest::try_new(cart, total).expect("request")
}

fn service(
    gateway: MockPaymentGateway,
    orders: MockOrderRepository,
) -> CheckoutService<MockPaymentGateway, MockOrderRepository> {
    CheckoutService::new(Arc::new(gateway), Arc::new(orders))
}

fn gateway_returning(
    result: Result<ProviderTransaction, PaymentGatewayError>,
) -> MockPaymentGateway {
    let mut gateway = MockPaymentGateway::new();
    gateway
        .expect_fetch_transaction()
        .withf(|reference| reference.as_ref() == REFERENCE)
        .times(1)
        .return_once(move |_| result);
    gateway
}

#[tokio::test]
async fn matching_report_is_verified() {
    let gateway = gateway_returning(Ok(report("success", 5000, "ngn")));
    let payment = service(gateway, MockOrderRepository::new())
        .verify_payment(expectation(5000))
        .await
        .expect("verified");
    assert_eq!(payment, verified(5000));
}

#[rstest]
#[case(report("success", 4999, "NGN"), "Amount mismatch")]
#[case(report("failed", 5000, "NGN"), "Payment not successful")]
#[case(report("success", 5000, "GHS"), "Currency mismatch")]
#[tokio::test]
async fn mismatches_fail_verification(
    #[case] provider_report: ProviderTransaction,
    #[case] message: &str,
) {
    let gateway = gateway_returning(Ok(provider_report));
    let err = service(gateway, MockOrderRepository::new())
        .verify_payment(expectation(5000))
        .await
        .expect_err("mismatch");
    assert_eq!(err.code(), ErrorCode::VerificationFailed);
    assert_eq!(err.message(), message);
}

#[rstest]
#[case(PaymentGatewayError::timeout("10s elapsed"), ErrorCode::GatewayUnavailable)]
#[case(PaymentGatewayError::transport("dns"), ErrorCode::GatewayUnavailable)]
#[case(PaymentGatewayError::rejected(503_u16, "maintenance"), ErrorCode::GatewayUnavailable)]
#[case(PaymentGatewayError::not_configured("secret missing"), ErrorCode::GatewayUnavailable)]
#[case(PaymentGatewayError::rejected(404_u16, "unknown reference"), ErrorCode::VerificationFailed)]
#[case(PaymentGatewayError::decode("missing data"), ErrorCode::VerificationFailed)]
#[tokio::test]
async fn gateway_failures_map_to_retryable_or_closed(
    #[case] failure: PaymentGatewayError,
    #[case] expected: ErrorCode,
) {
    let gateway = gateway_returning(Err(failure));
    let err = service(gateway, MockOrderRepository::new())
        .verify_payment(expectation(5000))
        .await
        .expect_err("gateway failure");
    assert_eq!(err.code(), expected);
}

#[tokio::test]
async fn anonymous_checkout_is_unauthorised() {
    let err = service(MockPaymentGateway::new(), MockOrderRepository::new())
        .place_order(Caller::Anonymous, request(Decimal::new(50, 0)), Some(verified(5000)))
        .await
        .expect_err("anonymous");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn checkout_without_verified_payment_fails() {
    let err = service(MockPaymentGateway::new(), MockOrderRepository::new())
        .place_order(customer(), request(Decimal::new(50, 0)), None)
        .await
        .expect_err("unverified");
    assert_eq!(err.code(), ErrorCode::VerificationFailed);
}

#[rstest]
#[case(Decimal::new(4999, 2))]
#[case(Decimal::new(5001, 2))]
#[tokio::test]
async fn total_must_match_verified_amount(#[case] total: Decimal) {
    // No order repository expectations: nothing may be written.
    let err = service(MockPaymentGateway::new(), MockOrderRepository::new())
        .place_order(customer(), request(total), Some(verified(5000)))
        .await
        .expect_err("amount mismatch");
    assert_eq!(err.code(), ErrorCode::VerificationFailed);
}

#[tokio::test]
async fn commit_writes_one_order_with_every_line() {
    let mut orders = MockOrderRepository::new();
    orders.expect_find_by_reference().return_once(|_| Ok(None));
    orders
        .expect_place()
        .withf(|order| {
            let lines = order.cart.lines();
            order.user_id == UserId::new(5)
                && order.total == Decimal::new(50, 0)
                && order.payment_reference.as_ref() == REFERENCE
                && lines.len() == 2
                && lines[0].item_id == CatalogueItemId::new(1)
                && lines[0].quantity == 2
                && lines[1].item_id == CatalogueItemId::new(2)
                && lines[1].quantity == 1
        })
        .times(1)
        .return_once(|_| Ok(OrderId::new(31)));

    let placed = service(MockPaymentGateway::new(), orders)
        .place_order(customer(), request(Decimal::new(50, 0)), Some(verified(5000)))
        .await
        .expect("placed");
    assert_eq!(
        placed,
        PlacedOrder {
            order_id: OrderId::new(31),
            replayed: false,
        }
    );
}

#[tokio::test]
async fn resubmission_replays_existing_order() {
    let mut orders = MockOrderRepository::new();
    orders.expect_find_by_reference().return_once(|_| {
        Ok(Some(OrderSummary {
            id: OrderId::new(31),
            user_id: UserId::new(5),
        }))
    });

    let placed = service(MockPaymentGateway::new(), orders)
        .place_order(customer(), request(Decimal::new(50, 0)), Some(verified(5000)))
        .await
        .expect("replayed");
    assert!(placed.replayed);
    assert_eq!(placed.order_id, OrderId::new(31));
}

#[tokio::test]
async fn reference_owned_by_another_user_conflicts() {
    let mut orders = MockOrderRepository::new();
    orders.expect_find_by_reference().return_once(|_| {
        Ok(Some(OrderSummary {
            id: OrderId::new(31),
            user_id: UserId::new(77),
        }))
    });

    let err = service(MockPaymentGateway::new(), orders)
        .place_order(customer(), request(Decimal::new(50, 0)), Some(verified(5000)))
        .await
        .expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn unknown_items_are_not_found() {
    let mut orders = MockOrderRepository::new();
    orders.expect_find_by_reference().return_once(|_| Ok(None));
    orders
        .expect_place()
        .return_once(|_| Err(OrderRepositoryError::unknown_item(2)));

    let err = service(MockPaymentGateway::new(), orders)
        .place_order(customer(), request(Decimal::new(50, 0)), Some(verified(5000)))
        .await
        .expect_err("unknown item");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn concurrent_duplicate_is_replayed() {
    let mut orders = MockOrderRepository::new();
    let mut lookups = 0;
    orders.expect_find_by_reference().times(2).returning(move |_| {
        lookups += 1;
        Ok((lookups > 1).then_some(OrderSummary {
            id: OrderId::new(40),
            user_id: UserId::new(5),
        }))
    });
    orders
        .expect_place()
        .return_once(|_| Err(OrderRepositoryError::duplicate_reference(REFERENCE)));

    let placed = service(MockPaymentGateway::new(), orders)
        .place_order(customer(), request(Decimal::new(50, 0)), Some(verified(5000)))
        .await
        .expect("replayed");
    assert_eq!(placed.order_id, OrderId::new(40));
    assert!(placed.replayed);
}

#[tokio::test]
async fn ledger_outage_is_service_unavailable() {
    let mut orders = MockOrderRepository::new();
    orders
        .expect_find_by_reference()
        .return_once(|_| Err(OrderRepositoryError::connection("pool timeout")));

    let err = service(MockPaymentGateway::new(), orders)
        .place_order(customer(), request(Decimal::new(50, 0)), Some(verified(5000)))
        .await
        .expect_err("outage");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
