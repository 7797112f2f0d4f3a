//! Paystack outbound adapters implementing the `PaymentGateway` port.

mod dto;
mod http_gateway;

pub use http_gateway::{DEFAULT_PAYSTACK_BASE_URL, PaystackHttpGateway, UnconfiguredPaymentGateway};
