//! Session helpers keeping handlers free of framework-specific logic.
//!
//! The cookie session holds two entries: the caller's [`SessionIdentity`]
//! and, between `/paystack_verify` and `/orders`, the [`VerifiedPayment`]
//! the next order must be bound to.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::domain::{Caller, Error, SessionIdentity, VerifiedPayment};

pub(crate) const IDENTITY_KEY: &str = "identity";
pub(crate) const VERIFIED_PAYMENT_KEY: &str = "verified_payment";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    fn insert<T: Serialize>(&self, key: &str, value: &T) -> Result<(), Error> {
        self.0
            .insert(key, value)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Read `key`, treating undecodable entries as absent.
    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.0.get::<T>(key) {
            Ok(value) => value,
            Err(error) => {
                warn!(key, %error, "discarding unreadable session entry");
                self.0.remove(key);
                None
            }
        }
    }

    /// Identity of the requester; anonymous when nobody is logged in.
    pub fn caller(&self) -> Caller {
        Caller::from(self.read::<SessionIdentity>(IDENTITY_KEY))
    }

    /// Start a fresh authenticated session for `identity`.
    ///
    /// The session id is renewed so a cookie issued before login cannot be
    /// replayed afterwards.
    pub fn log_in(&self, identity: &SessionIdentity) -> Result<(), Error> {
        self.0.renew();
        self.insert(IDENTITY_KEY, identity)
    }

    /// Overwrite the stored identity, e.g. after a profile or role refresh.
    pub fn persist_identity(&self, identity: &SessionIdentity) -> Result<(), Error> {
        self.insert(IDENTITY_KEY, identity)
    }

    /// Drop everything held for this client.
    pub fn purge(&self) {
        self.0.purge();
    }

    /// Payment verified earlier in this session, if any.
    pub fn verified_payment(&self) -> Option<VerifiedPayment> {
        self.read(VERIFIED_PAYMENT_KEY)
    }

    /// Remember a verified payment for the next order.
    pub fn store_verified_payment(&self, payment: &VerifiedPayment) -> Result<(), Error> {
        self.insert(VERIFIED_PAYMENT_KEY, payment)
    }

    /// Forget the verified payment once an order has consumed it.
    pub fn clear_verified_payment(&self) {
        self.0.remove(VERIFIED_PAYMENT_KEY);
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
