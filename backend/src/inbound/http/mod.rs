//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod catalogue;
pub mod checkout;
pub mod error;
pub mod health;
pub mod recovery;
pub mod responses;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

use crate::domain::Error;

/// Register every `/api/v1` handler on the given scope.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(accounts::register)
        .service(accounts::login)
        .service(accounts::logout)
        .service(accounts::current_user)
        .service(accounts::update_profile)
        .service(accounts::make_admin)
        .service(accounts::make_user)
        .service(catalogue::list_games)
        .service(catalogue::list_catalogue)
        .service(catalogue::mutate_catalogue)
        .service(recovery::list_recovery)
        .service(recovery::apply_recovery_action)
        .service(checkout::verify_payment)
        .service(checkout::place_order);
}

/// JSON extractor configuration reporting malformed bodies through the
/// standard error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid JSON body: {err}")).into()
    })
}
