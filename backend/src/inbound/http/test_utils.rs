//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, Resource, test, web};

use crate::domain::{Error, Role, SessionIdentity, UserId};
use crate::inbound::http::json_config;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const TEST_LOGIN_PATH: &str = "/__test/login/{user_id}/{role}";

/// Build a session middleware configured for tests.
///
/// Generates a fresh key per invocation, names the cookie `session` and
/// disables the `Secure` flag for plain-HTTP test requests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Session cookie set by a response, if any.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// Route that logs the client in as `{user_id}` with `{role}`.
///
/// Lets handler tests obtain an authenticated cookie without an account
/// service.
pub fn test_login_resource() -> Resource {
    web::resource(TEST_LOGIN_PATH).route(web::get().to(
        |session: SessionContext, path: web::Path<(i32, String)>| async move {
            let (user_id, role) = path.into_inner();
            let role = role
                .parse::<Role>()
                .map_err(|err| Error::invalid_request(err.to_string()))?;
            session.log_in(&SessionIdentity {
                user_id: UserId::new(user_id),
                role,
            })?;
            Ok::<_, Error>(HttpResponse::Ok().finish())
        },
    ))
}

/// Cookie for a session logged in as `user_id` with `role`.
///
/// The app under test must register [`test_login_resource`].
pub async fn login_cookie<S>(app: &S, user_id: i32, role: Role) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::get()
        .uri(&format!("/__test/login/{user_id}/{role}"))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(response.status().is_success(), "test login failed");
    session_cookie(&response).expect("test login sets a session cookie")
}

/// App mounting `routes` under `/api/v1` with test sessions and the test
/// login route.
pub fn test_app<F>(
    state: HttpState,
    routes: F,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    F: FnOnce(&mut web::ServiceConfig),
{
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .wrap(test_session_middleware())
        .service(test_login_resource())
        .service(web::scope("/api/v1").configure(routes))
}

/// Decode a JSON response body.
pub async fn json_body<B>(response: ServiceResponse<B>) -> serde_json::Value
where
    B: actix_web::body::MessageBody,
{
    let body = test::read_body(response).await;
    serde_json::from_slice(&body).expect("JSON body")
}
