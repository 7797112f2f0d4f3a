//! In-process HTTP harness wiring the real handlers over in-memory adapters.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use storefront::Trace;
use storefront::domain::ports::PasswordHasher;
use storefront::domain::{DisplayName, EmailAddress, Role};
use storefront::inbound::http::state::{DrivenAdapters, HttpState};
use storefront::inbound::http::{configure_api, json_config};
use storefront::outbound::Argon2PasswordHasher;
use storefront::outbound::memory::{FixturePaymentGateway, MemoryStore};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-secret";
pub const CUSTOMER_PASSWORD: &str = "customer-secret";

/// Shared store and gateway behind every client of one test.
pub struct Backend {
    pub store: Arc<MemoryStore>,
    pub gateway: Arc<FixturePaymentGateway>,
    state: HttpState,
}

impl Backend {
    /// Fresh backend holding a single admin account.
    pub async fn with_admin() -> Self {
        let store = Arc::new(MemoryStore::new());
        let gateway = Arc::new(FixturePaymentGateway::new());
        let hasher = Arc::new(Argon2PasswordHasher::low_cost().expect("argon2 params"));
        let hash = hasher
            .hash(ADMIN_PASSWORD)
            .await
            .expect("hash admin password");
        store
            .seed_user(
                DisplayName::parse("Admin").expect("valid name"),
                EmailAddress::parse(ADMIN_EMAIL).expect("valid email"),
                hash,
                Role::Admin,
            )
            .expect("seed admin");
        let state = HttpState::from_adapters(DrivenAdapters {
            catalogue: Arc::clone(&store),
            recovery: Arc::clone(&store),
            orders: Arc::clone(&store),
            users: Arc::clone(&store),
            gateway: Arc::clone(&gateway),
            hasher,
        });
        Self {
            store,
            gateway,
            state,
        }
    }

    /// Anonymous client with its own cookie jar.
    pub async fn client(
        &self,
    ) -> Client<impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>>
    {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
            .cookie_name("session".into())
            .cookie_secure(false)
            .build();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(self.state.clone()))
                .app_data(json_config())
                .wrap(Trace)
                .service(web::scope("/api/v1").wrap(session).configure(configure_api)),
        )
        .await;
        Client { app, cookie: None }
    }

    /// Client signed in as the seeded admin.
    pub async fn admin(
        &self,
    ) -> Client<impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>>
    {
        let mut client = self.client().await;
        client.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        client
    }

    /// Client for a newly registered and signed-in customer.
    pub async fn customer(
        &self,
        email: &str,
    ) -> Client<impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>>
    {
        let mut client = self.client().await;
        let (status, _) = client
            .post(
                "/api/v1/auth/register",
                json!({
                    "name": "Customer",
                    "email": email,
                    "password": CUSTOMER_PASSWORD,
                    "passwordConfirm": CUSTOMER_PASSWORD,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "registration of {email}");
        client.login(email, CUSTOMER_PASSWORD).await;
        client
    }
}

/// Test client that carries the session cookie between calls.
pub struct Client<S> {
    app: S,
    cookie: Option<Cookie<'static>>,
}

impl<S, B> Client<S>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    pub async fn get(&mut self, path: &str) -> (StatusCode, Value) {
        self.send(test::TestRequest::get().uri(path)).await
    }

    pub async fn post(&mut self, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(test::TestRequest::post().uri(path).set_json(body))
            .await
    }

    pub async fn login(&mut self, email: &str, password: &str) {
        let (status, body) = self
            .post(
                "/api/v1/auth/login",
                json!({"email": email, "password": password}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login as {email}: {body}");
    }

    async fn send(&mut self, request: test::TestRequest) -> (StatusCode, Value) {
        let request = match &self.cookie {
            Some(cookie) => request.cookie(cookie.clone()),
            None => request,
        };
        let response = test::call_service(&self.app, request.to_request()).await;
        if let Some(cookie) = response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
        {
            self.cookie = Some(cookie.into_owned());
        }
        let status = response.status();
        let bytes = test::read_body(response).await;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, body)
    }
}

/// Add a catalogue item as admin and return its id.
pub async fn add_catalogue_item<S, B>(admin: &mut Client<S>, code: &str, price: f64) -> i64
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = admin
        .post(
            "/api/v1/admin/catalogue",
            json!({"action": "add", "bookingCode": code, "price": price}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "add {code}: {body}");
    body["item"]["id"].as_i64().expect("item id")
}

/// Stage a booking code as admin and return the staged id.
pub async fn stage_code<S, B>(admin: &mut Client<S>, code: &str) -> i64
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = admin
        .post(
            "/api/v1/recovery",
            json!({"action": "add", "bookingCode": code}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "stage {code}: {body}");
    body["id"].as_i64().expect("staged id")
}
