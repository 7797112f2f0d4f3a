//! Account handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"name":"Ada","email":"ada@example.com","password":"secret1","passwordConfirm":"secret1"}
//! POST /api/v1/auth/login {"email":"ada@example.com","password":"secret1"}
//! POST /api/v1/auth/logout
//! GET  /api/v1/auth/me
//! POST /api/v1/auth/profile {"name":"Ada L."}
//! POST /api/v1/admin/make-admin {"email":"bo@example.com"}
//! POST /api/v1/admin/make-user {"email":"bo@example.com"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    Caller, DisplayName, EmailAddress, LoginCredentials, Registration, Role, SessionIdentity, User,
    require_admin, require_authenticated,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::responses::Ack;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{credentials_error, user_field_error};

/// Registration success message shown by the storefront.
pub const REGISTERED_MESSAGE: &str = "Registration successful. Please login.";

/// Body for `POST /auth/register`. Missing fields count as blank.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(alias = "password_confirm")]
    pub password_confirm: String,
}

/// Body for `POST /auth/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body for `POST /auth/profile`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct ProfileRequest {
    pub name: String,
}

/// Body for the admin role-change endpoints.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct RoleChangeRequest {
    pub email: String,
}

/// Success body carrying the public user.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    pub user: User,
}

impl UserResponse {
    fn new(user: User) -> Self {
        Self {
            success: true,
            message: None,
            user,
        }
    }
}

fn identity_of(user: &User) -> SessionIdentity {
    SessionIdentity {
        user_id: user.id,
        role: user.role,
    }
}

/// Create an account with role `user`.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 409, description = "Email already registered", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let registration = Registration::try_from_parts(
        &body.name,
        &body.email,
        &body.password,
        &body.password_confirm,
    )
    .map_err(credentials_error)?;
    let user = state.accounts.register(registration).await?;
    info!(user_id = %user.id, "account registered");
    Ok(HttpResponse::Created().json(UserResponse {
        success: true,
        message: Some(REGISTERED_MESSAGE.to_owned()),
        user,
    }))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 401, description = "Invalid credentials", body = ErrorEnvelope),
        (status = 403, description = "Account disabled", body = ErrorEnvelope)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let body = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&body.email, &body.password).map_err(credentials_error)?;
    let user = state.accounts.authenticate(credentials).await?;
    session.log_in(&identity_of(&user))?;
    Ok(web::Json(UserResponse::new(user)))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 200, description = "Session cleared", body = Ack)),
    tags = ["accounts"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> web::Json<Ack> {
    session.purge();
    web::Json(Ack::OK)
}

/// Current user; also refreshes the role cached in the session.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Login required", body = ErrorEnvelope)
    ),
    tags = ["accounts"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let user = match state.accounts_query.current_user(session.caller()).await {
        Ok(user) => user,
        Err(error) => {
            if session.caller().identity().is_some() {
                session.purge();
            }
            return Err(error);
        }
    };
    session.persist_identity(&identity_of(&user))?;
    Ok(web::Json(UserResponse::new(user)))
}

/// Rename the current user.
#[utoipa::path(
    post,
    path = "/api/v1/auth/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 401, description = "Login required", body = ErrorEnvelope)
    ),
    tags = ["accounts"],
    operation_id = "updateProfile"
)]
#[post("/auth/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let caller = session.caller();
    require_authenticated(&caller)?;
    let name = DisplayName::parse(&payload.name).map_err(user_field_error)?;
    let user = state.accounts.update_profile(caller, name).await?;
    session.persist_identity(&identity_of(&user))?;
    Ok(web::Json(UserResponse::new(user)))
}

async fn change_role(
    state: &HttpState,
    session: &SessionContext,
    payload: RoleChangeRequest,
    role: Role,
) -> ApiResult<web::Json<UserResponse>> {
    let caller = session.caller();
    require_admin(&caller)?;
    let email = EmailAddress::parse(&payload.email).map_err(user_field_error)?;
    let user = state.accounts.change_role(caller, email, role).await?;
    if let Caller::Authenticated(identity) = caller {
        if identity.user_id == user.id {
            session.persist_identity(&identity_of(&user))?;
        }
    }
    info!(target_user = %user.id, role = %role, "role changed");
    Ok(web::Json(UserResponse::new(user)))
}

/// Grant the admin role.
#[utoipa::path(
    post,
    path = "/api/v1/admin/make-admin",
    request_body = RoleChangeRequest,
    responses(
        (status = 200, description = "Role changed", body = UserResponse),
        (status = 403, description = "Admin required", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope)
    ),
    tags = ["accounts"],
    operation_id = "makeAdmin"
)]
#[post("/admin/make-admin")]
pub async fn make_admin(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RoleChangeRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    change_role(&state, &session, payload.into_inner(), Role::Admin).await
}

/// Revoke the admin role.
#[utoipa::path(
    post,
    path = "/api/v1/admin/make-user",
    request_body = RoleChangeRequest,
    responses(
        (status = 200, description = "Role changed", body = UserResponse),
        (status = 403, description = "Admin required", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope)
    ),
    tags = ["accounts"],
    operation_id = "makeUser"
)]
#[post("/admin/make-user")]
pub async fn make_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RoleChangeRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    change_role(&state, &session, payload.into_inner(), Role::User).await
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
