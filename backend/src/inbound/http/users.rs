//! Session API handlers.
//!
//! ```text
//! POST /api/v1/signup {"fullName":"Ada Lovelace","email":"ada@example.com",...}
//! POST /api/v1/login {"email":"admin@tastetrail.com","password":"password"}
//! POST /api/v1/logout
//! GET /api/v1/users/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::ports::SignupOutcome;
use crate::domain::{
    AuthenticatedUser, Error, LoginCredentials, LoginValidationError, MANUAL_SIGN_IN_MESSAGE,
    SIGNED_UP_MESSAGE, SignupDraft, SignupRequest,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    EMAIL, email_error, map_signup_validation_error, password_too_short,
};

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "admin@tastetrail.com")]
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Registration form for `POST /api/v1/signup`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequestBody {
    #[schema(example = "Ada Lovelace")]
    pub full_name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// US number in any common spelling.
    #[schema(example = "(617) 555-0123")]
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub is_harvard_grad: bool,
}

impl SignupRequestBody {
    fn draft(&self) -> SignupDraft<'_> {
        SignupDraft {
            full_name: &self.full_name,
            email: &self.email,
            phone: &self.phone,
            password: &self.password,
            confirm_password: &self.confirm_password,
            is_harvard_grad: self.is_harvard_grad,
        }
    }
}

/// Created account and whether the caller is now signed in.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub signed_in: bool,
    #[schema(example = "Account created successfully!")]
    pub message: String,
    pub user: CurrentUserResponse,
}

/// Identity held in the session.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    #[schema(example = "123e4567-e89b-12d3-a456-426614174000")]
    pub id: String,
    #[schema(example = "admin@tastetrail.com")]
    pub email: String,
    pub display_name: Option<String>,
    /// Display name, else the local part of the email.
    #[schema(example = "TasteTrail Admin")]
    pub greeting_name: String,
}

impl From<&AuthenticatedUser> for CurrentUserResponse {
    fn from(user: &AuthenticatedUser) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            display_name: user.display_name().map(ToString::to_string),
            greeting_name: user.greeting_name().to_owned(),
        }
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::Email(inner) => email_error(&inner, EMAIL),
        LoginValidationError::PasswordTooShort { min } => password_too_short(min),
    }
}

/// Create an account and sign it in when the identity provider allows.
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    request_body = SignupRequestBody,
    responses(
        (status = 201, description = "Account created", body = SignupResponse,
            headers(("Set-Cookie" = String, description = "Session cookie when signed in"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email or phone already registered", body = ErrorSchema),
        (status = 503, description = "Identity provider unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error")
    ),
    tags = ["session"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignupRequestBody>,
) -> ApiResult<HttpResponse> {
    let request =
        SignupRequest::try_from_draft(payload.draft()).map_err(map_signup_validation_error)?;
    let outcome = state.login.register(&request).await?;
    let (signed_in, message) = match &outcome {
        SignupOutcome::SignedIn(user) => {
            session.persist_user(user)?;
            info!(user_id = %user.id(), "user signed up and signed in");
            (true, SIGNED_UP_MESSAGE)
        }
        SignupOutcome::Created(user) => {
            info!(user_id = %user.id(), "user signed up without a session");
            (false, MANUAL_SIGN_IN_MESSAGE)
        }
    };
    Ok(HttpResponse::Created().json(SignupResponse {
        signed_in,
        message: message.to_owned(),
        user: CurrentUserResponse::from(outcome.user()),
    }))
}

/// Authenticate with the identity provider and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = CurrentUserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Identity provider unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error")
    ),
    tags = ["session"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<CurrentUserResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let user = state.login.authenticate(&credentials).await?;
    session.persist_user(&user)?;
    info!(user_id = %user.id(), "user signed in");
    Ok(web::Json(CurrentUserResponse::from(&user)))
}

/// Clear the session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["session"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Return the identity held in the session.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = CurrentUserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["session"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(session: SessionContext) -> ApiResult<web::Json<CurrentUserResponse>> {
    let user = session.require_user()?;
    Ok(web::Json(CurrentUserResponse::from(&user)))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
