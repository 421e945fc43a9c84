//! Registration, login, logout, home, and profile handlers

use axum::{extract::Extension, http::StatusCode, Form, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::session::{removal_cookie, session_cookie, CurrentAccount, MaybeAccount};
use super::{ErrorResponse, MessageResponse, VoterContext};
use crate::voter::repo::AccountRecord;
use crate::voter::service::{self, Profile, RegisterRequest, ServiceError};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HomeResponse {
    pub service: String,
    pub screen_name: Option<String>,
}

/// Login form
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub screen_name: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub account: AccountRecord,
}

/// Service name and the logged-in screen name, if any
#[utoipa::path(
    get,
    path = "/",
    tag = "Accounts",
    responses((status = 200, description = "Home", body = HomeResponse))
)]
pub async fn home(MaybeAccount(current): MaybeAccount) -> Json<HomeResponse> {
    Json(HomeResponse {
        service: env!("CARGO_PKG_NAME").to_string(),
        screen_name: current.map(|c| c.account.screen_name),
    })
}

/// Register an account
///
/// # Errors
///
/// 400 for missing fields, 409 if the screen name or email is registered.
#[utoipa::path(
    post,
    path = "/register",
    tag = "Accounts",
    request_body(content = RegisterRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Account created", body = AccountRecord),
        (status = 400, description = "Invalid form", body = ErrorResponse),
        (status = 409, description = "Already registered", body = ErrorResponse)
    )
)]
pub async fn register(
    Extension(ctx): Extension<VoterContext>,
    Form(request): Form<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountRecord>), ServiceError> {
    let account = service::register(ctx.repo.as_ref(), &request).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// Log in and receive the session cookie
///
/// # Errors
///
/// 401 with "Email not registered!" or "Incorrect password!".
#[utoipa::path(
    post,
    path = "/login",
    tag = "Accounts",
    request_body(content = LoginRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Logged in; session cookie set", body = LoginResponse),
        (status = 401, description = "Unknown screen name or wrong password", body = ErrorResponse)
    )
)]
pub async fn login(
    Extension(ctx): Extension<VoterContext>,
    jar: CookieJar,
    Form(request): Form<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ServiceError> {
    let session = service::login(
        ctx.repo.as_ref(),
        &request.screen_name,
        &request.password,
        ctx.session.ttl,
    )
    .await?;

    Ok((
        jar.add(session_cookie(&ctx.session, session.session_id)),
        Json(LoginResponse {
            message: "Logged in successfully".to_string(),
            account: session.account,
        }),
    ))
}

/// End the current session and clear the cookie
///
/// # Errors
///
/// 500 if the session cannot be deleted.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Accounts",
    responses((status = 200, description = "Logged out", body = MessageResponse))
)]
pub async fn logout(
    Extension(ctx): Extension<VoterContext>,
    jar: CookieJar,
    MaybeAccount(current): MaybeAccount,
) -> Result<(CookieJar, Json<MessageResponse>), ServiceError> {
    if let Some(current) = current {
        service::logout(ctx.repo.as_ref(), current.session_id).await?;
    }

    Ok((
        jar.remove(removal_cookie(&ctx.session)),
        Json(MessageResponse::new("Logged out successfully")),
    ))
}

/// The logged-in account and its chosen categories
///
/// # Errors
///
/// 401 without a valid session.
#[utoipa::path(
    get,
    path = "/profile",
    tag = "Accounts",
    responses(
        (status = 200, description = "Profile", body = Profile),
        (status = 401, description = "Login required", body = ErrorResponse)
    )
)]
pub async fn profile(
    Extension(ctx): Extension<VoterContext>,
    current: CurrentAccount,
) -> Result<Json<Profile>, ServiceError> {
    Ok(Json(service::profile(ctx.repo.as_ref(), current.account).await?))
}
