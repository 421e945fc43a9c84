//! Session cookie handling and the logged-in account extractors

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use super::{SessionSettings, VoterContext};
use crate::voter::repo::AccountRecord;
use crate::voter::service::{current_account, ServiceError};

/// The account behind a valid session cookie. Rejects with 401 otherwise.
pub struct CurrentAccount {
    pub account: AccountRecord,
    pub session_id: Uuid,
}

/// Like [`CurrentAccount`] but anonymous requests are allowed.
pub struct MaybeAccount(pub Option<CurrentAccount>);

/// Read the session id from the request cookies. Quoted values are accepted.
#[must_use]
pub fn session_id_from_jar(jar: &CookieJar, cookie_name: &str) -> Option<Uuid> {
    jar.get(cookie_name)
        .and_then(|cookie| Uuid::parse_str(cookie.value_trimmed()).ok())
}

/// Cookie establishing a session.
#[must_use]
pub fn session_cookie(settings: &SessionSettings, session_id: Uuid) -> Cookie<'static> {
    let max_age = i64::try_from(settings.ttl.as_secs()).unwrap_or(i64::MAX);
    Cookie::build((settings.cookie_name.clone(), session_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.secure)
        .max_age(time::Duration::seconds(max_age))
        .build()
}

/// Cookie naming the session to remove. Pass to [`CookieJar::remove`].
#[must_use]
pub fn removal_cookie(settings: &SessionSettings) -> Cookie<'static> {
    Cookie::build((settings.cookie_name.clone(), ""))
        .path("/")
        .build()
}

fn context(parts: &Parts) -> Result<VoterContext, Response> {
    parts
        .extensions
        .get::<VoterContext>()
        .cloned()
        .ok_or_else(|| ServiceError::Internal("voter context not configured".into()).into_response())
}

impl<S: Send + Sync> FromRequestParts<S> for MaybeAccount {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = context(parts)?;
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(session_id) = session_id_from_jar(&jar, &ctx.session.cookie_name) else {
            return Ok(Self(None));
        };

        let account = current_account(ctx.repo.as_ref(), session_id)
            .await
            .map_err(IntoResponse::into_response)?;

        Ok(Self(account.map(|account| CurrentAccount {
            account,
            session_id,
        })))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentAccount {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let MaybeAccount(current) = MaybeAccount::from_request_parts(parts, state).await?;
        current.ok_or_else(|| ServiceError::Unauthenticated.into_response())
    }
}
