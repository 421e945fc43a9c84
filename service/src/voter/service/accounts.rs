//! Registration, login, and sessions

use std::time::Duration;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::ServiceError;
use crate::voter::repo::{AccountRecord, AccountRepoError, NewAccount, VoterRepo};

/// Registration form
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub screen_name: String,
    pub email: String,
    pub password: String,
    pub address: String,
}

/// A session established by [`login`].
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub account: AccountRecord,
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

fn validate_registration(request: &RegisterRequest) -> Result<(), ServiceError> {
    let screen_name = request.screen_name.trim();
    if screen_name.is_empty() {
        return Err(ServiceError::Validation("Screen name is required".to_string()));
    }
    if screen_name.len() > 64 {
        return Err(ServiceError::Validation("Screen name too long".to_string()));
    }
    if !request.email.contains('@') {
        return Err(ServiceError::Validation("A valid email is required".to_string()));
    }
    if request.password.is_empty() {
        return Err(ServiceError::Validation("Password is required".to_string()));
    }
    if request.address.trim().is_empty() {
        return Err(ServiceError::Validation("Address is required".to_string()));
    }
    Ok(())
}

/// Hash a password with argon2 and a random salt.
///
/// # Errors
///
/// Returns `ServiceError::Internal` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())
        .map_err(|e| ServiceError::Internal(format!("salt: {e}")))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::Internal(format!("password hash: {e}")))
}

/// Whether `password` matches a stored argon2 hash. A malformed hash never
/// matches.
#[must_use]
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

/// Create an account.
///
/// # Errors
///
/// Returns `ServiceError::Validation` for missing fields,
/// `ServiceError::AccountExists` if the screen name or email is taken,
/// `ServiceError::Account` on database failures.
pub async fn register(
    repo: &dyn VoterRepo,
    request: &RegisterRequest,
) -> Result<AccountRecord, ServiceError> {
    validate_registration(request)?;

    let screen_name = request.screen_name.trim();
    let email = request.email.trim();
    if repo.account_exists(screen_name, email).await? {
        return Err(ServiceError::AccountExists);
    }

    let account = NewAccount {
        screen_name: screen_name.to_string(),
        email: email.to_string(),
        password_hash: hash_password(&request.password)?,
        address: Some(request.address.trim().to_string()),
    };

    match repo.create_account(&account).await {
        Ok(record) => {
            tracing::info!(account_id = record.id, "Registered account");
            Ok(record)
        }
        Err(AccountRepoError::DuplicateScreenName) => Err(ServiceError::AccountExists),
        Err(e) => Err(e.into()),
    }
}

/// Check credentials and start a session lasting `ttl`.
///
/// # Errors
///
/// Returns `ServiceError::InvalidCredentials` for an unknown screen name or a
/// wrong password, `ServiceError::Repo`/`Account` on database failures.
pub async fn login(
    repo: &dyn VoterRepo,
    screen_name: &str,
    password: &str,
    ttl: Duration,
) -> Result<LoginSession, ServiceError> {
    let account = match repo.get_account_by_screen_name(screen_name.trim()).await {
        Ok(account) => account,
        Err(AccountRepoError::NotFound) => {
            return Err(ServiceError::InvalidCredentials("Email not registered!"))
        }
        Err(e) => return Err(e.into()),
    };

    if !verify_password(password, &account.password_hash) {
        return Err(ServiceError::InvalidCredentials("Incorrect password!"));
    }

    let ttl = chrono::Duration::from_std(ttl)
        .map_err(|e| ServiceError::Internal(format!("session ttl: {e}")))?;
    let expires_at = Utc::now() + ttl;
    let session_id = repo.create_session(account.id, expires_at).await?;

    Ok(LoginSession {
        account,
        session_id,
        expires_at,
    })
}

/// End a session.
///
/// # Errors
///
/// Returns `ServiceError::Repo` on database failures.
pub async fn logout(repo: &dyn VoterRepo, session_id: Uuid) -> Result<(), ServiceError> {
    repo.delete_session(session_id).await?;
    Ok(())
}

/// The account behind an unexpired session, if any.
///
/// # Errors
///
/// Returns `ServiceError::Repo` on database failures.
pub async fn current_account(
    repo: &dyn VoterRepo,
    session_id: Uuid,
) -> Result<Option<AccountRecord>, ServiceError> {
    Ok(repo.get_session_account(session_id, Utc::now()).await?)
}
