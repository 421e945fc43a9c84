//! Representative and chamber listing handlers

use axum::{extract::Extension, Json};

use super::session::CurrentAccount;
use super::{ErrorResponse, VoterContext};
use crate::voter::repo::RepresentativeRecord;
use crate::voter::service::{self, CongressListing, ServiceError};

/// Stored representatives for the logged-in account's address
///
/// # Errors
///
/// 401 without a session, 502 if the geocoding lookup fails.
#[utoipa::path(
    get,
    path = "/representatives",
    tag = "Legislators",
    responses(
        (status = 200, description = "Matched representatives in upstream order", body = [RepresentativeRecord]),
        (status = 401, description = "Login required", body = ErrorResponse),
        (status = 502, description = "Geocoding service error", body = ErrorResponse)
    )
)]
pub async fn representatives(
    Extension(ctx): Extension<VoterContext>,
    current: CurrentAccount,
) -> Result<Json<Vec<RepresentativeRecord>>, ServiceError> {
    let reps =
        service::find_representatives(ctx.repo.as_ref(), ctx.civic.as_ref(), &current.account)
            .await?;
    Ok(Json(reps))
}

/// Senators and House members
///
/// # Errors
///
/// 500 on database failures.
#[utoipa::path(
    get,
    path = "/congress",
    tag = "Legislators",
    responses((status = 200, description = "Chamber listings", body = CongressListing))
)]
pub async fn congress(
    Extension(ctx): Extension<VoterContext>,
) -> Result<Json<CongressListing>, ServiceError> {
    Ok(Json(service::congress_listing(ctx.repo.as_ref()).await?))
}
