//! Bill detail handler

use axum::{
    extract::{Extension, Path},
    Json,
};

use super::session::MaybeAccount;
use super::{ErrorResponse, VoterContext};
use crate::voter::service::{self, BillDetailView, ServiceError};

/// A stored bill with its latest roll calls, plus the logged-in account's
/// representatives' votes
///
/// # Errors
///
/// 404 for an unknown bill, 502 if an upstream lookup fails.
#[utoipa::path(
    get,
    path = "/bills/{bill_id}",
    tag = "Bills",
    params(("bill_id" = String, Path, description = "Bill id, e.g. hr1234-115")),
    responses(
        (status = 200, description = "Bill detail", body = BillDetailView),
        (status = 404, description = "Unknown bill", body = ErrorResponse),
        (status = 502, description = "Upstream service error", body = ErrorResponse)
    )
)]
pub async fn bill_detail(
    Extension(ctx): Extension<VoterContext>,
    MaybeAccount(current): MaybeAccount,
    Path(bill_id): Path<String>,
) -> Result<Json<BillDetailView>, ServiceError> {
    let view = service::bill_detail(
        ctx.repo.as_ref(),
        ctx.congress.as_ref(),
        ctx.civic.as_ref(),
        &bill_id,
        current.as_ref().map(|c| &c.account),
    )
    .await?;
    Ok(Json(view))
}
