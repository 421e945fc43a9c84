//! Category listing and selection handlers

use axum::{
    extract::{Extension, Path},
    Json,
};
use axum_extra::extract::Form;
use serde::{Deserialize, Deserializer, Serialize};
use serde_aux::prelude::deserialize_vec_from_string_or_vec;
use utoipa::ToSchema;

use super::session::{CurrentAccount, MaybeAccount};
use super::{ErrorResponse, VoterContext};
use crate::voter::repo::{BillRecord, CategoryRecord};
use crate::voter::service::{self, ServiceError};

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryRecord>,
    /// Ids the logged-in account has chosen; empty when anonymous
    pub selected: Vec<i32>,
}

/// Category selection form
#[derive(Debug, Deserialize, ToSchema)]
pub struct CategorySelection {
    /// Category ids, comma-separated (`1,4,7`), repeated
    /// (`category_ids=1&category_ids=4`), or both
    #[serde(deserialize_with = "deserialize_category_ids")]
    #[schema(value_type = String, example = "1,4,7")]
    pub category_ids: Vec<i32>,
}

fn deserialize_category_ids<'de, D>(deserializer: D) -> Result<Vec<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<String> = deserialize_vec_from_string_or_vec(deserializer)?;
    raw.iter()
        .flat_map(|s| s.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .map_err(|_| serde::de::Error::custom(format!("invalid category id '{s}'")))
        })
        .collect()
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryChangeResponse {
    pub message: String,
    pub changed: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryBillsResponse {
    pub category: CategoryRecord,
    pub bills: Vec<BillRecord>,
}

/// All categories, with the logged-in account's selection
///
/// # Errors
///
/// 500 on database failures.
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    responses((status = 200, description = "Categories", body = CategoriesResponse))
)]
pub async fn list_categories(
    Extension(ctx): Extension<VoterContext>,
    MaybeAccount(current): MaybeAccount,
) -> Result<Json<CategoriesResponse>, ServiceError> {
    let categories = ctx.repo.list_categories().await?;
    let selected = match current {
        Some(current) => ctx
            .repo
            .list_account_categories(current.account.id)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect(),
        None => Vec::new(),
    };
    Ok(Json(CategoriesResponse {
        categories,
        selected,
    }))
}

/// Add categories to the logged-in account
///
/// # Errors
///
/// 400 for an empty selection, 404 for an unknown category.
#[utoipa::path(
    post,
    path = "/categories/add",
    tag = "Categories",
    request_body(content = CategorySelection, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Links created", body = CategoryChangeResponse),
        (status = 401, description = "Login required", body = ErrorResponse),
        (status = 404, description = "Unknown category", body = ErrorResponse)
    )
)]
pub async fn add_categories(
    Extension(ctx): Extension<VoterContext>,
    current: CurrentAccount,
    Form(selection): Form<CategorySelection>,
) -> Result<Json<CategoryChangeResponse>, ServiceError> {
    let changed =
        service::add_categories(ctx.repo.as_ref(), current.account.id, &selection.category_ids)
            .await?;
    Ok(Json(CategoryChangeResponse {
        message: "Categories added".to_string(),
        changed,
    }))
}

/// Remove categories from the logged-in account
///
/// # Errors
///
/// 400 for an empty selection.
#[utoipa::path(
    post,
    path = "/categories/remove",
    tag = "Categories",
    request_body(content = CategorySelection, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Links removed", body = CategoryChangeResponse),
        (status = 401, description = "Login required", body = ErrorResponse)
    )
)]
pub async fn remove_categories(
    Extension(ctx): Extension<VoterContext>,
    current: CurrentAccount,
    Form(selection): Form<CategorySelection>,
) -> Result<Json<CategoryChangeResponse>, ServiceError> {
    let changed =
        service::remove_categories(ctx.repo.as_ref(), current.account.id, &selection.category_ids)
            .await?;
    Ok(Json(CategoryChangeResponse {
        message: "Categories removed".to_string(),
        changed,
    }))
}

/// Bills filed under a category
///
/// # Errors
///
/// 404 for an unknown category.
#[utoipa::path(
    get,
    path = "/categories/{id}/bills",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Bills", body = CategoryBillsResponse),
        (status = 404, description = "Unknown category", body = ErrorResponse)
    )
)]
pub async fn category_bills(
    Extension(ctx): Extension<VoterContext>,
    Path(id): Path<i32>,
) -> Result<Json<CategoryBillsResponse>, ServiceError> {
    let (category, bills) = service::bills_for_category(ctx.repo.as_ref(), id).await?;
    Ok(Json(CategoryBillsResponse { category, bills }))
}
