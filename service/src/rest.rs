//! `OpenAPI` documentation for the HTTP surface.
//!
//! Handlers live in [`crate::voter::http`]; this module only collects their
//! `utoipa` path annotations and schemas into one document.

// The OpenApi derive macro generates code that triggers this lint
#![allow(clippy::needless_for_each)]

use utoipa::OpenApi;

use crate::voter::http::{
    accounts::{self, HomeResponse, LoginRequest, LoginResponse},
    bills,
    categories::{self, CategoriesResponse, CategoryBillsResponse, CategoryChangeResponse, CategorySelection},
    legislators, ErrorResponse, MessageResponse,
};
use crate::voter::repo::{AccountRecord, BillRecord, CategoryRecord, RepresentativeRecord};
use crate::voter::service::{
    BillDetailView, CongressListing, Profile, RegisterRequest, RepresentativeVote, RollCallInfo,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "VoterInfo API",
        version = "1.0.0",
        description = "Representatives, policy categories, and bill votes for registered voters",
        license(name = "MIT")
    ),
    paths(
        accounts::home,
        accounts::register,
        accounts::login,
        accounts::logout,
        accounts::profile,
        legislators::representatives,
        legislators::congress,
        categories::list_categories,
        categories::add_categories,
        categories::remove_categories,
        categories::category_bills,
        bills::bill_detail,
    ),
    components(schemas(
        AccountRecord,
        BillDetailView,
        BillRecord,
        CategoriesResponse,
        CategoryBillsResponse,
        CategoryChangeResponse,
        CategoryRecord,
        CategorySelection,
        CongressListing,
        ErrorResponse,
        HomeResponse,
        LoginRequest,
        LoginResponse,
        MessageResponse,
        Profile,
        RegisterRequest,
        RepresentativeRecord,
        RepresentativeVote,
        RollCallInfo,
    ))
)]
pub struct ApiDoc;
