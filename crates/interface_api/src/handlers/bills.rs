//! Bill handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use core_kernel::{BillId, OperationMetadata};

use crate::dto::bills::{BillListResponse, BillResponse, CreateBillBody, ListBillsQuery};
use crate::extract::{ValidatedJson, ValidatedQuery};
use crate::{error::ApiError, AppState};

/// Creates the bill for a completed appointment
pub async fn create_bill(
    State(state): State<AppState>,
    Extension(metadata): Extension<OperationMetadata>,
    ValidatedJson(body): ValidatedJson<CreateBillBody>,
) -> Result<(StatusCode, Json<BillResponse>), ApiError> {
    let bill = state.bills.create_bill(body.into(), Some(&metadata)).await?;
    Ok((StatusCode::CREATED, Json(bill.into())))
}

/// Lists bills with pagination and optional filters
pub async fn list_bills(
    State(state): State<AppState>,
    Extension(metadata): Extension<OperationMetadata>,
    ValidatedQuery(query): ValidatedQuery<ListBillsQuery>,
) -> Result<Json<BillListResponse>, ApiError> {
    let filter = query.filter()?;
    let page = state
        .bills
        .list_bills(query.page(), query.page_size(), filter, Some(&metadata))
        .await?;
    Ok(Json(page.into()))
}

/// Gets a bill by ID
pub async fn get_bill(
    State(state): State<AppState>,
    Extension(metadata): Extension<OperationMetadata>,
    Path(bill_id): Path<i64>,
) -> Result<Json<BillResponse>, ApiError> {
    let bill = state
        .bills
        .get_bill(BillId::new(bill_id), Some(&metadata))
        .await?;
    Ok(Json(bill.into()))
}
