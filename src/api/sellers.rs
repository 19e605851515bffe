use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::domain::SellerId;

use super::AppState;
use super::dto::{SellerCreateDto, SellerDto, SellerPatchDto, SellerUpdateDto, TransactionDto};
use super::error::ApiError;
use super::extract::{ApiPath, ValidatedJson};

pub async fn list_sellers(State(state): State<AppState>) -> Result<Json<Vec<SellerDto>>, ApiError> {
    let sellers = state.service.list_sellers().await?;
    Ok(Json(sellers.into_iter().map(SellerDto::from).collect()))
}

pub async fn get_seller(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<SellerId>,
) -> Result<Json<SellerDto>, ApiError> {
    let seller = state.service.get_seller(id).await?;
    Ok(Json(seller.into()))
}

pub async fn create_seller(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<SellerCreateDto>,
) -> Result<impl IntoResponse, ApiError> {
    let seller = state
        .service
        .create_seller(body.name, body.contact_info)
        .await?;
    let location = format!("/api/v1/seller/{}", seller.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(SellerDto::from(seller)),
    ))
}

pub async fn replace_seller(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<SellerUpdateDto>,
) -> Result<Json<SellerDto>, ApiError> {
    let seller = state
        .service
        .replace_seller(body.id, body.name, body.contact_info)
        .await?;
    Ok(Json(seller.into()))
}

pub async fn patch_seller(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<SellerPatchDto>,
) -> Result<Json<SellerDto>, ApiError> {
    let (id, patch) = body.into_patch();
    let seller = state.service.patch_seller(id, patch).await?;
    Ok(Json(seller.into()))
}

pub async fn delete_seller(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<SellerId>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_seller(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_seller_transactions(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<SellerId>,
) -> Result<Json<Vec<TransactionDto>>, ApiError> {
    let transactions = state.service.list_transactions_for_seller(id).await?;
    Ok(Json(
        transactions.into_iter().map(TransactionDto::from).collect(),
    ))
}
