use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::application::AppError;
use crate::domain::{TransactionId, decimal_to_cents};

use super::AppState;
use super::dto::{TransactionCreateDto, TransactionDto};
use super::error::ApiError;
use super::extract::{ApiPath, ValidatedJson};

pub async fn list_transactions(
    State(state): State<AppState>,
) -> Result<Json<Vec<TransactionDto>>, ApiError> {
    let transactions = state.service.list_transactions().await?;
    Ok(Json(
        transactions.into_iter().map(TransactionDto::from).collect(),
    ))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<TransactionId>,
) -> Result<Json<TransactionDto>, ApiError> {
    let transaction = state.service.get_transaction(id).await?;
    Ok(Json(transaction.into()))
}

pub async fn create_transaction(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<TransactionCreateDto>,
) -> Result<impl IntoResponse, ApiError> {
    let amount_cents =
        decimal_to_cents(body.amount).map_err(|e| AppError::InvalidAmount(e.to_string()))?;

    let info = state
        .service
        .create_transaction(body.seller_id, amount_cents, body.payment_type)
        .await?;
    let location = format!("/api/v1/transaction/{}", info.transaction.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(TransactionDto::from(info)),
    ))
}
