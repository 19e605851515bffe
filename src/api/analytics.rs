use axum::{Json, extract::State};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::application::AppError;
use crate::domain::{PeriodType, SellerId, TimeWindow, parse_timestamp, threshold_to_cents};

use super::AppState;
use super::dto::{
    BestPeriodDto, BestPeriodParams, SellerDto, SellerWithIncomeDto, ThresholdParams,
    WindowParams,
};
use super::error::ApiError;
use super::extract::{ApiPath, ApiQuery};

fn parse_window(start: &str, end: &str) -> Result<TimeWindow, ApiError> {
    let start = parse_timestamp(start)
        .ok_or_else(|| ApiError::bad_request(format!("Invalid start date: '{start}'")))?;
    let end = parse_timestamp(end)
        .ok_or_else(|| ApiError::bad_request(format!("Invalid end date: '{end}'")))?;
    Ok(TimeWindow::new(start, end).map_err(AppError::from)?)
}

pub async fn top_seller(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<WindowParams>,
) -> Result<Json<SellerWithIncomeDto>, ApiError> {
    let window = parse_window(&params.start, &params.end)?;
    let report = state.service.find_top_seller_by_period(window).await?;
    Ok(Json(report.into()))
}

pub async fn sellers_below_threshold(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ThresholdParams>,
) -> Result<Json<Vec<SellerDto>>, ApiError> {
    let window = parse_window(&params.start, &params.end)?;
    let threshold = Decimal::from_str(params.threshold.trim())
        .map_err(|_| AppError::InvalidThreshold(format!("'{}' is not a number", params.threshold)))?;
    if threshold.is_sign_negative() && !threshold.is_zero() {
        return Err(AppError::InvalidThreshold(
            "threshold must be greater than or equal to 0".to_string(),
        )
        .into());
    }
    let threshold = threshold_to_cents(threshold);

    let report = state
        .service
        .find_sellers_with_income_below_threshold(threshold, window)
        .await?;
    Ok(Json(
        report.sellers.into_iter().map(SellerDto::from).collect(),
    ))
}

pub async fn best_period(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<SellerId>,
    ApiQuery(params): ApiQuery<BestPeriodParams>,
) -> Result<Json<BestPeriodDto>, ApiError> {
    let period = match params.period.as_deref() {
        Some(value) => PeriodType::from_str(value).map_err(AppError::Validation)?,
        None => PeriodType::default(),
    };
    let report = state.service.find_best_period_for_seller(id, period).await?;
    Ok(Json(report.into()))
}
