use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::application::{BestPeriodReport, TopSellerReport, TransactionInfo};
use crate::domain::{
    MAX_AMOUNT_CENTS, PaymentType, PeriodType, Seller, SellerId, SellerIncome, SellerPatch,
    cents_to_decimal, format_cents,
};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

fn amount_in_range(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("range");
        err.message = Some("must be greater than or equal to 0".into());
        return Err(err);
    }
    if *value > cents_to_decimal(MAX_AMOUNT_CENTS) {
        let mut err = ValidationError::new("range");
        err.message =
            Some(format!("must not exceed {}", format_cents(MAX_AMOUNT_CENTS)).into());
        return Err(err);
    }
    Ok(())
}

// ========================
// Requests
// ========================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SellerCreateDto {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub contact_info: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SellerUpdateDto {
    pub id: SellerId,
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub contact_info: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SellerPatchDto {
    pub id: SellerId,
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub contact_info: Option<String>,
}

impl SellerPatchDto {
    pub fn into_patch(self) -> (SellerId, SellerPatch) {
        (
            self.id,
            SellerPatch {
                name: self.name,
                contact_info: self.contact_info,
            },
        )
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCreateDto {
    pub seller_id: SellerId,
    #[validate(custom(function = "amount_in_range"))]
    pub amount: Decimal,
    pub payment_type: PaymentType,
}

/// `?start=..&end=..`
#[derive(Debug, Deserialize)]
pub struct WindowParams {
    pub start: String,
    pub end: String,
}

/// `?start=..&end=..&threshold=..`
#[derive(Debug, Deserialize)]
pub struct ThresholdParams {
    pub start: String,
    pub end: String,
    pub threshold: String,
}

/// `?period=..`
#[derive(Debug, Deserialize)]
pub struct BestPeriodParams {
    pub period: Option<String>,
}

// ========================
// Responses
// ========================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerDto {
    pub id: SellerId,
    pub name: String,
    pub contact_info: String,
    pub registration_date: DateTime<Utc>,
}

impl From<Seller> for SellerDto {
    fn from(seller: Seller) -> Self {
        Self {
            id: seller.id,
            name: seller.name,
            contact_info: seller.contact_info,
            registration_date: seller.registration_date,
        }
    }
}

impl From<SellerIncome> for SellerDto {
    fn from(income: SellerIncome) -> Self {
        income.seller.into()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub id: i64,
    pub seller: SellerDto,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub payment_type: PaymentType,
    pub transaction_date: DateTime<Utc>,
}

impl From<TransactionInfo> for TransactionDto {
    fn from(info: TransactionInfo) -> Self {
        Self {
            id: info.transaction.id,
            seller: info.seller.into(),
            amount: cents_to_decimal(info.transaction.amount_cents),
            payment_type: info.transaction.payment_type,
            transaction_date: info.transaction.transaction_date,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerWithIncomeDto {
    pub seller: SellerDto,
    #[serde(with = "rust_decimal::serde::float")]
    pub sum_of_transaction_amount: Decimal,
}

impl From<TopSellerReport> for SellerWithIncomeDto {
    fn from(report: TopSellerReport) -> Self {
        Self {
            seller: report.seller.into(),
            sum_of_transaction_amount: cents_to_decimal(report.total),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestPeriodDto {
    pub seller: SellerDto,
    pub period: PeriodType,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::float")]
    pub sum_of_transaction_amount: Decimal,
    pub transaction_count: usize,
}

impl From<BestPeriodReport> for BestPeriodDto {
    fn from(report: BestPeriodReport) -> Self {
        Self {
            seller: report.seller.into(),
            period: report.period,
            period_start: report.period_start,
            period_end: report.period_end,
            sum_of_transaction_amount: cents_to_decimal(report.total),
            transaction_count: report.transaction_count,
        }
    }
}
