use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{InvalidWindow, SellerId, TransactionId};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("There is no seller with id {0}")]
    SellerNotFound(SellerId),

    #[error("There is no transaction with id {0}")]
    TransactionNotFound(TransactionId),

    #[error("There are no transactions between {start} and {end}")]
    NoSalesInPeriod {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Seller {0} has no transactions")]
    NoSalesForSeller(SellerId),

    #[error("Seller {seller_id} cannot be deleted: it has {count} transaction(s)")]
    SellerHasTransactions { seller_id: SellerId, count: i64 },

    #[error(transparent)]
    InvalidWindow(#[from] InvalidWindow),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl AppError {
    /// True for errors caused by a missing entity.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::SellerNotFound(_)
                | AppError::TransactionNotFound(_)
                | AppError::NoSalesInPeriod { .. }
                | AppError::NoSalesForSeller(_)
        )
    }

    /// True for errors caused by malformed or out-of-range input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::InvalidWindow(_)
                | AppError::InvalidAmount(_)
                | AppError::InvalidThreshold(_)
                | AppError::Validation(_)
        )
    }
}
