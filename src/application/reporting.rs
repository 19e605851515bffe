use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Cents, PeriodType, Seller, SellerIncome, TimeWindow};

/// The seller with the highest income over a window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopSellerReport {
    pub from_date: DateTime<Utc>,
    pub to_date: DateTime<Utc>,
    pub seller: Seller,
    pub total: Cents,
}

impl TopSellerReport {
    pub fn new(window: TimeWindow, income: SellerIncome) -> Self {
        Self {
            from_date: window.start,
            to_date: window.end,
            seller: income.seller,
            total: income.total,
        }
    }
}

/// Sellers earning less than a threshold over a window, by descending income.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BelowThresholdReport {
    pub from_date: DateTime<Utc>,
    pub to_date: DateTime<Utc>,
    pub threshold: Cents,
    pub sellers: Vec<SellerIncome>,
}

/// The calendar period in which a seller earned the most.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestPeriodReport {
    pub seller: Seller,
    pub period: PeriodType,
    pub period_start: DateTime<Utc>,
    /// Exclusive: the start of the following period.
    pub period_end: DateTime<Utc>,
    pub total: Cents,
    pub transaction_count: usize,
}
