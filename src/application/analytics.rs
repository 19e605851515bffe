use tracing::debug;

use crate::domain::{Cents, PeriodType, SellerId, SellerIncome, TimeWindow, best_period};

use super::{AppError, BelowThresholdReport, BestPeriodReport, LedgerService, TopSellerReport};

impl LedgerService {
    /// Seller with the largest income in the inclusive window.
    /// Equal incomes resolve to the lowest seller id.
    pub async fn find_top_seller_by_period(
        &self,
        window: TimeWindow,
    ) -> Result<TopSellerReport, AppError> {
        let income = self
            .repo
            .top_seller_by_period(window.start, window.end)
            .await?
            .ok_or(AppError::NoSalesInPeriod {
                start: window.start,
                end: window.end,
            })?;

        debug!(
            seller_id = income.seller.id,
            total = income.total,
            "top seller found"
        );
        Ok(TopSellerReport::new(window, income))
    }

    /// Sellers whose income in the window is strictly below `threshold`, by descending income.
    ///
    /// Only sellers with at least one transaction in the window are considered.
    pub async fn find_sellers_with_income_below_threshold(
        &self,
        threshold: Cents,
        window: TimeWindow,
    ) -> Result<BelowThresholdReport, AppError> {
        if threshold < 0 {
            return Err(AppError::InvalidThreshold(
                "threshold must be greater than or equal to 0".to_string(),
            ));
        }

        let sellers: Vec<SellerIncome> = self
            .repo
            .sellers_with_income_below(threshold, window.start, window.end)
            .await?;

        debug!(count = sellers.len(), threshold, "sellers below threshold");
        Ok(BelowThresholdReport {
            from_date: window.start,
            to_date: window.end,
            threshold,
            sellers,
        })
    }

    /// The calendar period of the given granularity in which a seller earned the most.
    /// Equal totals resolve to the earliest period.
    pub async fn find_best_period_for_seller(
        &self,
        seller_id: SellerId,
        period: PeriodType,
    ) -> Result<BestPeriodReport, AppError> {
        let seller = self.get_seller(seller_id).await?;
        let transactions = self.repo.list_transactions_for_seller(seller_id).await?;

        let best = best_period(&transactions, period).ok_or(AppError::NoSalesForSeller(seller_id))?;
        let transaction_count = transactions
            .iter()
            .filter(|t| {
                t.transaction_date >= best.period_start && t.transaction_date < best.period_end
            })
            .count();

        Ok(BestPeriodReport {
            seller,
            period,
            period_start: best.period_start,
            period_end: best.period_end,
            total: best.total,
            transaction_count,
        })
    }
}
