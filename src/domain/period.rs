use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use super::{Cents, Transaction};

/// Calendar granularity used to bucket a seller's income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Day => "day",
            PeriodType::Week => "week",
            PeriodType::Month => "month",
            PeriodType::Year => "year",
        }
    }

    /// Start (inclusive) and end (exclusive) of the period containing `at`, in UTC.
    pub fn bounds(&self, at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let date = at.date_naive();
        let (start, end) = match self {
            PeriodType::Day => (date, date + Days::new(1)),
            PeriodType::Week => {
                // Week starts on Monday
                let start = date - Days::new(u64::from(date.weekday().num_days_from_monday()));
                (start, start + Days::new(7))
            }
            PeriodType::Month => {
                let start = date - Days::new(u64::from(date.day0()));
                (start, start + Months::new(1))
            }
            PeriodType::Year => {
                let start = date - Days::new(u64::from(date.ordinal0()));
                (start, start + Months::new(12))
            }
        };
        (midnight(start), midnight(end))
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

impl FromStr for PeriodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" | "daily" => Ok(PeriodType::Day),
            "week" | "weekly" => Ok(PeriodType::Week),
            "month" | "monthly" => Ok(PeriodType::Month),
            "year" | "yearly" => Ok(PeriodType::Year),
            other => Err(format!(
                "unknown period '{other}' (expected day, week, month or year)"
            )),
        }
    }
}

impl std::fmt::Display for PeriodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Income summed over one calendar period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodIncome {
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub total: Cents,
}

/// Sum transactions per period and return the period with the highest income.
/// Equal totals resolve to the earliest period. `None` when there are no transactions.
/// Sums saturate at `Cents::MAX` rather than overflow.
pub fn best_period(transactions: &[Transaction], period: PeriodType) -> Option<PeriodIncome> {
    let mut buckets: BTreeMap<DateTime<Utc>, (DateTime<Utc>, Cents)> = BTreeMap::new();
    for transaction in transactions {
        let (start, end) = period.bounds(transaction.transaction_date);
        let bucket = buckets.entry(start).or_insert((end, 0));
        bucket.1 = bucket.1.saturating_add(transaction.amount_cents);
    }

    let mut best: Option<PeriodIncome> = None;
    for (period_start, (period_end, total)) in buckets {
        if best.is_none_or(|current| total > current.total) {
            best = Some(PeriodIncome {
                period_start,
                period_end,
                total,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PaymentType;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn tx(id: i64, amount_cents: Cents, at: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            seller_id: 1,
            amount_cents,
            payment_type: PaymentType::Card,
            transaction_date: at,
        }
    }

    #[test]
    fn test_bounds_day() {
        let (start, end) = PeriodType::Day.bounds(utc(2025, 8, 27, 15));
        assert_eq!(start, utc(2025, 8, 27, 0));
        assert_eq!(end, utc(2025, 8, 28, 0));
    }

    #[test]
    fn test_bounds_week_starts_monday() {
        // 2025-08-27 is a Wednesday
        let (start, end) = PeriodType::Week.bounds(utc(2025, 8, 27, 15));
        assert_eq!(start, utc(2025, 8, 25, 0));
        assert_eq!(end, utc(2025, 9, 1, 0));
    }

    #[test]
    fn test_bounds_month_rolls_over_year() {
        let (start, end) = PeriodType::Month.bounds(utc(2024, 12, 31, 23));
        assert_eq!(start, utc(2024, 12, 1, 0));
        assert_eq!(end, utc(2025, 1, 1, 0));
    }

    #[test]
    fn test_bounds_year() {
        let (start, end) = PeriodType::Year.bounds(utc(2024, 2, 29, 10));
        assert_eq!(start, utc(2024, 1, 1, 0));
        assert_eq!(end, utc(2025, 1, 1, 0));
    }

    #[test]
    fn test_period_type_parsing() {
        assert_eq!("month".parse::<PeriodType>(), Ok(PeriodType::Month));
        assert_eq!("Weekly".parse::<PeriodType>(), Ok(PeriodType::Week));
        assert!("fortnight".parse::<PeriodType>().is_err());
    }

    #[test]
    fn test_best_period_picks_highest_sum() {
        let transactions = vec![
            tx(1, 10000, utc(2025, 7, 3, 9)),
            tx(2, 5000, utc(2025, 8, 1, 9)),
            tx(3, 7000, utc(2025, 8, 20, 9)),
            tx(4, 2000, utc(2025, 9, 5, 9)),
        ];

        let best = best_period(&transactions, PeriodType::Month).unwrap();
        assert_eq!(best.period_start, utc(2025, 8, 1, 0));
        assert_eq!(best.period_end, utc(2025, 9, 1, 0));
        assert_eq!(best.total, 12000);
    }

    #[test]
    fn test_best_period_tie_prefers_earliest() {
        let transactions = vec![
            tx(1, 5000, utc(2025, 9, 3, 9)),
            tx(2, 5000, utc(2025, 8, 3, 9)),
        ];

        let best = best_period(&transactions, PeriodType::Month).unwrap();
        assert_eq!(best.period_start, utc(2025, 8, 1, 0));
    }

    #[test]
    fn test_best_period_sum_saturates() {
        let transactions = vec![
            tx(1, Cents::MAX - 1, utc(2025, 8, 3, 9)),
            tx(2, Cents::MAX - 1, utc(2025, 8, 4, 9)),
            tx(3, 100, utc(2025, 9, 4, 9)),
        ];

        let best = best_period(&transactions, PeriodType::Month).unwrap();
        assert_eq!(best.period_start, utc(2025, 8, 1, 0));
        assert_eq!(best.total, Cents::MAX);
    }

    #[test]
    fn test_best_period_empty() {
        assert_eq!(best_period(&[], PeriodType::Day), None);
    }
}
