// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use seller_ledger::application::LedgerService;
use seller_ledger::domain::{Cents, PaymentType, Seller, SellerId, TimeWindow};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(&format!("sqlite:{}", db_path.display())).await?;
    Ok((service, temp_dir))
}

/// Helper to parse a date string into DateTime<Utc>
pub fn parse_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

/// Inclusive window between two dates at midnight
pub fn window(from: &str, to: &str) -> TimeWindow {
    TimeWindow::new(parse_date(from), parse_date(to)).unwrap()
}

/// Register a seller with a derived contact address
pub async fn seller(service: &LedgerService, name: &str) -> Result<Seller> {
    let contact = format!("{}@example.com", name.to_lowercase());
    Ok(service.create_seller(name.to_string(), contact).await?)
}

/// Record a card payment for a seller on a given date
pub async fn sale(
    service: &LedgerService,
    seller_id: SellerId,
    amount_cents: Cents,
    date: &str,
) -> Result<()> {
    service
        .record_transaction_at(seller_id, amount_cents, PaymentType::Card, parse_date(date))
        .await?;
    Ok(())
}

/// Test fixture: the two-seller scenario
/// A earns 100.00 on Aug 2, B earns 300.00 on Aug 3
pub struct TwoSellers {
    pub a: Seller,
    pub b: Seller,
}

impl TwoSellers {
    pub async fn create(service: &LedgerService) -> Result<Self> {
        let a = seller(service, "Alice").await?;
        let b = seller(service, "Bob").await?;
        sale(service, a.id, 10000, "2025-08-02").await?;
        sale(service, b.id, 30000, "2025-08-03").await?;
        Ok(Self { a, b })
    }
}
