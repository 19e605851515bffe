mod common;

use anyhow::Result;
use chrono::Duration;
use common::{TwoSellers, parse_date, sale, seller, test_service, window};
use seller_ledger::application::AppError;
use seller_ledger::domain::{MAX_AMOUNT_CENTS, PaymentType, PeriodType, TimeWindow};

#[tokio::test]
async fn test_top_seller_by_period() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fixture = TwoSellers::create(&service).await?;

    let report = service
        .find_top_seller_by_period(window("2025-08-01", "2025-08-04"))
        .await?;
    assert_eq!(report.seller.id, fixture.b.id);
    assert_eq!(report.total, 30000);

    Ok(())
}

#[tokio::test]
async fn test_top_seller_sums_per_seller() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fixture = TwoSellers::create(&service).await?;

    // Two smaller sales push A past B
    sale(&service, fixture.a.id, 15000, "2025-08-03").await?;
    sale(&service, fixture.a.id, 10000, "2025-08-04").await?;

    let report = service
        .find_top_seller_by_period(window("2025-08-01", "2025-08-04"))
        .await?;
    assert_eq!(report.seller.id, fixture.a.id);
    assert_eq!(report.total, 35000);

    Ok(())
}

#[tokio::test]
async fn test_top_seller_tie_prefers_lowest_id() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let first = seller(&service, "First").await?;
    let second = seller(&service, "Second").await?;

    sale(&service, second.id, 5000, "2025-08-02").await?;
    sale(&service, first.id, 5000, "2025-08-03").await?;

    let report = service
        .find_top_seller_by_period(window("2025-08-01", "2025-08-31"))
        .await?;
    assert_eq!(report.seller.id, first.id);

    Ok(())
}

#[tokio::test]
async fn test_empty_window_has_no_top_seller() -> Result<()> {
    let (service, _temp) = test_service().await?;
    TwoSellers::create(&service).await?;

    let err = service
        .find_top_seller_by_period(window("2025-09-01", "2025-09-30"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NoSalesInPeriod { .. }));
    assert!(err.is_not_found());

    Ok(())
}

#[tokio::test]
async fn test_window_bounds_are_inclusive() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fixture = TwoSellers::create(&service).await?;

    // Window ends exactly at B's sale
    let report = service
        .find_top_seller_by_period(window("2025-08-02", "2025-08-03"))
        .await?;
    assert_eq!(report.seller.id, fixture.b.id);

    // Degenerate window equal to A's timestamp
    let at = parse_date("2025-08-02");
    let report = service
        .find_top_seller_by_period(TimeWindow::new(at, at)?)
        .await?;
    assert_eq!(report.seller.id, fixture.a.id);
    assert_eq!(report.total, 10000);

    // One microsecond past the sale excludes it
    let after = at + Duration::microseconds(1);
    let err = service
        .find_top_seller_by_period(TimeWindow::new(after, after)?)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NoSalesInPeriod { .. }));

    Ok(())
}

#[tokio::test]
async fn test_sub_microsecond_start_excludes_earlier_sale() -> Result<()> {
    let (service, _temp) = test_service().await?;
    TwoSellers::create(&service).await?;

    // A's sale sits at midnight; a start 500ns later must not match it
    let start = parse_date("2025-08-02") + Duration::nanoseconds(500);
    let end = parse_date("2025-08-02") + Duration::hours(1);
    let err = service
        .find_top_seller_by_period(TimeWindow::new(start, end)?)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NoSalesInPeriod { .. }));

    let report = service
        .find_sellers_with_income_below_threshold(1_000_000, TimeWindow::new(start, end)?)
        .await?;
    assert!(report.sellers.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_sellers_below_threshold() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fixture = TwoSellers::create(&service).await?;

    let report = service
        .find_sellers_with_income_below_threshold(15000, window("2025-08-01", "2025-08-04"))
        .await?;
    let ids: Vec<_> = report.sellers.iter().map(|s| s.seller.id).collect();
    assert_eq!(ids, vec![fixture.a.id]);
    assert_eq!(report.sellers[0].total, 10000);

    Ok(())
}

#[tokio::test]
async fn test_threshold_comparison_is_strict() -> Result<()> {
    let (service, _temp) = test_service().await?;
    TwoSellers::create(&service).await?;

    // A earns exactly 100.00, which is not below 100.00
    let report = service
        .find_sellers_with_income_below_threshold(10000, window("2025-08-01", "2025-08-04"))
        .await?;
    assert!(report.sellers.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_below_threshold_sorted_by_income_descending() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fixture = TwoSellers::create(&service).await?;
    let carol = seller(&service, "Carol").await?;
    sale(&service, carol.id, 20000, "2025-08-02").await?;

    let report = service
        .find_sellers_with_income_below_threshold(100000, window("2025-08-01", "2025-08-04"))
        .await?;
    let totals: Vec<_> = report.sellers.iter().map(|s| s.total).collect();
    assert_eq!(totals, vec![30000, 20000, 10000]);
    assert_eq!(report.sellers[0].seller.id, fixture.b.id);

    Ok(())
}

#[tokio::test]
async fn test_below_threshold_skips_sellers_without_sales() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let fixture = TwoSellers::create(&service).await?;
    let idle = seller(&service, "Idle").await?;

    let report = service
        .find_sellers_with_income_below_threshold(15000, window("2025-08-01", "2025-08-04"))
        .await?;
    assert!(report.sellers.iter().all(|s| s.seller.id != idle.id));
    assert_eq!(report.sellers.len(), 1);
    assert_eq!(report.sellers[0].seller.id, fixture.a.id);

    Ok(())
}

#[tokio::test]
async fn test_below_threshold_empty_window_is_empty_list() -> Result<()> {
    let (service, _temp) = test_service().await?;
    TwoSellers::create(&service).await?;

    let report = service
        .find_sellers_with_income_below_threshold(15000, window("2025-09-01", "2025-09-30"))
        .await?;
    assert!(report.sellers.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_negative_threshold_is_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service
        .find_sellers_with_income_below_threshold(-1, window("2025-08-01", "2025-08-04"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidThreshold(_)));

    Ok(())
}

#[tokio::test]
async fn test_best_period_for_seller() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let john = seller(&service, "John").await?;

    sale(&service, john.id, 10000, "2025-07-15").await?;
    sale(&service, john.id, 6000, "2025-08-01").await?;
    sale(&service, john.id, 6000, "2025-08-31").await?;
    service
        .record_transaction_at(john.id, 500, PaymentType::Cash, parse_date("2025-09-01"))
        .await?;

    let report = service
        .find_best_period_for_seller(john.id, PeriodType::Month)
        .await?;
    assert_eq!(report.period_start, parse_date("2025-08-01"));
    assert_eq!(report.period_end, parse_date("2025-09-01"));
    assert_eq!(report.total, 12000);
    assert_eq!(report.transaction_count, 2);

    let daily = service
        .find_best_period_for_seller(john.id, PeriodType::Day)
        .await?;
    assert_eq!(daily.period_start, parse_date("2025-07-15"));
    assert_eq!(daily.total, 10000);

    Ok(())
}

#[tokio::test]
async fn test_best_period_without_sales_is_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let john = seller(&service, "John").await?;

    let err = service
        .find_best_period_for_seller(john.id, PeriodType::Week)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NoSalesForSeller(_)));

    let err = service
        .find_best_period_for_seller(404, PeriodType::Week)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SellerNotFound(404)));

    Ok(())
}

#[tokio::test]
async fn test_largest_amounts_aggregate_without_overflow() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let whale = seller(&service, "Whale").await?;
    let minnow = seller(&service, "Minnow").await?;

    for date in ["2025-08-02", "2025-08-03"] {
        sale(&service, whale.id, MAX_AMOUNT_CENTS, date).await?;
    }
    sale(&service, minnow.id, 100, "2025-08-02").await?;

    let top = service
        .find_top_seller_by_period(window("2025-08-01", "2025-08-31"))
        .await?;
    assert_eq!(top.seller.id, whale.id);
    assert_eq!(top.total, 2 * MAX_AMOUNT_CENTS);

    let below = service
        .find_sellers_with_income_below_threshold(i64::MAX, window("2025-08-01", "2025-08-31"))
        .await?;
    assert_eq!(below.sellers.len(), 2);
    assert_eq!(below.sellers[0].total, 2 * MAX_AMOUNT_CENTS);

    let none_below_zero = service
        .find_sellers_with_income_below_threshold(0, window("2025-08-01", "2025-08-31"))
        .await?;
    assert!(none_below_zero.sellers.is_empty());

    let best = service
        .find_best_period_for_seller(whale.id, PeriodType::Month)
        .await?;
    assert_eq!(best.period_start, parse_date("2025-08-01"));
    assert_eq!(best.total, 2 * MAX_AMOUNT_CENTS);
    assert_eq!(best.transaction_count, 2);

    Ok(())
}
