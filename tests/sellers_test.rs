mod common;

use anyhow::Result;
use common::{sale, seller, test_service};
use seller_ledger::application::AppError;
use seller_ledger::domain::SellerPatch;

#[tokio::test]
async fn test_create_and_get_seller() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let created = service
        .create_seller("John Doe".to_string(), "john@doe.com".to_string())
        .await?;
    assert!(created.id > 0);

    let fetched = service.get_seller(created.id).await?;
    assert_eq!(fetched, created);

    Ok(())
}

#[tokio::test]
async fn test_list_sellers_ordered_by_id() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let first = seller(&service, "Zoe").await?;
    let second = seller(&service, "Adam").await?;

    let sellers = service.list_sellers().await?;
    let ids: Vec<_> = sellers.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);

    Ok(())
}

#[tokio::test]
async fn test_get_missing_seller_is_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service.get_seller(42).await.unwrap_err();
    assert!(matches!(err, AppError::SellerNotFound(42)));
    assert_eq!(err.to_string(), "There is no seller with id 42");

    Ok(())
}

#[tokio::test]
async fn test_blank_fields_are_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service
        .create_seller("  ".to_string(), "john@doe.com".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(service.list_sellers().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_replace_seller_keeps_registration_date() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let original = seller(&service, "John").await?;

    let updated = service
        .replace_seller(original.id, "Johnny".to_string(), "johnny@doe.com".to_string())
        .await?;
    assert_eq!(updated.name, "Johnny");
    assert_eq!(updated.contact_info, "johnny@doe.com");
    assert_eq!(updated.registration_date, original.registration_date);

    let stored = service.get_seller(original.id).await?;
    assert_eq!(stored, updated);

    Ok(())
}

#[tokio::test]
async fn test_patch_changes_only_supplied_fields() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let original = seller(&service, "John").await?;

    let patched = service
        .patch_seller(
            original.id,
            SellerPatch {
                name: None,
                contact_info: Some("+1 555 0100".to_string()),
            },
        )
        .await?;
    assert_eq!(patched.name, "John");
    assert_eq!(patched.contact_info, "+1 555 0100");

    Ok(())
}

#[tokio::test]
async fn test_update_missing_seller_is_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service
        .replace_seller(7, "Ghost".to_string(), "ghost@nowhere".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SellerNotFound(7)));

    Ok(())
}

#[tokio::test]
async fn test_delete_seller() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let john = seller(&service, "John").await?;

    service.delete_seller(john.id).await?;
    assert!(matches!(
        service.get_seller(john.id).await,
        Err(AppError::SellerNotFound(_))
    ));

    // Deleting again reports the seller as missing
    let err = service.delete_seller(john.id).await.unwrap_err();
    assert!(matches!(err, AppError::SellerNotFound(_)));

    Ok(())
}

#[tokio::test]
async fn test_delete_seller_with_transactions_is_refused() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let john = seller(&service, "John").await?;
    sale(&service, john.id, 5000, "2025-08-01").await?;

    let err = service.delete_seller(john.id).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::SellerHasTransactions { count: 1, .. }
    ));
    assert!(service.get_seller(john.id).await.is_ok());

    Ok(())
}
