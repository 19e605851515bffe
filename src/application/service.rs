use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::info;

use crate::domain::{
    Cents, MAX_AMOUNT_CENTS, NewSeller, NewTransaction, PaymentType, Seller, SellerId,
    SellerPatch, Transaction, TransactionId, format_cents,
};
use crate::storage::Repository;

use super::AppError;

/// Application service providing high-level operations over sellers and transactions.
/// This is the primary interface for any client (CLI, HTTP API).
pub struct LedgerService {
    pub(super) repo: Repository,
}

/// A transaction together with the seller it belongs to.
#[derive(Debug, Clone)]
pub struct TransactionInfo {
    pub transaction: Transaction,
    pub seller: Seller,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Open the database at `database_url`, creating it and its schema if needed.
    pub async fn init(database_url: &str) -> Result<Self, AppError> {
        let repo = Repository::init(database_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let repo = Repository::connect(database_url).await?;
        Ok(Self::new(repo))
    }

    /// Check that the store answers.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repo.ping().await?;
        Ok(())
    }

    // ========================
    // Seller operations
    // ========================

    /// List all sellers, ordered by id.
    pub async fn list_sellers(&self) -> Result<Vec<Seller>, AppError> {
        Ok(self.repo.list_sellers().await?)
    }

    /// Get a seller by id.
    pub async fn get_seller(&self, id: SellerId) -> Result<Seller, AppError> {
        self.repo
            .get_seller(id)
            .await?
            .ok_or(AppError::SellerNotFound(id))
    }

    /// Register a new seller. The registration date is set to now.
    pub async fn create_seller(
        &self,
        name: String,
        contact_info: String,
    ) -> Result<Seller, AppError> {
        require_non_blank("name", &name)?;
        require_non_blank("contactInfo", &contact_info)?;

        let seller = self
            .repo
            .save_seller(&NewSeller::new(name, contact_info))
            .await?;
        info!(seller_id = seller.id, "created seller");
        Ok(seller)
    }

    /// Replace every mutable field of a seller.
    pub async fn replace_seller(
        &self,
        id: SellerId,
        name: String,
        contact_info: String,
    ) -> Result<Seller, AppError> {
        self.patch_seller(
            id,
            SellerPatch {
                name: Some(name),
                contact_info: Some(contact_info),
            },
        )
        .await
    }

    /// Change only the supplied fields of a seller.
    pub async fn patch_seller(&self, id: SellerId, patch: SellerPatch) -> Result<Seller, AppError> {
        if let Some(name) = &patch.name {
            require_non_blank("name", name)?;
        }
        if let Some(contact_info) = &patch.contact_info {
            require_non_blank("contactInfo", contact_info)?;
        }

        let mut seller = self.get_seller(id).await?;
        if patch.is_empty() {
            return Ok(seller);
        }

        seller.apply(patch);
        if !self.repo.update_seller(&seller).await? {
            return Err(AppError::SellerNotFound(id));
        }
        info!(seller_id = id, "updated seller");
        Ok(seller)
    }

    /// Delete a seller. Sellers that still own transactions are kept.
    pub async fn delete_seller(&self, id: SellerId) -> Result<(), AppError> {
        self.get_seller(id).await?;

        let count = self.repo.count_transactions_for_seller(id).await?;
        if count > 0 {
            return Err(AppError::SellerHasTransactions {
                seller_id: id,
                count,
            });
        }

        if !self.repo.delete_seller(id).await? {
            return Err(AppError::SellerNotFound(id));
        }
        info!(seller_id = id, "deleted seller");
        Ok(())
    }

    // ========================
    // Transaction operations
    // ========================

    /// List all transactions, ordered by id, each with its seller.
    pub async fn list_transactions(&self) -> Result<Vec<TransactionInfo>, AppError> {
        let sellers: HashMap<SellerId, Seller> = self
            .repo
            .list_sellers()
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        self.repo
            .list_transactions()
            .await?
            .into_iter()
            .map(|transaction| {
                let seller = sellers
                    .get(&transaction.seller_id)
                    .cloned()
                    .ok_or(AppError::SellerNotFound(transaction.seller_id))?;
                Ok(TransactionInfo {
                    transaction,
                    seller,
                })
            })
            .collect()
    }

    /// Get a transaction by id, with its seller.
    pub async fn get_transaction(&self, id: TransactionId) -> Result<TransactionInfo, AppError> {
        let transaction = self
            .repo
            .get_transaction(id)
            .await?
            .ok_or(AppError::TransactionNotFound(id))?;
        let seller = self.get_seller(transaction.seller_id).await?;
        Ok(TransactionInfo {
            transaction,
            seller,
        })
    }

    /// Record a payment for a seller, dated now.
    pub async fn create_transaction(
        &self,
        seller_id: SellerId,
        amount_cents: Cents,
        payment_type: PaymentType,
    ) -> Result<TransactionInfo, AppError> {
        self.record_transaction(NewTransaction::new(seller_id, amount_cents, payment_type))
            .await
    }

    /// Record a payment for a seller at an explicit date (imports, back-filling, tests).
    pub async fn record_transaction_at(
        &self,
        seller_id: SellerId,
        amount_cents: Cents,
        payment_type: PaymentType,
        transaction_date: DateTime<Utc>,
    ) -> Result<TransactionInfo, AppError> {
        self.record_transaction(
            NewTransaction::new(seller_id, amount_cents, payment_type).at(transaction_date),
        )
        .await
    }

    async fn record_transaction(
        &self,
        new_transaction: NewTransaction,
    ) -> Result<TransactionInfo, AppError> {
        if new_transaction.amount_cents < 0 {
            return Err(AppError::InvalidAmount(
                "amount must be greater than or equal to 0".to_string(),
            ));
        }
        if new_transaction.amount_cents > MAX_AMOUNT_CENTS {
            return Err(AppError::InvalidAmount(format!(
                "amount must not exceed {}",
                format_cents(MAX_AMOUNT_CENTS)
            )));
        }

        // Nothing is written when the seller does not resolve.
        let seller = self.get_seller(new_transaction.seller_id).await?;
        let transaction = self.repo.save_transaction(&new_transaction).await?;
        info!(
            transaction_id = transaction.id,
            seller_id = seller.id,
            amount_cents = transaction.amount_cents,
            "recorded transaction"
        );
        Ok(TransactionInfo {
            transaction,
            seller,
        })
    }

    /// List the transactions of one seller, ordered by id.
    pub async fn list_transactions_for_seller(
        &self,
        seller_id: SellerId,
    ) -> Result<Vec<TransactionInfo>, AppError> {
        let seller = self.get_seller(seller_id).await?;
        let transactions = self.repo.list_transactions_for_seller(seller_id).await?;
        Ok(transactions
            .into_iter()
            .map(|transaction| TransactionInfo {
                transaction,
                seller: seller.clone(),
            })
            .collect())
    }
}

fn require_non_blank(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be blank")));
    }
    Ok(())
}
