use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{Seller, Transaction, format_cents};

/// Database snapshot for a full export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub sellers: Vec<Seller>,
    pub transactions: Vec<Transaction>,
}

/// Exporter for converting ledger data to various formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export sellers to CSV format
    pub async fn export_sellers_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let sellers = self.service.list_sellers().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "name", "contact_info", "registration_date"])?;

        for seller in &sellers {
            csv_writer.write_record([
                seller.id.to_string(),
                seller.name.clone(),
                seller.contact_info.clone(),
                seller.registration_date.to_rfc3339(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(sellers.len())
    }

    /// Export transactions to CSV format, with the seller name resolved
    pub async fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let transactions = self.service.list_transactions().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "seller_id",
            "seller_name",
            "amount",
            "payment_type",
            "transaction_date",
        ])?;

        for info in &transactions {
            let transaction = &info.transaction;
            csv_writer.write_record([
                transaction.id.to_string(),
                transaction.seller_id.to_string(),
                info.seller.name.clone(),
                format_cents(transaction.amount_cents),
                transaction.payment_type.to_string(),
                transaction.transaction_date.to_rfc3339(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(transactions.len())
    }

    /// Export full database as JSON snapshot
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<DatabaseSnapshot> {
        let sellers = self.service.list_sellers().await?;
        let transactions = self
            .service
            .list_transactions()
            .await?
            .into_iter()
            .map(|info| info.transaction)
            .collect();

        let snapshot = DatabaseSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            sellers,
            transactions,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
