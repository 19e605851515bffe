use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{Cents, SellerId, now};

pub type TransactionId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentType {
    Card,
    Cash,
    Transfer,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Card => "CARD",
            PaymentType::Cash => "CASH",
            PaymentType::Transfer => "TRANSFER",
        }
    }
}

impl FromStr for PaymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CARD" => Ok(PaymentType::Card),
            "CASH" => Ok(PaymentType::Cash),
            "TRANSFER" => Ok(PaymentType::Transfer),
            other => Err(format!(
                "unknown payment type '{other}' (expected CARD, CASH or TRANSFER)"
            )),
        }
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single payment record tied to exactly one seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub seller_id: SellerId,
    pub amount_cents: Cents,
    pub payment_type: PaymentType,
    pub transaction_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub seller_id: SellerId,
    pub amount_cents: Cents,
    pub payment_type: PaymentType,
    pub transaction_date: DateTime<Utc>,
}

impl NewTransaction {
    pub fn new(seller_id: SellerId, amount_cents: Cents, payment_type: PaymentType) -> Self {
        Self {
            seller_id,
            amount_cents,
            payment_type,
            transaction_date: now(),
        }
    }

    pub fn at(mut self, transaction_date: DateTime<Utc>) -> Self {
        self.transaction_date = transaction_date;
        self
    }
}
