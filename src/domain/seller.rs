use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Cents, now};

pub type SellerId = i64;

/// A party that receives payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
    pub id: SellerId,
    pub name: String,
    pub contact_info: String,
    pub registration_date: DateTime<Utc>,
}

impl Seller {
    /// Apply a partial update. Only supplied fields change.
    pub fn apply(&mut self, patch: SellerPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(contact_info) = patch.contact_info {
            self.contact_info = contact_info;
        }
    }
}

/// A seller that has not been stored yet; the store assigns its id.
#[derive(Debug, Clone)]
pub struct NewSeller {
    pub name: String,
    pub contact_info: String,
    pub registration_date: DateTime<Utc>,
}

impl NewSeller {
    pub fn new(name: impl Into<String>, contact_info: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact_info: contact_info.into(),
            registration_date: now(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SellerPatch {
    pub name: Option<String>,
    pub contact_info: Option<String>,
}

impl SellerPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.contact_info.is_none()
    }
}

/// A seller together with its summed income over some window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerIncome {
    pub seller: Seller,
    pub total: Cents,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seller() -> Seller {
        Seller {
            id: 1,
            name: "John Doe".into(),
            contact_info: "john@doe.com".into(),
            registration_date: now(),
        }
    }

    #[test]
    fn test_patch_changes_only_supplied_fields() {
        let mut seller = seller();
        seller.apply(SellerPatch {
            name: Some("Jane Doe".into()),
            contact_info: None,
        });
        assert_eq!(seller.name, "Jane Doe");
        assert_eq!(seller.contact_info, "john@doe.com");
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let mut seller = seller();
        let before = seller.clone();
        let patch = SellerPatch::default();
        assert!(patch.is_empty());
        seller.apply(patch);
        assert_eq!(seller, before);
    }
}
