use std::cmp::Reverse;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::error::MarketplaceError;
use crate::marketplace::identity::UserId;
use crate::marketplace::properties::{Property, PropertyId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdvertisementId(pub u64);

impl fmt::Display for AdvertisementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Moderation state of a single request. `approved` and `rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvertisementStatus {
    Pending,
    Approved,
    Rejected,
}

impl AdvertisementStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Pending, Self::Approved, Self::Rejected]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Pending and approved requests block a new submission for the same property.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }
}

/// Outcome an employee records against a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationDecision {
    Approved,
    Rejected,
}

impl ModerationDecision {
    pub const fn status(self) -> AdvertisementStatus {
        match self {
            Self::Approved => AdvertisementStatus::Approved,
            Self::Rejected => AdvertisementStatus::Rejected,
        }
    }
}

/// What the seller can do next about advertising a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvertisingAction {
    Advertise,
    Pending,
    Active,
    Retry,
}

impl AdvertisingAction {
    /// Derives the action from a property's request history in any order.
    pub fn from_history(history: &[AdvertisementRequest]) -> Self {
        if let Some(active) = history.iter().find(|request| request.status.is_active()) {
            return match active.status {
                AdvertisementStatus::Approved => Self::Active,
                _ => Self::Pending,
            };
        }
        if history.is_empty() {
            Self::Advertise
        } else {
            Self::Retry
        }
    }
}

/// Seller payload for a new request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdvertisementSubmission {
    #[serde(alias = "propertyId")]
    pub property_id: PropertyId,
    pub amount: f64,
    pub currency: String,
}

impl AdvertisementSubmission {
    /// Checks the amount and returns the upper-cased currency code.
    pub fn validate(&self) -> Result<String, MarketplaceError> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(MarketplaceError::validation(format!(
                "amount must be a non-negative number, got {}",
                self.amount
            )));
        }
        normalize_currency(&self.currency)
    }
}

fn normalize_currency(raw: &str) -> Result<String, MarketplaceError> {
    let code = raw.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(MarketplaceError::validation(format!(
            "currency must be a three-letter code, got '{code}'"
        )))
    }
}

/// Insert payload handed to the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAdvertisementRequest {
    pub property_id: PropertyId,
    pub seller_id: UserId,
    pub amount: f64,
    pub currency: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvertisementRequest {
    pub id: AdvertisementId,
    pub property_id: PropertyId,
    pub seller_id: UserId,
    pub amount: f64,
    pub currency: String,
    /// Property title at submission time.
    pub title: String,
    pub status: AdvertisementStatus,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
    pub decided_by: Option<UserId>,
}

impl AdvertisementRequest {
    pub fn from_draft(id: AdvertisementId, draft: NewAdvertisementRequest) -> Self {
        Self {
            id,
            property_id: draft.property_id,
            seller_id: draft.seller_id,
            amount: draft.amount,
            currency: draft.currency,
            title: draft.title,
            status: AdvertisementStatus::Pending,
            created_at: draft.created_at,
            decided_at: None,
            decided_by: None,
        }
    }

    /// Records a decision. Only a pending request can be decided.
    pub fn decide(
        &mut self,
        decision: ModerationDecision,
        employee_id: UserId,
        at: DateTime<Utc>,
    ) -> Result<(), MarketplaceError> {
        let next = decision.status();
        if self.status != AdvertisementStatus::Pending {
            return Err(MarketplaceError::InvalidTransition {
                entity: "advertisement request",
                from: self.status.label(),
                to: next.label(),
            });
        }

        self.status = next;
        self.decided_at = Some(at);
        self.decided_by = Some(employee_id);
        Ok(())
    }

    pub(crate) fn recency_key(&self) -> (Reverse<DateTime<Utc>>, Reverse<AdvertisementId>) {
        (Reverse(self.created_at), Reverse(self.id))
    }
}

/// Approved request joined with the property as it reads now.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturedListing {
    pub request: AdvertisementRequest,
    pub property: Property,
}

/// Seller-facing advertising summary for one property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvertisementOverview {
    pub property_id: PropertyId,
    pub status: Option<AdvertisementStatus>,
    pub action: AdvertisingAction,
}
