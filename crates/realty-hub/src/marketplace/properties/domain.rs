use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::error::MarketplaceError;
use crate::marketplace::http::blank_as_none;
use crate::marketplace::identity::UserId;

/// Identifier wrapper for listed properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(pub u64);

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    House,
    Apartment,
    Villa,
    Land,
}

impl PropertyType {
    pub const fn ordered() -> [Self; 4] {
        [Self::House, Self::Apartment, Self::Villa, Self::Land]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::House => "house",
            Self::Apartment => "apartment",
            Self::Villa => "villa",
            Self::Land => "land",
        }
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown property type '{value}'"))
    }
}

/// Availability of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    Available,
    Pending,
    Sold,
}

impl PropertyStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Available, Self::Pending, Self::Sold]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Pending => "pending",
            Self::Sold => "sold",
        }
    }

    /// `sold` is final; a pending deal can close or fall through.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Available, Self::Pending)
                | (Self::Available, Self::Sold)
                | (Self::Pending, Self::Sold)
                | (Self::Pending, Self::Available)
        )
    }
}

impl FromStr for PropertyStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown property status '{value}'"))
    }
}

/// Seller-editable description of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyAttributes {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub location: String,
    pub property_type: PropertyType,
    #[serde(default)]
    pub bedrooms: u16,
    #[serde(default)]
    pub bathrooms: u16,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl PropertyAttributes {
    pub fn validate(&self) -> Result<(), MarketplaceError> {
        if self.title.trim().is_empty() {
            return Err(MarketplaceError::validation("title must not be blank"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(MarketplaceError::validation(format!(
                "price must be a non-negative number, got {}",
                self.price
            )));
        }
        if let Some(area) = self.area {
            if !area.is_finite() || area <= 0.0 {
                return Err(MarketplaceError::validation(format!(
                    "area must be greater than zero, got {area}"
                )));
            }
        }
        Ok(())
    }
}

/// Insert payload handed to the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProperty {
    pub owner_id: UserId,
    pub attributes: PropertyAttributes,
    pub created_at: DateTime<Utc>,
}

/// Stored listing owned by exactly one seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub owner_id: UserId,
    #[serde(flatten)]
    pub attributes: PropertyAttributes,
    pub status: PropertyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    pub fn from_draft(id: PropertyId, draft: NewProperty) -> Self {
        Self {
            id,
            owner_id: draft.owner_id,
            attributes: draft.attributes,
            status: PropertyStatus::Available,
            buyer_id: None,
            created_at: draft.created_at,
            updated_at: draft.created_at,
        }
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// Moves the status, failing with `InvalidTransition` for disallowed moves. The buyer
    /// reference is dropped when the listing returns to `available`.
    pub fn transition(
        &mut self,
        next: PropertyStatus,
        at: DateTime<Utc>,
    ) -> Result<(), MarketplaceError> {
        if !self.status.can_transition_to(next) {
            return Err(MarketplaceError::InvalidTransition {
                entity: "property",
                from: self.status.label(),
                to: next.label(),
            });
        }

        self.status = next;
        if next == PropertyStatus::Available {
            self.buyer_id = None;
        }
        self.updated_at = at;
        Ok(())
    }

    /// Newest first, ties broken by the later id.
    pub(crate) fn recency_key(&self) -> (Reverse<DateTime<Utc>>, Reverse<PropertyId>) {
        (Reverse(self.created_at), Reverse(self.id))
    }
}

/// Independently optional search criteria, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PropertyCriteria {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub title: Option<String>,
    #[serde(default, alias = "minPrice", deserialize_with = "blank_as_none")]
    pub min_price: Option<f64>,
    #[serde(default, alias = "maxPrice", deserialize_with = "blank_as_none")]
    pub max_price: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub location: Option<String>,
    #[serde(default, alias = "propertyType", deserialize_with = "blank_as_none")]
    pub property_type: Option<PropertyType>,
    #[serde(default, alias = "minBedrooms", deserialize_with = "blank_as_none")]
    pub min_bedrooms: Option<u16>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<PropertyStatus>,
}

impl PropertyCriteria {
    pub fn validate(&self) -> Result<(), MarketplaceError> {
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(MarketplaceError::validation(format!(
                    "min_price {min} exceeds max_price {max}"
                )));
            }
        }
        Ok(())
    }

    pub fn matches(&self, property: &Property) -> bool {
        let attributes = &property.attributes;

        contains_ignore_case(&attributes.title, self.title.as_deref())
            && contains_ignore_case(&attributes.location, self.location.as_deref())
            && self.min_price.map_or(true, |min| attributes.price >= min)
            && self.max_price.map_or(true, |max| attributes.price <= max)
            && self
                .property_type
                .map_or(true, |kind| attributes.property_type == kind)
            && self
                .min_bedrooms
                .map_or(true, |min| attributes.bedrooms >= min)
            && self.status.map_or(true, |status| property.status == status)
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle.map(str::trim) {
        None | Some("") => true,
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
    }
}
