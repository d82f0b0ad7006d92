//! Public feedback submissions, read back by staff and the admin dashboard.

pub mod router;
pub mod service;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::error::MarketplaceError;
use crate::marketplace::users::domain::normalize_email;

pub use service::FeedbackLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackId(pub u64);

impl fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl FeedbackSubmission {
    pub fn normalized(self) -> Result<Self, MarketplaceError> {
        let name = self.name.trim().to_string();
        let message = self.message.trim().to_string();
        if name.is_empty() {
            return Err(MarketplaceError::validation("name must not be blank"));
        }
        if message.is_empty() {
            return Err(MarketplaceError::validation("message must not be blank"));
        }

        Ok(Self {
            name,
            email: normalize_email(&self.email)?,
            message,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: FeedbackId,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
