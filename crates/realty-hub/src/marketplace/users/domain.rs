use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::error::MarketplaceError;
use crate::marketplace::identity::{Actor, Role, UserId};

/// Registered marketplace participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }
}

/// Sign-up payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRegistration {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl UserRegistration {
    /// Trims the fields, lowercases the e-mail, and rejects blank or malformed input.
    pub fn normalized(self) -> Result<Self, MarketplaceError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(MarketplaceError::validation("name must not be blank"));
        }

        Ok(Self {
            name,
            email: normalize_email(&self.email)?,
            role: self.role,
        })
    }
}

pub(crate) fn normalize_email(raw: &str) -> Result<String, MarketplaceError> {
    let email = raw.trim().to_ascii_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(email)
    } else {
        Err(MarketplaceError::validation(format!(
            "'{}' is not a valid e-mail address",
            raw.trim()
        )))
    }
}
