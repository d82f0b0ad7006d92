use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::MarketplaceError;

/// Identifier wrapper for registered users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Marketplace roles. A user's role is fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Buyer,
    Seller,
    Employee,
    Admin,
}

impl Role {
    pub const fn ordered() -> [Self; 4] {
        [Self::Buyer, Self::Seller, Self::Employee, Self::Admin]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Seller => "seller",
            Self::Employee => "employee",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|role| role.label().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown role '{value}'"))
    }
}

/// The acting identity passed into every engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is(&self, role: Role) -> bool {
        self.role == role
    }

    /// Fails with `Forbidden` unless the actor holds `role`.
    pub fn require(&self, role: Role, action: &str) -> Result<(), MarketplaceError> {
        self.require_any(&[role], action)
    }

    /// Fails with `Forbidden` unless the actor holds one of `roles`.
    pub fn require_any(&self, roles: &[Role], action: &str) -> Result<(), MarketplaceError> {
        if roles.contains(&self.role) {
            return Ok(());
        }

        let allowed = roles
            .iter()
            .map(|role| role.label())
            .collect::<Vec<_>>()
            .join(" or ");
        Err(MarketplaceError::Forbidden(format!(
            "{} {} cannot {action}; requires {allowed}",
            self.role.label(),
            self.user_id
        )))
    }

    /// Lets a user act on their own records; anyone else must be an admin.
    pub fn require_self_or_admin(
        &self,
        user_id: UserId,
        action: &str,
    ) -> Result<(), MarketplaceError> {
        if self.user_id == user_id {
            Ok(())
        } else {
            self.require(Role::Admin, action)
        }
    }
}
