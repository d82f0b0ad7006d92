use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::marketplace::error::MarketplaceError;
use crate::marketplace::http::blank_as_none;
use crate::marketplace::identity::Role;
use crate::marketplace::properties::PropertyStatus;

/// Inclusive calendar-day window over a UTC timestamp. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub const fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let day = at.date_naive();
        self.from.map_or(true, |from| day >= from) && self.to.map_or(true, |to| day <= to)
    }

    fn validate(&self, category: &str) -> Result<(), MarketplaceError> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err(MarketplaceError::validation(format!(
                "{category} date range starts {from} after it ends {to}"
            ))),
            _ => Ok(()),
        }
    }
}

/// Dashboard query. Every category is filtered on its own fields only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DashboardFilters {
    #[serde(default, alias = "userDateFrom", deserialize_with = "blank_as_none")]
    pub user_date_from: Option<NaiveDate>,
    #[serde(default, alias = "userDateTo", deserialize_with = "blank_as_none")]
    pub user_date_to: Option<NaiveDate>,
    #[serde(default, alias = "userRole", deserialize_with = "blank_as_none")]
    pub user_role: Option<Role>,
    #[serde(default, alias = "propertyDateFrom", deserialize_with = "blank_as_none")]
    pub property_date_from: Option<NaiveDate>,
    #[serde(default, alias = "propertyDateTo", deserialize_with = "blank_as_none")]
    pub property_date_to: Option<NaiveDate>,
    #[serde(default, alias = "propertyStatus", deserialize_with = "blank_as_none")]
    pub property_status: Option<PropertyStatus>,
    #[serde(default, alias = "feedbackDateFrom", deserialize_with = "blank_as_none")]
    pub feedback_date_from: Option<NaiveDate>,
    #[serde(default, alias = "feedbackDateTo", deserialize_with = "blank_as_none")]
    pub feedback_date_to: Option<NaiveDate>,
}

impl DashboardFilters {
    pub fn users(&self) -> DateRange {
        DateRange::new(self.user_date_from, self.user_date_to)
    }

    pub fn properties(&self) -> DateRange {
        DateRange::new(self.property_date_from, self.property_date_to)
    }

    pub fn feedback(&self) -> DateRange {
        DateRange::new(self.feedback_date_from, self.feedback_date_to)
    }

    pub fn validate(&self) -> Result<(), MarketplaceError> {
        self.users().validate("user")?;
        self.properties().validate("property")?;
        self.feedback().validate("feedback")
    }
}
