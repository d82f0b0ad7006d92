use std::cmp::Reverse;
use std::sync::Arc;

use tracing::debug;

use super::filters::DashboardFilters;
use super::views::{
    AdvertisementStats, CountEntry, DashboardStats, FeedbackStats, PropertyStats, UserStats,
};
use crate::marketplace::advertisements::AdvertisementStatus;
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::identity::{Actor, Role};
use crate::marketplace::properties::{Property, PropertyStatus};
use crate::marketplace::repository::{
    AdvertisementRepository, FeedbackRepository, PropertyRepository, UserRepository,
};

/// Computes the admin dashboard from current store contents on every call.
pub struct DashboardReporter<S> {
    store: Arc<S>,
    recent_limit: usize,
}

impl<S> DashboardReporter<S>
where
    S: UserRepository + PropertyRepository + AdvertisementRepository + FeedbackRepository,
{
    pub fn new(store: Arc<S>, recent_limit: usize) -> Self {
        Self {
            store,
            recent_limit,
        }
    }

    pub fn dashboard_stats(
        &self,
        actor: &Actor,
        filters: &DashboardFilters,
    ) -> Result<DashboardStats, MarketplaceError> {
        actor.require(Role::Admin, "view the dashboard")?;
        filters.validate()?;

        let stats = DashboardStats {
            users: self.user_stats(filters)?,
            properties: self.property_stats(filters)?,
            advertisements: self.advertisement_stats()?,
            feedback: self.feedback_stats(filters)?,
        };
        debug!(
            users = stats.users.total,
            properties = stats.properties.total,
            feedback = stats.feedback.total,
            "dashboard computed"
        );
        Ok(stats)
    }

    fn user_stats(&self, filters: &DashboardFilters) -> Result<UserStats, MarketplaceError> {
        let range = filters.users();
        let mut in_range: Vec<_> = self
            .store
            .users()?
            .into_iter()
            .filter(|user| range.contains(user.created_at))
            .collect();
        in_range.sort_by_key(|user| (Reverse(user.created_at), Reverse(user.id)));

        let by_role = CountEntry::tally(Role::ordered(), &in_range, |user| user.role, Role::label);
        let total = in_range.len();
        let users = in_range
            .into_iter()
            .filter(|user| filters.user_role.map_or(true, |role| user.role == role))
            .collect();

        Ok(UserStats {
            total,
            by_role,
            users,
        })
    }

    fn property_stats(
        &self,
        filters: &DashboardFilters,
    ) -> Result<PropertyStats, MarketplaceError> {
        let range = filters.properties();
        let mut in_range: Vec<Property> = self
            .store
            .properties()?
            .into_iter()
            .filter(|property| range.contains(property.created_at))
            .collect();
        in_range.sort_by_key(Property::recency_key);

        let by_status = CountEntry::tally(
            PropertyStatus::ordered(),
            &in_range,
            |property| property.status,
            PropertyStatus::label,
        );
        let total = in_range.len();
        let recent_properties = in_range
            .into_iter()
            .filter(|property| {
                filters
                    .property_status
                    .map_or(true, |status| property.status == status)
            })
            .take(self.recent_limit)
            .collect();

        Ok(PropertyStats {
            total,
            by_status,
            recent_properties,
        })
    }

    fn advertisement_stats(&self) -> Result<AdvertisementStats, MarketplaceError> {
        let requests = self.store.advertisements()?;
        Ok(AdvertisementStats {
            total: requests.len(),
            by_status: CountEntry::tally(
                AdvertisementStatus::ordered(),
                &requests,
                |request| request.status,
                AdvertisementStatus::label,
            ),
        })
    }

    fn feedback_stats(
        &self,
        filters: &DashboardFilters,
    ) -> Result<FeedbackStats, MarketplaceError> {
        let range = filters.feedback();
        let mut in_range: Vec<_> = self
            .store
            .feedback_entries()?
            .into_iter()
            .filter(|entry| range.contains(entry.created_at))
            .collect();
        in_range.sort_by_key(|entry| (Reverse(entry.created_at), Reverse(entry.id)));

        let total = in_range.len();
        in_range.truncate(self.recent_limit);
        Ok(FeedbackStats {
            total,
            recent_feedback: in_range,
        })
    }
}
