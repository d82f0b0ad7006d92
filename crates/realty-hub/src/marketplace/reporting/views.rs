use serde::Serialize;

use crate::marketplace::feedback::Feedback;
use crate::marketplace::properties::Property;
use crate::marketplace::users::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    pub key: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub total: usize,
    pub by_role: Vec<CountEntry>,
    pub users: Vec<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyStats {
    pub total: usize,
    pub by_status: Vec<CountEntry>,
    pub recent_properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvertisementStats {
    pub total: usize,
    pub by_status: Vec<CountEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackStats {
    pub total: usize,
    pub recent_feedback: Vec<Feedback>,
}

/// Admin dashboard snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub users: UserStats,
    pub properties: PropertyStats,
    pub advertisements: AdvertisementStats,
    pub feedback: FeedbackStats,
}

impl CountEntry {
    /// Tallies `items` into one entry per key, keeping the order of `keys`.
    pub(crate) fn tally<K, T>(
        keys: impl IntoIterator<Item = K>,
        items: &[T],
        key_of: impl Fn(&T) -> K,
        label: impl Fn(K) -> &'static str,
    ) -> Vec<Self>
    where
        K: Copy + PartialEq,
    {
        keys.into_iter()
            .map(|key| Self {
                key: label(key),
                count: items.iter().filter(|item| key_of(item) == key).count(),
            })
            .collect()
    }

    pub fn count_for(entries: &[Self], key: &str) -> usize {
        entries
            .iter()
            .find(|entry| entry.key == key)
            .map_or(0, |entry| entry.count)
    }
}
