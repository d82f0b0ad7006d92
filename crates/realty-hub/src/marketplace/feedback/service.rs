use std::cmp::Reverse;
use std::sync::Arc;

use tracing::info;

use super::{Feedback, FeedbackSubmission};
use crate::marketplace::clock::Clock;
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::identity::{Actor, Role};
use crate::marketplace::repository::FeedbackRepository;

pub struct FeedbackLog<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> FeedbackLog<S>
where
    S: FeedbackRepository,
{
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Open to anyone, registered or not.
    pub fn submit(&self, submission: FeedbackSubmission) -> Result<Feedback, MarketplaceError> {
        let submission = submission.normalized()?;
        let feedback = self.store.insert_feedback(submission, self.clock.now())?;
        info!(feedback_id = %feedback.id, "feedback received");
        Ok(feedback)
    }

    /// Newest first.
    pub fn list(&self, actor: &Actor) -> Result<Vec<Feedback>, MarketplaceError> {
        actor.require_any(&[Role::Employee, Role::Admin], "read feedback")?;
        let mut entries = self.store.feedback_entries()?;
        entries.sort_by_key(|entry| (Reverse(entry.created_at), Reverse(entry.id)));
        Ok(entries)
    }
}
