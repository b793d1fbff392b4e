use std::sync::Arc;

use futures::future::join_all;

use crate::core::api::{ApiResult, CategoryId, ContestantId, EligibleEvent, FestApi, NewRegistration};

use super::error::SubmissionError;
use super::wizard::{ReferenceLists, SubmissionPlan};

/// Executes the network side of the registration wizard.
#[derive(Clone)]
pub struct RegistrationService {
    api: Arc<dyn FestApi>,
}

impl RegistrationService {
    pub fn new(api: Arc<dyn FestApi>) -> Self {
        Self { api }
    }

    /// Fetch groups and categories concurrently.
    pub async fn load_reference_lists(&self) -> ApiResult<ReferenceLists> {
        let (groups, categories) = tokio::try_join!(self.api.groups(), self.api.categories())?;
        Ok(ReferenceLists { groups, categories })
    }

    pub async fn eligible_events(&self, category: CategoryId) -> ApiResult<Vec<EligibleEvent>> {
        self.api.eligible_events(category).await
    }

    /// Create the contestant, then one registration per selected event.
    ///
    /// Registrations are issued concurrently and all of them are awaited even
    /// if some fail, so the error can report exactly which events are missing.
    pub async fn submit(&self, plan: &SubmissionPlan) -> Result<ContestantId, SubmissionError> {
        let contestant = self
            .api
            .create_contestant(plan.contestant.clone())
            .await
            .map_err(SubmissionError::ContestantRejected)?;
        log::info!("Created contestant {}", contestant.id);

        let requests = plan.events.iter().map(|&event| {
            let api = Arc::clone(&self.api);
            let registration = NewRegistration {
                contestant: contestant.id,
                event,
            };
            async move { (event, api.create_registration(registration).await) }
        });
        let results = join_all(requests).await;

        let mut failed = Vec::new();
        let mut first_error = None;
        for (event, result) in results {
            if let Err(e) = result {
                log::warn!("Registration of contestant {} for event {event} failed: {e}", contestant.id);
                failed.push(event);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        match first_error {
            None => Ok(contestant.id),
            Some(first_error) => Err(SubmissionError::RegistrationsFailed {
                contestant: contestant.id,
                attempted: plan.events.len(),
                failed,
                first_error,
            }),
        }
    }
}
