//! Registration wizard state machine.
//!
//! The wizard walks a contestant through three steps:
//! 1. Personal - name, email, state, gender, school, course, phone
//! 2. Category - eligibility category, which drives the event list
//! 3. Events   - competitions to enter, then submit
//!
//! [`RegistrationWizard`] is synchronous: it never performs I/O itself.
//! Operations that need the network return a request value
//! ([`EligibleEventsRequest`], [`SubmissionPlan`]) that the caller executes
//! (see [`super::RegistrationService`]) and feeds back through
//! [`RegistrationWizard::apply_eligible_events`] or
//! [`RegistrationWizard::finish_submit`].
//!
//! Eligible-event responses carry the generation they were requested under.
//! Changing the category (or resetting) starts a new generation, so a slow
//! response for a superseded category is dropped instead of overwriting the
//! current list.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::api::{Category, CategoryId, ContestantId, EligibleEvent, EventId, Group, GroupId, NewContestant};

use super::draft::{DraftField, Gender, RegistrationDraft};
use super::error::{RegistrationError, MSG_SUBMIT_FAILED};

// ============================================================================
// Steps
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    #[default]
    Personal,
    Category,
    Events,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [WizardStep::Personal, WizardStep::Category, WizardStep::Events];

    pub fn index(self) -> usize {
        match self {
            WizardStep::Personal => 0,
            WizardStep::Category => 1,
            WizardStep::Events => 2,
        }
    }

    pub fn next(self) -> Option<WizardStep> {
        WizardStep::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<WizardStep> {
        self.index().checked_sub(1).map(|i| WizardStep::ALL[i])
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }

    pub fn label(self) -> &'static str {
        match self {
            WizardStep::Personal => "Personal Details",
            WizardStep::Category => "Select Category",
            WizardStep::Events => "Choose Competitions",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Loaded data
// ============================================================================

/// Lookup lists fetched once when the wizard opens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceLists {
    pub groups: Vec<Group>,
    pub categories: Vec<Category>,
}

/// Events the contestant may pick for the selected category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EligibleEvents {
    /// No category selected.
    #[default]
    Idle,
    Loading,
    Loaded(Vec<EligibleEvent>),
    Failed(String),
}

impl EligibleEvents {
    pub fn events(&self) -> &[EligibleEvent] {
        match self {
            EligibleEvents::Loaded(events) => events,
            _ => &[],
        }
    }

    pub fn contains(&self, id: EventId) -> bool {
        self.events().iter().any(|e| e.id == id)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, EligibleEvents::Loading)
    }
}

/// Request for the eligible events of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibleEventsRequest {
    pub generation: u64,
    pub category: CategoryId,
}

/// Everything the two-phase write needs, captured when submit starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPlan {
    pub contestant: NewContestant,
    /// Selected event ids, ascending.
    pub events: Vec<EventId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded(ContestantId),
    /// Last attempt failed; submitting again is allowed.
    Failed,
}

// ============================================================================
// Wizard
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct RegistrationWizard {
    step: WizardStep,
    draft: RegistrationDraft,
    reference: ReferenceLists,
    eligible: EligibleEvents,
    status: SubmitStatus,
    error: Option<String>,
    generation: u64,
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    pub fn reference(&self) -> &ReferenceLists {
        &self.reference
    }

    pub fn eligible(&self) -> &EligibleEvents {
        &self.eligible
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    /// Message displayed under the form, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SubmitStatus::Submitting
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.status, SubmitStatus::Succeeded(_))
    }

    pub fn is_selected(&self, event: EventId) -> bool {
        self.draft.events.contains(&event)
    }

    // ── Reference data ───────────────────────────────────────────────────

    pub fn apply_reference_lists(&mut self, lists: ReferenceLists) {
        log::debug!(
            "Reference lists loaded: {} groups, {} categories",
            lists.groups.len(),
            lists.categories.len()
        );
        self.reference = lists;
    }

    // ── Draft edits ──────────────────────────────────────────────────────

    pub fn set_text(&mut self, field: DraftField, value: impl Into<String>) {
        if self.is_locked() {
            return;
        }
        self.draft.set_text(field, value);
    }

    pub fn set_gender(&mut self, gender: Option<Gender>) {
        if self.is_locked() {
            return;
        }
        self.draft.gender = gender;
    }

    /// Pick a school. Ids not present in the loaded groups are ignored.
    pub fn set_group(&mut self, group: Option<GroupId>) {
        if self.is_locked() {
            return;
        }
        match group {
            Some(id) if !self.reference.groups.iter().any(|g| g.id == id) => {
                log::warn!("Ignoring unknown group id {id}");
            }
            other => self.draft.group_id = other,
        }
    }

    /// Change the category.
    ///
    /// Returns the fetch to perform when a new category is chosen. Clearing
    /// the category empties the event list without any request. Selecting
    /// the current category again is a no-op.
    pub fn select_category(&mut self, category: Option<CategoryId>) -> Option<EligibleEventsRequest> {
        if self.is_locked() || self.draft.category_id == category {
            return None;
        }

        self.draft.category_id = category;
        self.generation += 1;

        match category {
            None => {
                self.eligible = EligibleEvents::Idle;
                self.draft.events.clear();
                None
            }
            Some(category) => {
                self.eligible = EligibleEvents::Loading;
                Some(EligibleEventsRequest {
                    generation: self.generation,
                    category,
                })
            }
        }
    }

    /// Re-issue the fetch for the current category after a failure.
    pub fn retry_eligible_events(&mut self) -> Option<EligibleEventsRequest> {
        let category = self.draft.category_id?;
        if !matches!(self.eligible, EligibleEvents::Failed(_)) {
            return None;
        }
        self.generation += 1;
        self.eligible = EligibleEvents::Loading;
        Some(EligibleEventsRequest {
            generation: self.generation,
            category,
        })
    }

    /// Feed back the result of an [`EligibleEventsRequest`].
    ///
    /// Returns `false` when the response belongs to a superseded request and
    /// was discarded. On success, selections that are not in the new list are
    /// dropped.
    pub fn apply_eligible_events<E: fmt::Display>(
        &mut self,
        generation: u64,
        result: Result<Vec<EligibleEvent>, E>,
    ) -> bool {
        if generation != self.generation {
            log::debug!(
                "Dropping stale eligible events (generation {generation}, current {})",
                self.generation
            );
            return false;
        }

        match result {
            Ok(events) => {
                self.draft
                    .events
                    .retain(|id| events.iter().any(|e| e.id == *id));
                self.eligible = EligibleEvents::Loaded(events);
            }
            Err(e) => {
                log::warn!("Failed to load eligible events: {e}");
                self.draft.events.clear();
                self.eligible = EligibleEvents::Failed(
                    "Could not load events for this category. Press r to retry.".to_string(),
                );
            }
        }
        true
    }

    /// Flip the selection of an eligible event. Returns the new state, or
    /// `None` if the event is not eligible.
    pub fn toggle_event(&mut self, event: EventId) -> Option<bool> {
        if self.is_locked() || !self.eligible.contains(event) {
            return None;
        }
        if self.draft.events.remove(&event) {
            Some(false)
        } else {
            self.draft.events.insert(event);
            Some(true)
        }
    }

    // ── Navigation ───────────────────────────────────────────────────────

    /// Validate the current step and advance by one.
    pub fn next(&mut self) -> Result<WizardStep, RegistrationError> {
        if self.is_locked() {
            return Err(RegistrationError::AlreadySubmitting);
        }

        if let Err(err) = self.validate_step(self.step) {
            self.error = Some(err.user_message().to_string());
            return Err(err);
        }

        match self.step.next() {
            Some(next) => {
                self.step = next;
                self.error = None;
                Ok(next)
            }
            None => {
                let err = RegistrationError::NotAtLastStep;
                self.error = Some("Use submit to finish registration.".to_string());
                Err(err)
            }
        }
    }

    /// Go back one step without validating.
    pub fn back(&mut self) -> WizardStep {
        if self.is_locked() {
            return self.step;
        }
        if let Some(prev) = self.step.previous() {
            self.step = prev;
        }
        self.error = None;
        self.step
    }

    pub fn validate_step(&self, step: WizardStep) -> Result<(), RegistrationError> {
        match step {
            WizardStep::Personal => {
                let missing = self.draft.missing_personal_fields();
                if missing.is_empty() {
                    Ok(())
                } else {
                    Err(RegistrationError::MissingFields {
                        step,
                        fields: missing,
                    })
                }
            }
            WizardStep::Category => {
                if self.draft.category_id.is_some() {
                    Ok(())
                } else {
                    Err(RegistrationError::CategoryNotSelected)
                }
            }
            WizardStep::Events => {
                if self.draft.events.is_empty() {
                    Err(RegistrationError::NoEventsSelected)
                } else if !self.selection_confirmed() {
                    Err(RegistrationError::EventsNotLoaded)
                } else {
                    Ok(())
                }
            }
        }
    }

    // ── Submission ───────────────────────────────────────────────────────

    /// Start a submission. On success the wizard is `Submitting` and the
    /// returned plan must be executed and reported via [`Self::finish_submit`].
    pub fn begin_submit(&mut self) -> Result<SubmissionPlan, RegistrationError> {
        let plan = self.plan_submission();
        match &plan {
            Ok(p) => {
                self.status = SubmitStatus::Submitting;
                self.error = None;
                log::info!("Submitting registration for {} event(s)", p.events.len());
            }
            Err(err @ (RegistrationError::AlreadySubmitting | RegistrationError::NotAtLastStep)) => {
                log::debug!("Submit ignored: {err}");
            }
            Err(err) => {
                self.error = Some(err.user_message().to_string());
            }
        }
        plan
    }

    /// Every selected event is in the list loaded for the current category.
    /// Selections made under a previous category stay unconfirmed until
    /// that category's response arrives.
    fn selection_confirmed(&self) -> bool {
        matches!(self.eligible, EligibleEvents::Loaded(_))
            && self.draft.events.iter().all(|id| self.eligible.contains(*id))
    }

    fn plan_submission(&self) -> Result<SubmissionPlan, RegistrationError> {
        if matches!(self.status, SubmitStatus::Submitting | SubmitStatus::Succeeded(_)) {
            return Err(RegistrationError::AlreadySubmitting);
        }
        if !self.step.is_last() {
            return Err(RegistrationError::NotAtLastStep);
        }
        if self.draft.events.is_empty() {
            return Err(RegistrationError::NoEventsSelected);
        }
        if !self.selection_confirmed() {
            return Err(RegistrationError::EventsNotLoaded);
        }

        let contestant = self
            .draft
            .to_contestant()
            .map_err(|fields| RegistrationError::MissingFields {
                step: WizardStep::Personal,
                fields,
            })?;

        Ok(SubmissionPlan {
            contestant,
            events: self.draft.events.iter().copied().collect(),
        })
    }

    /// Record the outcome of the two-phase write.
    pub fn finish_submit<E: fmt::Display>(&mut self, result: Result<ContestantId, E>) {
        if self.status != SubmitStatus::Submitting {
            log::warn!("Submission result arrived while not submitting; ignoring");
            return;
        }
        match result {
            Ok(id) => {
                log::info!("Registration complete for contestant {id}");
                self.status = SubmitStatus::Succeeded(id);
                self.error = None;
            }
            Err(e) => {
                log::error!("Registration failed: {e}");
                self.status = SubmitStatus::Failed;
                self.error = Some(MSG_SUBMIT_FAILED.to_string());
            }
        }
    }

    /// Discard the draft and start over. Reference lists are kept.
    pub fn reset(&mut self) {
        self.step = WizardStep::Personal;
        self.draft = RegistrationDraft::new();
        self.eligible = EligibleEvents::Idle;
        self.status = SubmitStatus::Idle;
        self.error = None;
        // In-flight category fetches must not land in the fresh draft.
        self.generation += 1;
    }

    fn is_locked(&self) -> bool {
        matches!(self.status, SubmitStatus::Submitting | SubmitStatus::Succeeded(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(ids: &[EventId]) -> Vec<EligibleEvent> {
        ids.iter()
            .map(|id| EligibleEvent {
                id: *id,
                name: format!("Event {id}"),
            })
            .collect()
    }

    fn with_groups() -> RegistrationWizard {
        let mut wizard = RegistrationWizard::new();
        wizard.apply_reference_lists(ReferenceLists {
            groups: vec![Group {
                id: 1,
                name: "School of Humanities".into(),
            }],
            categories: vec![Category {
                id: 2,
                name: "Category A".into(),
            }],
        });
        wizard
    }

    #[test]
    fn test_step_order() {
        assert_eq!(WizardStep::Personal.next(), Some(WizardStep::Category));
        assert_eq!(WizardStep::Events.next(), None);
        assert_eq!(WizardStep::Personal.previous(), None);
        assert_eq!(WizardStep::Events.previous(), Some(WizardStep::Category));
        assert!(WizardStep::Events.is_last());
    }

    #[test]
    fn test_new_wizard_starts_on_personal() {
        let wizard = RegistrationWizard::new();
        assert_eq!(wizard.step(), WizardStep::Personal);
        assert_eq!(wizard.status(), SubmitStatus::Idle);
        assert!(wizard.error().is_none());
        assert_eq!(wizard.eligible(), &EligibleEvents::Idle);
    }

    #[test]
    fn test_back_on_first_step_is_noop() {
        let mut wizard = RegistrationWizard::new();
        assert_eq!(wizard.back(), WizardStep::Personal);
    }

    #[test]
    fn test_unknown_group_is_ignored() {
        let mut wizard = with_groups();
        wizard.set_group(Some(99));
        assert_eq!(wizard.draft().group_id, None);
        wizard.set_group(Some(1));
        assert_eq!(wizard.draft().group_id, Some(1));
    }

    #[test]
    fn test_category_step_requires_category() {
        let mut wizard = with_groups();
        wizard.step = WizardStep::Category;
        assert_eq!(wizard.next(), Err(RegistrationError::CategoryNotSelected));
        assert_eq!(wizard.step(), WizardStep::Category);
        assert!(wizard.error().is_some());
    }

    #[test]
    fn test_clearing_category_empties_events_without_request() {
        let mut wizard = with_groups();
        let req = wizard.select_category(Some(2)).unwrap();
        wizard.apply_eligible_events::<String>(req.generation, Ok(events(&[5, 6])));
        wizard.toggle_event(5);

        assert!(wizard.select_category(None).is_none());
        assert_eq!(wizard.eligible(), &EligibleEvents::Idle);
        assert!(wizard.draft().events.is_empty());
    }

    #[test]
    fn test_reselecting_same_category_is_noop() {
        let mut wizard = with_groups();
        assert!(wizard.select_category(Some(2)).is_some());
        assert!(wizard.select_category(Some(2)).is_none());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut wizard = with_groups();
        let first = wizard.select_category(Some(2)).unwrap();
        let second = wizard.select_category(Some(3)).unwrap();

        // Slow response for category 2 lands after category 3 was chosen.
        assert!(!wizard.apply_eligible_events::<String>(first.generation, Ok(events(&[1, 2]))));
        assert!(wizard.eligible().is_loading());

        assert!(wizard.apply_eligible_events::<String>(second.generation, Ok(events(&[7]))));
        assert_eq!(wizard.eligible().events(), events(&[7]).as_slice());
    }

    #[test]
    fn test_toggle_only_eligible_events() {
        let mut wizard = with_groups();
        let req = wizard.select_category(Some(2)).unwrap();
        wizard.apply_eligible_events::<String>(req.generation, Ok(events(&[5, 6])));

        assert_eq!(wizard.toggle_event(5), Some(true));
        assert_eq!(wizard.toggle_event(5), Some(false));
        assert_eq!(wizard.toggle_event(42), None);
        assert!(wizard.draft().events.is_empty());
    }

    #[test]
    fn test_failed_fetch_can_be_retried() {
        let mut wizard = with_groups();
        let req = wizard.select_category(Some(2)).unwrap();
        wizard.apply_eligible_events(req.generation, Err("connection refused"));
        assert!(matches!(wizard.eligible(), EligibleEvents::Failed(_)));

        let retry = wizard.retry_eligible_events().unwrap();
        assert_eq!(retry.category, 2);
        assert!(retry.generation > req.generation);
        assert!(wizard.eligible().is_loading());
    }

    #[test]
    fn test_retry_without_failure_does_nothing() {
        let mut wizard = with_groups();
        assert!(wizard.retry_eligible_events().is_none());
        wizard.select_category(Some(2));
        assert!(wizard.retry_eligible_events().is_none());
    }

    #[test]
    fn test_submit_only_on_last_step() {
        let mut wizard = with_groups();
        assert_eq!(wizard.begin_submit(), Err(RegistrationError::NotAtLastStep));
        assert_eq!(wizard.status(), SubmitStatus::Idle);
    }

    #[test]
    fn test_selection_unconfirmed_while_new_category_loads() {
        let mut wizard = with_groups();
        let req = wizard.select_category(Some(2)).unwrap();
        wizard.apply_eligible_events::<String>(req.generation, Ok(events(&[5, 6])));
        wizard.toggle_event(5);
        assert_eq!(wizard.validate_step(WizardStep::Events), Ok(()));

        wizard.select_category(Some(3)).unwrap();
        assert_eq!(
            wizard.validate_step(WizardStep::Events),
            Err(RegistrationError::EventsNotLoaded)
        );
    }

    #[test]
    fn test_result_without_submission_is_ignored() {
        let mut wizard = with_groups();
        wizard.finish_submit::<String>(Ok(3));
        assert_eq!(wizard.status(), SubmitStatus::Idle);
    }
}
