use crate::core::api::{ApiError, ContestantId, EventId};

use super::draft::DraftField;
use super::wizard::WizardStep;

pub const MSG_FILL_REQUIRED: &str = "Please fill all required fields before proceeding.";
pub const MSG_SELECT_CATEGORY: &str = "Please select a category before proceeding.";
pub const MSG_SELECT_EVENT: &str = "Please select at least one competition.";
pub const MSG_EVENTS_LOADING: &str =
    "Competitions for this category are still loading. Please wait and check your selection.";
pub const MSG_SUBMIT_FAILED: &str =
    "Registration failed. Please check your details and try again.";

/// Errors surfaced by the registration wizard. All are recoverable by the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("Missing required fields on {step}: {fields:?}")]
    MissingFields {
        step: WizardStep,
        fields: Vec<DraftField>,
    },

    #[error("No category selected")]
    CategoryNotSelected,

    #[error("No competition selected")]
    NoEventsSelected,

    #[error("Selected competitions are not confirmed for the current category")]
    EventsNotLoaded,

    #[error("Submission is only possible on the last step")]
    NotAtLastStep,

    #[error("A submission is already in progress")]
    AlreadySubmitting,

    #[error("Network error: {0}")]
    Network(String),
}

impl RegistrationError {
    /// Text shown under the form.
    pub fn user_message(&self) -> &'static str {
        match self {
            RegistrationError::MissingFields { .. } => MSG_FILL_REQUIRED,
            RegistrationError::CategoryNotSelected => MSG_SELECT_CATEGORY,
            RegistrationError::NoEventsSelected => MSG_SELECT_EVENT,
            RegistrationError::EventsNotLoaded => MSG_EVENTS_LOADING,
            RegistrationError::NotAtLastStep | RegistrationError::AlreadySubmitting => {
                "Please finish the current step first."
            }
            RegistrationError::Network(_) => MSG_SUBMIT_FAILED,
        }
    }

    pub fn is_validation(&self) -> bool {
        !matches!(self, RegistrationError::Network(_))
    }
}

/// Failure of the two-phase write.
///
/// Participant creation and the per-event registrations are separate
/// requests, so a failure in the second phase leaves a contestant on the
/// server without all of its registrations.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Contestant was rejected: {0}")]
    ContestantRejected(#[source] ApiError),

    #[error("Contestant {contestant} created but {} of {attempted} registrations failed (events {failed:?}): {first_error}", .failed.len())]
    RegistrationsFailed {
        contestant: ContestantId,
        attempted: usize,
        failed: Vec<EventId>,
        first_error: ApiError,
    },
}

impl From<SubmissionError> for RegistrationError {
    fn from(err: SubmissionError) -> Self {
        RegistrationError::Network(err.to_string())
    }
}
