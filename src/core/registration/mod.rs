//! Contestant registration: form draft, wizard state machine and the
//! two-phase write against the API.

mod draft;
mod error;
mod service;
mod wizard;

pub use draft::{DraftField, Gender, RegistrationDraft};
pub use error::{
    RegistrationError, SubmissionError, MSG_EVENTS_LOADING, MSG_FILL_REQUIRED, MSG_SELECT_CATEGORY, MSG_SELECT_EVENT,
    MSG_SUBMIT_FAILED,
};
pub use service::RegistrationService;
pub use wizard::{
    EligibleEvents, EligibleEventsRequest, ReferenceLists, RegistrationWizard, SubmissionPlan,
    SubmitStatus, WizardStep,
};
