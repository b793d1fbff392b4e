//! Fixtures and pre-wired API mocks.

#![allow(dead_code)]

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::api::{
    Category, Contestant, EligibleEvent, Group, MockFestApi, Registration,
};
use crate::core::registration::{Gender, ReferenceLists, RegistrationWizard};
use crate::tui::events::AppEvent;
use crate::tui::services::Services;

pub fn groups() -> Vec<Group> {
    vec![
        Group {
            id: 1,
            name: "Dept of English".into(),
        },
        Group {
            id: 2,
            name: "Dept of History".into(),
        },
    ]
}

pub fn categories() -> Vec<Category> {
    vec![
        Category {
            id: 2,
            name: "Category A (UG)".into(),
        },
        Category {
            id: 3,
            name: "Category B (PG)".into(),
        },
    ]
}

pub fn eligible(ids: &[u64]) -> Vec<EligibleEvent> {
    ids.iter()
        .map(|&id| EligibleEvent {
            id,
            name: format!("Event {id}"),
        })
        .collect()
}

/// A wizard with reference lists applied and every personal field filled
/// with the canonical sample contestant.
pub fn filled_wizard() -> RegistrationWizard {
    use crate::core::registration::DraftField;

    let mut wizard = RegistrationWizard::new();
    wizard.apply_reference_lists(ReferenceLists {
        groups: groups(),
        categories: categories(),
    });
    wizard.set_text(DraftField::FullName, "A");
    wizard.set_text(DraftField::Email, "a@b.com");
    wizard.set_text(DraftField::State, "X");
    wizard.set_gender(Some(Gender::Male));
    wizard.set_group(Some(1));
    wizard.set_text(DraftField::Course, "C");
    wizard.set_text(DraftField::PhoneNumber, "123");
    wizard
}

/// Mock that accepts any contestant as id `contestant_id` and every
/// registration.
pub fn accepting_api(contestant_id: u64) -> MockFestApi {
    let mut api = MockFestApi::new();
    api.expect_create_contestant().returning(move |c| {
        Ok(Contestant {
            id: contestant_id,
            full_name: Some(c.full_name),
        })
    });
    api.expect_create_registration().returning(|r| {
        Ok(Registration {
            id: r.event * 10,
            contestant: r.contestant,
            event: r.event,
        })
    });
    api
}

/// Services over a mock, plus the receiving end of the app channel.
pub fn services(api: MockFestApi) -> (Services, mpsc::UnboundedReceiver<AppEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let services = Services::with_api(Arc::new(api), &AppConfig::default(), tx);
    (services, rx)
}
