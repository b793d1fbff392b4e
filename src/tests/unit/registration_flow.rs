//! End-to-end wizard flow against a mocked API.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::rstest;

use crate::core::api::{Contestant, MockFestApi, NewRegistration, Registration};
use crate::core::registration::{
    DraftField, RegistrationError, RegistrationService, SubmissionError, SubmitStatus,
    WizardStep, MSG_EVENTS_LOADING, MSG_FILL_REQUIRED, MSG_SELECT_EVENT, MSG_SUBMIT_FAILED,
};
use crate::tests::mocks::{accepting_api, eligible, filled_wizard};

#[tokio::test]
async fn test_sample_registration_creates_contestant_then_two_registrations() {
    let mut wizard = filled_wizard();
    assert_eq!(wizard.next(), Ok(WizardStep::Category));

    let request = wizard.select_category(Some(2)).expect("fetch for new category");
    assert_eq!(request.category, 2);
    assert!(wizard.apply_eligible_events::<String>(request.generation, Ok(eligible(&[5, 6, 7]))));
    assert_eq!(wizard.next(), Ok(WizardStep::Events));

    assert_eq!(wizard.toggle_event(5), Some(true));
    assert_eq!(wizard.toggle_event(6), Some(true));

    let mut api = MockFestApi::new();
    api.expect_create_contestant()
        .times(1)
        .withf(|c| {
            c.full_name == "A"
                && c.email == "a@b.com"
                && c.state == "X"
                && c.gender == "Male"
                && c.group == 1
                && c.category == 2
                && c.course == "C"
                && c.phone_number == "123"
        })
        .returning(|_| {
            Ok(Contestant {
                id: 42,
                full_name: Some("A".into()),
            })
        });
    for event in [5, 6] {
        api.expect_create_registration()
            .with(eq(NewRegistration {
                contestant: 42,
                event,
            }))
            .times(1)
            .returning(|r| {
                Ok(Registration {
                    id: 100 + r.event,
                    contestant: r.contestant,
                    event: r.event,
                })
            });
    }

    let plan = wizard.begin_submit().expect("plan");
    assert_eq!(plan.events, vec![5, 6]);
    assert!(wizard.is_submitting());

    let service = RegistrationService::new(Arc::new(api));
    let result = service.submit(&plan).await;
    assert_eq!(result.as_ref().ok(), Some(&42));

    wizard.finish_submit(result);
    assert_eq!(wizard.status(), SubmitStatus::Succeeded(42));
    assert!(wizard.is_complete());
}

#[rstest]
#[case::full_name(DraftField::FullName)]
#[case::email(DraftField::Email)]
#[case::state(DraftField::State)]
#[case::course(DraftField::Course)]
#[case::phone_number(DraftField::PhoneNumber)]
fn test_blank_text_field_blocks_personal_step(#[case] field: DraftField) {
    let mut wizard = filled_wizard();
    wizard.set_text(field, "   ");

    match wizard.next() {
        Err(RegistrationError::MissingFields { step, fields }) => {
            assert_eq!(step, WizardStep::Personal);
            assert_eq!(fields, vec![field]);
        }
        other => panic!("expected missing {field:?}, got {other:?}"),
    }
    assert_eq!(wizard.step(), WizardStep::Personal);
    assert_eq!(wizard.error(), Some(MSG_FILL_REQUIRED));
}

#[rstest]
#[case::gender(DraftField::Gender)]
#[case::group(DraftField::Group)]
fn test_unset_choice_blocks_personal_step(#[case] field: DraftField) {
    let mut wizard = filled_wizard();
    match field {
        DraftField::Gender => wizard.set_gender(None),
        _ => wizard.set_group(None),
    }

    assert!(matches!(
        wizard.next(),
        Err(RegistrationError::MissingFields { ref fields, .. }) if fields == &vec![field]
    ));
}

#[test]
fn test_zero_events_yields_no_submission_plan() {
    let mut wizard = filled_wizard();
    wizard.next().expect("personal step valid");
    let request = wizard.select_category(Some(2)).expect("fetch");
    wizard.apply_eligible_events::<String>(request.generation, Ok(eligible(&[5])));
    wizard.next().expect("category chosen");

    assert_eq!(wizard.begin_submit(), Err(RegistrationError::NoEventsSelected));
    assert_eq!(wizard.status(), SubmitStatus::Idle);
    assert_eq!(wizard.error(), Some(MSG_SELECT_EVENT));
}

#[test]
fn test_events_from_previous_category_not_submitted_while_loading() {
    let mut wizard = filled_wizard();
    wizard.next().expect("personal");
    let first = wizard.select_category(Some(2)).expect("fetch");
    wizard.apply_eligible_events::<String>(first.generation, Ok(eligible(&[5, 6])));
    wizard.next().expect("category");
    assert_eq!(wizard.toggle_event(5), Some(true));

    // Back to the category step and switch before the new list arrives
    assert_eq!(wizard.back(), WizardStep::Category);
    let second = wizard.select_category(Some(3)).expect("fetch");
    assert!(wizard.eligible().is_loading());
    assert_eq!(wizard.next(), Ok(WizardStep::Events));

    assert_eq!(wizard.begin_submit(), Err(RegistrationError::EventsNotLoaded));
    assert_eq!(wizard.status(), SubmitStatus::Idle);
    assert_eq!(wizard.error(), Some(MSG_EVENTS_LOADING));

    // Category 3 does not offer event 5, so the stale pick is dropped
    assert!(wizard.apply_eligible_events::<String>(second.generation, Ok(eligible(&[7]))));
    assert!(!wizard.is_selected(5));
    assert_eq!(wizard.begin_submit(), Err(RegistrationError::NoEventsSelected));

    wizard.toggle_event(7);
    let plan = wizard.begin_submit().expect("plan");
    assert_eq!(plan.contestant.category, 3);
    assert_eq!(plan.events, vec![7]);
}

#[tokio::test]
async fn test_failed_submission_can_be_retried() {
    let mut wizard = filled_wizard();
    wizard.next().expect("personal");
    let request = wizard.select_category(Some(2)).expect("fetch");
    wizard.apply_eligible_events::<String>(request.generation, Ok(eligible(&[5])));
    wizard.next().expect("category");
    wizard.toggle_event(5);

    let plan = wizard.begin_submit().expect("plan");
    wizard.finish_submit(Err(SubmissionError::ContestantRejected(
        crate::core::api::ApiError::Status {
            status: 400,
            body: "{\"email\":[\"invalid\"]}".into(),
        },
    )));
    assert_eq!(wizard.status(), SubmitStatus::Failed);
    assert_eq!(wizard.error(), Some(MSG_SUBMIT_FAILED));
    // Draft is kept for the retry
    assert!(wizard.is_selected(5));

    let service = RegistrationService::new(Arc::new(accepting_api(7)));
    let retry = wizard.begin_submit().expect("retry allowed after failure");
    assert_eq!(retry, plan);
    wizard.finish_submit(service.submit(&retry).await);
    assert_eq!(wizard.status(), SubmitStatus::Succeeded(7));
}

#[test]
fn test_reset_after_success_starts_fresh_but_keeps_lists() {
    let mut wizard = filled_wizard();
    wizard.next().expect("personal");
    let request = wizard.select_category(Some(3)).expect("fetch");
    wizard.apply_eligible_events::<String>(request.generation, Ok(eligible(&[9])));
    wizard.next().expect("category");
    wizard.toggle_event(9);
    wizard.begin_submit().expect("plan");
    wizard.finish_submit::<String>(Ok(1));

    wizard.reset();
    assert_eq!(wizard.step(), WizardStep::Personal);
    assert!(wizard.draft().full_name.is_empty());
    assert!(wizard.draft().events.is_empty());
    assert_eq!(wizard.reference().groups.len(), 2);

    // The old category's response must not land in the fresh draft
    assert!(!wizard.apply_eligible_events::<String>(request.generation, Ok(eligible(&[9]))));
}
