//! App-level event routing: modal priority, view input, notifications.

use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use crate::core::api::{MockFestApi, TeamPoints};
use crate::tui::app::AppState;
use crate::tui::events::{Action, AppEvent, Focus, Notification, NotificationLevel};
use crate::tests::mocks::{categories, groups, services};

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Input(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

fn app(api: MockFestApi) -> AppState {
    let (services, rx) = services(api);
    AppState::new(rx, services)
}

#[test]
fn test_notifications_dedup_and_cap() {
    let mut app = app(MockFestApi::new());

    app.push_notification("Saved".into(), NotificationLevel::Success);
    app.push_notification("Saved".into(), NotificationLevel::Success);
    assert_eq!(app.notifications.len(), 1);

    for msg in ["a", "b", "c"] {
        app.handle_event(AppEvent::Notification(Notification::new(
            msg,
            NotificationLevel::Info,
        )));
    }
    let messages: Vec<_> = app.notifications.iter().map(|n| n.message.as_str()).collect();
    assert_eq!(messages, vec!["a", "b", "c"]);

    let ids: Vec<_> = app.notifications.iter().map(|n| n.id).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_help_modal_swallows_quit() {
    let mut app = app(MockFestApi::new());
    app.handle_action(Action::ShowHelp);

    app.handle_event(key(KeyCode::Char('q')));
    assert!(app.running);
    assert!(app.show_help);

    app.handle_event(key(KeyCode::Esc));
    assert!(!app.show_help);
}

#[test]
fn test_typing_q_in_name_field_does_not_quit() {
    let mut app = app(MockFestApi::new());
    assert_eq!(app.focus, Focus::Register);

    app.handle_event(key(KeyCode::Char('q')));
    assert!(app.running);
    assert_eq!(app.registration.wizard().draft().full_name, "q");
}

#[test]
fn test_ctrl_c_quits_from_text_field() {
    let mut app = app(MockFestApi::new());
    app.handle_event(AppEvent::Input(Event::Key(KeyEvent::new(
        KeyCode::Char('c'),
        KeyModifiers::CONTROL,
    ))));
    assert!(!app.running);
}

#[tokio::test]
async fn test_function_keys_switch_views_and_load() {
    let mut api = MockFestApi::new();
    api.expect_groups().returning(|| Ok(groups()));
    api.expect_categories().returning(|| Ok(categories()));
    api.expect_events().returning(|| Ok(Vec::new()));
    api.expect_points().returning(|| {
        Ok(vec![TeamPoints {
            group_name: "Dept of English".into(),
            total_points: 12,
        }])
    });
    api.expect_gallery().returning(|| Ok(Vec::new()));
    let mut app = app(api);

    app.handle_event(key(KeyCode::F(2)));
    assert_eq!(app.focus, Focus::Results);
    app.handle_event(key(KeyCode::F(3)));
    assert_eq!(app.focus, Focus::Scoreboard);
    app.handle_event(key(KeyCode::F(4)));
    assert_eq!(app.focus, Focus::Gallery);

    // Let the spawned fetches finish, then drain them
    tokio::time::sleep(Duration::from_millis(20)).await;
    app.handle_event(AppEvent::Tick);

    app.handle_event(AppEvent::Quit);
    assert!(!app.running);
}
