use super::*;

use std::sync::Arc;

use shared::protocol::{RequestName, RequestRegistry};

use crate::test_support::ManualDispatcher;

fn dispatcher(backend: &ManualDispatcher) -> Dispatcher {
    Dispatcher::new(RequestRegistry::default(), Arc::new(backend.clone()))
}

#[tokio::test]
async fn transition_records_intent_before_content_arrives() {
    let backend = ManualDispatcher::default();
    let mut tabs = TabController::default();

    let ticket = tabs
        .transition(Tab::Settings, &dispatcher(&backend), |_, _| {})
        .expect("ticket");

    assert_eq!(tabs.intended_tab(), Tab::Settings);
    assert_eq!(tabs.rendered_tab(), None);
    assert_eq!(tabs.state(), LoadState::Loading(ticket));
}

#[tokio::test]
async fn newer_transition_makes_older_ticket_stale() {
    let backend = ManualDispatcher::default();
    let dispatcher = dispatcher(&backend);
    let mut tabs = TabController::default();

    let game = tabs.transition(Tab::Game, &dispatcher, |_, _| {}).expect("game");
    let settings = tabs
        .transition(Tab::Settings, &dispatcher, |_, _| {})
        .expect("settings");

    assert!(settings.generation > game.generation);
    assert_eq!(
        tabs.complete(game, true),
        LoadDisposition::Stale {
            ticket: game,
            latest: settings.generation,
        }
    );
    assert_eq!(
        tabs.complete(settings, true),
        LoadDisposition::Render(Tab::Settings)
    );
    assert_eq!(tabs.rendered_tab(), Some(Tab::Settings));
}

#[tokio::test]
async fn same_tab_requested_twice_only_latest_counts() {
    let backend = ManualDispatcher::default();
    let dispatcher = dispatcher(&backend);
    let mut tabs = TabController::default();

    let first = tabs.transition(Tab::Help, &dispatcher, |_, _| {}).expect("first");
    let second = tabs.transition(Tab::Help, &dispatcher, |_, _| {}).expect("second");

    assert!(matches!(
        tabs.complete(first, true),
        LoadDisposition::Stale { .. }
    ));
    assert_eq!(
        tabs.complete(second, true),
        LoadDisposition::Render(Tab::Help)
    );
}

#[tokio::test]
async fn failure_keeps_previous_rendered_tab() {
    let backend = ManualDispatcher::default();
    let dispatcher = dispatcher(&backend);
    let mut tabs = TabController::default();

    let game = tabs.transition(Tab::Game, &dispatcher, |_, _| {}).expect("game");
    tabs.complete(game, true);
    let help = tabs.transition(Tab::Help, &dispatcher, |_, _| {}).expect("help");

    assert_eq!(
        tabs.complete(help, false),
        LoadDisposition::Failed(Tab::Help)
    );
    assert_eq!(tabs.state(), LoadState::Failed(help));
    assert_eq!(tabs.intended_tab(), Tab::Help);
    assert_eq!(tabs.rendered_tab(), Some(Tab::Game));
    assert_eq!(tabs.pending(), None);
}

#[tokio::test]
async fn completed_ticket_cannot_render_twice() {
    let backend = ManualDispatcher::default();
    let mut tabs = TabController::default();

    let ticket = tabs
        .transition(Tab::Game, &dispatcher(&backend), |_, _| {})
        .expect("ticket");
    assert_eq!(
        tabs.complete(ticket, true),
        LoadDisposition::Render(Tab::Game)
    );
    assert!(matches!(
        tabs.complete(ticket, true),
        LoadDisposition::Stale { .. }
    ));
}

#[tokio::test]
async fn doc_tab_is_not_fetched() {
    let backend = ManualDispatcher::default();
    let mut tabs = TabController::default();

    assert!(tabs
        .transition(Tab::Doc, &dispatcher(&backend), |_, _| {})
        .is_none());
    assert_eq!(tabs.state(), LoadState::Idle);
    assert_eq!(tabs.intended_tab(), Tab::Game);
    crate::test_support::settle().await;
    assert!(backend.sent().is_empty());
}

#[tokio::test]
async fn transition_issues_one_fetch_for_the_tab() {
    let backend = ManualDispatcher::default();
    let mut tabs = TabController::default();

    tabs.transition(Tab::Settings, &dispatcher(&backend), |_, _| {});
    crate::test_support::settle().await;

    assert_eq!(backend.sent(), vec![(RequestName::Settings, None)]);
}
