use super::*;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use shared::protocol::{RequestName, RequestRegistry};

use crate::{
    config::Settings,
    dispatcher::{Dispatcher, FetchResponse},
    surface::NoopHooks,
    test_support::{settle, ManualDispatcher, RecordingSurface},
};

fn build(surface: &RecordingSurface, backend: &ManualDispatcher) -> Application {
    Application::new(
        Settings::use_default(),
        Dispatcher::new(RequestRegistry::default(), Arc::new(backend.clone())),
        Box::new(surface.clone()),
        Box::new(NoopHooks),
    )
}

#[tokio::test]
async fn get_instance_builds_the_controller_once() {
    let context = AppContext::new();
    let surface = RecordingSurface::with_regions(&["main"]);
    let backend = ManualDispatcher::default();
    let builds = AtomicUsize::new(0);

    assert!(context.instance().is_none());
    let first = context
        .get_instance(|| {
            builds.fetch_add(1, Ordering::SeqCst);
            build(&surface, &backend)
        })
        .clone();
    let second = context.get_instance(|| {
        builds.fetch_add(1, Ordering::SeqCst);
        build(&surface, &backend)
    });

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert!(first.same_instance(second));
    assert!(context.instance().is_some_and(|h| h.same_instance(&first)));

    first.shutdown().expect("shutdown");
    first.closed().await;
}

#[tokio::test]
async fn handle_drives_the_spawned_controller() {
    let context = AppContext::new();
    let surface = RecordingSurface::with_regions(&["main"]);
    let backend = ManualDispatcher::default();
    let handle = context.get_instance(|| build(&surface, &backend)).clone();

    handle.request_tab("SETTINGS").expect("queued");
    settle().await;
    backend
        .resolve(RequestName::Settings, FetchResponse::success("<form/>"))
        .await;

    assert_eq!(surface.content("main").as_deref(), Some("<form/>"));
    assert_eq!(surface.log().nav_active.as_deref(), Some("settings"));

    handle.notify_success("main", "saved").expect("queued");
    settle().await;
    assert_eq!(surface.visible_messages("main"), vec!["saved".to_string()]);

    handle.shutdown().expect("shutdown");
    handle.closed().await;
    assert!(handle.is_closed());
    assert!(matches!(
        handle.request_tab("GAME"),
        Err(crate::error::ControllerError::ControllerClosed)
    ));
    // Shutdown clears any notification still on screen.
    assert!(surface.visible_messages("main").is_empty());
}
