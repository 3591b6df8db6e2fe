use std::sync::OnceLock;

use tracing::info;

use crate::application::{AppHandle, Application};

/// Process-scoped home of the single [`Application`]. Built once at startup
/// and passed by reference to whatever needs the controller.
#[derive(Default)]
pub struct AppContext {
    instance: OnceLock<AppHandle>,
}

impl AppContext {
    pub const fn new() -> Self {
        Self {
            instance: OnceLock::new(),
        }
    }

    /// Returns the controller handle, building and spawning the controller on
    /// the first call. Later calls never run `init`. Must be called from
    /// within a Tokio runtime.
    pub fn get_instance(&self, init: impl FnOnce() -> Application) -> &AppHandle {
        self.instance.get_or_init(|| {
            let application = init();
            let handle = application.handle();
            info!(tab = %application.current_tab(), "app: controller instance created");
            tokio::spawn(application.run());
            handle
        })
    }

    pub fn instance(&self) -> Option<&AppHandle> {
        self.instance.get()
    }
}

#[cfg(test)]
#[path = "tests/context_tests.rs"]
mod tests;
