//! Controller core for the tabbed desktop client: tab transitions, async
//! content loading and per-region status notifications.

pub mod application;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod notification;
pub mod surface;
pub mod tabs;

pub use application::{AppEvent, AppHandle, Application, GameSession};
pub use config::{load_config, ClientConfig, Settings};
pub use context::AppContext;
pub use dispatcher::{
    Dispatcher, FetchResponse, FetchStatus, HttpDispatcher, Request, RequestDispatcher,
};
pub use error::ControllerError;
pub use notification::{Notification, NotificationManager};
pub use surface::{NoopHooks, RenderSurface, TabHooks};
pub use tabs::{LoadState, LoadTicket, TabController};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
