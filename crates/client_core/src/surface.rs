//! Seams between the controller and whatever renders the window.

use shared::domain::{NotificationId, Region};

use crate::{config::Settings, notification::Notification};

/// Rendering surface owned by the front end. The controller only describes
/// what should be shown; how it looks is up to the implementation.
pub trait RenderSurface: Send {
    fn has_region(&self, region: &Region) -> bool;
    fn show_loader(&mut self, region: &Region);
    fn replace_content(&mut self, region: &Region, markup: &str);
    fn clear_content(&mut self, region: &Region);
    fn set_nav_active(&mut self, nav_id: &str);

    /// Attach a notification in its hidden state, dismiss affordance included.
    fn mount_notification(&mut self, notification: &Notification);
    fn set_notification_visible(&mut self, region: &Region, id: NotificationId, visible: bool);
    fn unmount_notification(&mut self, region: &Region, id: NotificationId);

    fn apply_settings(&mut self, _settings: &Settings) {}
    fn open_doc_window(&mut self) {}
    fn toggle_console(&mut self) {}
}

/// Per-tab initialization run after new content is swapped in.
pub trait TabHooks: Send {
    fn on_game_loaded(&mut self, settings: &Settings);
    fn on_settings_loaded(&mut self, settings: &Settings);
}

pub struct NoopHooks;

impl TabHooks for NoopHooks {
    fn on_game_loaded(&mut self, _settings: &Settings) {}

    fn on_settings_loaded(&mut self, _settings: &Settings) {}
}
