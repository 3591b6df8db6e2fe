//! Terminal rendering of the window: content region, nav bar and alerts.

use std::collections::HashSet;

use client_core::{Notification, RenderSurface, Settings, TabHooks};
use shared::domain::{NotificationId, Region};
use tracing::info;

const PREVIEW_CHARS: usize = 72;

pub struct TerminalSurface {
    regions: HashSet<Region>,
    nav_active: Option<String>,
}

impl TerminalSurface {
    pub fn new(regions: impl IntoIterator<Item = Region>) -> Self {
        Self {
            regions: regions.into_iter().collect(),
            nav_active: None,
        }
    }
}

impl RenderSurface for TerminalSurface {
    fn has_region(&self, region: &Region) -> bool {
        self.regions.contains(region)
    }

    fn show_loader(&mut self, region: &Region) {
        println!("[{region}] loading...");
    }

    fn replace_content(&mut self, region: &Region, markup: &str) {
        println!("[{region}] {}", preview(markup));
    }

    fn clear_content(&mut self, region: &Region) {
        println!("[{region}] (empty)");
    }

    fn set_nav_active(&mut self, nav_id: &str) {
        if self.nav_active.as_deref() != Some(nav_id) {
            println!("[nav] active: {nav_id}");
            self.nav_active = Some(nav_id.to_string());
        }
    }

    fn mount_notification(&mut self, notification: &Notification) {
        let timer = if notification.auto_close {
            "auto-close"
        } else {
            "dismiss with: dismiss <region> <id>"
        };
        println!(
            "[{}] #{} {} {} ({timer})",
            notification.region,
            notification.id.0,
            notification.severity.style_class(),
            notification.message
        );
    }

    fn set_notification_visible(&mut self, _region: &Region, _id: NotificationId, _visible: bool) {}

    fn unmount_notification(&mut self, region: &Region, id: NotificationId) {
        println!("[{region}] #{} closed", id.0);
    }

    fn apply_settings(&mut self, settings: &Settings) {
        info!(
            auto_close_notif = settings.auto_close_notif,
            notif_timer_ms = settings.notif_timer_ms,
            "ui: settings applied to view"
        );
    }

    fn open_doc_window(&mut self) {
        println!("[doc] documentation window opened");
    }

    fn toggle_console(&mut self) {
        println!("[console] toggled");
    }
}

/// Stand-ins for the game and settings view initializers.
pub struct TerminalHooks;

impl TabHooks for TerminalHooks {
    fn on_game_loaded(&mut self, settings: &Settings) {
        if settings.typeset_math {
            info!("ui: typesetting math in game view");
        }
        if settings.show_countdown {
            info!("ui: countdown shown");
        }
    }

    fn on_settings_loaded(&mut self, settings: &Settings) {
        info!(?settings, "ui: settings form populated");
    }
}

fn preview(markup: &str) -> String {
    let flat = markup.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        flat
    }
}
