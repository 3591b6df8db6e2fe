//! One live notification per region, with optional timed auto-dismissal.

use std::collections::HashMap;

use shared::domain::{NotificationId, Region, Severity};
use tokio::{
    sync::mpsc::UnboundedSender,
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use tracing::{debug, info};

use crate::{
    application::AppEvent, config::Settings, error::ControllerError, surface::RenderSurface,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub region: Region,
    pub message: String,
    pub severity: Severity,
    pub auto_close: bool,
    pub expiry: Option<Instant>,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    User,
    AutoClose,
    Superseded,
    Shutdown,
}

struct Slot {
    notification: Notification,
    timer: Option<JoinHandle<()>>,
}

pub struct NotificationManager {
    slots: HashMap<Region, Slot>,
    next_id: u64,
    events: UnboundedSender<AppEvent>,
}

impl NotificationManager {
    pub fn new(events: UnboundedSender<AppEvent>) -> Self {
        Self {
            slots: HashMap::new(),
            next_id: 1,
            events,
        }
    }

    /// Replace whatever occupies `region` with a new notification. The old
    /// one is hidden and unmounted before the new one becomes visible, and
    /// its pending auto-close timer is aborted.
    pub fn show(
        &mut self,
        surface: &mut dyn RenderSurface,
        region: &Region,
        message: impl Into<String>,
        severity: Severity,
        settings: &Settings,
    ) -> Result<NotificationId, ControllerError> {
        if !surface.has_region(region) {
            return Err(ControllerError::NotificationRegionMissing(region.clone()));
        }

        if let Some(previous) = self.slots.remove(region) {
            retire(surface, previous, DismissReason::Superseded);
        }

        let id = NotificationId(self.next_id);
        self.next_id += 1;

        let auto_close = settings.auto_close_notif;
        let mut notification = Notification {
            id,
            region: region.clone(),
            message: message.into(),
            severity,
            auto_close,
            expiry: auto_close.then(|| Instant::now() + settings.notif_timer()),
            visible: false,
        };
        surface.mount_notification(&notification);
        surface.set_notification_visible(region, id, true);
        notification.visible = true;

        let timer = notification
            .expiry
            .map(|deadline| self.schedule_auto_close(region.clone(), id, deadline));

        debug!(
            region = %region,
            id = id.0,
            severity = %severity,
            auto_close,
            "notif: shown"
        );
        self.slots.insert(
            region.clone(),
            Slot {
                notification,
                timer,
            },
        );
        Ok(id)
    }

    fn schedule_auto_close(
        &self,
        region: Region,
        id: NotificationId,
        deadline: Instant,
    ) -> JoinHandle<()> {
        let events = self.events.clone();
        tokio::spawn(async move {
            sleep_until(deadline).await;
            if events.send(AppEvent::NotificationExpired { region, id }).is_err() {
                debug!(id = id.0, "notif: controller stopped; expiry dropped");
            }
        })
    }

    /// User-triggered close. Returns false when `id` is no longer live.
    pub fn dismiss(
        &mut self,
        surface: &mut dyn RenderSurface,
        region: &Region,
        id: NotificationId,
    ) -> bool {
        self.remove_if_current(surface, region, id, DismissReason::User)
    }

    /// Timer-triggered close. A timer that outlived its notification is a no-op.
    pub fn expire(
        &mut self,
        surface: &mut dyn RenderSurface,
        region: &Region,
        id: NotificationId,
    ) -> bool {
        self.remove_if_current(surface, region, id, DismissReason::AutoClose)
    }

    fn remove_if_current(
        &mut self,
        surface: &mut dyn RenderSurface,
        region: &Region,
        id: NotificationId,
        reason: DismissReason,
    ) -> bool {
        let is_current = self
            .slots
            .get(region)
            .is_some_and(|slot| slot.notification.id == id);
        if !is_current {
            debug!(region = %region, id = id.0, ?reason, "notif: dismiss ignored, not live");
            return false;
        }
        match self.slots.remove(region) {
            Some(slot) => {
                retire(surface, slot, reason);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self, surface: &mut dyn RenderSurface) {
        for (_, slot) in self.slots.drain() {
            retire(surface, slot, DismissReason::Shutdown);
        }
    }

    pub fn visible(&self, region: &Region) -> Option<&Notification> {
        self.slots
            .get(region)
            .map(|slot| &slot.notification)
            .filter(|notification| notification.visible)
    }

    pub fn live_count(&self) -> usize {
        self.slots.len()
    }
}

fn retire(surface: &mut dyn RenderSurface, slot: Slot, reason: DismissReason) {
    let Slot {
        notification,
        timer,
    } = slot;
    if let Some(timer) = timer {
        timer.abort();
    }
    surface.set_notification_visible(&notification.region, notification.id, false);
    surface.unmount_notification(&notification.region, notification.id);
    info!(
        region = %notification.region,
        id = notification.id.0,
        ?reason,
        "notif: removed"
    );
}

#[cfg(test)]
#[path = "tests/notification_tests.rs"]
mod tests;
