//! Test doubles shared by the controller test modules.

use std::{
    collections::{BTreeMap, HashMap, HashSet, VecDeque},
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use shared::{
    domain::{NotificationId, Region},
    protocol::{RequestName, RequestSpec},
};
use tokio::sync::oneshot;

use crate::{
    config::Settings,
    dispatcher::{FetchResponse, RequestDispatcher},
    notification::Notification,
    surface::{RenderSurface, TabHooks},
};

pub const LOADER_MARKUP: &str = "<div class=\"spinner\"></div>";

#[derive(Default)]
pub struct SurfaceLog {
    pub regions: HashSet<Region>,
    pub content: HashMap<Region, String>,
    pub loader_shown: usize,
    pub nav_active: Option<String>,
    pub mounted: BTreeMap<NotificationId, (Notification, bool)>,
    pub unmounted: Vec<NotificationId>,
    pub settings_applied: Vec<Settings>,
    pub doc_opened: usize,
    pub console_toggles: usize,
}

#[derive(Clone, Default)]
pub struct RecordingSurface {
    log: Arc<Mutex<SurfaceLog>>,
}

impl RecordingSurface {
    pub fn with_regions(regions: &[&str]) -> Self {
        let surface = Self::default();
        surface.log().regions = regions.iter().map(|r| Region::new(*r)).collect();
        surface
    }

    pub fn log(&self) -> MutexGuard<'_, SurfaceLog> {
        self.log.lock().expect("surface log")
    }

    pub fn visible_messages(&self, region: &str) -> Vec<String> {
        let region = Region::new(region);
        self.log()
            .mounted
            .values()
            .filter(|(notification, visible)| *visible && notification.region == region)
            .map(|(notification, _)| notification.message.clone())
            .collect()
    }

    pub fn content(&self, region: &str) -> Option<String> {
        self.log().content.get(&Region::new(region)).cloned()
    }
}

impl RenderSurface for RecordingSurface {
    fn has_region(&self, region: &Region) -> bool {
        self.log().regions.contains(region)
    }

    fn show_loader(&mut self, region: &Region) {
        let mut log = self.log();
        log.loader_shown += 1;
        log.content.insert(region.clone(), LOADER_MARKUP.to_string());
    }

    fn replace_content(&mut self, region: &Region, markup: &str) {
        self.log().content.insert(region.clone(), markup.to_string());
    }

    fn clear_content(&mut self, region: &Region) {
        self.log().content.insert(region.clone(), String::new());
    }

    fn set_nav_active(&mut self, nav_id: &str) {
        self.log().nav_active = Some(nav_id.to_string());
    }

    fn mount_notification(&mut self, notification: &Notification) {
        self.log().mounted.insert(
            notification.id,
            (notification.clone(), notification.visible),
        );
    }

    fn set_notification_visible(&mut self, _region: &Region, id: NotificationId, visible: bool) {
        if let Some(entry) = self.log().mounted.get_mut(&id) {
            entry.1 = visible;
        }
    }

    fn unmount_notification(&mut self, _region: &Region, id: NotificationId) {
        let mut log = self.log();
        log.mounted.remove(&id);
        log.unmounted.push(id);
    }

    fn apply_settings(&mut self, settings: &Settings) {
        self.log().settings_applied.push(settings.clone());
    }

    fn open_doc_window(&mut self) {
        self.log().doc_opened += 1;
    }

    fn toggle_console(&mut self) {
        self.log().console_toggles += 1;
    }
}

#[derive(Default)]
pub struct HookCalls {
    pub game: usize,
    pub settings: usize,
}

#[derive(Clone, Default)]
pub struct CountingHooks {
    calls: Arc<Mutex<HookCalls>>,
}

impl CountingHooks {
    pub fn calls(&self) -> MutexGuard<'_, HookCalls> {
        self.calls.lock().expect("hook calls")
    }
}

impl TabHooks for CountingHooks {
    fn on_game_loaded(&mut self, _settings: &Settings) {
        self.calls().game += 1;
    }

    fn on_settings_loaded(&mut self, _settings: &Settings) {
        self.calls().settings += 1;
    }
}

type Pending = HashMap<RequestName, VecDeque<oneshot::Sender<FetchResponse>>>;

/// Holds every fetch open until the test resolves it, in any order.
#[derive(Clone, Default)]
pub struct ManualDispatcher {
    pending: Arc<Mutex<Pending>>,
    sent: Arc<Mutex<Vec<(RequestName, Option<String>)>>>,
}

impl ManualDispatcher {
    pub fn sent(&self) -> Vec<(RequestName, Option<String>)> {
        self.sent.lock().expect("sent").clone()
    }

    /// Completes the oldest open fetch for `name`, waiting for the spawned
    /// request task to register it first.
    pub async fn resolve(&self, name: RequestName, response: FetchResponse) {
        for _ in 0..100 {
            let sender = self
                .pending
                .lock()
                .expect("pending")
                .get_mut(&name)
                .and_then(VecDeque::pop_front);
            if let Some(sender) = sender {
                let _ = sender.send(response);
                settle().await;
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("no open fetch for {name}");
    }
}

#[async_trait]
impl RequestDispatcher for ManualDispatcher {
    async fn fetch(&self, spec: &RequestSpec, path_suffix: Option<&str>) -> FetchResponse {
        let (tx, rx) = oneshot::channel();
        self.sent
            .lock()
            .expect("sent")
            .push((spec.name, path_suffix.map(str::to_string)));
        self.pending
            .lock()
            .expect("pending")
            .entry(spec.name)
            .or_default()
            .push_back(tx);
        rx.await
            .unwrap_or_else(|_| FetchResponse::failure(crate::dispatcher::FetchStatus::Error, None))
    }
}

/// Lets spawned request and timer tasks run without moving the clock.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
