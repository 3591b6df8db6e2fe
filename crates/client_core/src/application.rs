//! Application controller: owns the process state, sequences tab
//! transitions and turns every failure into user-facing feedback.

use std::{ops::ControlFlow, str::FromStr};

use shared::{
    domain::{FormulaId, GameId, NotificationId, Region, Severity, Tab},
    error::ApiError,
    protocol::{GameResponse, RequestName},
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::{
    config::Settings,
    dispatcher::{Dispatcher, FetchResponse},
    error::ControllerError,
    notification::NotificationManager,
    surface::{RenderSurface, TabHooks},
    tabs::{LoadDisposition, LoadState, LoadTicket, TabController},
};

/// Everything the controller reacts to. UI commands and async completions
/// share one queue so all state changes happen on the controller loop.
#[derive(Debug)]
pub enum AppEvent {
    RequestTab(String),
    TabLoaded {
        ticket: LoadTicket,
        response: FetchResponse,
    },
    RequestGame {
        name: RequestName,
        path_suffix: Option<String>,
    },
    GameResponse {
        name: RequestName,
        response: FetchResponse,
    },
    Notify {
        region: Region,
        message: String,
        severity: Severity,
    },
    DismissNotification {
        region: Region,
        id: NotificationId,
    },
    NotificationExpired {
        region: Region,
        id: NotificationId,
    },
    ApplySettings(Settings),
    DisplayDoc,
    ToggleConsole,
    Shutdown,
}

impl AppEvent {
    fn name(&self) -> &'static str {
        match self {
            AppEvent::RequestTab(_) => "request_tab",
            AppEvent::TabLoaded { .. } => "tab_loaded",
            AppEvent::RequestGame { .. } => "request_game",
            AppEvent::GameResponse { .. } => "game_response",
            AppEvent::Notify { .. } => "notify",
            AppEvent::DismissNotification { .. } => "dismiss_notification",
            AppEvent::NotificationExpired { .. } => "notification_expired",
            AppEvent::ApplySettings(_) => "apply_settings",
            AppEvent::DisplayDoc => "display_doc",
            AppEvent::ToggleConsole => "toggle_console",
            AppEvent::Shutdown => "shutdown",
        }
    }
}

/// Identifiers tying this client to server-side game state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameSession {
    pub game_id: Option<GameId>,
    pub formula_id: Option<FormulaId>,
    pub last_response: Option<GameResponse>,
}

impl GameSession {
    pub fn is_active(&self) -> bool {
        self.game_id.is_some()
    }

    fn record(&mut self, response: GameResponse) {
        if let Some(game_id) = response.game_id {
            self.game_id = Some(game_id);
        }
        if let Some(formula_id) = response.formula_id {
            self.formula_id = Some(formula_id);
        }
        self.last_response = Some(response);
    }

    fn end(&mut self) {
        *self = Self::default();
    }
}

/// Cloneable entry point for the rest of the UI. Calls are queued for the
/// controller loop and never block.
#[derive(Clone, Debug)]
pub struct AppHandle {
    events: UnboundedSender<AppEvent>,
}

impl AppHandle {
    pub fn request_tab(&self, name: impl Into<String>) -> Result<(), ControllerError> {
        self.dispatch(AppEvent::RequestTab(name.into()))
    }

    pub fn request_game(
        &self,
        name: RequestName,
        path_suffix: Option<String>,
    ) -> Result<(), ControllerError> {
        self.dispatch(AppEvent::RequestGame { name, path_suffix })
    }

    pub fn notify(
        &self,
        region: impl Into<Region>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Result<(), ControllerError> {
        self.dispatch(AppEvent::Notify {
            region: region.into(),
            message: message.into(),
            severity,
        })
    }

    pub fn notify_error(
        &self,
        region: impl Into<Region>,
        message: impl Into<String>,
    ) -> Result<(), ControllerError> {
        self.notify(region, message, Severity::Error)
    }

    pub fn notify_success(
        &self,
        region: impl Into<Region>,
        message: impl Into<String>,
    ) -> Result<(), ControllerError> {
        self.notify(region, message, Severity::Success)
    }

    pub fn dismiss_notification(
        &self,
        region: impl Into<Region>,
        id: NotificationId,
    ) -> Result<(), ControllerError> {
        self.dispatch(AppEvent::DismissNotification {
            region: region.into(),
            id,
        })
    }

    pub fn apply_settings(&self, settings: Settings) -> Result<(), ControllerError> {
        self.dispatch(AppEvent::ApplySettings(settings))
    }

    pub fn display_doc(&self) -> Result<(), ControllerError> {
        self.dispatch(AppEvent::DisplayDoc)
    }

    pub fn toggle_console(&self) -> Result<(), ControllerError> {
        self.dispatch(AppEvent::ToggleConsole)
    }

    pub fn shutdown(&self) -> Result<(), ControllerError> {
        self.dispatch(AppEvent::Shutdown)
    }

    /// Resolves once the controller loop has stopped.
    pub async fn closed(&self) {
        self.events.closed().await
    }

    pub fn is_closed(&self) -> bool {
        self.events.is_closed()
    }

    pub fn same_instance(&self, other: &AppHandle) -> bool {
        self.events.same_channel(&other.events)
    }

    fn dispatch(&self, event: AppEvent) -> Result<(), ControllerError> {
        let name = event.name();
        match self.events.send(event) {
            Ok(()) => {
                debug!(event = name, "app: queued ui->controller event");
                Ok(())
            }
            Err(_) => {
                warn!(event = name, "app: controller stopped; event dropped");
                Err(ControllerError::ControllerClosed)
            }
        }
    }
}

pub struct Application {
    settings: Settings,
    session: GameSession,
    tabs: TabController,
    notifications: NotificationManager,
    dispatcher: Dispatcher,
    surface: Box<dyn RenderSurface>,
    hooks: Box<dyn TabHooks>,
    content_region: Region,
    last_good_markup: Option<String>,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
}

impl Application {
    pub fn new(
        settings: Settings,
        dispatcher: Dispatcher,
        surface: Box<dyn RenderSurface>,
        hooks: Box<dyn TabHooks>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            settings,
            session: GameSession::default(),
            tabs: TabController::new(Tab::Game),
            notifications: NotificationManager::new(events_tx.clone()),
            dispatcher,
            surface,
            hooks,
            content_region: Region::content(),
            last_good_markup: None,
            events_tx,
            events_rx,
        }
    }

    pub fn handle(&self) -> AppHandle {
        AppHandle {
            events: self.events_tx.clone(),
        }
    }

    /// Latest requested tab, possibly still loading or failed.
    pub fn current_tab(&self) -> Tab {
        self.tabs.intended_tab()
    }

    pub fn rendered_tab(&self) -> Option<Tab> {
        self.tabs.rendered_tab()
    }

    pub fn load_state(&self) -> LoadState {
        self.tabs.state()
    }

    pub fn pending_transition(&self) -> Option<LoadTicket> {
        self.tabs.pending()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    /// Drive the controller until [`AppEvent::Shutdown`] arrives.
    pub async fn run(mut self) {
        info!(tab = %self.current_tab(), "app: controller loop started");
        while let Some(event) = self.events_rx.recv().await {
            if self.handle_event(event).is_break() {
                break;
            }
        }
        self.notifications.clear(self.surface.as_mut());
        info!("app: controller loop stopped");
    }

    /// Handle every event already queued without waiting for more.
    pub fn drain_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            handled += 1;
            if self.handle_event(event).is_break() {
                break;
            }
        }
        handled
    }

    pub fn handle_event(&mut self, event: AppEvent) -> ControlFlow<()> {
        match event {
            AppEvent::RequestTab(name) => {
                self.request_tab(&name);
            }
            AppEvent::TabLoaded { ticket, response } => self.on_tab_loaded(ticket, response),
            AppEvent::RequestGame { name, path_suffix } => self.request_game(name, path_suffix),
            AppEvent::GameResponse { name, response } => self.on_game_response(name, response),
            AppEvent::Notify {
                region,
                message,
                severity,
            } => {
                self.notify(&region, message, severity);
            }
            AppEvent::DismissNotification { region, id } => {
                self.notifications.dismiss(self.surface.as_mut(), &region, id);
            }
            AppEvent::NotificationExpired { region, id } => {
                self.notifications.expire(self.surface.as_mut(), &region, id);
            }
            AppEvent::ApplySettings(settings) => self.apply_settings(settings),
            AppEvent::DisplayDoc => self.display_doc(),
            AppEvent::ToggleConsole => self.surface.toggle_console(),
            AppEvent::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Start a transition to the tab called `name`. Unknown names are
    /// rejected before anything is dispatched.
    pub fn request_tab(&mut self, name: &str) -> Option<LoadTicket> {
        match self.try_request_tab(name) {
            Ok(ticket) => ticket,
            Err(err) => {
                warn!(tab = name, "app: tab request rejected: {err}");
                let region = self.content_region.clone();
                self.notify(&region, err.to_string(), Severity::Error);
                None
            }
        }
    }

    fn try_request_tab(&mut self, name: &str) -> Result<Option<LoadTicket>, ControllerError> {
        let tab = Tab::from_str(name).map_err(|_| ControllerError::InvalidTabName(name.into()))?;
        if tab == Tab::Doc {
            self.display_doc();
            return Ok(None);
        }

        self.surface.show_loader(&self.content_region);
        let events = self.events_tx.clone();
        Ok(self
            .tabs
            .transition(tab, &self.dispatcher, move |ticket, response| {
                if events.send(AppEvent::TabLoaded { ticket, response }).is_err() {
                    debug!(tab = %ticket.tab, "tabs: controller stopped; load result dropped");
                }
            }))
    }

    /// Completion of a tab fetch. Results for superseded transitions are
    /// dropped without touching the screen.
    pub fn on_tab_loaded(&mut self, ticket: LoadTicket, response: FetchResponse) {
        match self.tabs.complete(ticket, response.is_success()) {
            LoadDisposition::Stale { ticket, latest } => {
                debug!(
                    tab = %ticket.tab,
                    generation = ticket.generation,
                    latest,
                    "tabs: stale load dropped"
                );
            }
            LoadDisposition::Failed(tab) => {
                let err = ControllerError::FetchFailure {
                    request: tab.request_name().unwrap_or(RequestName::Game),
                    status: response.status,
                    http_status: response.http_status,
                };
                warn!(tab = %tab, "tabs: load failed: {err}");
                self.restore_last_good_content();
                let region = self.content_region.clone();
                self.notify(&region, err.to_string(), Severity::Error);
            }
            LoadDisposition::Render(tab) => {
                self.surface.replace_content(&self.content_region, &response.body);
                self.last_good_markup = Some(response.body);
                self.surface.set_nav_active(tab.nav_id());
                info!(tab = %tab, "tabs: tab loaded");
                self.run_post_load_hook(tab);
            }
        }
    }

    /// Put the last rendered tab back on screen. Restored markup is fresh
    /// content, so its post-load initialization runs again.
    fn restore_last_good_content(&mut self) {
        let rendered = self.tabs.rendered_tab();
        match (&self.last_good_markup, rendered) {
            (Some(markup), Some(tab)) => {
                self.surface.replace_content(&self.content_region, markup);
                self.surface.set_nav_active(tab.nav_id());
                debug!(tab = %tab, "tabs: last good content restored");
                self.run_post_load_hook(tab);
            }
            _ => self.surface.clear_content(&self.content_region),
        }
    }

    fn run_post_load_hook(&mut self, tab: Tab) {
        match tab {
            Tab::Game => self.hooks.on_game_loaded(&self.settings),
            Tab::Settings => self.hooks.on_settings_loaded(&self.settings),
            Tab::Help | Tab::Doc => {}
        }
        self.surface.apply_settings(&self.settings);
    }

    pub fn request_game(&mut self, name: RequestName, path_suffix: Option<String>) {
        if !name.is_game_request() {
            let err = ControllerError::InvalidGameRequest(name);
            warn!(request = %name, "app: game request rejected: {err}");
            let region = self.content_region.clone();
            self.notify(&region, err.to_string(), Severity::Error);
            return;
        }

        let events = self.events_tx.clone();
        self.dispatcher
            .build_request(name, move |response| {
                if events.send(AppEvent::GameResponse { name, response }).is_err() {
                    debug!(request = %name, "app: controller stopped; game response dropped");
                }
            })
            .send(path_suffix);
    }

    pub fn on_game_response(&mut self, name: RequestName, response: FetchResponse) {
        if let Err(err) = self.try_record_game_response(name, response) {
            warn!(request = %name, "app: game request failed: {err}");
            let region = self.content_region.clone();
            self.notify(&region, err.to_string(), Severity::Error);
        }
    }

    fn try_record_game_response(
        &mut self,
        name: RequestName,
        response: FetchResponse,
    ) -> Result<(), ControllerError> {
        if !response.is_success() {
            if let Ok(api_error) = serde_json::from_str::<ApiError>(&response.body) {
                debug!(
                    request = %name,
                    code = ?api_error.code,
                    "app: api error {}",
                    api_error.message
                );
            }
            return Err(ControllerError::FetchFailure {
                request: name,
                status: response.status,
                http_status: response.http_status,
            });
        }

        if name == RequestName::Over {
            info!(game_id = ?self.session.game_id, "app: game session ended");
            self.session.end();
            return Ok(());
        }

        let parsed = if response.body.trim().is_empty() {
            GameResponse::default()
        } else {
            serde_json::from_str::<GameResponse>(&response.body).map_err(|source| {
                ControllerError::InvalidGameResponse {
                    request: name,
                    source,
                }
            })?
        };
        self.session.record(parsed);
        info!(
            request = %name,
            game_id = ?self.session.game_id,
            formula_id = ?self.session.formula_id,
            "app: game state updated"
        );
        Ok(())
    }

    pub fn notify(
        &mut self,
        region: &Region,
        message: impl Into<String>,
        severity: Severity,
    ) -> Option<NotificationId> {
        match self.notifications.show(
            self.surface.as_mut(),
            region,
            message,
            severity,
            &self.settings,
        ) {
            Ok(id) => Some(id),
            Err(err) => {
                debug!("notif: dropped: {err}");
                None
            }
        }
    }

    pub fn notify_error(
        &mut self,
        region: &Region,
        message: impl Into<String>,
    ) -> Option<NotificationId> {
        self.notify(region, message, Severity::Error)
    }

    pub fn notify_success(
        &mut self,
        region: &Region,
        message: impl Into<String>,
    ) -> Option<NotificationId> {
        self.notify(region, message, Severity::Success)
    }

    pub fn dismiss_notification(&mut self, region: &Region, id: NotificationId) -> bool {
        self.notifications.dismiss(self.surface.as_mut(), region, id)
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        info!(
            auto_close_notif = settings.auto_close_notif,
            notif_timer_ms = settings.notif_timer_ms,
            "app: settings applied"
        );
        self.settings = settings;
        self.surface.apply_settings(&self.settings);
    }

    pub fn display_doc(&mut self) {
        info!("app: documentation window requested");
        self.surface.open_doc_window();
    }
}

#[cfg(test)]
#[path = "tests/application_tests.rs"]
mod tests;
