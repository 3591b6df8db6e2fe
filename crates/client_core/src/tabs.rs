//! Tab transition state machine. Every transition gets a generation number;
//! only the latest generation may render.

use shared::domain::Tab;
use tracing::{debug, info};

use crate::dispatcher::{Dispatcher, FetchResponse};

/// Identifies one transition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub tab: Tab,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading(LoadTicket),
    Loaded(LoadTicket),
    Failed(LoadTicket),
}

/// What the controller should do with a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadDisposition {
    Render(Tab),
    Failed(Tab),
    Stale { ticket: LoadTicket, latest: u64 },
}

#[derive(Debug)]
pub struct TabController {
    generation: u64,
    intended: Tab,
    rendered: Option<Tab>,
    state: LoadState,
}

impl Default for TabController {
    fn default() -> Self {
        Self::new(Tab::Game)
    }
}

impl TabController {
    pub fn new(initial: Tab) -> Self {
        Self {
            generation: 0,
            intended: initial,
            rendered: None,
            state: LoadState::Idle,
        }
    }

    /// Target of the most recent transition, written before content arrives.
    pub fn intended_tab(&self) -> Tab {
        self.intended
    }

    /// Tab whose content was last swapped in successfully.
    pub fn rendered_tab(&self) -> Option<Tab> {
        self.rendered
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn pending(&self) -> Option<LoadTicket> {
        match self.state {
            LoadState::Loading(ticket) => Some(ticket),
            _ => None,
        }
    }

    /// Start loading `tab`. Any attempt still in flight is superseded; its
    /// completion will still arrive but will be classified as stale.
    pub fn transition(
        &mut self,
        tab: Tab,
        dispatcher: &Dispatcher,
        on_complete: impl FnOnce(LoadTicket, FetchResponse) + Send + 'static,
    ) -> Option<LoadTicket> {
        let request_name = tab.request_name()?;

        if let Some(previous) = self.pending() {
            debug!(
                superseded = %previous.tab,
                generation = previous.generation,
                "tabs: in-flight load superseded"
            );
        }

        self.generation += 1;
        let ticket = LoadTicket {
            generation: self.generation,
            tab,
        };
        self.intended = tab;
        self.state = LoadState::Loading(ticket);

        info!(tab = %tab, generation = ticket.generation, "tabs: load started");
        dispatcher
            .build_request(request_name, move |response| on_complete(ticket, response))
            .send(None);
        Some(ticket)
    }

    pub fn complete(&mut self, ticket: LoadTicket, succeeded: bool) -> LoadDisposition {
        if self.pending() != Some(ticket) {
            return LoadDisposition::Stale {
                ticket,
                latest: self.generation,
            };
        }

        if succeeded {
            self.rendered = Some(ticket.tab);
            self.state = LoadState::Loaded(ticket);
            LoadDisposition::Render(ticket.tab)
        } else {
            self.state = LoadState::Failed(ticket);
            LoadDisposition::Failed(ticket.tab)
        }
    }
}

#[cfg(test)]
#[path = "tests/tabs_tests.rs"]
mod tests;
