//! The logbook page controller: turns navigation, filter changes, reload
//! notifications and "load more" clicks into fetches, and fetch outcomes into
//! view state. Everything here runs on the UI thread; only the HTTP call
//! itself happens on the fetch runner.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use crate::api::EntriesSource;
use crate::error::PageError;
use crate::events::{Event, EventBus, Subscription, Topic};
use crate::jobs::{FetchRunner, WakeFn};
use crate::query::Location;
use crate::request::EntriesRequest;
use crate::state::ViewState;
use crate::view::PageView;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Navigation {
    pub location: Location,
    /// Forces a refetch even when the location did not change.
    pub reload_logbook: bool,
}

impl Navigation {
    pub fn new(location: Location) -> Self {
        Self { location, reload_logbook: false }
    }

    pub fn reloading(location: Location) -> Self {
        Self { location, reload_logbook: true }
    }

    pub fn logbook_id(&self) -> Option<u64> {
        self.location.route.logbook_id
    }
}

/// What `poll` applied, in order. Handy for an activity log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Loaded { logbook_id: u64, entries: usize, count: u64 },
    Appended { logbook_id: u64, added: usize, entries: usize, count: u64 },
    Failed { logbook_id: u64, message: String },
    ReloadRequested { logbook_id: u64 },
}

pub struct LogbookPage {
    source: Arc<dyn EntriesSource>,
    bus: EventBus,
    runner: FetchRunner,
    page_size: Option<u32>,
    nav: Navigation,
    state: ViewState,
    last_request: Option<EntriesRequest>,
    subscription: Option<Subscription>,
    reload_tx: Sender<u64>,
    reload_rx: Receiver<u64>,
}

impl LogbookPage {
    pub fn new(source: Arc<dyn EntriesSource>, bus: EventBus, page_size: Option<u32>) -> anyhow::Result<Self> {
        let (reload_tx, reload_rx) = mpsc::channel();
        Ok(Self {
            source,
            bus,
            runner: FetchRunner::new()?,
            page_size,
            nav: Navigation::default(),
            state: ViewState::default(),
            last_request: None,
            subscription: None,
            reload_tx,
            reload_rx,
        })
    }

    pub fn set_waker(&mut self, waker: Option<WakeFn>) {
        self.runner.set_waker(waker);
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn navigation(&self) -> &Navigation {
        &self.nav
    }

    pub fn view(&self) -> PageView<'_> {
        PageView::build(&self.state, &self.nav)
    }

    pub fn mount(&mut self, nav: Navigation) {
        let tx = Mutex::new(self.reload_tx.clone());
        self.subscription = Some(self.bus.subscribe(Topic::LogbookReloaded, move |event| {
            let Event::LogbookReloaded { logbook_id } = event;
            if let Ok(tx) = tx.lock() {
                let _ = tx.send(*logbook_id);
            }
        }));
        self.nav = Navigation { reload_logbook: false, ..nav };
        self.fetch(None);
    }

    pub fn unmount(&mut self) {
        self.subscription = None;
        self.runner.cancel();
        self.state.loading = false;
    }

    pub fn navigate(&mut self, nav: Navigation) {
        let logbook_changed = nav.logbook_id() != self.nav.logbook_id();
        let search_changed = nav.location.search != self.nav.location.search;
        if logbook_changed {
            self.state.clear_filters();
        }
        let refetch = logbook_changed || search_changed || nav.reload_logbook;
        self.nav = Navigation { reload_logbook: false, ..nav };
        if refetch {
            self.fetch(None);
        }
    }

    pub fn select_attribute(&mut self, name: &str, index: usize) -> Result<(), PageError> {
        if self.state.select_attribute(name, index)? {
            self.fetch(None);
        }
        Ok(())
    }

    pub fn set_attribute_filter(&mut self, name: &str, value: Option<String>) -> Result<(), PageError> {
        if self.state.set_attribute_filter(name, value)? {
            self.fetch(None);
        }
        Ok(())
    }

    pub fn load_more(&mut self) {
        if self.state.loading {
            return;
        }
        self.fetch(Some(self.state.entries.len() as u64));
    }

    /// Only refetches when `logbook_id` is the logbook currently on display.
    pub fn reload(&mut self, logbook_id: u64) -> bool {
        if !self.state.loaded || self.state.logbook.id != logbook_id {
            debug!(logbook_id, showing = self.state.logbook.id, "ignoring reload for another logbook");
            return false;
        }
        self.fetch(None);
        true
    }

    pub fn retry(&mut self) {
        if let Some(req) = self.last_request.clone() {
            self.issue(req);
        }
    }

    pub fn poll(&mut self) -> Vec<PageEvent> {
        let mut events = Vec::new();
        while let Ok(logbook_id) = self.reload_rx.try_recv() {
            if self.reload(logbook_id) {
                events.push(PageEvent::ReloadRequested { logbook_id });
            }
        }
        while let Some(outcome) = self.runner.try_next() {
            let logbook_id = outcome.request.logbook_id;
            match outcome.result {
                Ok(page) => {
                    let added = page.entries.len();
                    let fresh = outcome.request.is_fresh();
                    let pruned = self.state.apply_page(&outcome.request, page);
                    let (entries, count) = (self.state.entries.len(), self.state.count);
                    info!(logbook_id, entries, count, fresh, "entries applied");
                    events.push(if fresh {
                        PageEvent::Loaded { logbook_id, entries, count }
                    } else {
                        PageEvent::Appended { logbook_id, added, entries, count }
                    });
                    // the list was filtered by attributes that are gone now
                    if pruned {
                        info!(logbook_id, filters = ?self.state.attribute_filters, "stale filters dropped, loading again");
                        self.fetch(None);
                    }
                }
                Err(err) => {
                    self.state.apply_failure(&outcome.request, &err);
                    events.push(PageEvent::Failed { logbook_id, message: err.to_string() });
                }
            }
        }
        events
    }

    fn fetch(&mut self, offset: Option<u64>) {
        let req = EntriesRequest::new(
            self.nav.logbook_id(),
            &self.nav.location.search,
            &self.state.attribute_filters,
            offset,
            self.page_size,
        );
        self.issue(req);
    }

    fn issue(&mut self, req: EntriesRequest) {
        self.state.begin_fetch();
        self.last_request = Some(req.clone());
        let generation = self.runner.spawn(self.source.clone(), req.clone());
        debug!(generation, path = %req.path(), "fetch issued");
    }
}
