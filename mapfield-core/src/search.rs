//! Search-as-you-type for places.
//!
//! [`SearchState`] is the plain state machine, [`SearchController`] drives it
//! with a debounced geocoding request per input change. Every request carries
//! a sequence number and only the most recent one is allowed to touch the
//! state.

use std::{
    cell::{Ref, RefCell},
    fmt,
    future::Future,
    rc::Rc,
    time::Duration,
};

use crate::{
    entities::search::SearchOption,
    gateways::{geocode::GeocodingGateway, timer::Timer},
};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(u64);

impl RequestSeq {
    #[must_use]
    const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: RequestSeq,
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Loading,
    HasResults,
    HasSelection,
}

/// Outcome of a finished request.
#[derive(Debug)]
pub enum Completion<E> {
    Applied { count: usize },
    Failed(E),
    /// A newer request has been issued in the meantime.
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    input_value: String,
    options: Vec<SearchOption>,
    selected: Option<SearchOption>,
    latest: RequestSeq,
    in_flight: Option<RequestSeq>,
}

impl SearchState {
    pub fn input_value(&self) -> &str {
        &self.input_value
    }

    pub fn options(&self) -> &[SearchOption] {
        &self.options
    }

    pub const fn selected(&self) -> Option<&SearchOption> {
        self.selected.as_ref()
    }

    pub const fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn phase(&self) -> SearchPhase {
        if self.is_loading() {
            SearchPhase::Loading
        } else if self.selected.is_some() {
            SearchPhase::HasSelection
        } else if !self.options.is_empty() {
            SearchPhase::HasResults
        } else {
            SearchPhase::Idle
        }
    }

    /// Records the new input and supersedes all previous requests.
    ///
    /// Returns the request to issue, or `None` for a blank input.
    pub fn input_changed(&mut self, text: String) -> Option<SearchRequest> {
        self.latest = self.latest.next();
        self.in_flight = None;
        let request = (!text.trim().is_empty()).then(|| SearchRequest {
            seq: self.latest,
            query: text.clone(),
        });
        self.input_value = text;
        request
    }

    /// Marks `request` as outstanding unless it has been superseded.
    pub fn begin_fetch(&mut self, request: &SearchRequest) -> bool {
        if request.seq != self.latest {
            return false;
        }
        self.in_flight = Some(request.seq);
        true
    }

    pub fn complete<E>(
        &mut self,
        seq: RequestSeq,
        result: Result<Vec<SearchOption>, E>,
    ) -> Completion<E> {
        if self.in_flight != Some(seq) {
            return Completion::Stale;
        }
        self.in_flight = None;
        match result {
            Ok(options) => {
                let count = options.len();
                self.options = options;
                Completion::Applied { count }
            }
            Err(err) => Completion::Failed(err),
        }
    }

    /// Selects an option and clears the input.
    ///
    /// Clearing the input supersedes all pending requests.
    pub fn select(&mut self, option: Option<SearchOption>) {
        self.latest = self.latest.next();
        self.in_flight = None;
        self.selected = option;
        self.input_value.clear();
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}

type Listener = Box<dyn Fn(&SearchState)>;

struct Inner<G, T> {
    gateway: G,
    timer: T,
    debounce: Duration,
    state: RefCell<SearchState>,
    listener: RefCell<Option<Listener>>,
}

impl<G, T> Inner<G, T> {
    fn notify(&self) {
        if let Some(listener) = &*self.listener.borrow() {
            listener(&self.state.borrow());
        }
    }
}

/// Debounced, race-free search of a single control.
pub struct SearchController<G, T> {
    inner: Rc<Inner<G, T>>,
}

impl<G, T> Clone for SearchController<G, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<G, T> fmt::Debug for SearchController<G, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchController")
            .field("debounce", &self.inner.debounce)
            .field("state", &self.inner.state)
            .finish_non_exhaustive()
    }
}

impl<G, T> SearchController<G, T>
where
    G: GeocodingGateway + 'static,
    T: Timer + 'static,
{
    pub fn new(gateway: G, timer: T) -> Self {
        Self::with_debounce(gateway, timer, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(gateway: G, timer: T, debounce: Duration) -> Self {
        Self {
            inner: Rc::new(Inner {
                gateway,
                timer,
                debounce,
                state: RefCell::new(SearchState::default()),
                listener: RefCell::new(None),
            }),
        }
    }

    /// Registers a callback that is invoked after every state change.
    pub fn on_update<F>(&self, listener: F)
    where
        F: Fn(&SearchState) + 'static,
    {
        *self.inner.listener.borrow_mut() = Some(Box::new(listener));
    }

    pub fn state(&self) -> Ref<'_, SearchState> {
        self.inner.state.borrow()
    }

    /// Updates the input immediately and returns the debounced search task.
    ///
    /// The task has to be spawned (or awaited) by the caller. It does nothing
    /// if another input arrives before the debounce delay has elapsed.
    pub fn input_changed(&self, text: &str) -> impl Future<Output = ()> + 'static {
        let request = self.inner.state.borrow_mut().input_changed(text.to_owned());
        self.inner.notify();
        let inner = Rc::clone(&self.inner);
        async move {
            let Some(request) = request else {
                return;
            };
            inner.timer.sleep(inner.debounce).await;
            if !inner.state.borrow_mut().begin_fetch(&request) {
                log::debug!("Search request {} has been superseded", request.seq);
                return;
            }
            inner.notify();
            log::debug!("Searching places for '{}' ({})", request.query, request.seq);
            let result = inner.gateway.search(&request.query).await;
            let completion = inner.state.borrow_mut().complete(request.seq, result);
            match completion {
                Completion::Applied { count } => {
                    log::debug!("Found {count} places for '{}'", request.query);
                }
                Completion::Failed(err) => {
                    log::error!("Unable to search places for '{}': {err}", request.query);
                }
                Completion::Stale => {
                    log::debug!("Discard stale search response {}", request.seq);
                    return;
                }
            }
            inner.notify();
        }
    }

    pub fn select(&self, option: Option<SearchOption>) {
        self.inner.state.borrow_mut().select(option);
        self.inner.notify();
    }

    pub fn clear_selection(&self) {
        self.inner.state.borrow_mut().clear_selection();
        self.inner.notify();
    }
}
