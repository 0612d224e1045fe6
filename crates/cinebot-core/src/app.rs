//! Mini-app controller
//!
//! [`MiniApp`] owns the [`AppState`] and is the only place that mutates it.
//! User intents (typing, paging, opening a category) dispatch actions and
//! spawn fetch tasks; [`MiniApp::step`] waits for the next settled query,
//! finished fetch or host event and folds it back into the state. All
//! mutation therefore happens on the caller's control flow.
//!
//! # Example
//! ```no_run
//! use cinebot_core::{AppConfig, MiniApp};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cinebot_core::CinebotError> {
//!     let config = AppConfig::from_env()?;
//!     let (commands, _host) = mpsc::unbounded_channel();
//!     let mut app = MiniApp::from_config(config, None, commands)?;
//!
//!     app.set_query("batman");
//!     while app.step().await.is_some() {
//!         if !app.is_loading() && !app.state().search.listing.items.is_empty() {
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::api::{MediaSource, TmdbApi};
use crate::bridge::{self, BotMessage, HostBridge, HostCommand, HostEvent};
use crate::config::AppConfig;
use crate::debounce::Debouncer;
use crate::error::Result;
use crate::store::{reduce, selectors, Action, AppState, FilterUpdate, Route};
use crate::types::{Category, MediaItem, MediaKind, PaginatedResult};

/// Main button label on the details screen
pub const SELECT_BUTTON_LABEL: &str = "Select movie";

/// Something [`MiniApp::step`] processed
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The search box has been stable for the debounce window
    QuerySettled(String),
    /// A fetch finished; the action has been reduced into the state
    Fetched(Action),
    /// A details fetch finished with this item
    DetailsLoaded(MediaItem),
    /// A details fetch for `id` failed
    DetailsFailed { id: u64, error: String },
    /// Telegram's main button was pressed
    MainButtonPressed,
}

/// Controller tying the store, the data source and the host bridge together
pub struct MiniApp {
    state: AppState,
    config: AppConfig,
    source: Arc<dyn MediaSource>,
    bridge: Box<dyn HostBridge>,
    debouncer: Debouncer<String>,
    /// In-flight fetches; dropping the app aborts them
    tasks: JoinSet<Event>,
    host_tx: mpsc::UnboundedSender<Event>,
    host_rx: mpsc::UnboundedReceiver<Event>,
    /// Last value pushed to the debouncer that has not settled yet
    unsettled: Option<String>,
    pending_details: Option<u64>,
}

impl MiniApp {
    /// Create a controller. Must be called inside a tokio runtime.
    pub fn new(source: Arc<dyn MediaSource>, bridge: Box<dyn HostBridge>, config: AppConfig) -> Self {
        let (host_tx, host_rx) = mpsc::unbounded_channel();

        Self {
            state: AppState::new(config.max_total_pages),
            debouncer: Debouncer::new(config.debounce),
            config,
            source,
            bridge,
            tasks: JoinSet::new(),
            host_tx,
            host_rx,
            unsettled: None,
            pending_details: None,
        }
    }

    /// Create a TMDB-backed controller, picking the bridge from the launch
    /// URL fragment.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(
        config: AppConfig,
        launch_fragment: Option<&str>,
        commands: mpsc::UnboundedSender<HostCommand>,
    ) -> Result<Self> {
        let api = TmdbApi::with_config(config.client.clone())?;
        let bridge = bridge::connect(launch_fragment, commands);
        Ok(Self::new(Arc::new(api), bridge, config))
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn bridge(&self) -> &dyn HostBridge {
        self.bridge.as_ref()
    }

    /// Whether any fetch is outstanding
    pub fn is_loading(&self) -> bool {
        selectors::is_loading(&self.state)
    }

    fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    pub fn navigate(&mut self, route: Route) {
        self.dispatch(Action::Navigate(route));
    }

    // ---------------------------------------------------------------------
    // Search
    // ---------------------------------------------------------------------

    /// Feed raw search box text.
    ///
    /// A blank query clears results at once and issues nothing. Anything
    /// else is fetched after it settles.
    pub fn set_query(&mut self, raw: &str) {
        self.dispatch(Action::SearchInputChanged(raw.to_string()));

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.dispatch(Action::SearchCleared);
        }
        // Blank input is pushed too, superseding any pending non-blank value.
        self.unsettled = Some(trimmed.to_string());
        self.debouncer.push(trimmed.to_string());
    }

    fn on_query_settled(&mut self, query: String) {
        if self.unsettled.as_deref() == Some(query.as_str()) {
            self.unsettled = None;
        }
        if query.is_empty() || query == self.state.search.query {
            return;
        }
        self.start_search(query, 1);
    }

    /// Jump to `page` of the current settled query, clamped to the known
    /// page range. No-op without a settled query or results.
    pub fn set_page(&mut self, page: u32) {
        let listing = &self.state.search.listing;
        if self.state.search.query.is_empty() || listing.total_pages == 0 {
            return;
        }

        let page = page.clamp(1, listing.total_pages);
        self.start_search(self.state.search.query.clone(), page);
    }

    pub fn next_page(&mut self) {
        self.set_page(self.state.search.listing.current_page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.state.search.listing.current_page.saturating_sub(1));
    }

    /// Re-issue the newest search request
    pub fn retry_search(&mut self) {
        if self.state.search.query.is_empty() {
            return;
        }
        let page = self.state.search.listing.requested_page;
        self.start_search(self.state.search.query.clone(), page);
    }

    fn start_search(&mut self, query: String, page: u32) {
        self.dispatch(Action::SearchStarted {
            query: query.clone(),
            page,
        });
        let generation = self.state.search.listing.generation;
        tracing::debug!(%query, page, generation, "search issued");

        let max_pages = self.state.max_total_pages;
        let source = Arc::clone(&self.source);
        self.tasks.spawn(async move {
            let mut outcome = source.search(&query, page).await;
            if let Some(last) = past_last_page(&outcome, page, max_pages) {
                tracing::debug!(%query, page, last, "page beyond results, fetching last page");
                outcome = source.search(&query, last).await;
            }

            let action = match outcome {
                Ok(result) => Action::SearchSucceeded { generation, result },
                Err(e) => {
                    tracing::warn!(%query, page, error = %e, "search failed");
                    Action::SearchFailed {
                        generation,
                        error: e.user_message(),
                    }
                }
            };
            Event::Fetched(action)
        });
    }

    // ---------------------------------------------------------------------
    // Categories
    // ---------------------------------------------------------------------

    /// Fetch a home-screen row unless it already has items or is loading.
    ///
    /// Returns whether a request was issued.
    pub fn load_category(&mut self, category: Category) -> bool {
        if !selectors::category_needs_fetch(&self.state, category) {
            return false;
        }
        self.fetch_category(category);
        true
    }

    /// [`MiniApp::load_category`] by host key (`popular`, `nowPlaying`, ...).
    ///
    /// # Errors
    /// `CinebotError::UnknownCategory` for keys outside the fixed table; no
    /// request is made.
    pub fn load_category_key(&mut self, key: &str) -> Result<bool> {
        let category: Category = key.parse()?;
        Ok(self.load_category(category))
    }

    /// Load every home-screen row that is still empty
    pub fn load_home(&mut self) -> usize {
        Category::ALL
            .into_iter()
            .filter(|category| self.load_category(*category))
            .count()
    }

    /// Re-issue a row's request even if it has items. No-op while loading.
    pub fn retry_category(&mut self, category: Category) -> bool {
        if self.state.category(category).loading {
            return false;
        }
        self.fetch_category(category);
        true
    }

    fn fetch_category(&mut self, category: Category) {
        self.dispatch(Action::CategoryStarted(category));
        tracing::debug!(%category, "category fetch issued");

        let source = Arc::clone(&self.source);
        self.tasks.spawn(async move {
            let action = match source.category(category, 1).await {
                Ok(result) => Action::CategorySucceeded {
                    category,
                    items: result.items,
                },
                Err(e) => {
                    tracing::warn!(%category, error = %e, "category fetch failed");
                    Action::CategoryFailed {
                        category,
                        error: e.user_message(),
                    }
                }
            };
            Event::Fetched(action)
        });
    }

    // ---------------------------------------------------------------------
    // Category page
    // ---------------------------------------------------------------------

    /// Show `page` of a category's full listing
    pub fn open_category_page(&mut self, category: Category, page: u32) {
        self.navigate(Route::Category(category));
        self.fetch_category_page(category, page.max(1));
    }

    /// Change page within the open category, clamped to the known range
    pub fn set_category_page(&mut self, page: u32) {
        let Some(category) = self.state.category_page.category else {
            return;
        };
        let total = self.state.category_page.listing.total_pages;
        if total == 0 {
            return;
        }
        self.fetch_category_page(category, page.clamp(1, total));
    }

    pub fn retry_category_page(&mut self) {
        if let Some(category) = self.state.category_page.category {
            let page = self.state.category_page.listing.requested_page;
            self.fetch_category_page(category, page);
        }
    }

    fn fetch_category_page(&mut self, category: Category, page: u32) {
        self.dispatch(Action::CategoryPageStarted { category, page });
        let generation = self.state.category_page.listing.generation;

        let max_pages = self.state.max_total_pages;
        let source = Arc::clone(&self.source);
        self.tasks.spawn(async move {
            let mut outcome = source.category(category, page).await;
            if let Some(last) = past_last_page(&outcome, page, max_pages) {
                tracing::debug!(%category, page, last, "page beyond listing, fetching last page");
                outcome = source.category(category, last).await;
            }

            let action = match outcome {
                Ok(result) => Action::CategoryPageSucceeded { generation, result },
                Err(e) => {
                    tracing::warn!(%category, page, error = %e, "category page fetch failed");
                    Action::CategoryPageFailed {
                        generation,
                        error: e.user_message(),
                    }
                }
            };
            Event::Fetched(action)
        });
    }

    // ---------------------------------------------------------------------
    // Filters
    // ---------------------------------------------------------------------

    /// Narrow displayed lists. Never triggers a request.
    pub fn update_filter(&mut self, update: FilterUpdate) {
        self.dispatch(Action::UpdateFilter(update));
    }

    pub fn reset_filters(&mut self) {
        self.dispatch(Action::ResetFilters);
    }

    // ---------------------------------------------------------------------
    // Selection and bot messaging
    // ---------------------------------------------------------------------

    /// Open the details screen for an item and offer the main button.
    pub fn select_media(&mut self, item: MediaItem) {
        self.pending_details = None;
        self.navigate(Route::Details {
            id: item.id,
            kind: item.kind,
        });
        self.dispatch(Action::SelectMedia(item));

        let tx = self.host_tx.clone();
        self.bridge.show_main_button(
            SELECT_BUTTON_LABEL,
            Box::new(move || {
                let _ = tx.send(Event::MainButtonPressed);
            }),
        );
    }

    /// Open details by id, using an already-fetched item when possible.
    pub fn open_details(&mut self, id: u64, kind: MediaKind) {
        if let Some(item) = selectors::find_item(&self.state, id).cloned() {
            self.select_media(item);
            return;
        }

        self.navigate(Route::Details { id, kind });
        self.dispatch(Action::DetailsStarted);
        self.pending_details = Some(id);

        let source = Arc::clone(&self.source);
        self.tasks.spawn(async move {
            match source.details(id, kind).await {
                Ok(item) => Event::DetailsLoaded(item),
                Err(e) => {
                    tracing::warn!(id, error = %e, "details fetch failed");
                    Event::DetailsFailed {
                        id,
                        error: e.user_message(),
                    }
                }
            }
        });
    }

    /// Leave the details screen
    pub fn close_details(&mut self) {
        self.pending_details = None;
        self.dispatch(Action::ClearSelection);
        self.bridge.hide_main_button();
    }

    /// Send `MOVIE_SELECTED` for `item` right away
    pub fn send_selection(&self, item: &MediaItem) {
        self.bridge.send_to_bot(&BotMessage::movie_selected(item));
    }

    /// Send `MOVIE_SELECTED` for the item on the details screen
    pub fn confirm_selection(&self) -> bool {
        match &self.state.selected {
            Some(item) => {
                self.send_selection(item);
                true
            }
            None => false,
        }
    }

    /// Forward an event from the Telegram host
    pub fn on_host_event(&mut self, event: HostEvent) {
        self.bridge.handle_event(event);
    }

    // ---------------------------------------------------------------------
    // Event loop
    // ---------------------------------------------------------------------

    /// Whether no query is waiting to settle and no fetch is in flight
    pub fn is_idle(&self) -> bool {
        self.unsettled.is_none() && self.tasks.is_empty()
    }

    /// Wait for and apply the next event.
    ///
    /// Pends until something happens; check [`MiniApp::is_idle`] first when
    /// nothing is expected. Returns `None` once no source of events is left.
    pub async fn step(&mut self) -> Option<Event> {
        loop {
            let event = tokio::select! {
                Some(query) = self.debouncer.settled() => Event::QuerySettled(query),
                Some(joined) = self.tasks.join_next() => match joined {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!(error = %e, "fetch task did not complete");
                        continue;
                    }
                },
                Some(event) = self.host_rx.recv() => event,
                else => return None,
            };

            self.handle(event.clone());
            return Some(event);
        }
    }

    /// Process events until [`MiniApp::is_idle`], then apply queued host
    /// events.
    pub async fn run_until_idle(&mut self) {
        while !self.is_idle() {
            if self.step().await.is_none() {
                break;
            }
        }
        while let Ok(event) = self.host_rx.try_recv() {
            self.handle(event);
        }
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::QuerySettled(query) => self.on_query_settled(query),
            Event::Fetched(action) => self.dispatch(action),
            Event::DetailsLoaded(item) => {
                if self.pending_details == Some(item.id) {
                    self.select_media(item);
                } else {
                    tracing::debug!(id = item.id, "dropping details for closed screen");
                }
            }
            Event::DetailsFailed { id, error } => {
                if self.pending_details == Some(id) {
                    self.pending_details = None;
                    self.dispatch(Action::DetailsFailed(error));
                } else {
                    tracing::debug!(id, "dropping details failure for closed screen");
                }
            }
            Event::MainButtonPressed => {
                self.confirm_selection();
            }
        }
    }
}

/// Last available page when `page` lies past it, so the request can be
/// repeated for a page that exists.
fn past_last_page(
    outcome: &Result<PaginatedResult<MediaItem>>,
    page: u32,
    max_pages: u32,
) -> Option<u32> {
    let last = outcome.as_ref().ok()?.total_pages.min(max_pages);
    (last > 0 && page > last).then_some(last)
}
