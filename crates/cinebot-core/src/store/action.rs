//! State transitions understood by [`reduce`](super::reduce).

use crate::types::{Category, MediaItem, PaginatedResult};

use super::state::{FilterUpdate, Route};

/// Everything that can change [`AppState`](super::AppState).
///
/// `*Started` actions are dispatched before a request is issued;
/// `*Succeeded` / `*Failed` carry the request's outcome. Paged listings tag
/// outcomes with the generation assigned at start so stale responses can be
/// recognized.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Navigate(Route),

    /// Raw search box text changed (not yet settled)
    SearchInputChanged(String),
    /// Blank query: drop results and invalidate in-flight requests
    SearchCleared,
    SearchStarted { query: String, page: u32 },
    SearchSucceeded {
        generation: u64,
        result: PaginatedResult<MediaItem>,
    },
    SearchFailed { generation: u64, error: String },

    CategoryStarted(Category),
    CategorySucceeded {
        category: Category,
        items: Vec<MediaItem>,
    },
    CategoryFailed { category: Category, error: String },

    CategoryPageStarted { category: Category, page: u32 },
    CategoryPageSucceeded {
        generation: u64,
        result: PaginatedResult<MediaItem>,
    },
    CategoryPageFailed { generation: u64, error: String },

    UpdateFilter(FilterUpdate),
    ResetFilters,

    DetailsStarted,
    DetailsFailed(String),
    SelectMedia(MediaItem),
    ClearSelection,
}
