//! Read-only views over [`AppState`].
//!
//! Filter criteria are applied here, on already-fetched items. Changing a
//! filter never triggers a request.

use crate::pagination::page_window;
use crate::types::{Category, MediaItem};

use super::state::{AppState, CategoryState, FilterCriteria, PagedListing};

pub fn category(state: &AppState, category: Category) -> &CategoryState {
    state.category(category)
}

/// Whether the fetch-once policy allows a request for `category`
pub fn category_needs_fetch(state: &AppState, category: Category) -> bool {
    state.category(category).needs_fetch()
}

/// Items passing `filters`, in original order
pub fn apply_filters<'a>(items: &'a [MediaItem], filters: &FilterCriteria) -> Vec<&'a MediaItem> {
    items.iter().filter(|item| filters.matches(item)).collect()
}

/// Filtered items of a home-screen row
pub fn visible_category_items(state: &AppState, category: Category) -> Vec<&MediaItem> {
    apply_filters(&state.category(category).items, &state.filters)
}

/// Filtered search results
pub fn visible_search_results(state: &AppState) -> Vec<&MediaItem> {
    apply_filters(&state.search.listing.items, &state.filters)
}

/// Filtered items of the category page
pub fn visible_category_page_items(state: &AppState) -> Vec<&MediaItem> {
    apply_filters(&state.category_page.listing.items, &state.filters)
}

/// Page buttons for a listing
pub fn listing_page_window(listing: &PagedListing, window: usize) -> Vec<u32> {
    page_window(listing.current_page, listing.total_pages, window)
}

/// Whether any request is outstanding
pub fn is_loading(state: &AppState) -> bool {
    state.categories.iter().any(|row| row.loading)
        || state.search.listing.loading
        || state.category_page.listing.loading
}

/// Look up an item by id across everything fetched so far
pub fn find_item(state: &AppState, id: u64) -> Option<&MediaItem> {
    state
        .categories
        .iter()
        .flat_map(|row| row.items.iter())
        .chain(state.search.listing.items.iter())
        .chain(state.category_page.listing.items.iter())
        .find(|item| item.id == id)
}
