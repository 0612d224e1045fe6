//! Pure state transitions.

use crate::types::{MediaItem, PaginatedResult};

use super::action::Action;
use super::state::{AppState, FilterCriteria, FilterUpdate, PagedListing};

/// Apply `action` to `state` and return the new state.
///
/// Never performs I/O. Outcomes whose generation does not match the
/// listing's newest request are dropped unchanged.
pub fn reduce(mut state: AppState, action: Action) -> AppState {
    let max_pages = state.max_total_pages;

    match action {
        Action::Navigate(route) => state.route = route,

        Action::SearchInputChanged(input) => state.search.input = input,
        Action::SearchCleared => {
            let generation = state.search.listing.generation + 1;
            state.search.query.clear();
            state.search.listing = PagedListing {
                generation,
                ..PagedListing::default()
            };
        }
        Action::SearchStarted { query, page } => {
            state.search.query = query;
            start(&mut state.search.listing, page);
        }
        Action::SearchSucceeded { generation, result } => {
            succeed(&mut state.search.listing, generation, result, max_pages, "search");
        }
        Action::SearchFailed { generation, error } => {
            fail(&mut state.search.listing, generation, error, "search");
        }

        Action::CategoryStarted(category) => {
            let row = state.category_mut(category);
            if !row.loading {
                row.loading = true;
                row.error = None;
            }
        }
        Action::CategorySucceeded { category, items } => {
            let row = state.category_mut(category);
            row.items = items;
            row.loading = false;
            row.error = None;
        }
        Action::CategoryFailed { category, error } => {
            let row = state.category_mut(category);
            row.loading = false;
            row.error = Some(error);
        }

        Action::CategoryPageStarted { category, page } => {
            let page_state = &mut state.category_page;
            if page_state.category != Some(category) {
                page_state.listing.items.clear();
                page_state.listing.total_pages = 0;
                page_state.listing.current_page = 1;
                page_state.category = Some(category);
            }
            start(&mut page_state.listing, page);
        }
        Action::CategoryPageSucceeded { generation, result } => {
            succeed(
                &mut state.category_page.listing,
                generation,
                result,
                max_pages,
                "category page",
            );
        }
        Action::CategoryPageFailed { generation, error } => {
            fail(&mut state.category_page.listing, generation, error, "category page");
        }

        Action::UpdateFilter(update) => apply_filter(&mut state.filters, update),
        Action::ResetFilters => state.filters = FilterCriteria::default(),

        Action::DetailsStarted => {
            state.details_loading = true;
            state.details_error = None;
        }
        Action::DetailsFailed(error) => {
            state.details_loading = false;
            state.details_error = Some(error);
        }
        Action::SelectMedia(item) => {
            state.selected = Some(item);
            state.details_loading = false;
            state.details_error = None;
        }
        Action::ClearSelection => {
            state.selected = None;
            state.details_loading = false;
            state.details_error = None;
        }
    }

    state
}

fn start(listing: &mut PagedListing, page: u32) {
    listing.generation += 1;
    listing.requested_page = page.max(1);
    listing.loading = true;
    listing.error = None;
}

fn succeed(
    listing: &mut PagedListing,
    generation: u64,
    result: PaginatedResult<MediaItem>,
    max_pages: u32,
    label: &str,
) {
    if generation != listing.generation {
        tracing::debug!(label, generation, current = listing.generation, "dropping stale response");
        return;
    }

    let total = result.total_pages.min(max_pages);
    let page = result.current_page.max(1);
    listing.total_pages = total;
    listing.loading = false;
    listing.error = None;

    if total > 0 && page > total {
        // Items of a page past the end are never shown under another number.
        tracing::debug!(label, page, total, "response page beyond last page");
        listing.items.clear();
        listing.current_page = total;
    } else {
        listing.items = result.items;
        listing.current_page = page;
    }
    listing.requested_page = listing.current_page;
}

/// Previous items stay visible on failure.
fn fail(listing: &mut PagedListing, generation: u64, error: String, label: &str) {
    if generation != listing.generation {
        tracing::debug!(label, generation, current = listing.generation, "dropping stale failure");
        return;
    }

    listing.loading = false;
    listing.error = Some(error);
}

fn apply_filter(filters: &mut FilterCriteria, update: FilterUpdate) {
    match update {
        FilterUpdate::Genre(genre) => filters.genre = genre,
        FilterUpdate::YearFrom(year) => filters.year_from = year,
        FilterUpdate::YearTo(year) => filters.year_to = year,
        FilterUpdate::MinRating(rating) => {
            filters.min_rating = if rating.is_nan() { 0.0 } else { rating.clamp(0.0, 10.0) };
        }
    }
}
