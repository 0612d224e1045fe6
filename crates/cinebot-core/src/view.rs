//! Screen view models
//!
//! Borrowed, serializable snapshots of [`AppState`] shaped for the webview.
//! Each screen reads the state only through the store's selectors, so
//! active filters are already applied.

use serde::Serialize;

use crate::bridge::ColorScheme;
use crate::client::poster_url;
use crate::store::{selectors, AppState, PagedListing};
use crate::types::{Category, MediaItem, MediaKind};

/// Poster width used in lists
const LIST_POSTER_SIZE: &str = "w342";

/// One card in a list or row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView<'a> {
    pub id: u64,
    pub kind: MediaKind,
    pub title: &'a str,
    pub year: Option<i32>,
    pub rating: Option<f32>,
    pub poster_url: String,
}

impl<'a> CardView<'a> {
    pub fn new(item: &'a MediaItem, image_base_url: &str) -> Self {
        Self {
            id: item.id,
            kind: item.kind,
            title: &item.title,
            year: item.year(),
            rating: item.vote_average,
            poster_url: poster_url(image_base_url, item.poster_path.as_deref(), LIST_POSTER_SIZE),
        }
    }
}

/// A home-screen category row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView<'a> {
    pub category: Category,
    pub title: &'static str,
    pub items: Vec<CardView<'a>>,
    pub loading: bool,
    pub error: Option<&'a str>,
    pub can_retry: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeView<'a> {
    pub color_scheme: ColorScheme,
    pub rows: Vec<RowView<'a>>,
}

/// Page buttons under a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagerView {
    pub pages: Vec<u32>,
    pub current: u32,
    pub total: u32,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PagerView {
    /// `None` when there is nothing to page through
    pub fn new(listing: &PagedListing, window: usize) -> Option<Self> {
        if listing.total_pages <= 1 {
            return None;
        }

        Some(Self {
            pages: selectors::listing_page_window(listing, window),
            current: listing.current_page,
            total: listing.total_pages,
            has_prev: listing.current_page > 1,
            has_next: listing.current_page < listing.total_pages,
        })
    }
}

/// A paginated list with its loading and error indicators
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingView<'a> {
    pub items: Vec<CardView<'a>>,
    pub loading: bool,
    pub error: Option<&'a str>,
    /// Shown next to `error`; retry re-issues the last request
    pub can_retry: bool,
    pub pager: Option<PagerView>,
}

impl<'a> ListingView<'a> {
    fn new(
        listing: &'a PagedListing,
        visible: Vec<&'a MediaItem>,
        image_base_url: &str,
        window: usize,
    ) -> Self {
        Self {
            items: cards(visible, image_base_url),
            loading: listing.loading,
            error: listing.error.as_deref(),
            can_retry: listing.error.is_some() && !listing.loading,
            pager: PagerView::new(listing, window),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchView<'a> {
    pub input: &'a str,
    pub query: &'a str,
    /// Settled query with nothing found
    pub empty: bool,
    pub listing: ListingView<'a>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPageView<'a> {
    pub category: Option<Category>,
    pub title: Option<&'static str>,
    pub listing: ListingView<'a>,
}

fn cards<'a>(items: Vec<&'a MediaItem>, image_base_url: &str) -> Vec<CardView<'a>> {
    items
        .into_iter()
        .map(|item| CardView::new(item, image_base_url))
        .collect()
}

pub fn home_view<'a>(state: &'a AppState, color_scheme: ColorScheme, image_base_url: &str) -> HomeView<'a> {
    let rows = Category::ALL
        .into_iter()
        .map(|category| {
            let row = selectors::category(state, category);
            RowView {
                category,
                title: category.title(),
                items: cards(selectors::visible_category_items(state, category), image_base_url),
                loading: row.loading,
                error: row.error.as_deref(),
                can_retry: row.error.is_some() && !row.loading,
            }
        })
        .collect();

    HomeView { color_scheme, rows }
}

pub fn search_view<'a>(state: &'a AppState, image_base_url: &str, window: usize) -> SearchView<'a> {
    let listing = &state.search.listing;
    let empty = !state.search.query.is_empty()
        && !listing.loading
        && listing.error.is_none()
        && listing.items.is_empty();

    SearchView {
        input: &state.search.input,
        query: &state.search.query,
        empty,
        listing: ListingView::new(
            listing,
            selectors::visible_search_results(state),
            image_base_url,
            window,
        ),
    }
}

pub fn category_page_view<'a>(state: &'a AppState, image_base_url: &str, window: usize) -> CategoryPageView<'a> {
    let page = &state.category_page;

    CategoryPageView {
        category: page.category,
        title: page.category.map(|category| category.title()),
        listing: ListingView::new(
            &page.listing,
            selectors::visible_category_page_items(state),
            image_base_url,
            window,
        ),
    }
}
