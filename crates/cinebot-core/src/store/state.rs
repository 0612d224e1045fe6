//! Application state container.
//!
//! [`AppState`] is plain data. It changes only through
//! [`reduce`](super::reduce) and is read by view code through the
//! [`selectors`](super::selectors).

use serde::{Deserialize, Serialize};

use crate::types::{Category, MediaItem, MediaKind};

/// Upper bound on `total_pages` kept in state
pub const MAX_TOTAL_PAGES: u32 = 20;

/// Screen the user is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "name", content = "params", rename_all = "camelCase")]
pub enum Route {
    #[default]
    Home,
    Search,
    Category(Category),
    Filters,
    Details { id: u64, kind: MediaKind },
}

/// Cached home-screen row for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryState {
    pub category: Category,
    pub items: Vec<MediaItem>,
    pub loading: bool,
    pub error: Option<String>,
}

impl CategoryState {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }

    /// Fetch-once policy: only an empty, idle row may fetch.
    pub fn needs_fetch(&self) -> bool {
        self.items.is_empty() && !self.loading
    }
}

/// A paginated list fed by one request at a time.
///
/// `generation` identifies the newest request. Responses carrying an
/// older generation are stale and ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedListing {
    pub items: Vec<MediaItem>,
    /// 1-based page of `items`
    pub current_page: u32,
    /// Clamped to `max_total_pages`
    pub total_pages: u32,
    pub loading: bool,
    pub error: Option<String>,
    /// Page of the newest request, or the shown page once it succeeds.
    /// Retry re-issues it.
    pub requested_page: u32,
    pub generation: u64,
}

impl Default for PagedListing {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            total_pages: 0,
            loading: false,
            error: None,
            requested_page: 1,
            generation: 0,
        }
    }
}

/// Search screen state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    /// Raw text as typed
    pub input: String,
    /// Last settled, trimmed query; empty when cleared
    pub query: String,
    pub listing: PagedListing,
}

/// Paged browsing of a single category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryPageState {
    pub category: Option<Category>,
    pub listing: PagedListing,
}

/// Client-side filter over fetched lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// TMDB genre id
    pub genre: Option<u32>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    /// 0.0 - 10.0
    pub min_rating: f32,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            genre: None,
            year_from: None,
            year_to: None,
            min_rating: 0.0,
        }
    }
}

impl FilterCriteria {
    /// Whether no criterion is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether `item` passes every set criterion.
    ///
    /// Year bounds reject undated items; a missing vote counts as 0.
    pub fn matches(&self, item: &MediaItem) -> bool {
        if let Some(genre) = self.genre {
            if !item.genre_ids.contains(&genre) {
                return false;
            }
        }

        if self.year_from.is_some() || self.year_to.is_some() {
            let Some(year) = item.year() else {
                return false;
            };
            if self.year_from.is_some_and(|from| year < from) {
                return false;
            }
            if self.year_to.is_some_and(|to| year > to) {
                return false;
            }
        }

        item.vote_average.unwrap_or(0.0) >= self.min_rating
    }
}

/// Single change to [`FilterCriteria`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterUpdate {
    Genre(Option<u32>),
    YearFrom(Option<i32>),
    YearTo(Option<i32>),
    MinRating(f32),
}

/// Everything the mini-app knows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub route: Route,
    /// Indexed by [`Category::ALL`] order
    pub categories: [CategoryState; 4],
    pub search: SearchState,
    pub category_page: CategoryPageState,
    pub filters: FilterCriteria,
    /// Item opened in the details screen
    pub selected: Option<MediaItem>,
    pub details_loading: bool,
    pub details_error: Option<String>,
    pub max_total_pages: u32,
}

impl AppState {
    pub fn new(max_total_pages: u32) -> Self {
        Self {
            route: Route::Home,
            categories: Category::ALL.map(CategoryState::new),
            search: SearchState::default(),
            category_page: CategoryPageState::default(),
            filters: FilterCriteria::default(),
            selected: None,
            details_loading: false,
            details_error: None,
            max_total_pages: max_total_pages.max(1),
        }
    }

    pub fn category(&self, category: Category) -> &CategoryState {
        &self.categories[category.index()]
    }

    pub(crate) fn category_mut(&mut self, category: Category) -> &mut CategoryState {
        &mut self.categories[category.index()]
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(MAX_TOTAL_PAGES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(year: Option<i32>, vote: Option<f32>, genres: Vec<u32>) -> MediaItem {
        MediaItem {
            id: 1,
            title: "Heat".to_string(),
            kind: MediaKind::Movie,
            release_date: year.and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1)),
            poster_path: None,
            vote_average: vote,
            genre_ids: genres,
            overview: None,
        }
    }

    #[test]
    fn test_initial_state_has_every_category_empty() {
        let state = AppState::default();
        for category in Category::ALL {
            let row = state.category(category);
            assert_eq!(row.category, category);
            assert!(row.needs_fetch());
            assert!(row.error.is_none());
        }
        assert_eq!(state.max_total_pages, MAX_TOTAL_PAGES);
    }

    #[test]
    fn test_loading_row_does_not_need_fetch() {
        let mut row = CategoryState::new(Category::Popular);
        row.loading = true;
        assert!(!row.needs_fetch());
    }

    #[test]
    fn test_default_filters_match_everything() {
        let filters = FilterCriteria::default();
        assert!(filters.is_empty());
        assert!(filters.matches(&item(None, None, vec![])));
    }

    #[test]
    fn test_genre_filter() {
        let filters = FilterCriteria {
            genre: Some(28),
            ..Default::default()
        };
        assert!(filters.matches(&item(None, None, vec![80, 28])));
        assert!(!filters.matches(&item(None, None, vec![35])));
    }

    #[test]
    fn test_year_range_filter() {
        let filters = FilterCriteria {
            year_from: Some(1990),
            year_to: Some(1999),
            ..Default::default()
        };
        assert!(filters.matches(&item(Some(1995), None, vec![])));
        assert!(filters.matches(&item(Some(1999), None, vec![])));
        assert!(!filters.matches(&item(Some(2000), None, vec![])));
        assert!(!filters.matches(&item(None, None, vec![])));
    }

    #[test]
    fn test_min_rating_filter() {
        let filters = FilterCriteria {
            min_rating: 7.5,
            ..Default::default()
        };
        assert!(filters.matches(&item(None, Some(8.3), vec![])));
        assert!(!filters.matches(&item(None, Some(6.1), vec![])));
        assert!(!filters.matches(&item(None, None, vec![])));
    }

    #[test]
    fn test_route_serialization() {
        let json = serde_json::to_string(&Route::Category(Category::TopRated)).unwrap();
        assert_eq!(json, r#"{"name":"category","params":"topRated"}"#);
    }
}
