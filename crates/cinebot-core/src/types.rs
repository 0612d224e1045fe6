//! Data types for Cinebot
//!
//! This module contains the core data structures shared by the API layer,
//! the store and the view models. All types implement Serialize and
//! Deserialize for JSON compatibility with the host webview.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CinebotError;

/// Kind of media item returned by TMDB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Feature film
    Movie,
    /// TV show
    Tv,
}

impl MediaKind {
    /// Path segment TMDB uses for this kind (`movie` or `tv`)
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }

    /// Parse TMDB's `media_type` value. Anything else (e.g. `person`) is `None`.
    pub fn from_media_type(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(MediaKind::Movie),
            "tv" => Some(MediaKind::Tv),
            _ => None,
        }
    }
}

/// A movie or TV show as received from TMDB. Never mutated locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    /// TMDB identifier
    pub id: u64,
    /// Movie title or show name
    pub title: String,
    /// Movie or TV
    pub kind: MediaKind,
    /// Release date for movies, first air date for shows
    pub release_date: Option<NaiveDate>,
    /// Relative poster path (e.g. "/abc.jpg")
    pub poster_path: Option<String>,
    /// Average vote (0.0 - 10.0)
    pub vote_average: Option<f32>,
    /// TMDB genre ids, in API order
    pub genre_ids: Vec<u32>,
    /// Plot summary
    pub overview: Option<String>,
}

impl MediaItem {
    /// Release (or first air) year
    pub fn year(&self) -> Option<i32> {
        self.release_date.map(|date| date.year())
    }
}

/// One of the four fixed curated listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Popular,
    NowPlaying,
    TopRated,
    Upcoming,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 4] = [
        Category::Popular,
        Category::NowPlaying,
        Category::TopRated,
        Category::Upcoming,
    ];

    /// Key used by the host webview (`popular`, `nowPlaying`, ...)
    pub fn key(&self) -> &'static str {
        match self {
            Category::Popular => "popular",
            Category::NowPlaying => "nowPlaying",
            Category::TopRated => "topRated",
            Category::Upcoming => "upcoming",
        }
    }

    /// Read-only listing endpoint for this category
    pub fn endpoint(&self) -> &'static str {
        match self {
            Category::Popular => "/movie/popular",
            Category::NowPlaying => "/movie/now_playing",
            Category::TopRated => "/movie/top_rated",
            Category::Upcoming => "/movie/upcoming",
        }
    }

    /// Row title on the home screen
    pub fn title(&self) -> &'static str {
        match self {
            Category::Popular => "Popular",
            Category::NowPlaying => "Now Playing",
            Category::TopRated => "Top Rated",
            Category::Upcoming => "Upcoming",
        }
    }

    /// Position in [`Category::ALL`]
    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = CinebotError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.key() == key)
            .ok_or_else(|| CinebotError::UnknownCategory(key.to_string()))
    }
}

/// Paginated result wrapper for listing and search responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    /// Items on the current page
    pub items: Vec<T>,
    /// Current page number (1-based)
    pub current_page: u32,
    /// Total number of pages reported by the API
    pub total_pages: u32,
}

impl<T> PaginatedResult<T> {
    /// Create a new paginated result
    pub fn new(items: Vec<T>, current_page: u32, total_pages: u32) -> Self {
        Self {
            items,
            current_page,
            total_pages,
        }
    }

    /// Create an empty result for the first page
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            total_pages: 0,
        }
    }

    /// Whether there are more pages available
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// TMDB genre ids for both movies and TV, keyed by a lowercase slug.
const GENRES: &[(&str, u32)] = &[
    ("action", 28),
    ("adventure", 12),
    ("animation", 16),
    ("comedy", 35),
    ("crime", 80),
    ("documentary", 99),
    ("drama", 18),
    ("family", 10751),
    ("fantasy", 14),
    ("history", 36),
    ("horror", 27),
    ("music", 10402),
    ("mystery", 9648),
    ("romance", 10749),
    ("science-fiction", 878),
    ("thriller", 53),
    ("war", 10752),
    ("western", 37),
    ("action-adventure", 10759),
    ("kids", 10762),
    ("sci-fi-fantasy", 10765),
];

/// Look up a TMDB genre id by slug (`"action"` -> 28)
pub fn genre_id(slug: &str) -> Option<u32> {
    let slug = slug.trim().to_lowercase();
    GENRES
        .iter()
        .find(|(name, _)| *name == slug)
        .map(|(_, id)| *id)
}

/// Slug for a TMDB genre id, if known
pub fn genre_name(id: u32) -> Option<&'static str> {
    GENRES
        .iter()
        .find(|(_, genre)| *genre == id)
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> MediaItem {
        MediaItem {
            id: 268,
            title: "Batman".to_string(),
            kind: MediaKind::Movie,
            release_date: NaiveDate::from_ymd_opt(1989, 6, 23),
            poster_path: Some("/batman.jpg".to_string()),
            vote_average: Some(7.2),
            genre_ids: vec![14, 28],
            overview: None,
        }
    }

    #[test]
    fn test_media_kind_serialization() {
        assert_eq!(serde_json::to_string(&MediaKind::Movie).unwrap(), "\"movie\"");
        assert_eq!(serde_json::to_string(&MediaKind::Tv).unwrap(), "\"tv\"");
    }

    #[test]
    fn test_media_kind_from_media_type_drops_person() {
        assert_eq!(MediaKind::from_media_type("movie"), Some(MediaKind::Movie));
        assert_eq!(MediaKind::from_media_type("tv"), Some(MediaKind::Tv));
        assert_eq!(MediaKind::from_media_type("person"), None);
    }

    #[test]
    fn test_media_item_year() {
        assert_eq!(sample_item().year(), Some(1989));

        let undated = MediaItem {
            release_date: None,
            ..sample_item()
        };
        assert_eq!(undated.year(), None);
    }

    #[test]
    fn test_category_keys_round_trip_through_from_str() {
        for category in Category::ALL {
            assert_eq!(category.key().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_category_unknown_key() {
        match "trending".parse::<Category>() {
            Err(CinebotError::UnknownCategory(key)) => assert_eq!(key, "trending"),
            other => panic!("Expected UnknownCategory, got {:?}", other),
        }
    }

    #[test]
    fn test_category_endpoints_are_distinct() {
        let mut endpoints: Vec<_> = Category::ALL.iter().map(|c| c.endpoint()).collect();
        endpoints.sort();
        endpoints.dedup();
        assert_eq!(endpoints.len(), 4);
    }

    #[test]
    fn test_category_serializes_as_camel_case_key() {
        let json = serde_json::to_string(&Category::NowPlaying).unwrap();
        assert_eq!(json, "\"nowPlaying\"");
    }

    #[test]
    fn test_paginated_result_empty() {
        let result: PaginatedResult<MediaItem> = PaginatedResult::empty();
        assert!(result.items.is_empty());
        assert_eq!(result.current_page, 1);
        assert!(!result.has_next_page());
    }

    #[test]
    fn test_paginated_result_has_next_page() {
        let result = PaginatedResult::new(vec![sample_item()], 2, 7);
        assert!(result.has_next_page());

        let last = PaginatedResult::new(vec![sample_item()], 7, 7);
        assert!(!last.has_next_page());
    }

    #[test]
    fn test_genre_lookup() {
        assert_eq!(genre_id("Action"), Some(28));
        assert_eq!(genre_id("unknown"), None);
        assert_eq!(genre_name(35), Some("comedy"));
    }
}
