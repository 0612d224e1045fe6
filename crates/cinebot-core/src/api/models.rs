//! Raw TMDB response shapes and their conversion into [`MediaItem`]s.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::types::{MediaItem, MediaKind, PaginatedResult};

/// Page envelope shared by search and listing endpoints
#[derive(Debug, Deserialize)]
pub struct TmdbPage {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<TmdbMediaItem>,
    #[serde(default)]
    pub total_pages: u32,
}

fn first_page() -> u32 {
    1
}

/// One entry of `results`. Movies carry `title`/`release_date`,
/// shows carry `name`/`first_air_date`; details responses share the shape.
#[derive(Debug, Deserialize)]
pub struct TmdbMediaItem {
    pub id: u64,
    pub media_type: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    pub overview: Option<String>,
}

/// Genre object as embedded in details responses
#[derive(Debug, Deserialize)]
pub struct TmdbGenre {
    pub id: u32,
}

impl TmdbMediaItem {
    /// Convert into a [`MediaItem`].
    ///
    /// `fallback_kind` applies when the payload has no `media_type` (listing
    /// and details endpoints). Returns `None` for kinds other than movie/tv.
    pub fn into_media_item(self, fallback_kind: Option<MediaKind>) -> Option<MediaItem> {
        let kind = match self.media_type.as_deref() {
            Some(media_type) => MediaKind::from_media_type(media_type)?,
            None => fallback_kind?,
        };

        let title = match kind {
            MediaKind::Movie => self.title.or(self.name),
            MediaKind::Tv => self.name.or(self.title),
        }
        .unwrap_or_default();

        let date = match kind {
            MediaKind::Movie => self.release_date,
            MediaKind::Tv => self.first_air_date,
        };

        let genre_ids = if self.genre_ids.is_empty() {
            self.genres.into_iter().map(|genre| genre.id).collect()
        } else {
            self.genre_ids
        };

        Some(MediaItem {
            id: self.id,
            title,
            kind,
            release_date: date.as_deref().and_then(parse_date),
            poster_path: self.poster_path.filter(|path| !path.is_empty()),
            vote_average: self.vote_average,
            genre_ids,
            overview: self.overview.filter(|text| !text.trim().is_empty()),
        })
    }
}

/// TMDB sends `""` for unknown dates
fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Convert a raw page, dropping anything that is not a movie or show.
pub fn into_media_page(
    page: TmdbPage,
    fallback_kind: Option<MediaKind>,
) -> PaginatedResult<MediaItem> {
    let items = page
        .results
        .into_iter()
        .filter_map(|item| item.into_media_item(fallback_kind))
        .collect();

    PaginatedResult::new(items, page.page, page.total_pages)
}
