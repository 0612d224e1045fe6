//! Typed TMDB endpoints
//!
//! This module combines the HTTP client with the response models to expose
//! the handful of endpoints the mini-app needs. [`MediaSource`] is the seam
//! the controller talks to, so tests can substitute an in-memory source.

pub mod models;

use std::future::Future;
use std::pin::Pin;

use crate::client::{ClientConfig, TmdbClient};
use crate::error::Result;
use crate::types::{Category, MediaItem, MediaKind, PaginatedResult};

pub use models::{into_media_page, TmdbMediaItem, TmdbPage};

/// Boxed future returned by [`MediaSource`] methods
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Where media listings come from
pub trait MediaSource: Send + Sync + 'static {
    /// Multi-search, restricted to movies and TV shows
    fn search<'a>(&'a self, query: &'a str, page: u32) -> SourceFuture<'a, PaginatedResult<MediaItem>>;

    /// One page of a curated category listing
    fn category(&self, category: Category, page: u32) -> SourceFuture<'_, PaginatedResult<MediaItem>>;

    /// Full record for a single movie or show
    fn details(&self, id: u64, kind: MediaKind) -> SourceFuture<'_, MediaItem>;
}

/// TMDB-backed [`MediaSource`]
///
/// # Example
/// ```no_run
/// use cinebot_core::{ClientConfig, TmdbApi};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let api = TmdbApi::with_config(ClientConfig {
///         api_key: "your-key".to_string(),
///         ..Default::default()
///     })?;
///
///     let results = api.search_multi("Batman", 1).await?;
///     println!("Found {} results", results.items.len());
///     Ok(())
/// }
/// ```
pub struct TmdbApi {
    client: TmdbClient,
}

impl TmdbApi {
    /// Create an API wrapper with custom client configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            client: TmdbClient::with_config(config)?,
        })
    }

    /// Create an API wrapper around an existing client.
    pub fn with_client(client: TmdbClient) -> Self {
        Self { client }
    }

    /// Underlying HTTP client
    pub fn client(&self) -> &TmdbClient {
        &self.client
    }

    /// Search movies and shows by text.
    ///
    /// A blank query returns an empty page without touching the network.
    /// People and other non-media results are dropped.
    pub async fn search_multi(&self, query: &str, page: u32) -> Result<PaginatedResult<MediaItem>> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(PaginatedResult::empty());
        }

        let params = [
            ("query", trimmed.to_string()),
            ("page", page.max(1).to_string()),
        ];
        let raw: TmdbPage = self.client.get_json("/search/multi", &params).await?;
        Ok(into_media_page(raw, None))
    }

    /// Fetch one page of a category listing.
    ///
    /// Listing endpoints are movie-only and omit `media_type`.
    pub async fn listing(&self, category: Category, page: u32) -> Result<PaginatedResult<MediaItem>> {
        let params = [("page", page.max(1).to_string())];
        let raw: TmdbPage = self.client.get_json(category.endpoint(), &params).await?;
        Ok(into_media_page(raw, Some(MediaKind::Movie)))
    }

    /// Fetch the details record for a movie or show.
    pub async fn media_details(&self, id: u64, kind: MediaKind) -> Result<MediaItem> {
        let path = format!("/{}/{}", kind.as_str(), id);
        let raw: TmdbMediaItem = self.client.get_json(&path, &[]).await?;

        // The fallback always applies because details payloads have no media_type.
        raw.into_media_item(Some(kind)).ok_or_else(|| {
            crate::error::CinebotError::Parse(format!("unexpected payload for {}", path))
        })
    }
}

impl MediaSource for TmdbApi {
    fn search<'a>(&'a self, query: &'a str, page: u32) -> SourceFuture<'a, PaginatedResult<MediaItem>> {
        Box::pin(self.search_multi(query, page))
    }

    fn category(&self, category: Category, page: u32) -> SourceFuture<'_, PaginatedResult<MediaItem>> {
        Box::pin(self.listing(category, page))
    }

    fn details(&self, id: u64, kind: MediaKind) -> SourceFuture<'_, MediaItem> {
        Box::pin(self.media_details(id, kind))
    }
}
