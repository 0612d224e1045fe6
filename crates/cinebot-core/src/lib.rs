//! Cinebot Core Library
//!
//! This crate provides the data layer of a Telegram mini-app for browsing
//! movies and TV shows from TMDB (The Movie Database).
//!
//! # Features
//! - Rate-limited TMDB client with user-facing error messages
//! - Debounced multi-search with stale-response suppression
//! - Cached category rows and paged category browsing
//! - Reducer-driven global state with client-side filters
//! - Telegram WebApp bridge with a no-op fallback outside Telegram

pub mod api;
pub mod app;
pub mod bridge;
pub mod client;
pub mod config;
pub mod debounce;
pub mod error;
pub mod logging;
pub mod pagination;
pub mod store;
pub mod types;
pub mod view;

// Re-export main types for convenience
pub use api::{MediaSource, TmdbApi};
pub use app::{Event, MiniApp};
pub use bridge::{BotMessage, ColorScheme, HostBridge, HostCommand, HostEvent, LaunchParams};
pub use client::{ClientConfig, RateLimiter, TmdbClient};
pub use config::AppConfig;
pub use debounce::Debouncer;
pub use error::{CinebotError, Result};
pub use logging::init_logging;
pub use pagination::page_window;
pub use store::{Action, AppState, FilterUpdate, Route};
pub use types::{Category, MediaItem, MediaKind, PaginatedResult};
