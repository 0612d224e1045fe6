//! Telegram Mini-App host bridge
//!
//! The mini-app talks to Telegram through a [`HostBridge`]. Two
//! implementations exist and one is chosen at startup by [`connect`]:
//!
//! - [`TelegramBridge`]: forwards [`HostCommand`]s over a channel to the
//!   webview shell, which relays them to `Telegram.WebApp`.
//! - [`NoopBridge`]: used outside Telegram. Every call is inert and only
//!   leaves a log line.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::{CinebotError, Result};
use crate::types::{MediaItem, MediaKind};

/// Telegram's light/dark theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    /// Telegram's rule: a background darker than brightness 120 is dark.
    pub fn from_background(hex: &str) -> Option<Self> {
        let hex = hex.trim().strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        let (r, g, b) = (
            f64::from(channel(0..2)?),
            f64::from(channel(2..4)?),
            f64::from(channel(4..6)?),
        );

        let brightness = (0.299 * r * r + 0.587 * g * g + 0.114 * b * b).sqrt();
        Some(if brightness < 120.0 {
            ColorScheme::Dark
        } else {
            ColorScheme::Light
        })
    }
}

/// Payload of a `MOVIE_SELECTED` message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionPayload {
    pub id: u64,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub year: Option<i32>,
    pub rating: Option<f32>,
    pub poster_path: Option<String>,
    pub genre_ids: Vec<u32>,
    pub overview: Option<String>,
}

/// Message posted to the bot through `sendData`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum BotMessage {
    #[serde(rename = "MOVIE_SELECTED")]
    MovieSelected(SelectionPayload),
}

impl BotMessage {
    pub fn movie_selected(item: &MediaItem) -> Self {
        BotMessage::MovieSelected(SelectionPayload {
            id: item.id,
            title: item.title.clone(),
            kind: item.kind,
            year: item.year(),
            rating: item.vote_average,
            poster_path: item.poster_path.clone(),
            genre_ids: item.genre_ids.clone(),
            overview: item.overview.clone(),
        })
    }
}

/// Instruction for the webview shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "camelCase")]
pub enum HostCommand {
    Ready,
    Expand,
    SendData(String),
    ShowMainButton { text: String },
    HideMainButton,
    Close,
}

/// Notification from the webview shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "params", rename_all = "camelCase")]
pub enum HostEvent {
    MainButtonClicked,
    ThemeChanged { color_scheme: ColorScheme },
}

/// Callback run when the main button is pressed
pub type MainButtonCallback = Box<dyn Fn() + Send + Sync>;

/// Capabilities the mini-app needs from its host
pub trait HostBridge: Send {
    /// `false` for the fallback bridge
    fn is_available(&self) -> bool;

    fn color_scheme(&self) -> ColorScheme;

    /// Fire-and-forget; there is no acknowledgement.
    fn send_to_bot(&self, message: &BotMessage);

    /// Show the main button, replacing any previous callback.
    fn show_main_button(&mut self, label: &str, on_activate: MainButtonCallback);

    fn hide_main_button(&mut self);

    /// Deliver an event coming back from the host.
    fn handle_event(&mut self, event: HostEvent);
}

/// Theme colors passed in the launch URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeParams {
    pub bg_color: Option<String>,
    pub text_color: Option<String>,
    pub button_color: Option<String>,
    pub button_text_color: Option<String>,
}

/// Telegram user from the launch init data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebAppUser {
    pub id: i64,
    pub first_name: Option<String>,
    pub username: Option<String>,
    pub language_code: Option<String>,
}

/// Parameters Telegram appends to the mini-app URL fragment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LaunchParams {
    /// Raw, still signed `tgWebAppData`
    pub init_data: String,
    pub version: Option<String>,
    pub platform: Option<String>,
    pub theme: ThemeParams,
}

impl LaunchParams {
    /// Parse a fragment such as `#tgWebAppData=...&tgWebAppPlatform=ios`.
    ///
    /// # Errors
    /// `CinebotError::HostUnavailable` when `tgWebAppData` is missing, which
    /// means the page was not opened by Telegram.
    pub fn from_fragment(fragment: &str) -> Result<Self> {
        let params = parse_query(fragment.trim_start_matches('#'));

        let init_data = params
            .get("tgWebAppData")
            .filter(|data| !data.is_empty())
            .cloned()
            .ok_or_else(|| CinebotError::HostUnavailable("no tgWebAppData in launch URL".to_string()))?;

        let theme = params
            .get("tgWebAppThemeParams")
            .and_then(|json| serde_json::from_str(json).ok())
            .unwrap_or_default();

        Ok(Self {
            init_data,
            version: params.get("tgWebAppVersion").cloned(),
            platform: params.get("tgWebAppPlatform").cloned(),
            theme,
        })
    }

    /// Scheme derived from the theme background; light when unknown.
    pub fn color_scheme(&self) -> ColorScheme {
        self.theme
            .bg_color
            .as_deref()
            .and_then(ColorScheme::from_background)
            .unwrap_or_default()
    }

    /// User encoded in the init data, if present
    pub fn user(&self) -> Option<WebAppUser> {
        parse_query(&self.init_data)
            .get("user")
            .and_then(|json| serde_json::from_str(json).ok())
    }
}

fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter_map(|(key, value)| {
            let value = urlencoding::decode(&value.replace('+', " ")).ok()?.into_owned();
            Some((key.to_string(), value))
        })
        .collect()
}

/// Bridge backed by a live Telegram host
pub struct TelegramBridge {
    launch: LaunchParams,
    color_scheme: ColorScheme,
    commands: mpsc::UnboundedSender<HostCommand>,
    main_button: Option<MainButtonCallback>,
}

impl TelegramBridge {
    /// Tell the host the app is ready and expand to full height.
    pub fn new(launch: LaunchParams, commands: mpsc::UnboundedSender<HostCommand>) -> Self {
        let bridge = Self {
            color_scheme: launch.color_scheme(),
            launch,
            commands,
            main_button: None,
        };
        bridge.post(HostCommand::Ready);
        bridge.post(HostCommand::Expand);
        bridge
    }

    pub fn launch_params(&self) -> &LaunchParams {
        &self.launch
    }

    fn post(&self, command: HostCommand) {
        if self.commands.send(command).is_err() {
            tracing::warn!("host command channel closed");
        }
    }
}

impl HostBridge for TelegramBridge {
    fn is_available(&self) -> bool {
        true
    }

    fn color_scheme(&self) -> ColorScheme {
        self.color_scheme
    }

    fn send_to_bot(&self, message: &BotMessage) {
        match serde_json::to_string(message) {
            Ok(data) => {
                tracing::info!(%data, "sending data to bot");
                self.post(HostCommand::SendData(data));
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize bot message"),
        }
    }

    fn show_main_button(&mut self, label: &str, on_activate: MainButtonCallback) {
        self.main_button = Some(on_activate);
        self.post(HostCommand::ShowMainButton {
            text: label.to_string(),
        });
    }

    fn hide_main_button(&mut self) {
        self.main_button = None;
        self.post(HostCommand::HideMainButton);
    }

    fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::MainButtonClicked => match &self.main_button {
                Some(callback) => callback(),
                None => tracing::debug!("main button clicked with no callback"),
            },
            HostEvent::ThemeChanged { color_scheme } => self.color_scheme = color_scheme,
        }
    }
}

/// Inert bridge for running outside Telegram
#[derive(Debug, Default)]
pub struct NoopBridge;

impl HostBridge for NoopBridge {
    fn is_available(&self) -> bool {
        false
    }

    fn color_scheme(&self) -> ColorScheme {
        ColorScheme::Light
    }

    fn send_to_bot(&self, message: &BotMessage) {
        tracing::info!(?message, "host unavailable, message not sent");
    }

    fn show_main_button(&mut self, label: &str, _on_activate: MainButtonCallback) {
        tracing::info!(label, "host unavailable, main button not shown");
    }

    fn hide_main_button(&mut self) {
        tracing::debug!("host unavailable, main button not hidden");
    }

    fn handle_event(&mut self, event: HostEvent) {
        tracing::debug!(?event, "host unavailable, event ignored");
    }
}

/// Pick the bridge once at startup.
///
/// A fragment with valid Telegram launch data yields a [`TelegramBridge`]
/// writing to `commands`; anything else falls back to [`NoopBridge`].
pub fn connect(
    fragment: Option<&str>,
    commands: mpsc::UnboundedSender<HostCommand>,
) -> Box<dyn HostBridge> {
    let launch = fragment
        .ok_or_else(|| CinebotError::HostUnavailable("no launch URL".to_string()))
        .and_then(LaunchParams::from_fragment);

    match launch {
        Ok(launch) => {
            tracing::info!(platform = ?launch.platform, version = ?launch.version, "Telegram host detected");
            Box::new(TelegramBridge::new(launch, commands))
        }
        Err(e) => {
            tracing::warn!(error = %e, "running without Telegram, bridge calls are no-ops");
            Box::new(NoopBridge)
        }
    }
}
