//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.snakebot/config.json`) and environment.
//! `Settings::from_config` is the startup gate: it fails when no bot token is available.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_GAME_SHORT_NAME: &str = "snake4d";
pub const DEFAULT_GAME_URL: &str = "https://snake4d.netlify.app";
pub const DEFAULT_BOT_USERNAME: &str = "snake4dbot";
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Bot API credentials and webhook registration.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// The game this bot launches.
    #[serde(default)]
    pub game: GameConfig,
}

/// Gateway bind and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Port for HTTP (default 8080).
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1"). Telegram must reach the webhook over HTTPS, so on the
    /// loopback default put a TLS reverse proxy in front; set "0.0.0.0" to listen on all interfaces.
    #[serde(default = "default_gateway_bind")]
    pub bind: String,
}

fn default_gateway_port() -> u16 {
    8080
}

fn default_gateway_bind() -> String {
    "127.0.0.1".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            bind: default_gateway_bind(),
        }
    }
}

/// Telegram config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramConfig {
    /// Bot token from BotFather. Overridden by TELEGRAM_BOT_TOKEN env when set.
    pub bot_token: Option<String>,
    /// When set, the gateway registers this URL with setWebhook on startup and removes it on shutdown.
    pub webhook_url: Option<String>,
    /// Optional secret for webhook verification (X-Telegram-Bot-Api-Secret-Token).
    pub webhook_secret: Option<String>,
    /// Bot API base URL (default https://api.telegram.org).
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_api_base() -> String {
    DEFAULT_TELEGRAM_API_BASE.to_string()
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            webhook_url: None,
            webhook_secret: None,
            api_base: default_api_base(),
        }
    }
}

/// Game identity: short name registered with BotFather and the web front-end URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    #[serde(default = "default_game_short_name")]
    pub short_name: String,
    /// Front-end base URL. Overridden by GAME_URL env when set.
    #[serde(default = "default_game_url")]
    pub url: String,
    /// Bot handle mentioned in the /start welcome text (without the leading @).
    #[serde(default = "default_bot_username")]
    pub bot_username: String,
}

fn default_game_short_name() -> String {
    DEFAULT_GAME_SHORT_NAME.to_string()
}

fn default_game_url() -> String {
    DEFAULT_GAME_URL.to_string()
}

fn default_bot_username() -> String {
    DEFAULT_BOT_USERNAME.to_string()
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            short_name: default_game_short_name(),
            url: default_game_url(),
            bot_username: default_bot_username(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TELEGRAM_BOT_TOKEN is not set (env or telegram.botToken)")]
    MissingBotToken,
    #[error("game.shortName must not be empty")]
    EmptyGameShortName,
}

/// Non-empty trimmed env var.
fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|s| {
        let t = s.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_string())
        }
    })
}

fn trimmed(value: Option<&String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Resolve the Telegram bot token: env TELEGRAM_BOT_TOKEN overrides config.
pub fn resolve_telegram_token(config: &Config) -> Option<String> {
    env_non_empty("TELEGRAM_BOT_TOKEN").or_else(|| trimmed(config.telegram.bot_token.as_ref()))
}

/// Resolve the game front-end URL: env GAME_URL overrides config.
pub fn resolve_game_url(config: &Config) -> String {
    env_non_empty("GAME_URL").unwrap_or_else(|| config.game.url.trim().to_string())
}

/// Game identity as used by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    pub short_name: String,
    pub url: String,
    pub welcome_text: String,
}

impl GameSettings {
    pub fn new(short_name: impl Into<String>, url: impl Into<String>, bot_username: &str) -> Self {
        Self {
            short_name: short_name.into(),
            url: url.into(),
            welcome_text: welcome_text(bot_username),
        }
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new(DEFAULT_GAME_SHORT_NAME, DEFAULT_GAME_URL, DEFAULT_BOT_USERNAME)
    }
}

/// Reply to `/start`.
pub fn welcome_text(bot_username: &str) -> String {
    format!(
        "Welcome to the Snake 4D Game Bot! Use @{} followed by some text in any chat to start playing.",
        bot_username.trim_start_matches('@')
    )
}

/// Validated runtime settings. Construct with [`Settings::from_config`].
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind: String,
    pub port: u16,
    pub bot_token: String,
    pub api_base: String,
    pub webhook_url: Option<String>,
    pub webhook_secret: Option<String>,
    pub game: GameSettings,
}

impl Settings {
    /// Resolve env overrides and validate. A missing bot token is fatal at startup.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let bot_token = resolve_telegram_token(config).ok_or(ConfigError::MissingBotToken)?;
        let short_name = config.game.short_name.trim();
        if short_name.is_empty() {
            return Err(ConfigError::EmptyGameShortName);
        }
        Ok(Self {
            bind: config.gateway.bind.trim().to_string(),
            port: config.gateway.port,
            bot_token,
            api_base: config.telegram.api_base.trim_end_matches('/').to_string(),
            webhook_url: trimmed(config.telegram.webhook_url.as_ref()),
            webhook_secret: trimmed(config.telegram.webhook_secret.as_ref()),
            game: GameSettings::new(
                short_name,
                resolve_game_url(config),
                &config.game.bot_username,
            ),
        })
    }
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("SNAKEBOT_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".snakebot").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the given path, SNAKEBOT_CONFIG_PATH, or the default. Missing file => default config.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}
