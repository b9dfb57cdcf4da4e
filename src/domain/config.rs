//! # Configuration
//!
//! Manages the loading and parsing of the bot's configuration file (`config.yaml`).
//! Defines the structs for the Slack connection, the image service, the command
//! vocabulary and loop timings. Every section has defaults, so the file is optional.
//! Secrets never live in the file: only the names of the environment variables do.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_PATH: &str = "data/config.yaml";

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub system: SystemConfig,
}

/// Configuration for the connected services.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ServicesConfig {
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub images: ImagesConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SlackConfig {
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Where the greeting goes after the handshake.
    #[serde(default = "default_channel")]
    pub default_channel: String,
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            token_env: default_token_env(),
            api_base: default_api_base(),
            default_channel: default_channel(),
            greeting: default_greeting(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImagesConfig {
    #[serde(default = "default_images_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Field of the response body holding the list of entries.
    #[serde(default = "default_list_field")]
    pub list_field: String,
    /// Field of each entry holding the resource URL.
    #[serde(default = "default_url_field")]
    pub url_field: String,
    /// `random`, or `{ index: N }` for a fixed position.
    #[serde(default, with = "serde_yaml::with::singleton_map")]
    pub selection: ImageSelection,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            endpoint: default_images_endpoint(),
            api_key_env: default_api_key_env(),
            list_field: default_list_field(),
            url_field: default_url_field(),
            selection: ImageSelection::default(),
        }
    }
}

/// How one URL is picked out of the lookup result.
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageSelection {
    #[default]
    Random,
    Index(usize),
}

/// The command vocabulary. Each verb is matched as a prefix of the mention remainder.
#[derive(Debug, Deserialize, Clone)]
pub struct CommandsConfig {
    #[serde(default = "default_help_verb")]
    pub help: String,
    #[serde(default = "default_image_verb")]
    pub image: String,
    #[serde(default = "default_fault_verb")]
    pub fault: String,
    #[serde(default = "default_shutdown_verb")]
    pub shutdown: String,
    #[serde(default = "default_replies")]
    pub replies: Vec<ReplyEntry>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            help: default_help_verb(),
            image: default_image_verb(),
            fault: default_fault_verb(),
            shutdown: default_shutdown_verb(),
            replies: default_replies(),
        }
    }
}

/// A fixed answer for a fixed prefix.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ReplyEntry {
    pub prefix: String,
    pub text: String,
}

/// Loop timings and log placement.
#[derive(Debug, Deserialize, Clone)]
pub struct SystemConfig {
    #[serde(default = "default_read_delay_ms")]
    pub read_delay_ms: u64,
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: u64,
    #[serde(default = "default_poll_window_ms")]
    pub poll_window_ms: u64,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            read_delay_ms: default_read_delay_ms(),
            backoff_secs: default_backoff_secs(),
            poll_window_ms: default_poll_window_ms(),
            log_dir: default_log_dir(),
            log_file: default_log_file(),
        }
    }
}

impl SystemConfig {
    pub fn read_delay(&self) -> Duration {
        Duration::from_millis(self.read_delay_ms)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_secs(self.backoff_secs)
    }

    pub fn poll_window(&self) -> Duration {
        Duration::from_millis(self.poll_window_ms)
    }
}

fn default_token_env() -> String {
    "SLACK_BOT_TOKEN".to_string()
}
fn default_api_base() -> String {
    "https://slack.com/api".to_string()
}
fn default_channel() -> String {
    "#general".to_string()
}
fn default_greeting() -> String {
    "Here's Rover! (type: -help)".to_string()
}
fn default_images_endpoint() -> String {
    "https://api.nasa.gov/mars-photos/api/v1/rovers/curiosity/photos?sol=1000&page=2".to_string()
}
fn default_api_key_env() -> String {
    "NASA_API_KEY".to_string()
}
fn default_list_field() -> String {
    "photos".to_string()
}
fn default_url_field() -> String {
    "img_src".to_string()
}
fn default_help_verb() -> String {
    "-help".to_string()
}
fn default_image_verb() -> String {
    "nasa".to_string()
}
fn default_fault_verb() -> String {
    "raise".to_string()
}
fn default_shutdown_verb() -> String {
    "secret logout".to_string()
}
fn default_replies() -> Vec<ReplyEntry> {
    vec![ReplyEntry {
        prefix: "sup?".to_string(),
        text: "I'm a really boring and I only do one thing... say nasa".to_string(),
    }]
}
fn default_read_delay_ms() -> u64 {
    1000
}
fn default_backoff_secs() -> u64 {
    5
}
fn default_poll_window_ms() -> u64 {
    250
}
fn default_log_dir() -> String {
    "data".to_string()
}
fn default_log_file() -> String {
    "slackbot.log".to_string()
}

impl AppConfig {
    /// Reads `path` if it exists, otherwise falls back to the built-in defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Pulls both secrets out of the environment. Absence of either is fatal at startup.
    pub fn resolve_secrets(&self) -> Result<Secrets> {
        self.resolve_secrets_with(|name| std::env::var(name).ok())
    }

    pub fn resolve_secrets_with<F>(&self, lookup: F) -> Result<Secrets>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch = |name: &str| -> Result<String> {
            match lookup(name) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => bail!("Missing required environment variable {name}"),
            }
        };
        Ok(Secrets {
            bot_token: fetch(&self.services.slack.token_env)?,
            image_api_key: fetch(&self.services.images.api_key_env)?,
        })
    }
}

/// Credentials pulled from the environment at startup.
#[derive(Clone)]
pub struct Secrets {
    pub bot_token: String,
    pub image_api_key: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("bot_token", &"<redacted>")
            .field("image_api_key", &"<redacted>")
            .finish()
    }
}
