//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use rolesync_core::{RecordSchema, Snowflake};
use serde::Deserialize;
use std::env;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub webhook: ServerConfig,
    pub discord: DiscordConfig,
    pub notion: NotionConfig,
    pub properties: RecordSchema,
    pub roles: RoleConfig,
    pub sync: SyncConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

/// Webhook listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    /// Route that receives change notifications
    #[serde(default = "default_webhook_path")]
    pub path: String,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Chat platform configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    pub token: String,
    pub guild_id: Snowflake,
    #[serde(default = "default_discord_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

/// Membership database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NotionConfig {
    pub token: String,
    pub members_database_id: String,
    #[serde(default)]
    pub teams_database_id: String,
    #[serde(default = "default_notion_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_notion_version")]
    pub version: String,
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

/// Fixed roles and the leadership pattern
#[derive(Debug, Clone, Deserialize)]
pub struct RoleConfig {
    pub inactive_role_id: Snowflake,
    pub technical_lead_role_id: Snowflake,
    #[serde(default = "default_technical_lead_pattern")]
    pub technical_lead_pattern: String,
}

/// Reconciliation pacing and scheduling
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Fixed pause after each remote call, in milliseconds
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_database_page_size")]
    pub database_page_size: u32,
    #[serde(default = "default_member_page_size")]
    pub member_page_size: u16,
    /// Run a sweep as soon as the engine starts
    #[serde(default)]
    pub on_startup: bool,
    /// Dry-run flag for scheduled and startup sweeps
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,
    /// Seconds between scheduled sweeps; `None` disables scheduling
    #[serde(default)]
    pub interval_secs: Option<u64>,
}

impl SyncConfig {
    #[must_use]
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: default_request_delay_ms(),
            database_page_size: default_database_page_size(),
            member_page_size: default_member_page_size(),
            on_startup: false,
            dry_run: default_dry_run(),
            interval_secs: None,
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "rolesync".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_webhook_path() -> String {
    "/members".to_string()
}

fn default_discord_api_base_url() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_notion_api_base_url() -> String {
    "https://api.notion.com/v1".to_string()
}

fn default_notion_version() -> String {
    "2022-06-28".to_string()
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_technical_lead_pattern() -> String {
    "Lead".to_string()
}

fn default_request_delay_ms() -> u64 {
    333
}

const MAX_DATABASE_PAGE_SIZE: u32 = 100;
const MAX_MEMBER_PAGE_SIZE: u16 = 1000;

fn default_database_page_size() -> u32 {
    MAX_DATABASE_PAGE_SIZE
}

fn default_member_page_size() -> u16 {
    MAX_MEMBER_PAGE_SIZE
}

fn default_dry_run() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);
        let schema_defaults = RecordSchema::default();
        let timeout_secs = vars.parse_or("HTTP_TIMEOUT_SECS", default_http_timeout_secs)?;

        Ok(Self {
            app: AppSettings {
                name: vars.get("APP_NAME").unwrap_or_else(default_app_name),
                env: vars
                    .get("APP_ENV")
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            webhook: ServerConfig {
                host: vars.get("WEBHOOK_HOST").unwrap_or_else(default_host),
                port: vars.required_parse("WEBHOOK_PORT")?,
                path: vars.get("WEBHOOK_PATH").unwrap_or_else(default_webhook_path),
            },
            discord: DiscordConfig {
                token: vars.required("DISCORD_TOKEN")?,
                guild_id: vars.required_parse("DISCORD_GUILD_ID")?,
                api_base_url: vars
                    .get("DISCORD_API_BASE_URL")
                    .unwrap_or_else(default_discord_api_base_url),
                timeout_secs,
            },
            notion: NotionConfig {
                token: vars.required("NOTION_TOKEN")?,
                members_database_id: vars.required("NOTION_MEMBERS_DATABASE_ID")?,
                teams_database_id: vars.get("NOTION_TEAMS_DATABASE_ID").unwrap_or_default(),
                api_base_url: vars
                    .get("NOTION_API_BASE_URL")
                    .unwrap_or_else(default_notion_api_base_url),
                version: vars.get("NOTION_VERSION").unwrap_or_else(default_notion_version),
                timeout_secs,
            },
            properties: RecordSchema {
                discord_username: vars
                    .get("PROP_DISCORD_USERNAME")
                    .unwrap_or(schema_defaults.discord_username),
                active: vars.get("PROP_ACTIVE").unwrap_or(schema_defaults.active),
                club_positions: vars
                    .get("PROP_CLUB_POSITIONS")
                    .unwrap_or(schema_defaults.club_positions),
                teams: vars.get("PROP_TEAMS").unwrap_or(schema_defaults.teams),
                team_name: vars.get("PROP_TEAM_NAME").unwrap_or(schema_defaults.team_name),
            },
            roles: RoleConfig {
                inactive_role_id: vars.required_parse("INACTIVE_ROLE_ID")?,
                technical_lead_role_id: vars.required_parse("TECHNICAL_LEAD_ROLE_ID")?,
                technical_lead_pattern: vars
                    .get("TECHNICAL_LEAD_PATTERN")
                    .unwrap_or_else(default_technical_lead_pattern),
            },
            sync: SyncConfig {
                request_delay_ms: vars.parse_or("SYNC_REQUEST_DELAY_MS", default_request_delay_ms)?,
                database_page_size: vars.parse_in_range(
                    "SYNC_DATABASE_PAGE_SIZE",
                    1..=MAX_DATABASE_PAGE_SIZE,
                    default_database_page_size,
                )?,
                member_page_size: vars.parse_in_range(
                    "SYNC_MEMBER_PAGE_SIZE",
                    1..=MAX_MEMBER_PAGE_SIZE,
                    default_member_page_size,
                )?,
                on_startup: vars.parse_or("SYNC_ON_STARTUP", || false)?,
                dry_run: vars.parse_or("SYNC_DRY_RUN", default_dry_run)?,
                interval_secs: vars
                    .get("SYNC_INTERVAL_SECS")
                    .map(|s| {
                        s.parse()
                            .map_err(|_| ConfigError::InvalidValue("SYNC_INTERVAL_SECS", s))
                    })
                    .transpose()?,
            },
        })
    }
}

/// Typed access over a key lookup; blank values count as unset
struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::MissingVar(key))
    }

    fn required_parse<T: FromStr>(&self, key: &'static str) -> Result<T, ConfigError> {
        let raw = self.required(key)?;
        raw.parse().map_err(|_| ConfigError::InvalidValue(key, raw))
    }

    fn parse_or<T: FromStr>(
        &self,
        key: &'static str,
        default: impl FnOnce() -> T,
    ) -> Result<T, ConfigError> {
        match self.get(key) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue(key, raw)),
            None => Ok(default()),
        }
    }

    fn parse_in_range<T>(
        &self,
        key: &'static str,
        range: RangeInclusive<T>,
        default: impl FnOnce() -> T,
    ) -> Result<T, ConfigError>
    where
        T: FromStr + PartialOrd,
    {
        let value = self.parse_or(key, default)?;
        if range.contains(&value) {
            Ok(value)
        } else {
            Err(ConfigError::InvalidValue(
                key,
                self.get(key).unwrap_or_default(),
            ))
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
