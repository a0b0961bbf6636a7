//! Application configuration management
//!
//! Configuration comes from a TOML file when `CONFIG_PATH` is set and from
//! environment variables (optionally seeded by a `.env` file) otherwise.
//! Values are validated once at startup so a malformed setting stops the
//! process before it binds a port.

use crate::core::constants::{anthropic, google, status};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Default request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT: u64 = 90;

/// Default server port
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnthropicConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub request_timeout: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: anthropic::DEFAULT_BASE_URL.to_string(),
            model: anthropic::DEFAULT_MODEL.to_string(),
            max_tokens: anthropic::DEFAULT_MAX_TOKENS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            log_level: "info".to_string(),
        }
    }
}

/// Optional third-party integrations; only their presence is reported
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IntegrationsConfig {
    pub supabase_url: Option<String>,
    pub slack_token: Option<String>,
}

/// Settings for the Google Workspace client
///
/// The base URLs exist so the client can be pointed at a different host
/// (a proxy or a mock server); production deployments leave them alone.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GoogleWorkspaceConfig {
    /// OAuth2 bearer token with Drive, Docs and Gmail scopes
    pub access_token: Option<String>,
    pub project_id: Option<String>,
    pub drive_base_url: String,
    pub drive_upload_url: String,
    pub docs_base_url: String,
    pub gmail_base_url: String,
    pub request_timeout: u64,
}

impl Default for GoogleWorkspaceConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            project_id: None,
            drive_base_url: google::DRIVE_BASE_URL.to_string(),
            drive_upload_url: google::DRIVE_UPLOAD_URL.to_string(),
            docs_base_url: google::DOCS_BASE_URL.to_string(),
            gmail_base_url: google::GMAIL_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl GoogleWorkspaceConfig {
    /// Configuration with every endpoint rooted at `base_url`
    pub fn with_base_url(access_token: Option<String>, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            access_token,
            drive_base_url: format!("{}/drive/v3", base),
            drive_upload_url: format!("{}/upload/drive/v3", base),
            docs_base_url: format!("{}/v1", base),
            gmail_base_url: format!("{}/gmail/v1", base),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct TomlConfig {
    anthropic: AnthropicConfig,
    server: ServerConfig,
    integrations: IntegrationsConfig,
    google: GoogleWorkspaceConfig,
}

/// Application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub anthropic: AnthropicConfig,
    pub server: ServerConfig,
    pub integrations: IntegrationsConfig,
    pub google: GoogleWorkspaceConfig,
}

/// Per-integration status as shown on `GET /` and in the startup banner
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IntegrationStatus {
    pub anthropic: &'static str,
    pub supabase: &'static str,
    pub slack: &'static str,
    pub google_workspace: &'static str,
}

/// Treat empty strings as absent
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match present(lookup(key)) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Every section and key is optional; omitted values take their defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not valid TOML for
    /// this schema.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read configuration file")?;

        let config: TomlConfig =
            toml::from_str(&content).context("Failed to parse TOML configuration")?;

        let mut anthropic = config.anthropic;
        anthropic.api_key = present(anthropic.api_key);
        let mut google = config.google;
        google.access_token = present(google.access_token);
        google.project_id = present(google.project_id);
        let integrations = IntegrationsConfig {
            supabase_url: present(config.integrations.supabase_url),
            slack_token: present(config.integrations.slack_token),
        };

        Ok(Self {
            anthropic,
            server: config.server,
            integrations,
            google,
        })
    }

    /// Build configuration from a key lookup (normally the process environment)
    ///
    /// # Errors
    ///
    /// Returns error if a numeric variable is set but does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let anthropic = AnthropicConfig {
            api_key: present(lookup("ANTHROPIC_API_KEY")),
            base_url: present(lookup("ANTHROPIC_BASE_URL")).unwrap_or(defaults.anthropic.base_url),
            model: present(lookup("ANTHROPIC_MODEL")).unwrap_or(defaults.anthropic.model),
            max_tokens: parse_or(&lookup, "MAX_TOKENS", defaults.anthropic.max_tokens)?,
            request_timeout: parse_or(
                &lookup,
                "REQUEST_TIMEOUT",
                defaults.anthropic.request_timeout,
            )?,
        };

        let server = ServerConfig {
            host: present(lookup("HOST")).unwrap_or(defaults.server.host),
            port: parse_or(&lookup, "PORT", defaults.server.port)?,
            log_level: present(lookup("LOG_LEVEL")).unwrap_or(defaults.server.log_level),
        };

        let integrations = IntegrationsConfig {
            supabase_url: present(lookup("SUPABASE_URL")),
            slack_token: present(lookup("SLACK_TOKEN")),
        };

        let google = GoogleWorkspaceConfig {
            access_token: present(lookup("GOOGLE_ACCESS_TOKEN")),
            project_id: present(lookup("GOOGLE_CLOUD_PROJECT")),
            request_timeout: anthropic.request_timeout,
            ..defaults.google
        };

        Ok(Self {
            anthropic,
            server,
            integrations,
            google,
        })
    }

    /// Load configuration from the environment
    ///
    /// Reads `.env` when present, then uses the TOML file named by
    /// `CONFIG_PATH` if set, or plain environment variables otherwise.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        match present(std::env::var("CONFIG_PATH").ok()) {
            Some(path) => Self::from_file(path),
            None => Self::from_lookup(|key| std::env::var(key).ok()),
        }
    }

    /// Whether an LLM API key is available
    pub fn llm_configured(&self) -> bool {
        self.anthropic.api_key.is_some()
    }

    /// Whether the Google Workspace client has credentials
    pub fn google_configured(&self) -> bool {
        self.google.access_token.is_some()
    }

    /// Human-readable status of every integration
    pub fn integration_status(&self) -> IntegrationStatus {
        let optional = |configured: bool| {
            if configured {
                status::CONFIGURED
            } else {
                status::OPTIONAL
            }
        };

        IntegrationStatus {
            anthropic: if self.llm_configured() {
                status::CONFIGURED
            } else {
                status::MISSING
            },
            supabase: optional(self.integrations.supabase_url.is_some()),
            slack: optional(self.integrations.slack_token.is_some()),
            google_workspace: optional(self.google_configured()),
        }
    }
}
