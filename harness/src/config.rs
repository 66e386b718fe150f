//! Process-level configuration for the test harness.
//!
//! Credentials and API settings are read exactly once at startup, before any
//! test case is constructed, and then handed to each case explicitly.

use amatino::ApiConfig;
use serde::Deserialize;
use std::fmt;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const USER_ID_VAR: &str = "AMATINO_TEST_USER_ID";
pub const EMAIL_VAR: &str = "AMATINO_TEST_EMAIL";
pub const SECRET_VAR: &str = "AMATINO_TEST_SECRET";
pub const API_URL_VAR: &str = "AMATINO_API_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} env variable required")]
    MissingVariable { name: &'static str },

    #[error("{name} string must hold integer, got '{value}'")]
    InvalidUserId {
        name: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Invalid API configuration: {message}")]
    InvalidApiConfig { message: String },

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Login details for the account the suite runs as.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: i64,
    pub email: String,
    pub secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub credentials: Credentials,
    pub api: ApiConfig,
}

impl HarnessConfig {
    pub fn new(credentials: Credentials, api: ApiConfig) -> Self {
        Self { credentials, api }
    }

    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from any variable source. An empty email, secret
    /// or API url is treated as missing; an empty user id is not an integer.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| lookup(name).filter(|value| !value.trim().is_empty());

        let raw_user_id = lookup(USER_ID_VAR).ok_or(ConfigError::MissingVariable {
            name: USER_ID_VAR,
        })?;
        let user_id = raw_user_id
            .trim()
            .parse::<i64>()
            .map_err(|source| ConfigError::InvalidUserId {
                name: USER_ID_VAR,
                value: raw_user_id.clone(),
                source,
            })?;

        let email = read(EMAIL_VAR).ok_or(ConfigError::MissingVariable { name: EMAIL_VAR })?;
        let secret = read(SECRET_VAR).ok_or(ConfigError::MissingVariable { name: SECRET_VAR })?;

        let mut api = ApiConfig::default();
        if let Some(base_url) = read(API_URL_VAR) {
            api = api.with_base_url(base_url);
        }

        Ok(Self {
            credentials: Credentials {
                user_id,
                email,
                secret,
            },
            api,
        })
    }

    pub fn with_api(mut self, api: ApiConfig) -> Self {
        self.api = api;
        self
    }

    /// Apply command line overrides in order: TOML file, then explicit flags.
    /// The result is validated.
    pub fn with_overrides(self, overrides: &ConfigOverrides) -> ConfigResult<Self> {
        let mut api = match &overrides.file {
            Some(path) => load_api_config(path, self.api.clone())?,
            None => self.api.clone(),
        };
        if let Some(base_url) = &overrides.base_url {
            api = api.with_base_url(base_url.clone());
        }
        if let Some(timeout) = overrides.timeout {
            api = api.with_timeout(timeout);
        }

        let config = self.with_api(api);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.api
            .validate()
            .map_err(|message| ConfigError::InvalidApiConfig { message })
    }
}

/// API settings supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub file: Option<PathBuf>,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
}

/// Optional API overrides read from a TOML file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ApiConfigFile {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

/// Apply the settings in a TOML file on top of `base`. Keys absent from the
/// file keep the value from `base`.
pub fn load_api_config(path: &Path, base: ApiConfig) -> ConfigResult<ApiConfig> {
    let text = std::fs::read_to_string(path)?;
    let file: ApiConfigFile = toml::from_str(&text)?;

    let mut api = base;
    if let Some(base_url) = file.base_url {
        api = api.with_base_url(base_url);
    }
    if let Some(secs) = file.timeout_secs {
        api = api.with_timeout(Duration::from_secs(secs));
    }
    if let Some(user_agent) = file.user_agent {
        api = api.with_user_agent(user_agent);
    }

    api.validate()
        .map_err(|message| ConfigError::InvalidApiConfig { message })?;
    Ok(api)
}
