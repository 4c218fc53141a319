//! Portal configuration loaded via OrthoConfig.
//!
//! [`Environment::functions_base_url`] follows the configured environment.
//! Notification deep links do not: they always use
//! [`notify_format::PRODUCTION_BASE_URL`] regardless of this setting.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::{JobCardOrigin, JobCardOriginError};

const DEFAULT_SESSION_FILE: &str = ".pr-portal/session.json";

/// Deployment the portal talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Base URL under which callable functions are exposed.
    pub fn functions_base_url(self) -> &'static str {
        match self {
            Self::Development => "http://127.0.0.1:5001/pr-system-dev/us-central1",
            Self::Staging => "https://us-central1-pr-system-staging.cloudfunctions.net",
            Self::Production => "https://us-central1-pr-system.cloudfunctions.net",
        }
    }
}

impl FromStr for Environment {
    type Err = SettingsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(SettingsError::UnknownEnvironment {
                value: raw.to_owned(),
            }),
        }
    }
}

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("unknown environment '{value}'; expected development, staging, or production")]
    UnknownEnvironment { value: String },
    #[error("invalid functions base URL '{value}': {message}")]
    InvalidFunctionsUrl { value: String, message: String },
    #[error(transparent)]
    InvalidJobCardOrigin(#[from] JobCardOriginError),
}

/// Settings shared by the portal binaries.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PR_PORTAL")]
pub struct PortalSettings {
    /// `development`, `staging`, or `production`.
    pub environment: Option<String>,
    /// Override for the callable functions base URL.
    pub functions_base_url: Option<String>,
    /// Override for the Job Card origin.
    pub job_card_origin: Option<String>,
    /// Timeout applied to every outbound request.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
    /// Path of the cached session file.
    pub session_file: Option<PathBuf>,
}

impl PortalSettings {
    /// Selected environment, defaulting to development.
    pub fn environment(&self) -> Result<Environment, SettingsError> {
        self.environment
            .as_deref()
            .map_or(Ok(Environment::default()), Environment::from_str)
    }

    /// Callable functions base URL: the override, else the environment's.
    pub fn functions_base_url(&self) -> Result<Url, SettingsError> {
        let raw = match self.functions_base_url.as_deref() {
            Some(value) => value.to_owned(),
            None => self.environment()?.functions_base_url().to_owned(),
        };
        Url::parse(&raw).map_err(|err| SettingsError::InvalidFunctionsUrl {
            value: raw.clone(),
            message: err.to_string(),
        })
    }

    /// Job Card origin: the override, else the default origin.
    pub fn job_card_origin(&self) -> Result<JobCardOrigin, SettingsError> {
        self.job_card_origin
            .as_deref()
            .map_or_else(|| Ok(JobCardOrigin::default()), JobCardOrigin::parse)
            .map_err(SettingsError::from)
    }

    /// Outbound request timeout, never shorter than one second.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Cached session file path.
    pub fn session_file(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE))
    }
}
