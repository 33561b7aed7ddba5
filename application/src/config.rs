//! [`Config`]-related definitions.

use std::time;

use common::{
    datetime::{self, ParseError},
    TimeZone,
};
use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use smart_default::SmartDefault;

use crate::cookie::SessionCookie;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: Server,

    /// Upstream authentication API configuration.
    pub api: Api,

    /// Session cookie configuration.
    pub session: Session,

    /// Calendar configuration.
    pub calendar: Calendar,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8080)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Upstream authentication API configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Api {
    /// Base URL of the upstream authentication API.
    #[default("http://127.0.0.1:3001".to_owned())]
    pub base_url: String,

    /// Timeout of a single upstream request.
    #[default(time::Duration::from_secs(10))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,
}

impl From<Api> for service::infra::http::Config {
    fn from(value: Api) -> Self {
        let Api { base_url, timeout } = value;
        Self { base_url, timeout }
    }
}

/// Session cookie configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Session {
    /// Indicator whether the session cookie is sent over HTTPS only.
    pub cookie_secure: bool,

    /// Lifetime of an issued session cookie.
    #[default(time::Duration::from_secs(7 * 24 * 60 * 60))]
    #[serde(with = "humantime_serde")]
    pub cookie_max_age: time::Duration,
}

impl From<Session> for SessionCookie {
    fn from(value: Session) -> Self {
        let Session {
            cookie_secure,
            cookie_max_age,
        } = value;
        Self {
            secure: cookie_secure,
            max_age: cookie_max_age,
        }
    }
}

/// Calendar configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Calendar {
    /// [IANA] identifier of the time zone, following its daylight saving
    /// rules.
    ///
    /// Resolved from the environment if not specified.
    ///
    /// [IANA]: https://www.iana.org/time-zones
    pub time_zone: Option<String>,

    /// Fixed UTC offset in the `+HH:MM` notation, used all year round instead
    /// of the `time_zone` rules.
    pub utc_offset: Option<String>,
}

impl Calendar {
    /// Resolves the [`TimeZone`] described by this [`Calendar`].
    ///
    /// Falls back to the [`TimeZone::local()`] one if nothing is configured,
    /// so this should be called before any runtime is started.
    ///
    /// # Errors
    ///
    /// If the configured `utc_offset` is invalid, or the configured
    /// `time_zone` is unknown.
    pub fn time_zone(&self) -> Result<TimeZone, ParseError> {
        let name = self
            .time_zone
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());

        if let Some(offset) = self.utc_offset.as_deref() {
            let offset = datetime::parse_utc_offset(offset)?;
            let name = name.map_or_else(
                || datetime::offset_name(offset),
                ToOwned::to_owned,
            );
            return Ok(TimeZone::fixed(name, offset));
        }

        match name {
            Some(name) => {
                TimeZone::named(name).ok_or(ParseError::UnknownTimeZone)
            }
            None => Ok(TimeZone::local()),
        }
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
