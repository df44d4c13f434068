// Storefront configuration
//
// Where the application under test lives and how the browser is driven.
// Values come from defaults, STOREFRONT_* environment variables, or JSON.

use crate::driver::{DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT, WaitPolicy};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Browser engine to launch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl FromStr for BrowserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" | "safari" => Ok(BrowserKind::Webkit),
            other => Err(Error::Config {
                key: "browser".into(),
                message: format!("unknown browser '{other}' (expected chromium, firefox or webkit)"),
            }),
        }
    }
}

/// Configuration for a storefront test session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorefrontConfig {
    /// Root of the application; page routes are joined onto it
    pub base_url: Url,
    pub browser: BrowserKind,
    pub headless: bool,
    /// Upper bound for polled waits and navigation
    #[serde(with = "millis")]
    pub timeout: Duration,
    #[serde(with = "millis")]
    pub poll_interval: Duration,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            browser: BrowserKind::default(),
            headless: true,
            timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl StorefrontConfig {
    /// Creates a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `STOREFRONT_*` environment variables on top of the defaults.
    ///
    /// Recognised variables: `STOREFRONT_BASE_URL`, `STOREFRONT_BROWSER`,
    /// `STOREFRONT_HEADLESS`, `STOREFRONT_TIMEOUT_MS`, `STOREFRONT_POLL_MS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parses a JSON document; missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config {
            key: "json".into(),
            message: e.to_string(),
        })
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup("STOREFRONT_BASE_URL") {
            config = config.base_url(&value)?;
        }
        if let Some(value) = lookup("STOREFRONT_BROWSER") {
            config.browser = value.parse()?;
        }
        if let Some(value) = lookup("STOREFRONT_HEADLESS") {
            config.headless = parse_bool("STOREFRONT_HEADLESS", &value)?;
        }
        if let Some(value) = lookup("STOREFRONT_TIMEOUT_MS") {
            config.timeout = parse_millis("STOREFRONT_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = lookup("STOREFRONT_POLL_MS") {
            config.poll_interval = parse_millis("STOREFRONT_POLL_MS", &value)?;
        }

        Ok(config)
    }

    /// Sets the base URL
    pub fn base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = Url::parse(base_url).map_err(|e| Error::Config {
            key: "base_url".into(),
            message: format!("'{base_url}': {e}"),
        })?;
        Ok(self)
    }

    /// Sets the browser engine
    pub fn browser(mut self, browser: BrowserKind) -> Self {
        self.browser = browser;
        self
    }

    /// Run in headless mode
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Sets the wait timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the polling interval
    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy::new(self.timeout, self.poll_interval)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Config {
            key: key.into(),
            message: format!("expected a boolean, got '{other}'"),
        }),
    }
}

fn parse_millis(key: &str, value: &str) -> Result<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| Error::Config {
            key: key.into(),
            message: format!("'{value}': {e}"),
        })
}

mod millis {
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(duration.as_millis())
            .map_err(|_| S::Error::custom(format!("{duration:?} does not fit in u64 milliseconds")))?;
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
