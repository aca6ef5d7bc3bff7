//! Configuration types for orders-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Default service root; the orders API lives under `/orders/v2`
pub const DEFAULT_BASE_URL: &str = "https://api.planet.com/compute/ops";

/// Main configuration for [`OrdersClient`](crate::OrdersClient)
///
/// Fields are organized into logical sub-configs:
/// - [`wait`](WaitOptions) - polling delay and attempt budget
/// - [`download`](DownloadOptions) - destination, overwrite policy, concurrency and retries
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Service root URL (default: [`DEFAULT_BASE_URL`])
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Deadline for a whole API call: create, get, list page, cancel (default: 60 seconds)
    ///
    /// Artifact transfers are not bound by it; see [`stall_timeout`](Self::stall_timeout).
    #[serde(default = "default_request_timeout", with = "optional_duration_serde")]
    pub request_timeout: Option<Duration>,

    /// Time allowed to establish a connection (default: 30 seconds)
    #[serde(default = "default_connect_timeout", with = "optional_duration_serde")]
    pub connect_timeout: Option<Duration>,

    /// Longest an artifact transfer may go without receiving data (default: 60 seconds)
    ///
    /// A transfer that keeps making progress is never cut off, however long it runs.
    #[serde(default = "default_stall_timeout", with = "optional_duration_serde")]
    pub stall_timeout: Option<Duration>,

    /// Polling behaviour for `wait`
    #[serde(default)]
    pub wait: WaitOptions,

    /// Download behaviour
    #[serde(default)]
    pub download: DownloadOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
            stall_timeout: default_stall_timeout(),
            wait: WaitOptions::default(),
            download: DownloadOptions::default(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration pointing at a different service root
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Check settings that would otherwise fail late
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url).map_err(|e| Error::Config {
            message: format!("invalid base URL '{}': {}", self.base_url, e),
            key: Some("base_url".to_string()),
        })?;

        if self.download.max_concurrent_downloads == 0 {
            return Err(Error::Config {
                message: "max_concurrent_downloads must be at least 1".to_string(),
                key: Some("download.max_concurrent_downloads".to_string()),
            });
        }

        Ok(())
    }
}

/// Polling configuration for waiting on an order
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WaitOptions {
    /// Time between polls, measured from the start of each fetch (default: 5 seconds)
    #[serde(default = "default_wait_delay", with = "duration_serde")]
    pub delay: Duration,

    /// Maximum number of polls (default: 0 = unlimited)
    #[serde(default = "default_wait_max_attempts")]
    pub max_attempts: u32,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            delay: default_wait_delay(),
            max_attempts: default_wait_max_attempts(),
        }
    }
}

/// Download behaviour for an order's artifacts
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadOptions {
    /// Destination directory (default: current working directory)
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Replace files that already exist at the destination (default: false)
    #[serde(default)]
    pub overwrite: bool,

    /// Maximum artifact transfers in flight (default: 4)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_downloads: usize,

    /// Retry policy for transient artifact failures
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            overwrite: false,
            max_concurrent_downloads: default_max_concurrent(),
            retry: RetryConfig::default(),
        }
    }
}

impl DownloadOptions {
    /// Download into `directory` with default settings
    pub fn into_dir(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Default::default()
        }
    }

    /// Set the overwrite policy
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// Retry configuration for transient failures
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 3)
    #[serde(default = "default_max_retries")]
    pub max_attempts: u32,

    /// Initial delay before first retry (default: 1 second)
    #[serde(default = "default_initial_delay", with = "duration_serde")]
    pub initial_delay: Duration,

    /// Maximum delay between retries (default: 30 seconds)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_retries(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// A policy that never retries
    pub fn disabled() -> Self {
        Self {
            max_attempts: 0,
            ..Default::default()
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> Option<Duration> {
    Some(Duration::from_secs(60))
}

fn default_connect_timeout() -> Option<Duration> {
    Some(Duration::from_secs(30))
}

fn default_stall_timeout() -> Option<Duration> {
    Some(Duration::from_secs(60))
}

fn default_wait_delay() -> Duration {
    Duration::from_secs(5)
}

fn default_wait_max_attempts() -> u32 {
    0
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_max_concurrent() -> usize {
    4
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(30)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_true() -> bool {
    true
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
