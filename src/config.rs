//! Environment configuration

use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Configuration for the terminal client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the producer
    pub api_url: String,
    /// Print reasoning steps above the response
    pub show_reasoning: bool,
    /// Force-seal a turn after this long without data. Unset means wait forever.
    pub stall_timeout: Option<Duration>,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            show_reasoning: true,
            stall_timeout: None,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: std::env::var("AGENTWIRE_API_URL").unwrap_or(defaults.api_url),
            show_reasoning: env_bool("AGENTWIRE_SHOW_REASONING").unwrap_or(defaults.show_reasoning),
            stall_timeout: env_u64("AGENTWIRE_STALL_TIMEOUT_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            connect_timeout: env_u64("AGENTWIRE_CONNECT_TIMEOUT_SECS")
                .map_or(defaults.connect_timeout, Duration::from_secs),
        }
    }
}

/// Configuration for the demo producer
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    pub port: u16,
    /// Pause between streamed characters
    pub char_delay: Duration,
    /// Pause before each reasoning step
    pub step_delay: Duration,
    /// Send every event twice, as a flaky relay would
    pub redeliver: bool,
    /// Close the stream after this many characters, without `content_end`
    pub abort_after_chars: Option<usize>,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            char_delay: Duration::from_millis(10),
            step_delay: Duration::from_millis(200),
            redeliver: false,
            abort_after_chars: None,
        }
    }
}

impl ProducerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: std::env::var("AGENTWIRE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            char_delay: env_u64("AGENTWIRE_CHAR_DELAY_MS")
                .map_or(defaults.char_delay, Duration::from_millis),
            step_delay: env_u64("AGENTWIRE_STEP_DELAY_MS")
                .map_or(defaults.step_delay, Duration::from_millis),
            redeliver: env_bool("AGENTWIRE_REDELIVER").unwrap_or(defaults.redeliver),
            abort_after_chars: env_u64("AGENTWIRE_ABORT_AFTER_CHARS")
                .and_then(|n| usize::try_from(n).ok()),
        }
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn env_bool(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    parse_bool(&value)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
