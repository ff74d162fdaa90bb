//! Playback configuration from the environment.
//!
//! | variable | default |
//! |---|---|
//! | `ALGOVIZ_SPEED_MS` | 1000 |
//! | `ALGOVIZ_REMOTE_URL` | unset (local generation only) |
//! | `ALGOVIZ_REMOTE_TIMEOUT_MS` | 5000 |

use std::time::Duration;

pub const DEFAULT_SPEED: Duration = Duration::from_millis(1000);
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// Tick interval for new sessions.
    pub default_speed: Duration,
    /// Base URL of the remote step generator, if any.
    pub remote_url: Option<String>,
    pub remote_timeout: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            default_speed: DEFAULT_SPEED,
            remote_url: None,
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }
}

impl PlaybackConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source. Unparsable or
    /// zero durations keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = PlaybackConfig::default();
        let millis = |key: &str, default: Duration| match lookup(key) {
            None => default,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => {
                    tracing::warn!(key, value = %raw, "ignoring invalid duration");
                    default
                }
            },
        };

        PlaybackConfig {
            default_speed: millis("ALGOVIZ_SPEED_MS", defaults.default_speed),
            remote_url: lookup("ALGOVIZ_REMOTE_URL").filter(|url| !url.trim().is_empty()),
            remote_timeout: millis("ALGOVIZ_REMOTE_TIMEOUT_MS", defaults.remote_timeout),
        }
    }
}
