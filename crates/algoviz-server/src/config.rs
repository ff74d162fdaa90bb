//! Server configuration read from the environment.
//!
//! | variable | default |
//! |---|---|
//! | `ALGOVIZ_PORT` | 3000 |
//! | `ALGOVIZ_MAX_SESSIONS` | 256 |
//! | `ALGOVIZ_SESSION_TTL_SECS` | 1800 |
//!
//! Playback defaults come from [`PlaybackConfig`]. Invalid values are
//! logged and replaced by their defaults.

use std::time::Duration;

use algoviz_playback::PlaybackConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Live sessions allowed at once; creating one more is refused.
    pub max_sessions: usize,
    /// Sessions no request has touched for this long are dropped.
    pub session_ttl: Duration,
    pub playback: PlaybackConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: 3000,
            max_sessions: 256,
            session_ttl: Duration::from_secs(30 * 60),
            playback: PlaybackConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = ServerConfig::default();
        let positive = |key: &str, default: u64| match lookup(key) {
            None => default,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(n) if n > 0 => n,
                _ => {
                    tracing::warn!(key, value = %raw, "ignoring invalid setting");
                    default
                }
            },
        };

        let port = match lookup("ALGOVIZ_PORT") {
            None => defaults.port,
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
                tracing::warn!(key = "ALGOVIZ_PORT", value = %raw, "ignoring invalid setting");
                defaults.port
            }),
        };
        let max_sessions = positive("ALGOVIZ_MAX_SESSIONS", defaults.max_sessions as u64);
        let ttl = positive("ALGOVIZ_SESSION_TTL_SECS", defaults.session_ttl.as_secs());

        ServerConfig {
            port,
            max_sessions: usize::try_from(max_sessions).unwrap_or(usize::MAX),
            session_ttl: Duration::from_secs(ttl),
            playback: PlaybackConfig::from_lookup(&lookup),
        }
    }

    /// How often expired sessions are swept.
    pub fn reap_interval(&self) -> Duration {
        (self.session_ttl / 2).max(Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config(&[]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_sessions, 256);
        assert_eq!(config.session_ttl, Duration::from_secs(1800));
        assert_eq!(config.reap_interval(), Duration::from_secs(900));
    }

    #[test]
    fn reads_limits_and_playback_settings() {
        let config = config(&[
            ("ALGOVIZ_PORT", "8080"),
            ("ALGOVIZ_MAX_SESSIONS", "4"),
            ("ALGOVIZ_SESSION_TTL_SECS", " 60 "),
            ("ALGOVIZ_SPEED_MS", "250"),
        ]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_sessions, 4);
        assert_eq!(config.session_ttl, Duration::from_secs(60));
        assert_eq!(config.playback.default_speed, Duration::from_millis(250));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config(&[
            ("ALGOVIZ_PORT", "http"),
            ("ALGOVIZ_MAX_SESSIONS", "0"),
            ("ALGOVIZ_SESSION_TTL_SECS", "-5"),
        ]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_sessions, 256);
        assert_eq!(config.session_ttl, Duration::from_secs(1800));
    }

    #[test]
    fn short_ttl_sweeps_at_least_every_second() {
        let config = config(&[("ALGOVIZ_SESSION_TTL_SECS", "1")]);
        assert_eq!(config.reap_interval(), Duration::from_secs(1));
    }
}
