//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use crate::assistant::{EngineKind, SurfaceProfile};
use crate::chat::SurfaceSettings;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Assistant configuration
    pub assistant: AssistantConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Assistant configuration
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Delay before the FAQ assistant replies (milliseconds)
    pub faq_reply_delay_ms: u64,
    /// Delay before the support assistant replies (milliseconds)
    pub support_reply_delay_ms: u64,
    /// Maximum number of concurrently registered sessions
    pub max_sessions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 8080,
                host: "0.0.0.0".to_string(),
            },
            assistant: AssistantConfig {
                faq_reply_delay_ms: 1000,
                support_reply_delay_ms: 500,
                max_sessions: 1000,
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server: ServerConfig {
                port: env_or("PORT", defaults.server.port),
                host: env::var("HOST").unwrap_or(defaults.server.host),
            },
            assistant: AssistantConfig {
                faq_reply_delay_ms: env_or(
                    "FAQ_REPLY_DELAY_MS",
                    defaults.assistant.faq_reply_delay_ms,
                ),
                support_reply_delay_ms: env_or(
                    "SUPPORT_REPLY_DELAY_MS",
                    defaults.assistant.support_reply_delay_ms,
                ),
                max_sessions: env_or("MAX_SESSIONS", defaults.assistant.max_sessions),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Per-engine surfaces with the configured delays
    pub fn surfaces(&self) -> SurfaceSettings {
        SurfaceSettings {
            faq: SurfaceProfile {
                reply_delay: Duration::from_millis(self.assistant.faq_reply_delay_ms),
                ..EngineKind::Faq.default_surface()
            },
            support: SurfaceProfile {
                reply_delay: Duration::from_millis(self.assistant.support_reply_delay_ms),
                ..EngineKind::Support.default_surface()
            },
        }
    }
}

// Unset or unparsable values fall back to the default.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 5] = [
        "PORT",
        "HOST",
        "FAQ_REPLY_DELAY_MS",
        "SUPPORT_REPLY_DELAY_MS",
        "MAX_SESSIONS",
    ];

    fn clear_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.assistant.faq_reply_delay_ms, 1000);
        assert_eq!(config.assistant.support_reply_delay_ms, 500);
        assert_eq!(config.assistant.max_sessions, 1000);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var("PORT", "9000");
        env::set_var("HOST", "127.0.0.1");
        env::set_var("SUPPORT_REPLY_DELAY_MS", "50");
        let config = Config::from_env();
        clear_env();

        assert_eq!(config.server_addr(), "127.0.0.1:9000");
        assert_eq!(
            config.surfaces().support.reply_delay,
            Duration::from_millis(50)
        );
        assert_eq!(
            config.surfaces().faq.reply_delay,
            Duration::from_millis(1000)
        );
    }

    #[test]
    #[serial]
    fn test_unparsable_values_fall_back() {
        clear_env();
        env::set_var("PORT", "not-a-port");
        env::set_var("FAQ_REPLY_DELAY_MS", "-5");
        let config = Config::from_env();
        clear_env();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.assistant.faq_reply_delay_ms, 1000);
    }

    #[test]
    fn test_surfaces_keep_submit_policy() {
        let surfaces = Config::default().surfaces();
        assert_eq!(
            surfaces.faq.submit_policy,
            EngineKind::Faq.default_surface().submit_policy
        );
        assert_eq!(
            surfaces.support.submit_policy,
            EngineKind::Support.default_surface().submit_policy
        );
    }
}
