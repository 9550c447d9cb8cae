//! Environment variable overrides for configuration.
//!
//! Supports overriding config values with environment variables:
//! - `PROXYCHAT_CONFIG` - Path of the config file
//! - `PROXYCHAT_DEFAULT_CHANNEL` - Channel assigned on connect
//! - `PROXYCHAT_FORCE_CHANNEL_INTERCEPT` - Force chat interception (`true`/`false`)

use std::env;

use crate::common::types::Channel;
use crate::config::types::Config;

/// Environment variable prefix for all config overrides.
const ENV_PREFIX: &str = "PROXYCHAT";

/// Apply environment variable overrides to a config.
pub fn apply_env_overrides(config: Config) -> Config {
    apply_overrides(config, |name| env::var(name).ok())
}

/// Apply overrides read through `lookup`, keyed by full variable name.
pub fn apply_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(channel) = lookup(&format!("{}_DEFAULT_CHANNEL", ENV_PREFIX)) {
        if Channel::from_name(&channel).is_some() {
            config.channels.default = channel.trim().to_lowercase();
        } else {
            tracing::warn!(
                "Ignoring {}_DEFAULT_CHANNEL='{}': not a channel",
                ENV_PREFIX,
                channel
            );
        }
    }

    if let Some(force) = lookup(&format!("{}_FORCE_CHANNEL_INTERCEPT", ENV_PREFIX)) {
        match force.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => config.settings.force_channel_intercept = true,
            "false" | "0" | "no" => config.settings.force_channel_intercept = false,
            other => tracing::warn!(
                "Ignoring {}_FORCE_CHANNEL_INTERCEPT='{}': expected true or false",
                ENV_PREFIX,
                other
            ),
        }
    }

    config
}

/// Get the config file path from environment or use default.
///
/// Checks `PROXYCHAT_CONFIG` environment variable, otherwise returns "proxychat.conf".
pub fn get_config_path() -> String {
    env::var(format!("{}_CONFIG", ENV_PREFIX)).unwrap_or_else(|_| "proxychat.conf".to_string())
}
