//! Configuration validation.
//!
//! Validates configuration values and provides helpful error messages.

use crate::common::error::ConfigError;
use crate::common::types::Channel;
use crate::config::types::Config;

const MESSAGE_PLACEHOLDER: &str = "{message}";

/// Validate a configuration and return detailed errors.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    let templates = [
        ("channels.formats.server", &config.channels.formats.server),
        ("channels.formats.network", &config.channels.formats.network),
        ("channels.formats.staff", &config.channels.formats.staff),
        ("channels.alert.format", &config.channels.alert.format),
        ("private-messages.send", &config.private_messages.send),
        ("private-messages.receive", &config.private_messages.receive),
    ];

    for (path, template) in templates {
        if template.trim().is_empty() {
            errors.push(format!("{} must not be empty", path));
        } else if !template.contains(MESSAGE_PLACEHOLDER) {
            errors.push(format!(
                "{} must contain {} (got '{}')",
                path, MESSAGE_PLACEHOLDER, template
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            message: errors.join("\n"),
        })
    }
}

/// Non-fatal problems worth logging.
pub fn config_warnings(config: &Config) -> Vec<String> {
    let mut warnings = Vec::new();

    if Channel::from_name(&config.channels.default).is_none() {
        warnings.push(format!(
            "channels.default '{}' is not a channel, using server",
            config.channels.default
        ));
    }
    if config.default_channel() == Channel::Staff {
        warnings.push(
            "channels.default is staff; players without the staff permission get server"
                .to_string(),
        );
    }

    warnings
}
