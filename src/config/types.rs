//! Configuration type definitions.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::chat::formatter::{FormatContext, MessageFormatter};
use crate::common::messages::MessageKey;
use crate::common::types::Channel;

pub const DEFAULT_NETWORK_PREFIX: &str = "&b[Network]";
pub const DEFAULT_STAFF_PREFIX: &str = "&c[Staff]";
pub const DEFAULT_SERVER_FORMAT: &str = "{player}: {message}";
pub const DEFAULT_CHANNEL_FORMAT: &str = "{prefix} {player}: {message}";
pub const DEFAULT_ALERT_PREFIX: &str = "&4[Alert]";
pub const DEFAULT_ALERT_FORMAT: &str = "{prefix} {message}";
pub const DEFAULT_PRIVATE_SEND_FORMAT: &str = "&d[To {target}] {message}";
pub const DEFAULT_PRIVATE_RECEIVE_FORMAT: &str = "&d[From {sender}] {message}";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub channels: ChannelsConfig,
    pub private_messages: PrivateMessagesConfig,
    pub settings: SettingsConfig,
    /// Message templates keyed by dotted path below `messages`.
    #[serde(deserialize_with = "flatten_messages")]
    pub messages: HashMap<String, String>,
}

/// Channel selection and templates.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ChannelsConfig {
    /// Channel assigned on connect: "server", "network" or "staff".
    pub default: String,
    pub prefixes: ChannelPrefixes,
    pub formats: ChannelFormats,
    pub alert: AlertConfig,
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            default: Channel::Server.key().to_string(),
            prefixes: ChannelPrefixes::default(),
            formats: ChannelFormats::default(),
            alert: AlertConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChannelPrefixes {
    pub network: String,
    pub staff: String,
}

impl Default for ChannelPrefixes {
    fn default() -> Self {
        Self {
            network: DEFAULT_NETWORK_PREFIX.to_string(),
            staff: DEFAULT_STAFF_PREFIX.to_string(),
        }
    }
}

/// Chat line templates. Placeholders: `{prefix}`, `{player}`, `{message}`, `{server}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChannelFormats {
    pub server: String,
    pub network: String,
    pub staff: String,
}

impl Default for ChannelFormats {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER_FORMAT.to_string(),
            network: DEFAULT_CHANNEL_FORMAT.to_string(),
            staff: DEFAULT_CHANNEL_FORMAT.to_string(),
        }
    }
}

/// Alert template. Placeholders: `{prefix}`, `{message}`, `{sender}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub prefix: String,
    pub format: String,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_ALERT_PREFIX.to_string(),
            format: DEFAULT_ALERT_FORMAT.to_string(),
        }
    }
}

/// Private message templates. Placeholders: `{sender}`, `{target}`, `{message}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PrivateMessagesConfig {
    pub send: String,
    pub receive: String,
}

impl Default for PrivateMessagesConfig {
    fn default() -> Self {
        Self {
            send: DEFAULT_PRIVATE_SEND_FORMAT.to_string(),
            receive: DEFAULT_PRIVATE_RECEIVE_FORMAT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SettingsConfig {
    /// Always treat chat as interceptable, and drop (rather than blank) suppressed chat.
    #[serde(deserialize_with = "lenient_bool")]
    pub force_channel_intercept: bool,
}

impl Config {
    /// Channel assigned on connect. Unknown names mean `Server`.
    pub fn default_channel(&self) -> Channel {
        Channel::from_name(&self.channels.default).unwrap_or(Channel::Server)
    }

    pub fn prefix(&self, channel: Channel) -> &str {
        match channel {
            Channel::Server => "",
            Channel::Network => &self.channels.prefixes.network,
            Channel::Staff => &self.channels.prefixes.staff,
        }
    }

    pub fn format(&self, channel: Channel) -> &str {
        match channel {
            Channel::Server => &self.channels.formats.server,
            Channel::Network => &self.channels.formats.network,
            Channel::Staff => &self.channels.formats.staff,
        }
    }

    /// Template for `key`, or its built-in default.
    pub fn message(&self, key: MessageKey) -> &str {
        self.messages
            .get(key.key)
            .map(String::as_str)
            .unwrap_or(key.default)
    }

    /// Render the template for `key` with the given placeholders.
    pub fn render(&self, key: MessageKey, placeholders: &[(&str, String)]) -> String {
        let ctx = placeholders
            .iter()
            .fold(FormatContext::new(), |ctx, (name, value)| {
                ctx.with(*name, value.as_str())
            });
        MessageFormatter::new(self.message(key)).format(&ctx)
    }
}

/// Collapse the nested `messages` tree into `a.b.c` keys.
fn flatten_messages<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let mut out = HashMap::new();
    flatten_into(None, &value, &mut out);
    Ok(out)
}

fn flatten_into(prefix: Option<&str>, value: &Value, out: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = match prefix {
                    Some(prefix) => format!("{}.{}", prefix, key),
                    None => key.clone(),
                };
                flatten_into(Some(&path), child, out);
            }
        }
        Value::Null => {}
        leaf => {
            if let Some(key) = prefix {
                let text = match leaf {
                    Value::String(s) => s.clone(),
                    Value::Array(lines) => lines
                        .iter()
                        .map(|line| match line {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect::<Vec<_>>()
                        .join("\n"),
                    other => other.to_string(),
                };
                out.insert(key.to_string(), text);
            }
        }
    }
}

/// Accept both `true` and `"true"`.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}
