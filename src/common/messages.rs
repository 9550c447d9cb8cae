//! Catalogue of user-facing message keys.
//!
//! Every message the plugin sends back to a player or the console is looked
//! up under `messages.<key>` in the configuration. The default here is used
//! whenever the key is absent.

use crate::common::types::Channel;

/// A configurable message template and its built-in fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageKey {
    /// Key relative to the `messages` section (dotted for nested keys).
    pub key: &'static str,
    /// Template used when the configuration has no entry for `key`.
    pub default: &'static str,
}

impl MessageKey {
    const fn new(key: &'static str, default: &'static str) -> Self {
        Self { key, default }
    }
}

pub const NOT_STAFF: MessageKey =
    MessageKey::new("not-staff", "&cYou must have staff permissions to do that.");
pub const MUST_BE_PLAYER: MessageKey =
    MessageKey::new("must-be-player", "&cYou must be a player to use that command.");
pub const MESSAGE_NEEDED: MessageKey =
    MessageKey::new("message-needed", "&cYou must provide a message.");
pub const PLAYER_NOT_FOUND: MessageKey =
    MessageKey::new("player-not-found", "&cCould not find player named {target}.");

pub const CHANNEL_CURRENT: MessageKey =
    MessageKey::new("channel-current", "&7You are currently in {channel} chat.");
pub const CHANNEL_ALREADY: MessageKey =
    MessageKey::new("channel-already", "&eYou are already chatting in {channel} chat.");
pub const CHANNEL_LISTEN_ENABLED: MessageKey =
    MessageKey::new("channel-listen-enabled", "&aYou will now see {channel} chat.");
pub const CHANNEL_LISTEN_DISABLED: MessageKey =
    MessageKey::new("channel-listen-disabled", "&cYou will no longer see {channel} chat.");

const CHANNEL_SWITCHED_DEFAULT: &str = "&aYou are now talking in {channel} chat.";
pub const CHANNEL_SWITCHED_SERVER: MessageKey =
    MessageKey::new("channel-switched.server", CHANNEL_SWITCHED_DEFAULT);
pub const CHANNEL_SWITCHED_NETWORK: MessageKey =
    MessageKey::new("channel-switched.network", CHANNEL_SWITCHED_DEFAULT);
pub const CHANNEL_SWITCHED_STAFF: MessageKey =
    MessageKey::new("channel-switched.staff", CHANNEL_SWITCHED_DEFAULT);

pub const IGNORED_LIST: MessageKey =
    MessageKey::new("ignored-list", "&7You are ignoring: {list}");
pub const IGNORED_LIST_EMPTY: MessageKey =
    MessageKey::new("ignored-list-empty", "&7You are not ignoring anyone.");
pub const IGNORED_ADD: MessageKey =
    MessageKey::new("ignored-add", "&eYou are now ignoring {target}.");
pub const IGNORED_REMOVE: MessageKey =
    MessageKey::new("ignored-remove", "&eYou are no longer ignoring {target}.");
pub const IGNORED_YOU: MessageKey =
    MessageKey::new("ignored-you", "&c{target} is ignoring you.");
pub const CANNOT_IGNORE_SELF: MessageKey =
    MessageKey::new("cannot-ignore-self", "&cYou cannot ignore yourself.");
pub const CANNOT_IGNORE_STAFF: MessageKey =
    MessageKey::new("cannot-ignore-staff", "&cYou cannot ignore staff members.");
pub const CANNOT_MESSAGE_SELF: MessageKey =
    MessageKey::new("cannot-message-self", "&cYou cannot message yourself.");

pub const ALERT_SENT: MessageKey = MessageKey::new("alert-sent", "&aAlert sent to the network.");

pub const REPLY_NO_TARGET: MessageKey =
    MessageKey::new("reply-no-target", "&cNo one has messaged you yet.");
pub const REPLY_TARGET_OFFLINE: MessageKey =
    MessageKey::new("reply-target-offline", "&c{target} is no longer online.");

pub const SECURE_CHAT_RESTRICTED: MessageKey = MessageKey::new(
    "secure-chat-restricted",
    "&cSecure chat is enabled on this server, so chat channels are unavailable. You have been switched back to server chat.",
);

/// Confirmation sent after switching the speak channel to `channel`.
pub fn channel_switched(channel: Channel) -> MessageKey {
    match channel {
        Channel::Server => CHANNEL_SWITCHED_SERVER,
        Channel::Network => CHANNEL_SWITCHED_NETWORK,
        Channel::Staff => CHANNEL_SWITCHED_STAFF,
    }
}
