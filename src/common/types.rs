//! Shared types used across the application.

use std::fmt;

use uuid::Uuid;

/// Stable unique identifier for a player. Survives name changes.
pub type PlayerId = Uuid;

/// Permission node that unlocks the staff channel and alerts.
pub const STAFF_PERMISSION: &str = "proxychat.staff";

/// Name shown for messages sent from the proxy console.
pub const CONSOLE_NAME: &str = "Console";

/// A chat channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Chat local to the backend server the player is on.
    Server,
    /// Chat across every server behind the proxy.
    Network,
    /// Chat between players holding the staff permission.
    Staff,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Server, Channel::Network, Channel::Staff];

    /// Parse a channel from its key, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "server" => Some(Self::Server),
            "network" => Some(Self::Network),
            "staff" => Some(Self::Staff),
            _ => None,
        }
    }

    /// Lower-case key used in config and command arguments.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Network => "network",
            Self::Staff => "staff",
        }
    }

    /// Human readable name used in messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Server => "Server",
            Self::Network => "Network",
            Self::Staff => "Staff",
        }
    }

    /// Whether selecting or receiving this channel needs the staff permission.
    pub fn requires_staff(&self) -> bool {
        matches!(self, Self::Staff)
    }

    fn bit(&self) -> u8 {
        match self {
            Self::Server => 0b001,
            Self::Network => 0b010,
            Self::Staff => 0b100,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Compact set of channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelSet(u8);

impl ChannelSet {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn contains(&self, channel: Channel) -> bool {
        self.0 & channel.bit() != 0
    }

    pub fn insert(&mut self, channel: Channel) {
        self.0 |= channel.bit();
    }

    pub fn remove(&mut self, channel: Channel) {
        self.0 &= !channel.bit();
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Channel> + '_ {
        Channel::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

/// Revision of a player's identified chat signing key.
///
/// Ordered by protocol age; from `LinkedV2` (1.19.1) on, chat messages are
/// chained and signed so the proxy can no longer rewrite them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum KeyRevision {
    GenericV1,
    LinkedV2,
}

impl KeyRevision {
    /// Whether chat signed with this revision can still be rewritten.
    pub fn allows_interception(&self) -> bool {
        *self < Self::LinkedV2
    }
}

/// What the host should do with the original chat packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatVerdict {
    /// Let the original text through unmodified.
    Allowed,
    /// Drop the chat event.
    Denied,
    /// Replace the text with an empty message.
    Cleared,
}

impl ChatVerdict {
    pub fn is_suppressed(&self) -> bool {
        !matches!(self, Self::Allowed)
    }
}
