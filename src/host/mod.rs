//! Boundary to the proxy runtime.
//!
//! The chat core never owns players. Identity, permissions and delivery are
//! queried live through these traits every time they are needed.

pub mod local;

use std::sync::Arc;

use crate::common::types::{KeyRevision, PlayerId, CONSOLE_NAME};

pub use local::{LocalPlayer, LocalProxy};

/// A connected player as seen through the proxy.
pub trait ChatPlayer: Send + Sync {
    fn id(&self) -> PlayerId;

    /// Current display name.
    fn name(&self) -> String;

    /// Backend server the player is connected to, if any.
    fn server_name(&self) -> Option<String>;

    fn has_permission(&self, permission: &str) -> bool;

    /// Deliver a rendered chat line.
    fn send_message(&self, message: &str);

    /// Revision of the player's identified chat key, if the client sent one.
    fn key_revision(&self) -> Option<KeyRevision> {
        None
    }
}

/// Shared handle to a connected player.
pub type PlayerRef = Arc<dyn ChatPlayer>;

/// Player registry and console of the proxy.
pub trait ProxyHost: Send + Sync {
    fn online_players(&self) -> Vec<PlayerRef>;

    fn player(&self, id: PlayerId) -> Option<PlayerRef>;

    /// Look a player up by name, ignoring case.
    fn player_by_name(&self, name: &str) -> Option<PlayerRef>;

    /// Write a line to the operator console.
    fn console(&self, message: &str);
}

/// Who issued a command.
#[derive(Clone)]
pub enum CommandSource {
    Player(PlayerRef),
    Console,
}

impl CommandSource {
    pub fn player(&self) -> Option<&PlayerRef> {
        match self {
            Self::Player(player) => Some(player),
            Self::Console => None,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::Player(player) => player.name(),
            Self::Console => CONSOLE_NAME.to_string(),
        }
    }

    /// The console holds every permission.
    pub fn has_permission(&self, permission: &str) -> bool {
        match self {
            Self::Player(player) => player.has_permission(permission),
            Self::Console => true,
        }
    }

    pub fn send_message(&self, host: &dyn ProxyHost, message: &str) {
        match self {
            Self::Player(player) => player.send_message(message),
            Self::Console => host.console(message),
        }
    }
}

impl std::fmt::Debug for CommandSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Player(player) => f.debug_tuple("Player").field(&player.name()).finish(),
            Self::Console => f.write_str("Console"),
        }
    }
}
