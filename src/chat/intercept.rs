//! Whether a player's chat can be taken over by the proxy.
//!
//! Clients from 1.19.1 on sign chat in a linked chain; once the proxy drops or
//! rewrites one message the backend rejects the rest. Channel chat therefore
//! only works for players without a linked key, unless the operator forces
//! interception (backends running with `enforce-secure-profile=false`).

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::warn;

use crate::chat::preferences::PreferenceStore;
use crate::common::messages;
use crate::common::types::{Channel, ChatVerdict};
use crate::config::Config;
use crate::host::ChatPlayer;

#[derive(Debug, Default)]
pub struct InterceptPolicy {
    warned: AtomicBool,
}

impl InterceptPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_intercept(&self, player: &dyn ChatPlayer, force: bool) -> bool {
        if force {
            return true;
        }
        player
            .key_revision()
            .map(|revision| revision.allows_interception())
            .unwrap_or(true)
    }

    /// How to swallow the original chat event.
    pub fn suppress_verdict(force: bool) -> ChatVerdict {
        if force {
            ChatVerdict::Denied
        } else {
            ChatVerdict::Cleared
        }
    }

    /// Send a player whose chat cannot be intercepted back to server chat.
    pub fn restrict(&self, player: &dyn ChatPlayer, preferences: &PreferenceStore, config: &Config) {
        preferences.set_speak_channel_exclusive(player, Channel::Server);
        player.send_message(&config.render(messages::SECURE_CHAT_RESTRICTED, &[]));

        if !self.warned.swap(true, Ordering::Relaxed) {
            warn!(
                "Cannot intercept chat while secure chat is enforced (Minecraft 1.19.1+). \
                 Set enforce-secure-profile=false on backend servers to allow channel switching."
            );
        }
    }

    /// Whether the operator warning has been logged.
    pub fn warned(&self) -> bool {
        self.warned.load(Ordering::Relaxed)
    }
}
