//! Per-player channel preferences.
//!
//! The staff permission is checked against the live player on every write
//! and on every listening read, never remembered in the record: a permission
//! revoked while the player is online must take effect immediately.

use dashmap::DashMap;
use tracing::debug;

use crate::common::error::{ChatError, ChatResult};
use crate::common::types::{Channel, ChannelSet, PlayerId, STAFF_PERMISSION};
use crate::host::ChatPlayer;

/// Channel state of one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub speak_channel: Channel,
    /// Channels received besides `Server`, which is always received.
    pub listening: ChannelSet,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            speak_channel: Channel::Server,
            listening: ChannelSet::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct PreferenceStore {
    entries: DashMap<PlayerId, Preferences>,
}

fn permitted(player: &dyn ChatPlayer, channel: Channel) -> bool {
    !channel.requires_staff() || player.has_permission(STAFF_PERMISSION)
}

impl PreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the configured default channel for a freshly connected player.
    pub fn initialize(&self, player: &dyn ChatPlayer, default: Channel) -> Channel {
        let applied = self.set_speak_channel_exclusive(player, default);
        debug!(player = %player.name(), channel = %applied, "initialized chat preferences");
        applied
    }

    pub fn speak_channel(&self, player: &dyn ChatPlayer) -> Channel {
        self.entries
            .get(&player.id())
            .map(|prefs| prefs.speak_channel)
            .unwrap_or(Channel::Server)
    }

    /// Copy of the stored record, if any.
    pub fn get(&self, id: PlayerId) -> Option<Preferences> {
        self.entries.get(&id).map(|prefs| *prefs)
    }

    /// Switch the speak channel and listen to that channel only.
    ///
    /// `Staff` without permission becomes `Server`. Returns the channel
    /// actually applied.
    pub fn set_speak_channel_exclusive(&self, player: &dyn ChatPlayer, channel: Channel) -> Channel {
        let applied = if permitted(player, channel) {
            channel
        } else {
            Channel::Server
        };

        let mut prefs = self.entries.entry(player.id()).or_default();
        prefs.speak_channel = applied;
        prefs.listening.clear();
        if applied != Channel::Server {
            prefs.listening.insert(applied);
        }
        applied
    }

    /// Start or stop receiving `channel`.
    ///
    /// Disabling the channel the player speaks in moves them back to `Server`.
    pub fn set_listening(
        &self,
        player: &dyn ChatPlayer,
        channel: Channel,
        enable: bool,
    ) -> ChatResult<()> {
        if channel == Channel::Server {
            return Ok(());
        }
        if !permitted(player, channel) {
            return Err(ChatError::PermissionDenied);
        }

        let mut prefs = self.entries.entry(player.id()).or_default();
        if enable {
            prefs.listening.insert(channel);
        } else {
            prefs.listening.remove(channel);
            if prefs.speak_channel == channel {
                prefs.speak_channel = Channel::Server;
            }
        }
        Ok(())
    }

    /// Flip listening on `channel`, returning the new state.
    pub fn toggle_listening(&self, player: &dyn ChatPlayer, channel: Channel) -> ChatResult<bool> {
        if channel == Channel::Server {
            return Ok(true);
        }
        let enable = !self.is_listening(player, channel);
        self.set_listening(player, channel, enable)?;
        Ok(enable)
    }

    pub fn is_listening(&self, player: &dyn ChatPlayer, channel: Channel) -> bool {
        if channel == Channel::Server {
            return true;
        }
        if !permitted(player, channel) {
            return false;
        }
        self.entries
            .get(&player.id())
            .map(|prefs| prefs.listening.contains(channel))
            .unwrap_or(false)
    }

    pub fn remove(&self, id: PlayerId) {
        self.entries.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
