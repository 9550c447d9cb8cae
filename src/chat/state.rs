//! Per-player chat state, keyed by player id.

use crate::chat::conversation::ConversationTracker;
use crate::chat::ignore::IgnoreStore;
use crate::chat::preferences::PreferenceStore;
use crate::common::types::PlayerId;

/// All in-memory state the plugin keeps. Nothing here outlives the process.
#[derive(Debug, Default)]
pub struct ChatState {
    pub preferences: PreferenceStore,
    pub ignores: IgnoreStore,
    pub conversations: ConversationTracker,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything owned by a player that left, and every reply
    /// pointer naming them.
    pub fn forget(&self, id: PlayerId) {
        self.preferences.remove(id);
        self.ignores.remove(id);
        self.conversations.clear(id);
        self.conversations.forget_partner(id);
    }
}
