//! One-directional ignore lists.

use dashmap::DashMap;

use crate::common::types::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq)]
struct IgnoredPlayer {
    id: PlayerId,
    /// Name at the time the player was ignored.
    name: String,
}

#[derive(Debug, Default)]
pub struct IgnoreStore {
    lists: DashMap<PlayerId, Vec<IgnoredPlayer>>,
}

impl IgnoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip whether `owner` ignores `target`. Returns `true` if now ignoring.
    pub fn toggle(&self, owner: PlayerId, target: PlayerId, target_name: &str) -> bool {
        let mut list = self.lists.entry(owner).or_default();
        if let Some(pos) = list.iter().position(|entry| entry.id == target) {
            list.remove(pos);
            false
        } else {
            list.push(IgnoredPlayer {
                id: target,
                name: target_name.to_string(),
            });
            true
        }
    }

    pub fn is_ignoring(&self, owner: PlayerId, target: PlayerId) -> bool {
        self.lists
            .get(&owner)
            .map(|list| list.iter().any(|entry| entry.id == target))
            .unwrap_or(false)
    }

    /// Names of ignored players in the order they were ignored.
    pub fn ignored_names(&self, owner: PlayerId) -> Vec<String> {
        self.lists
            .get(&owner)
            .map(|list| list.iter().map(|entry| entry.name.clone()).collect())
            .unwrap_or_default()
    }

    pub fn remove(&self, owner: PlayerId) {
        self.lists.remove(&owner);
    }
}
