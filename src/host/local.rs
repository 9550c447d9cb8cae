//! In-memory proxy used by the console driver and by tests.
//!
//! Delivered lines are kept in per-player inboxes and a console log so they
//! can be inspected after the fact.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::common::types::{KeyRevision, PlayerId};
use crate::host::{ChatPlayer, PlayerRef, ProxyHost};

/// Offline-mode style id derived from the player name.
pub fn offline_id(name: &str) -> PlayerId {
    let seed = format!("OfflinePlayer:{}", name.to_lowercase());
    Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes())
}

#[derive(Debug)]
pub struct LocalPlayer {
    id: PlayerId,
    name: String,
    server: RwLock<Option<String>>,
    permissions: RwLock<HashSet<String>>,
    key_revision: RwLock<Option<KeyRevision>>,
    inbox: Mutex<Vec<String>>,
}

impl LocalPlayer {
    pub fn new(name: impl Into<String>, server: Option<&str>) -> Self {
        let name = name.into();
        Self::with_id(offline_id(&name), name, server)
    }

    pub fn with_id(id: PlayerId, name: impl Into<String>, server: Option<&str>) -> Self {
        Self {
            id,
            name: name.into(),
            server: RwLock::new(server.map(str::to_string)),
            permissions: RwLock::new(HashSet::new()),
            key_revision: RwLock::new(None),
            inbox: Mutex::new(Vec::new()),
        }
    }

    pub fn grant(&self, permission: &str) {
        self.permissions.write().insert(permission.to_string());
    }

    pub fn revoke(&self, permission: &str) {
        self.permissions.write().remove(permission);
    }

    pub fn set_server(&self, server: Option<&str>) {
        *self.server.write() = server.map(str::to_string);
    }

    pub fn set_key_revision(&self, revision: Option<KeyRevision>) {
        *self.key_revision.write() = revision;
    }

    /// Everything delivered so far.
    pub fn inbox(&self) -> Vec<String> {
        self.inbox.lock().clone()
    }

    /// Drain the inbox.
    pub fn take_inbox(&self) -> Vec<String> {
        std::mem::take(&mut *self.inbox.lock())
    }

    pub fn last_message(&self) -> Option<String> {
        self.inbox.lock().last().cloned()
    }
}

impl ChatPlayer for LocalPlayer {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn server_name(&self) -> Option<String> {
        self.server.read().clone()
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.permissions.read().contains(permission)
    }

    fn send_message(&self, message: &str) {
        debug!(player = %self.name, "deliver: {}", message);
        self.inbox.lock().push(message.to_string());
    }

    fn key_revision(&self) -> Option<KeyRevision> {
        *self.key_revision.read()
    }
}

#[derive(Debug, Default)]
pub struct LocalProxy {
    players: DashMap<PlayerId, Arc<LocalPlayer>>,
    console: Mutex<Vec<String>>,
}

impl LocalProxy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a player as online. Replaces any session with the same id.
    pub fn connect(&self, player: LocalPlayer) -> Arc<LocalPlayer> {
        let player = Arc::new(player);
        self.players.insert(player.id, Arc::clone(&player));
        player
    }

    pub fn disconnect(&self, id: PlayerId) -> Option<Arc<LocalPlayer>> {
        self.players.remove(&id).map(|(_, player)| player)
    }

    /// Concrete handle for a connected player, by name ignoring case.
    pub fn local_player(&self, name: &str) -> Option<Arc<LocalPlayer>> {
        self.players
            .iter()
            .find(|entry| entry.value().name.eq_ignore_ascii_case(name))
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Concrete handles for every connected player.
    pub fn local_players(&self) -> Vec<Arc<LocalPlayer>> {
        self.players
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    pub fn console_log(&self) -> Vec<String> {
        self.console.lock().clone()
    }

    pub fn take_console(&self) -> Vec<String> {
        std::mem::take(&mut *self.console.lock())
    }

    pub fn online_count(&self) -> usize {
        self.players.len()
    }
}

impl ProxyHost for LocalProxy {
    fn online_players(&self) -> Vec<PlayerRef> {
        self.players
            .iter()
            .map(|entry| Arc::clone(entry.value()) as PlayerRef)
            .collect()
    }

    fn player(&self, id: PlayerId) -> Option<PlayerRef> {
        self.players
            .get(&id)
            .map(|entry| Arc::clone(entry.value()) as PlayerRef)
    }

    fn player_by_name(&self, name: &str) -> Option<PlayerRef> {
        self.local_player(name).map(|player| player as PlayerRef)
    }

    fn console(&self, message: &str) {
        info!(target: "console", "{}", message);
        self.console.lock().push(message.to_string());
    }
}
