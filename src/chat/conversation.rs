//! Last private-message partner per player, for `/reply`.
//!
//! Pointers naming a player are dropped when that player leaves. A pointer
//! that still goes stale (a reply racing the disconnect) is cleared the next
//! time its owner tries to reply.

use dashmap::DashMap;

use crate::common::types::PlayerId;
use crate::host::{PlayerRef, ProxyHost};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub partner: PlayerId,
    /// Partner name when the pointer was last recorded.
    pub partner_name: String,
}

/// Outcome of looking up a reply target.
pub enum ReplyTarget {
    /// No conversation recorded.
    None,
    /// The partner has gone offline; the pointer was cleared.
    Offline { name: String },
    Online(PlayerRef),
}

#[derive(Debug, Default)]
pub struct ConversationTracker {
    pointers: DashMap<PlayerId, Conversation>,
}

impl ConversationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, owner: PlayerId, partner: PlayerId, partner_name: &str) {
        self.pointers.insert(
            owner,
            Conversation {
                partner,
                partner_name: partner_name.to_string(),
            },
        );
    }

    pub fn get(&self, owner: PlayerId) -> Option<Conversation> {
        self.pointers.get(&owner).map(|entry| entry.clone())
    }

    /// Find the partner to reply to, clearing the pointer if they are offline.
    pub fn resolve(&self, owner: PlayerId, host: &dyn ProxyHost) -> ReplyTarget {
        let Some(conversation) = self.get(owner) else {
            return ReplyTarget::None;
        };

        match host.player(conversation.partner) {
            Some(partner) => ReplyTarget::Online(partner),
            None => {
                // Only clear if nobody recorded a newer pointer meanwhile.
                self.pointers
                    .remove_if(&owner, |_, current| current.partner == conversation.partner);
                ReplyTarget::Offline {
                    name: conversation.partner_name,
                }
            }
        }
    }

    /// Drop `owner`'s pointer, also used when `owner` disconnects.
    pub fn clear(&self, owner: PlayerId) {
        self.pointers.remove(&owner);
    }

    /// Drop every other player's pointer to `partner`.
    pub fn forget_partner(&self, partner: PlayerId) {
        self.pointers
            .retain(|_, conversation| conversation.partner != partner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ChatPlayer, LocalPlayer, LocalProxy};

    #[test]
    fn test_record_and_get() {
        let tracker = ConversationTracker::new();
        let proxy = LocalProxy::new();
        let alex = proxy.connect(LocalPlayer::new("Alex", None));
        let steve = proxy.connect(LocalPlayer::new("Steve", None));

        assert!(tracker.get(alex.id()).is_none());
        tracker.record(alex.id(), steve.id(), "Steve");
        assert_eq!(
            tracker.get(alex.id()),
            Some(Conversation {
                partner: steve.id(),
                partner_name: "Steve".to_string(),
            })
        );

        tracker.record(alex.id(), steve.id(), "Steve2");
        assert_eq!(tracker.get(alex.id()).unwrap().partner_name, "Steve2");
    }

    #[test]
    fn test_resolve_online_partner() {
        let tracker = ConversationTracker::new();
        let proxy = LocalProxy::new();
        let alex = proxy.connect(LocalPlayer::new("Alex", None));
        let steve = proxy.connect(LocalPlayer::new("Steve", None));

        assert!(matches!(tracker.resolve(alex.id(), &proxy), ReplyTarget::None));

        tracker.record(alex.id(), steve.id(), "Steve");
        match tracker.resolve(alex.id(), &proxy) {
            ReplyTarget::Online(partner) => assert_eq!(partner.id(), steve.id()),
            _ => panic!("expected online partner"),
        }
        // Resolving an online partner keeps the pointer.
        assert!(tracker.get(alex.id()).is_some());
    }

    #[test]
    fn test_stale_pointer_is_cleared_on_resolve() {
        let tracker = ConversationTracker::new();
        let proxy = LocalProxy::new();
        let alex = proxy.connect(LocalPlayer::new("Alex", None));
        let steve = proxy.connect(LocalPlayer::new("Steve", None));

        tracker.record(alex.id(), steve.id(), "Steve");
        proxy.disconnect(steve.id());
        // Leaving the host alone does not touch the tracker.
        assert!(tracker.get(alex.id()).is_some());

        match tracker.resolve(alex.id(), &proxy) {
            ReplyTarget::Offline { name } => assert_eq!(name, "Steve"),
            _ => panic!("expected offline partner"),
        }
        assert!(tracker.get(alex.id()).is_none());
        assert!(matches!(tracker.resolve(alex.id(), &proxy), ReplyTarget::None));
    }

    #[test]
    fn test_forget_partner_drops_pointers_to_leaver() {
        let tracker = ConversationTracker::new();
        let proxy = LocalProxy::new();
        let alex = proxy.connect(LocalPlayer::new("Alex", None));
        let steve = proxy.connect(LocalPlayer::new("Steve", None));
        let notch = proxy.connect(LocalPlayer::new("Notch", None));

        tracker.record(alex.id(), steve.id(), "Steve");
        tracker.record(notch.id(), steve.id(), "Steve");
        tracker.record(steve.id(), alex.id(), "Alex");

        proxy.disconnect(steve.id());
        tracker.forget_partner(steve.id());
        assert!(tracker.get(alex.id()).is_none());
        assert!(tracker.get(notch.id()).is_none());
        assert_eq!(tracker.get(steve.id()).unwrap().partner, alex.id());

        // Coming back does not revive the old conversation.
        proxy.connect(LocalPlayer::new("Steve", Some("survival")));
        assert!(matches!(tracker.resolve(alex.id(), &proxy), ReplyTarget::None));
    }

    #[test]
    fn test_clear() {
        let tracker = ConversationTracker::new();
        let proxy = LocalProxy::new();
        let alex = proxy.connect(LocalPlayer::new("Alex", None));
        let steve = proxy.connect(LocalPlayer::new("Steve", None));

        tracker.record(alex.id(), steve.id(), "Steve");
        tracker.record(steve.id(), alex.id(), "Alex");
        tracker.clear(alex.id());
        assert!(tracker.get(alex.id()).is_none());

        assert!(tracker.get(steve.id()).is_some());
    }
}
