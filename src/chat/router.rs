//! Channel, private message and alert delivery.
//!
//! Recipient sets are computed from the live player list at send time.
//! Delivery order across recipients is unspecified.

use std::sync::Arc;

use tracing::{debug, info};

use crate::chat::formatter::{FormatContext, MessageFormatter};
use crate::chat::state::ChatState;
use crate::common::error::{ChatError, ChatResult};
use crate::common::types::{Channel, PlayerId, STAFF_PERMISSION};
use crate::config::ConfigStore;
use crate::host::{ChatPlayer, CommandSource, PlayerRef, ProxyHost};

/// Server name used when the sender is between backends.
pub const UNKNOWN_SERVER: &str = "Unknown";

pub struct ChannelRouter {
    host: Arc<dyn ProxyHost>,
    config: Arc<ConfigStore>,
    state: Arc<ChatState>,
}

impl ChannelRouter {
    pub fn new(host: Arc<dyn ProxyHost>, config: Arc<ConfigStore>, state: Arc<ChatState>) -> Self {
        Self {
            host,
            config,
            state,
        }
    }

    /// Online players that should see `sender`'s message on `channel`.
    pub fn recipients(&self, sender: &dyn ChatPlayer, channel: Channel) -> Vec<PlayerRef> {
        let sender_id = sender.id();
        let sender_server = sender.server_name();

        self.host
            .online_players()
            .into_iter()
            .filter(|recipient| {
                self.should_receive(recipient.as_ref(), sender_id, sender_server.as_deref(), channel)
            })
            .collect()
    }

    fn should_receive(
        &self,
        recipient: &dyn ChatPlayer,
        sender_id: PlayerId,
        sender_server: Option<&str>,
        channel: Channel,
    ) -> bool {
        let recipient_id = recipient.id();

        if channel == Channel::Staff && !recipient.has_permission(STAFF_PERMISSION) {
            return false;
        }
        if recipient_id != sender_id && !self.state.preferences.is_listening(recipient, channel) {
            return false;
        }
        if channel == Channel::Server
            && recipient_id != sender_id
            && recipient.server_name().as_deref() != sender_server
        {
            return false;
        }
        if self.state.ignores.is_ignoring(recipient_id, sender_id) {
            debug!(
                recipient = %recipient.name(),
                channel = %channel,
                "skipping recipient ignoring the sender"
            );
            return false;
        }
        true
    }

    /// Send `raw` from `sender` to everyone on `channel`. Returns the number of deliveries.
    ///
    /// On [`Channel::Server`] recipients are further limited to players on
    /// the sender's current backend server.
    pub fn broadcast(&self, sender: &dyn ChatPlayer, channel: Channel, raw: &str) -> usize {
        let config = self.config.snapshot();
        let sender_name = sender.name();
        let server = sender.server_name();

        let ctx = FormatContext::new()
            .with("prefix", config.prefix(channel))
            .with("player", sender_name.as_str())
            .with("message", raw)
            .with("server", server.as_deref().unwrap_or(UNKNOWN_SERVER));
        let line = MessageFormatter::new(config.format(channel)).format(&ctx);

        let recipients = self.recipients(sender, channel);
        for recipient in &recipients {
            recipient.send_message(&line);
        }

        info!(
            channel = %channel,
            sender = %sender_name,
            recipients = recipients.len(),
            "{}",
            raw
        );
        recipients.len()
    }

    /// Deliver a private message from `source` to `target`.
    ///
    /// Fails with [`ChatError::Ignored`] if `target` ignores the sending
    /// player; nothing is delivered and no conversation is recorded then.
    pub fn private_message(
        &self,
        source: &CommandSource,
        target: &dyn ChatPlayer,
        raw: &str,
    ) -> ChatResult<()> {
        let target_name = target.name();
        let sender_name = source.name();
        let sender_id = source.player().map(|player| player.id());

        if let Some(sender_id) = sender_id {
            if self.state.ignores.is_ignoring(target.id(), sender_id) {
                debug!(sender = %sender_name, target = %target_name, "private message blocked by ignore");
                return Err(ChatError::Ignored {
                    target: target_name,
                });
            }
        }

        let config = self.config.snapshot();
        let ctx = FormatContext::new()
            .with("sender", sender_name.as_str())
            .with("target", target_name.as_str())
            .with("message", raw);
        let sent = MessageFormatter::new(config.private_messages.send.as_str()).format(&ctx);
        let received = MessageFormatter::new(config.private_messages.receive.as_str()).format(&ctx);

        source.send_message(self.host.as_ref(), &sent);
        target.send_message(&received);

        if let Some(sender_id) = sender_id {
            self.state
                .conversations
                .record(sender_id, target.id(), &target_name);
            self.state
                .conversations
                .record(target.id(), sender_id, &sender_name);
        }

        info!(sender = %sender_name, target = %target_name, "private message");
        Ok(())
    }

    /// Deliver an alert to every online player and the console.
    pub fn alert(&self, source: &CommandSource, raw: &str) -> usize {
        let config = self.config.snapshot();
        let ctx = FormatContext::new()
            .with("prefix", config.channels.alert.prefix.as_str())
            .with("message", raw)
            .with("sender", source.name());
        let line = MessageFormatter::new(config.channels.alert.format.as_str()).format(&ctx);

        let players = self.host.online_players();
        for player in &players {
            player.send_message(&line);
        }
        self.host.console(&line);

        info!(sender = %source.name(), recipients = players.len(), "alert sent");
        players.len()
    }
}
