//! Plugin entry point wired to a proxy host.
//!
//! The host forwards connection and chat events through [`ChatEvents`] and
//! hands typed command lines to [`ProxyChat::dispatch`].

use std::sync::Arc;

use tracing::{debug, info};

use crate::chat::{ChannelRouter, ChatState, InterceptPolicy};
use crate::commands::{self, CommandContext, CommandLabel, CommandLine};
use crate::common::error::ConfigResult;
use crate::common::messages;
use crate::common::types::{Channel, ChatVerdict, STAFF_PERMISSION};
use crate::config::ConfigStore;
use crate::host::{ChatPlayer, CommandSource, ProxyHost};

/// Inbound events from the proxy.
pub trait ChatEvents {
    fn on_connect(&self, player: &dyn ChatPlayer);

    fn on_disconnect(&self, player: &dyn ChatPlayer);

    /// Route plain chat text. The verdict tells the host what to do with the original message.
    fn on_chat_text(&self, player: &dyn ChatPlayer, text: &str) -> ChatVerdict;
}

pub struct ProxyChat {
    host: Arc<dyn ProxyHost>,
    config: Arc<ConfigStore>,
    state: Arc<ChatState>,
    router: ChannelRouter,
    intercept: InterceptPolicy,
}

impl ProxyChat {
    pub fn new(host: Arc<dyn ProxyHost>, config: Arc<ConfigStore>) -> Self {
        let state = Arc::new(ChatState::new());
        let router = ChannelRouter::new(Arc::clone(&host), Arc::clone(&config), Arc::clone(&state));
        info!("Chat channels enabled");
        Self {
            host,
            config,
            state,
            router,
            intercept: InterceptPolicy::new(),
        }
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn router(&self) -> &ChannelRouter {
        &self.router
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Re-read the configuration file.
    pub fn reload(&self) -> ConfigResult<()> {
        self.config.reload()
    }

    fn context<'a>(&'a self, source: &'a CommandSource) -> CommandContext<'a> {
        CommandContext {
            host: self.host.as_ref(),
            config: self.config.snapshot(),
            state: &self.state,
            router: &self.router,
            source,
        }
    }

    /// Run a command line such as `/msg Steve hi`.
    ///
    /// Returns `false` if the line is not one of our commands.
    pub fn dispatch(&self, source: &CommandSource, line: &str) -> bool {
        let Some(command) = CommandLine::parse(line) else {
            return false;
        };
        debug!(source = %source.name(), "Processing command: {:?}", command);

        let ctx = self.context(source);
        let result = match command.label {
            CommandLabel::Chat => commands::chat::execute(&ctx, &command.args),
            CommandLabel::Message => commands::message::execute(&ctx, &command.args),
            CommandLabel::Reply => commands::reply::execute(&ctx, &command.args),
        };
        if let Err(e) = result {
            ctx.report(&e);
        }
        true
    }

    /// Tab completions for a partially typed command line.
    pub fn suggest(&self, _source: &CommandSource, line: &str) -> Vec<String> {
        let Some(command) = CommandLine::parse_partial(line) else {
            return Vec::new();
        };
        let host = self.host.as_ref();
        match command.label {
            CommandLabel::Chat => commands::chat::suggest(host, &command.args),
            CommandLabel::Message => commands::message::suggest(host, &command.args),
            CommandLabel::Reply => Vec::new(),
        }
    }
}

impl ChatEvents for ProxyChat {
    fn on_connect(&self, player: &dyn ChatPlayer) {
        let default = self.config.snapshot().default_channel();
        let applied = self.state.preferences.initialize(player, default);
        info!(player = %player.name(), channel = %applied, "player connected");
    }

    fn on_disconnect(&self, player: &dyn ChatPlayer) {
        self.state.forget(player.id());
        info!(player = %player.name(), "player disconnected");
    }

    fn on_chat_text(&self, player: &dyn ChatPlayer, text: &str) -> ChatVerdict {
        let channel = self.state.preferences.speak_channel(player);
        if channel == Channel::Server {
            return ChatVerdict::Allowed;
        }

        let config = self.config.snapshot();
        let force = config.settings.force_channel_intercept;
        let interceptable = self.intercept.can_intercept(player, force);

        if channel == Channel::Staff && !player.has_permission(STAFF_PERMISSION) {
            self.state
                .preferences
                .set_speak_channel_exclusive(player, Channel::Server);
            player.send_message(&config.render(messages::NOT_STAFF, &[]));
            debug!(player = %player.name(), "staff permission lost; moved to server chat");
            return if interceptable {
                InterceptPolicy::suppress_verdict(force)
            } else {
                ChatVerdict::Allowed
            };
        }

        if !interceptable {
            self.intercept
                .restrict(player, &self.state.preferences, &config);
            return ChatVerdict::Allowed;
        }

        self.router.broadcast(player, channel, text);
        InterceptPolicy::suppress_verdict(force)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::KeyRevision;
    use crate::config::Config;
    use crate::host::{LocalPlayer, LocalProxy};

    fn plugin_with(config: Config) -> (Arc<LocalProxy>, ProxyChat) {
        let proxy = Arc::new(LocalProxy::new());
        let plugin = ProxyChat::new(proxy.clone(), Arc::new(ConfigStore::fixed(config)));
        (proxy, plugin)
    }

    fn plugin() -> (Arc<LocalProxy>, ProxyChat) {
        plugin_with(Config::default())
    }

    fn join(proxy: &LocalProxy, plugin: &ProxyChat, name: &str, staff: bool) -> Arc<LocalPlayer> {
        let player = proxy.connect(LocalPlayer::new(name, Some("lobby")));
        if staff {
            player.grant(STAFF_PERMISSION);
        }
        plugin.on_connect(&*player);
        player
    }

    #[test]
    fn test_connect_uses_default_channel() {
        let mut config = Config::default();
        config.channels.default = "staff".to_string();
        let (proxy, plugin) = plugin_with(config);

        let admin = join(&proxy, &plugin, "Admin", true);
        let alex = join(&proxy, &plugin, "Alex", false);

        assert_eq!(plugin.state().preferences.speak_channel(&*admin), Channel::Staff);
        assert_eq!(plugin.state().preferences.speak_channel(&*alex), Channel::Server);
    }

    #[test]
    fn test_disconnect_forgets_player() {
        let (proxy, plugin) = plugin();
        let alex = join(&proxy, &plugin, "Alex", false);
        let steve = join(&proxy, &plugin, "Steve", false);
        plugin.dispatch(&CommandSource::Player(alex.clone()), "/chat ignore Steve");
        plugin.dispatch(&CommandSource::Player(alex.clone()), "/msg Steve hi");

        proxy.disconnect(alex.id());
        plugin.on_disconnect(&*alex);

        assert!(plugin.state().preferences.get(alex.id()).is_none());
        assert!(plugin.state().ignores.ignored_names(alex.id()).is_empty());
        assert!(plugin.state().conversations.get(alex.id()).is_none());
        assert!(plugin.state().conversations.get(steve.id()).is_none());

        plugin.dispatch(&CommandSource::Player(steve.clone()), "/r you there?");
        assert_eq!(
            steve.last_message().as_deref(),
            Some(messages::REPLY_NO_TARGET.default)
        );
    }

    #[test]
    fn test_server_chat_passes_through() {
        let (proxy, plugin) = plugin();
        let alex = join(&proxy, &plugin, "Alex", false);

        assert_eq!(plugin.on_chat_text(&*alex, "hi"), ChatVerdict::Allowed);
        assert!(alex.inbox().is_empty());
    }

    #[test]
    fn test_network_chat_is_intercepted() {
        let (proxy, plugin) = plugin();
        let alex = join(&proxy, &plugin, "Alex", false);
        let steve = join(&proxy, &plugin, "Steve", false);
        plugin.dispatch(&CommandSource::Player(alex.clone()), "/chat network");
        plugin.dispatch(&CommandSource::Player(steve.clone()), "/chat listen network on");
        steve.take_inbox();

        assert_eq!(plugin.on_chat_text(&*alex, "hey"), ChatVerdict::Cleared);
        assert_eq!(steve.take_inbox(), vec!["&b[Network] Alex: hey"]);
    }

    #[test]
    fn test_forced_intercept_denies() {
        let mut config = Config::default();
        config.settings.force_channel_intercept = true;
        let (proxy, plugin) = plugin_with(config);
        let alex = join(&proxy, &plugin, "Alex", false);
        alex.set_key_revision(Some(KeyRevision::LinkedV2));
        plugin.dispatch(&CommandSource::Player(alex.clone()), "/chat network");

        assert_eq!(plugin.on_chat_text(&*alex, "hey"), ChatVerdict::Denied);
        assert_eq!(alex.last_message().as_deref(), Some("&b[Network] Alex: hey"));
    }

    #[test]
    fn test_signed_chat_restricts_to_server() {
        let (proxy, plugin) = plugin();
        let alex = join(&proxy, &plugin, "Alex", false);
        let steve = join(&proxy, &plugin, "Steve", false);
        alex.set_key_revision(Some(KeyRevision::LinkedV2));
        plugin.dispatch(&CommandSource::Player(alex.clone()), "/chat network");
        plugin.dispatch(&CommandSource::Player(steve.clone()), "/chat listen network on");
        steve.take_inbox();

        assert_eq!(plugin.on_chat_text(&*alex, "hey"), ChatVerdict::Allowed);
        assert_eq!(plugin.state().preferences.speak_channel(&*alex), Channel::Server);
        assert_eq!(
            alex.last_message().as_deref(),
            Some(messages::SECURE_CHAT_RESTRICTED.default)
        );
        assert!(steve.inbox().is_empty());
        assert!(plugin.intercept.warned());
    }

    #[test]
    fn test_revoked_staff_falls_back_to_server() {
        let (proxy, plugin) = plugin();
        let former = join(&proxy, &plugin, "Former", true);
        let admin = join(&proxy, &plugin, "Admin", true);
        plugin.dispatch(&CommandSource::Player(former.clone()), "/chat staff");
        plugin.dispatch(&CommandSource::Player(admin.clone()), "/chat listen staff on");
        admin.take_inbox();

        former.revoke(STAFF_PERMISSION);
        assert_eq!(plugin.on_chat_text(&*former, "leak"), ChatVerdict::Cleared);
        assert_eq!(plugin.state().preferences.speak_channel(&*former), Channel::Server);
        assert_eq!(former.last_message().as_deref(), Some(messages::NOT_STAFF.default));
        assert!(admin.inbox().is_empty());

        // Signed chat can't be suppressed, so it goes through as server chat.
        plugin.dispatch(&CommandSource::Player(admin.clone()), "/chat staff");
        admin.revoke(STAFF_PERMISSION);
        admin.set_key_revision(Some(KeyRevision::LinkedV2));
        assert_eq!(plugin.on_chat_text(&*admin, "oops"), ChatVerdict::Allowed);
        assert_eq!(plugin.state().preferences.speak_channel(&*admin), Channel::Server);
    }

    #[test]
    fn test_staff_subcommand_denied_keeps_channel() {
        let (proxy, plugin) = plugin();
        let alex = join(&proxy, &plugin, "Alex", false);
        plugin.dispatch(&CommandSource::Player(alex.clone()), "/chat network");
        alex.take_inbox();

        assert!(plugin.dispatch(&CommandSource::Player(alex.clone()), "/chat staff"));
        assert_eq!(alex.take_inbox(), vec![messages::NOT_STAFF.default]);
        assert_eq!(plugin.state().preferences.speak_channel(&*alex), Channel::Network);
    }

    #[test]
    fn test_msg_then_reply_scenario() {
        let (proxy, plugin) = plugin();
        let alex = join(&proxy, &plugin, "Alex", false);
        let steve = join(&proxy, &plugin, "Steve", false);
        let notch = join(&proxy, &plugin, "Notch", false);

        plugin.dispatch(&CommandSource::Player(alex.clone()), "/msg Steve hello");
        assert_eq!(steve.take_inbox(), vec!["&d[From Alex] hello"]);
        assert_eq!(alex.take_inbox(), vec!["&d[To Steve] hello"]);

        plugin.dispatch(&CommandSource::Player(steve.clone()), "/r world");
        assert_eq!(alex.take_inbox(), vec!["&d[From Steve] world"]);
        assert!(notch.inbox().is_empty());
    }

    #[test]
    fn test_user_text_placeholders_not_expanded() {
        let (proxy, plugin) = plugin();
        let alex = join(&proxy, &plugin, "Alex", false);
        let steve = join(&proxy, &plugin, "Steve", false);

        plugin.dispatch(&CommandSource::Player(alex.clone()), "/msg Steve {sender} {time}");
        assert_eq!(
            steve.last_message().as_deref(),
            Some("&d[From Alex] {sender} {time}")
        );
    }

    #[test]
    fn test_reply_pointer_to_leaver_removed_on_disconnect() {
        let (proxy, plugin) = plugin();
        let alex = join(&proxy, &plugin, "Alex", false);
        let steve = join(&proxy, &plugin, "Steve", false);
        plugin.dispatch(&CommandSource::Player(alex.clone()), "/msg Steve hi");

        proxy.disconnect(steve.id());
        plugin.on_disconnect(&*steve);
        assert!(plugin.state().conversations.get(alex.id()).is_none());

        let steve = join(&proxy, &plugin, "Steve", false);
        alex.take_inbox();
        plugin.dispatch(&CommandSource::Player(alex.clone()), "/r welcome back");
        assert_eq!(alex.take_inbox(), vec![messages::REPLY_NO_TARGET.default]);
        assert!(steve.inbox().is_empty());
    }

    #[test]
    fn test_reload_swaps_templates() {
        let (proxy, plugin) = plugin();
        let alex = join(&proxy, &plugin, "Alex", false);

        let mut config = Config::default();
        config.channels.formats.network = "<{player}> {message}".to_string();
        plugin.config().replace(config);

        plugin.router().broadcast(&*alex, Channel::Network, "new look");
        assert_eq!(alex.last_message().as_deref(), Some("<Alex> new look"));
    }

    #[test]
    fn test_dispatch_ignores_foreign_lines() {
        let (_proxy, plugin) = plugin();
        assert!(!plugin.dispatch(&CommandSource::Console, "hello"));
        assert!(!plugin.dispatch(&CommandSource::Console, "/spawn"));
        assert!(plugin.dispatch(&CommandSource::Console, "/chat"));
    }

    #[test]
    fn test_suggest_routes_by_label() {
        let (proxy, plugin) = plugin();
        join(&proxy, &plugin, "Steve", false);
        let console = CommandSource::Console;

        assert_eq!(plugin.suggest(&console, "/chat li"), vec!["listen"]);
        assert_eq!(plugin.suggest(&console, "/tell s"), vec!["Steve"]);
        assert!(plugin.suggest(&console, "/r ").is_empty());
        assert!(plugin.suggest(&console, "/unknown ").is_empty());
    }
}
