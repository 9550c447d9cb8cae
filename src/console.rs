//! Line-based driver for the in-memory proxy.
//!
//! Reads a script of proxy events and commands, one per line, and feeds them
//! to the plugin. Lines delivered to players are logged after each step.
//!
//! ```text
//! join Alex lobby proxychat.staff
//! run Alex /chat network
//! say Alex hello everyone
//! tab console /msg A
//! ```

use std::sync::Arc;

use futures::StreamExt;
use thiserror::Error;
use tokio::io::AsyncRead;
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{info, warn};

use crate::common::types::KeyRevision;
use crate::host::{ChatPlayer, CommandSource, LocalPlayer, LocalProxy};
use crate::plugin::{ChatEvents, ProxyChat};

const MAX_LINE_LENGTH: usize = 4096;

/// A script line that could not be carried out.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unknown verb '{0}'")]
    UnknownVerb(String),

    #[error("'{verb}' needs {what}")]
    MissingArgument { verb: &'static str, what: &'static str },

    #[error("no player named '{0}' is online")]
    UnknownPlayer(String),

    #[error("unknown key revision '{0}' (expected v1, v2 or none)")]
    BadKeyRevision(String),
}

pub struct ConsoleDriver {
    proxy: Arc<LocalProxy>,
    plugin: Arc<ProxyChat>,
}

impl ConsoleDriver {
    pub fn new(proxy: Arc<LocalProxy>, plugin: Arc<ProxyChat>) -> Self {
        Self { proxy, plugin }
    }

    /// Run every line of `reader` until EOF. Returns the number of lines executed.
    pub async fn run<R>(&self, reader: R) -> anyhow::Result<usize>
    where
        R: AsyncRead + Unpin,
    {
        let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
        let mut executed = 0;

        while let Some(line) = lines.next().await {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match self.execute(line) {
                Ok(()) => executed += 1,
                Err(e) => warn!("{}: {}", line, e),
            }
            self.flush_inboxes();
        }

        info!("Console script finished ({} lines)", executed);
        Ok(executed)
    }

    /// Carry out a single script line.
    pub fn execute(&self, line: &str) -> Result<(), ScriptError> {
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let mut args = rest.split_whitespace();

        match verb.to_lowercase().as_str() {
            "join" => {
                let name = args.next().ok_or(ScriptError::MissingArgument {
                    verb: "join",
                    what: "a player name",
                })?;
                let server = args.next();
                let player = LocalPlayer::new(name, server);
                for permission in args {
                    player.grant(permission);
                }
                let player = self.proxy.connect(player);
                self.plugin.on_connect(&*player);
            }
            "leave" => {
                let player = self.player(args.next(), "leave")?;
                self.proxy.disconnect(player.id());
                self.plugin.on_disconnect(&*player);
            }
            "move" => {
                let player = self.player(args.next(), "move")?;
                let server = args.next().ok_or(ScriptError::MissingArgument {
                    verb: "move",
                    what: "a server name",
                })?;
                player.set_server(Some(server));
                info!(player = %player.name(), server = %server, "moved");
            }
            "grant" | "revoke" => {
                let verb = if verb.eq_ignore_ascii_case("grant") { "grant" } else { "revoke" };
                let player = self.player(args.next(), verb)?;
                let permission = args.next().ok_or(ScriptError::MissingArgument {
                    verb,
                    what: "a permission",
                })?;
                if verb == "grant" {
                    player.grant(permission);
                } else {
                    player.revoke(permission);
                }
            }
            "key" => {
                let player = self.player(args.next(), "key")?;
                let revision = match args.next().map(str::to_lowercase).as_deref() {
                    Some("v1") => Some(KeyRevision::GenericV1),
                    Some("v2") => Some(KeyRevision::LinkedV2),
                    Some("none") => None,
                    Some(other) => return Err(ScriptError::BadKeyRevision(other.to_string())),
                    None => {
                        return Err(ScriptError::MissingArgument {
                            verb: "key",
                            what: "a key revision",
                        })
                    }
                };
                player.set_key_revision(revision);
            }
            "say" => {
                let (name, text) = split_target(rest);
                let player = self.player(name, "say")?;
                let verdict = self.plugin.on_chat_text(&*player, text);
                info!(player = %player.name(), ?verdict, "chat: {}", text);
            }
            "run" => {
                let (name, command) = split_target(rest);
                let source = self.source(name, "run")?;
                if !self.plugin.dispatch(&source, command) {
                    warn!("Not a chat command: {}", command);
                }
            }
            "tab" => {
                let (name, partial) = split_target(rest);
                let source = self.source(name, "tab")?;
                let suggestions = self.plugin.suggest(&source, partial);
                info!("tab {:?}: {}", partial, suggestions.join(", "));
            }
            "reload" => {
                if let Err(e) = self.plugin.reload() {
                    warn!("Reload failed: {}", e);
                }
            }
            other => return Err(ScriptError::UnknownVerb(other.to_string())),
        }
        Ok(())
    }

    fn player(&self, name: Option<&str>, verb: &'static str) -> Result<Arc<LocalPlayer>, ScriptError> {
        let name = name.ok_or(ScriptError::MissingArgument {
            verb,
            what: "a player name",
        })?;
        self.proxy
            .local_player(name)
            .ok_or_else(|| ScriptError::UnknownPlayer(name.to_string()))
    }

    fn source(&self, name: Option<&str>, verb: &'static str) -> Result<CommandSource, ScriptError> {
        match name {
            Some(name) if name.eq_ignore_ascii_case("console") => Ok(CommandSource::Console),
            name => Ok(CommandSource::Player(self.player(name, verb)?)),
        }
    }

    fn flush_inboxes(&self) {
        for player in self.proxy.local_players() {
            for line in player.take_inbox() {
                info!(target: "chat", "[{}] {}", player.name(), line);
            }
        }
    }
}

/// Split `name rest...` into the name and the untouched remainder.
fn split_target(rest: &str) -> (Option<&str>, &str) {
    match rest.split_once(char::is_whitespace) {
        Some((name, tail)) => (Some(name), tail.trim_start()),
        None if rest.is_empty() => (None, ""),
        None => (Some(rest), ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::{Channel, STAFF_PERMISSION};
    use crate::config::{Config, ConfigStore};

    fn driver() -> (Arc<LocalProxy>, Arc<ProxyChat>, ConsoleDriver) {
        let proxy = Arc::new(LocalProxy::new());
        let plugin = Arc::new(ProxyChat::new(
            proxy.clone(),
            Arc::new(ConfigStore::fixed(Config::default())),
        ));
        let driver = ConsoleDriver::new(proxy.clone(), plugin.clone());
        (proxy, plugin, driver)
    }

    #[test]
    fn test_split_target() {
        assert_eq!(split_target("Alex /chat network"), (Some("Alex"), "/chat network"));
        assert_eq!(split_target("Alex"), (Some("Alex"), ""));
        assert_eq!(split_target(""), (None, ""));
    }

    #[test]
    fn test_join_with_permissions() {
        let (proxy, plugin, driver) = driver();
        driver.execute("join Admin lobby proxychat.staff").unwrap();

        let admin = proxy.local_player("admin").unwrap();
        assert!(admin.has_permission(STAFF_PERMISSION));
        assert_eq!(admin.server_name().as_deref(), Some("lobby"));
        assert!(plugin.state().preferences.get(admin.id()).is_some());
    }

    #[test]
    fn test_script_errors() {
        let (_, _, driver) = driver();
        assert_eq!(
            driver.execute("dance"),
            Err(ScriptError::UnknownVerb("dance".to_string()))
        );
        assert_eq!(
            driver.execute("leave Ghost"),
            Err(ScriptError::UnknownPlayer("Ghost".to_string()))
        );
        assert!(matches!(
            driver.execute("join"),
            Err(ScriptError::MissingArgument { verb: "join", .. })
        ));

        driver.execute("join Alex").unwrap();
        assert_eq!(
            driver.execute("key Alex v3"),
            Err(ScriptError::BadKeyRevision("v3".to_string()))
        );
    }

    #[test]
    fn test_leave_forgets_state() {
        let (proxy, plugin, driver) = driver();
        driver.execute("join Alex").unwrap();
        let alex = proxy.local_player("Alex").unwrap();

        driver.execute("leave alex").unwrap();
        assert_eq!(proxy.online_count(), 0);
        assert!(plugin.state().preferences.get(alex.id()).is_none());
    }

    #[tokio::test]
    async fn test_run_script() {
        let (proxy, plugin, driver) = driver();
        let script = tokio_test::io::Builder::new()
            .read(b"# setup\njoin Alex lobby\njoin Steve survival\n\n")
            .read(b"run Alex /chat network\nrun Steve /chat listen network on\n")
            .read(b"key Alex v1\nmove Steve lobby\n")
            .build();

        let executed = driver.run(script).await.unwrap();
        assert_eq!(executed, 6);

        let alex = proxy.local_player("Alex").unwrap();
        let steve = proxy.local_player("Steve").unwrap();
        assert_eq!(plugin.state().preferences.speak_channel(&*alex), Channel::Network);
        assert!(plugin.state().preferences.is_listening(&*steve, Channel::Network));
        assert_eq!(steve.server_name().as_deref(), Some("lobby"));
        // Delivered lines were flushed to the log.
        assert!(alex.inbox().is_empty());
    }

    #[tokio::test]
    async fn test_run_skips_bad_lines() {
        let (proxy, _, driver) = driver();
        let script = tokio_test::io::Builder::new()
            .read(b"join Alex\nfly Alex\nsay Nobody hi\nrun console /chat alert hello\n")
            .build();

        assert_eq!(driver.run(script).await.unwrap(), 2);
        assert_eq!(proxy.console_log().len(), 2);
    }
}
