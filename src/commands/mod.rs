//! Player and console commands (/chat, /msg, /r).
//!
//! Handles command line parsing and hands the arguments to the matching
//! command module. Failures come back as [`ChatError`] and are rendered to
//! the source by [`CommandContext::report`].

pub mod chat;
pub mod message;
pub mod reply;

use std::sync::Arc;

use tracing::debug;

use crate::chat::{ChannelRouter, ChatState};
use crate::common::error::{ChatError, ChatResult};
use crate::common::messages::MessageKey;
use crate::config::Config;
use crate::host::{CommandSource, PlayerRef, ProxyHost};

/// Registered command and its aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandLabel {
    /// `/chat`
    Chat,
    /// `/msg`, `/message`, `/tell`, `/whisper`, `/w`
    Message,
    /// `/r`, `/reply`
    Reply,
}

impl CommandLabel {
    pub fn parse(label: &str) -> Option<Self> {
        match label.to_lowercase().as_str() {
            "chat" => Some(Self::Chat),
            "msg" | "message" | "tell" | "whisper" | "w" => Some(Self::Message),
            "r" | "reply" => Some(Self::Reply),
            _ => None,
        }
    }
}

/// A command line split into its label and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine<'a> {
    pub label: CommandLabel,
    pub args: Vec<&'a str>,
}

impl<'a> CommandLine<'a> {
    /// Parse `/label args...`. Returns `None` for non-commands and unknown labels.
    pub fn parse(line: &'a str) -> Option<Self> {
        let body = line.trim_start().strip_prefix('/')?;
        let mut parts = body.split_whitespace();
        let label = CommandLabel::parse(parts.next()?)?;
        Some(Self {
            label,
            args: parts.collect(),
        })
    }

    /// Parse a partially typed line for completion.
    ///
    /// A trailing space starts a new, empty argument.
    pub fn parse_partial(line: &'a str) -> Option<Self> {
        let mut parsed = Self::parse(line)?;
        if line.ends_with(char::is_whitespace) {
            parsed.args.push("");
        }
        Some(parsed)
    }
}

/// Join free-text arguments back into a message.
pub fn join_args(args: &[&str]) -> String {
    args.join(" ")
}

/// Online player names starting with `prefix`, ignoring case, sorted.
pub fn complete_names(host: &dyn ProxyHost, prefix: &str) -> Vec<String> {
    let prefix = prefix.to_lowercase();
    let mut names: Vec<String> = host
        .online_players()
        .iter()
        .map(|player| player.name())
        .filter(|name| name.to_lowercase().starts_with(&prefix))
        .collect();
    names.sort_by_key(|name| name.to_lowercase());
    names
}

/// Options starting with `prefix`, ignoring case.
pub fn complete_options(options: &[&str], prefix: &str) -> Vec<String> {
    let prefix = prefix.to_lowercase();
    options
        .iter()
        .filter(|option| option.starts_with(&prefix))
        .map(|option| option.to_string())
        .collect()
}

/// Everything a command needs while it runs.
pub struct CommandContext<'a> {
    pub host: &'a dyn ProxyHost,
    pub config: Arc<Config>,
    pub state: &'a ChatState,
    pub router: &'a ChannelRouter,
    pub source: &'a CommandSource,
}

impl CommandContext<'_> {
    /// The issuing player, or [`ChatError::MustBePlayer`] for the console.
    pub fn player(&self) -> ChatResult<&PlayerRef> {
        self.source.player().ok_or(ChatError::MustBePlayer)
    }

    /// Render `key` and send it to the source.
    pub fn notify(&self, key: MessageKey, placeholders: &[(&str, String)]) {
        let text = self.config.render(key, placeholders);
        self.send_raw(&text);
    }

    /// Send a fixed line to the source.
    pub fn send_raw(&self, line: &str) {
        self.source.send_message(self.host, line);
    }

    /// Tell the source why its command failed.
    pub fn report(&self, err: &ChatError) {
        debug!(source = %self.source.name(), "command rejected: {}", err);
        let (key, placeholders) = err.notice();
        self.notify(key, &placeholders);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{LocalPlayer, LocalProxy};

    #[test]
    fn test_label_aliases() {
        assert_eq!(CommandLabel::parse("chat"), Some(CommandLabel::Chat));
        assert_eq!(CommandLabel::parse("TELL"), Some(CommandLabel::Message));
        assert_eq!(CommandLabel::parse("w"), Some(CommandLabel::Message));
        assert_eq!(CommandLabel::parse("reply"), Some(CommandLabel::Reply));
        assert_eq!(CommandLabel::parse("report"), None);
        assert_eq!(CommandLabel::parse("help"), None);
    }

    #[test]
    fn test_parse_line() {
        let line = CommandLine::parse("/msg  Steve hello   there").unwrap();
        assert_eq!(line.label, CommandLabel::Message);
        assert_eq!(line.args, vec!["Steve", "hello", "there"]);

        assert!(CommandLine::parse("hello").is_none());
        assert!(CommandLine::parse("/").is_none());
        assert!(CommandLine::parse("/unknown arg").is_none());
        assert!(CommandLine::parse("/chat").unwrap().args.is_empty());
    }

    #[test]
    fn test_parse_partial_trailing_space() {
        assert!(CommandLine::parse_partial("/chat").unwrap().args.is_empty());
        assert_eq!(CommandLine::parse_partial("/chat ").unwrap().args, vec![""]);
        assert_eq!(CommandLine::parse_partial("/chat li").unwrap().args, vec!["li"]);
        assert_eq!(
            CommandLine::parse_partial("/chat listen ").unwrap().args,
            vec!["listen", ""]
        );
    }

    #[test]
    fn test_complete_names_sorted_by_prefix() {
        let proxy = LocalProxy::new();
        proxy.connect(LocalPlayer::new("steve", None));
        proxy.connect(LocalPlayer::new("Alex", None));
        proxy.connect(LocalPlayer::new("Stella", None));

        assert_eq!(complete_names(&proxy, "ST"), vec!["Stella", "steve"]);
        assert_eq!(complete_names(&proxy, ""), vec!["Alex", "Stella", "steve"]);
        assert!(complete_names(&proxy, "z").is_empty());
    }

    #[test]
    fn test_complete_options() {
        let options = ["server", "staff", "network"];
        assert_eq!(complete_options(&options, "S"), vec!["server", "staff"]);
        assert_eq!(complete_options(&options, ""), vec!["server", "staff", "network"]);
    }
}
