//! Error types for the application.

use thiserror::Error;

use crate::common::messages::{self, MessageKey};

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// User-facing failures raised while handling chat commands and events.
///
/// None of these are fatal: each one is rendered back to the command source
/// through its message template and the operation is abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("missing staff permission")]
    PermissionDenied,

    #[error("command requires a player")]
    MustBePlayer,

    #[error("no message given")]
    MissingMessage,

    #[error("player '{name}' not found")]
    PlayerNotFound { name: String },

    #[error("cannot ignore yourself")]
    CannotIgnoreSelf,

    #[error("cannot ignore staff")]
    CannotIgnoreStaff,

    #[error("cannot message yourself")]
    CannotMessageSelf,

    #[error("'{target}' is ignoring the sender")]
    Ignored { target: String },

    #[error("no conversation to reply to")]
    NoConversation,

    #[error("conversation partner '{name}' is offline")]
    TargetOffline { name: String },
}

impl ChatError {
    /// Message template used to report this error, with its placeholders.
    pub fn notice(&self) -> (MessageKey, Vec<(&'static str, String)>) {
        match self {
            Self::PermissionDenied => (messages::NOT_STAFF, Vec::new()),
            Self::MustBePlayer => (messages::MUST_BE_PLAYER, Vec::new()),
            Self::MissingMessage => (messages::MESSAGE_NEEDED, Vec::new()),
            Self::PlayerNotFound { name } => {
                (messages::PLAYER_NOT_FOUND, vec![("target", name.clone())])
            }
            Self::CannotIgnoreSelf => (messages::CANNOT_IGNORE_SELF, Vec::new()),
            Self::CannotIgnoreStaff => (messages::CANNOT_IGNORE_STAFF, Vec::new()),
            Self::CannotMessageSelf => (messages::CANNOT_MESSAGE_SELF, Vec::new()),
            Self::Ignored { target } => (messages::IGNORED_YOU, vec![("target", target.clone())]),
            Self::NoConversation => (messages::REPLY_NO_TARGET, Vec::new()),
            Self::TargetOffline { name } => {
                (messages::REPLY_TARGET_OFFLINE, vec![("target", name.clone())])
            }
        }
    }
}

/// Result type alias for configuration loading.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for chat operations.
pub type ChatResult<T> = std::result::Result<T, ChatError>;
