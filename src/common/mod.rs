//! Common utilities and types shared across the application.

pub mod error;
pub mod messages;
pub mod types;

pub use error::{ChatError, ChatResult, ConfigError, ConfigResult};
pub use messages::MessageKey;
pub use types::{Channel, ChannelSet, ChatVerdict, KeyRevision, PlayerId};
