//! proxychat - chat channels for a Minecraft proxy
//!
//! Server, network and staff channels layered on top of player chat, with
//! private messages, replies, ignore lists and staff alerts.

pub mod chat;
pub mod commands;
pub mod common;
pub mod config;
pub mod console;
pub mod host;
pub mod plugin;

pub use common::{Channel, ChatError, ChatVerdict, PlayerId};
pub use config::{Config, ConfigStore};
pub use host::{ChatPlayer, CommandSource, PlayerRef, ProxyHost};
pub use plugin::{ChatEvents, ProxyChat};
