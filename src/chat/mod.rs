//! Chat channel state and routing.

pub mod conversation;
pub mod formatter;
pub mod ignore;
pub mod intercept;
pub mod preferences;
pub mod router;
pub mod state;

pub use conversation::{Conversation, ConversationTracker, ReplyTarget};
pub use formatter::{FormatContext, MessageFormatter};
pub use ignore::IgnoreStore;
pub use intercept::InterceptPolicy;
pub use preferences::{PreferenceStore, Preferences};
pub use router::ChannelRouter;
pub use state::ChatState;
