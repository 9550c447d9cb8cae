//! `/r <message...>`: answer the last private message partner.

use crate::chat::ReplyTarget;
use crate::commands::{join_args, CommandContext};
use crate::common::error::{ChatError, ChatResult};

pub fn execute(ctx: &CommandContext<'_>, args: &[&str]) -> ChatResult<()> {
    let player = ctx.player()?;

    let partner = match ctx.state.conversations.resolve(player.id(), ctx.host) {
        ReplyTarget::None => return Err(ChatError::NoConversation),
        ReplyTarget::Offline { name } => return Err(ChatError::TargetOffline { name }),
        ReplyTarget::Online(partner) => partner,
    };
    if args.is_empty() {
        return Err(ChatError::MissingMessage);
    }

    ctx.router
        .private_message(ctx.source, partner.as_ref(), &join_args(args))
}
