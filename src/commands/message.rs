//! `/msg <player> <message...>`

use crate::commands::{complete_names, join_args, CommandContext};
use crate::common::error::{ChatError, ChatResult};
use crate::host::ProxyHost;

pub fn execute(ctx: &CommandContext<'_>, args: &[&str]) -> ChatResult<()> {
    let [target_name, message @ ..] = args else {
        return Err(ChatError::MissingMessage);
    };
    if message.is_empty() {
        return Err(ChatError::MissingMessage);
    }

    let target = ctx
        .host
        .player_by_name(target_name)
        .ok_or_else(|| ChatError::PlayerNotFound {
            name: target_name.to_string(),
        })?;

    if let Some(sender) = ctx.source.player() {
        if sender.id() == target.id() {
            return Err(ChatError::CannotMessageSelf);
        }
    }

    ctx.router
        .private_message(ctx.source, target.as_ref(), &join_args(message))
}

pub fn suggest(host: &dyn ProxyHost, args: &[&str]) -> Vec<String> {
    match args {
        [] => complete_names(host, ""),
        [prefix] => complete_names(host, prefix),
        _ => Vec::new(),
    }
}
