//! `/chat` command: channel switching, listening, ignores and alerts.

use tracing::info;

use crate::commands::{complete_names, complete_options, join_args, CommandContext};
use crate::common::error::{ChatError, ChatResult};
use crate::common::messages;
use crate::common::types::{Channel, STAFF_PERMISSION};
use crate::host::{ChatPlayer, ProxyHost};

const SUB_COMMANDS: [&str; 6] = ["server", "network", "staff", "listen", "ignore", "alert"];

const USAGE: [&str; 6] = [
    "&7/chat server",
    "&7/chat network [message]",
    "&7/chat staff [message]",
    "&7/chat listen <network|staff> [on|off]",
    "&7/chat ignore [player]",
    "&7/chat alert <message>",
];

const LISTEN_USAGE: &str = "&cUsage: /chat listen <network|staff> [on|off]";

pub fn execute(ctx: &CommandContext<'_>, args: &[&str]) -> ChatResult<()> {
    let Some(verb) = args.first() else {
        let player = ctx.player()?;
        let channel = ctx.state.preferences.speak_channel(player.as_ref());
        ctx.notify(
            messages::CHANNEL_CURRENT,
            &[("channel", channel.display_name().to_string())],
        );
        return Ok(());
    };
    let rest = &args[1..];

    match verb.to_lowercase().as_str() {
        "server" => {
            let player = ctx.player()?;
            switch_channel(ctx, player.as_ref(), Channel::Server);
            Ok(())
        }
        "network" => speak_in(ctx, Channel::Network, rest),
        "staff" => speak_in(ctx, Channel::Staff, rest),
        "listen" => listen(ctx, rest),
        "ignore" => ignore(ctx, rest.first().copied()),
        "alert" => alert(ctx, rest),
        _ => {
            for line in USAGE {
                ctx.send_raw(line);
            }
            Ok(())
        }
    }
}

/// Switch to `channel` and optionally say something in it right away.
fn speak_in(ctx: &CommandContext<'_>, channel: Channel, message: &[&str]) -> ChatResult<()> {
    let player = ctx.player()?;
    if channel.requires_staff() && !player.has_permission(STAFF_PERMISSION) {
        return Err(ChatError::PermissionDenied);
    }

    let applied = switch_channel(ctx, player.as_ref(), channel);
    if applied == channel && !message.is_empty() {
        ctx.router
            .broadcast(player.as_ref(), applied, &join_args(message));
    }
    Ok(())
}

/// Apply `channel` exclusively and confirm with the channel actually applied.
fn switch_channel(ctx: &CommandContext<'_>, player: &dyn ChatPlayer, channel: Channel) -> Channel {
    let preferences = &ctx.state.preferences;

    if preferences.speak_channel(player) == channel {
        let applied = preferences.set_speak_channel_exclusive(player, channel);
        ctx.notify(
            messages::CHANNEL_ALREADY,
            &[("channel", applied.display_name().to_string())],
        );
        return applied;
    }

    let applied = preferences.set_speak_channel_exclusive(player, channel);
    ctx.notify(
        messages::channel_switched(applied),
        &[("channel", applied.display_name().to_string())],
    );
    info!(player = %player.name(), channel = %applied, "switched speak channel");
    applied
}

fn listen(ctx: &CommandContext<'_>, args: &[&str]) -> ChatResult<()> {
    let player = ctx.player()?;

    let Some(channel) = args.first().and_then(|name| parse_listen_channel(name)) else {
        ctx.send_raw(LISTEN_USAGE);
        return Ok(());
    };
    if channel.requires_staff() && !player.has_permission(STAFF_PERMISSION) {
        return Err(ChatError::PermissionDenied);
    }

    let desired = match args.get(1) {
        None => None,
        Some(state) => match parse_toggle(state) {
            Some(enable) => Some(enable),
            None => {
                ctx.send_raw(LISTEN_USAGE);
                return Ok(());
            }
        },
    };

    let preferences = &ctx.state.preferences;
    let speaking = preferences.speak_channel(player.as_ref());
    let enabled = match desired {
        Some(enable) => {
            preferences.set_listening(player.as_ref(), channel, enable)?;
            preferences.is_listening(player.as_ref(), channel)
        }
        None => preferences.toggle_listening(player.as_ref(), channel)?,
    };

    let name = [("channel", channel.display_name().to_string())];
    if enabled {
        ctx.notify(messages::CHANNEL_LISTEN_ENABLED, &name);
    } else {
        ctx.notify(messages::CHANNEL_LISTEN_DISABLED, &name);
        if speaking == channel {
            ctx.notify(
                messages::CHANNEL_SWITCHED_SERVER,
                &[("channel", Channel::Server.display_name().to_string())],
            );
        }
    }
    Ok(())
}

fn parse_listen_channel(name: &str) -> Option<Channel> {
    Channel::from_name(name).filter(|channel| *channel != Channel::Server)
}

fn parse_toggle(state: &str) -> Option<bool> {
    match state.to_lowercase().as_str() {
        "on" | "enable" | "true" => Some(true),
        "off" | "disable" | "false" => Some(false),
        _ => None,
    }
}

fn ignore(ctx: &CommandContext<'_>, target: Option<&str>) -> ChatResult<()> {
    let player = ctx.player()?;

    let Some(target_name) = target else {
        let names = ctx.state.ignores.ignored_names(player.id());
        if names.is_empty() {
            ctx.notify(messages::IGNORED_LIST_EMPTY, &[]);
        } else {
            ctx.notify(messages::IGNORED_LIST, &[("list", names.join(", "))]);
        }
        return Ok(());
    };

    if player.name().eq_ignore_ascii_case(target_name) {
        return Err(ChatError::CannotIgnoreSelf);
    }
    let target = ctx
        .host
        .player_by_name(target_name)
        .ok_or_else(|| ChatError::PlayerNotFound {
            name: target_name.to_string(),
        })?;
    if target.has_permission(STAFF_PERMISSION) {
        return Err(ChatError::CannotIgnoreStaff);
    }

    let name = target.name();
    let now_ignoring = ctx.state.ignores.toggle(player.id(), target.id(), &name);
    info!(player = %player.name(), target = %name, ignoring = now_ignoring, "ignore toggled");

    let key = if now_ignoring {
        messages::IGNORED_ADD
    } else {
        messages::IGNORED_REMOVE
    };
    ctx.notify(key, &[("target", name)]);
    Ok(())
}

fn alert(ctx: &CommandContext<'_>, message: &[&str]) -> ChatResult<()> {
    if !ctx.source.has_permission(STAFF_PERMISSION) {
        return Err(ChatError::PermissionDenied);
    }
    if message.is_empty() {
        return Err(ChatError::MissingMessage);
    }

    ctx.router.alert(ctx.source, &join_args(message));
    ctx.notify(messages::ALERT_SENT, &[]);
    Ok(())
}

/// Completions for the argument being typed (the last one in `args`).
pub fn suggest(host: &dyn ProxyHost, args: &[&str]) -> Vec<String> {
    match args {
        [] => complete_options(&SUB_COMMANDS, ""),
        [verb] => complete_options(&SUB_COMMANDS, verb),
        [verb, prefix] if verb.eq_ignore_ascii_case("ignore") => complete_names(host, prefix),
        [verb, prefix] if verb.eq_ignore_ascii_case("listen") => {
            complete_options(&["network", "staff"], prefix)
        }
        [verb, _, prefix] if verb.eq_ignore_ascii_case("listen") => {
            complete_options(&["on", "off"], prefix)
        }
        _ => Vec::new(),
    }
}
