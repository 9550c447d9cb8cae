//! Message formatting for display.
//!
//! Handles `{placeholder}` substitution in message templates. Substitution is
//! a single left-to-right pass, so placeholder-looking text inside a
//! substituted value (a player's message, say) is never expanded again.
//! `{time}` is always available and renders the local time as HH:MM:SS.

use std::borrow::Cow;

use chrono::Local;

/// Message formatter that substitutes placeholders in a template.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    /// Template for this formatter.
    template: String,
}

impl MessageFormatter {
    /// Create a new formatter with the given template.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Format a message with the given context.
    ///
    /// Unknown placeholders and unbalanced braces are kept verbatim.
    pub fn format(&self, ctx: &FormatContext) -> String {
        let mut out = String::with_capacity(self.template.len() + 32);
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            let Some(close) = after.find('}') else {
                out.push_str(&rest[open..]);
                return out;
            };

            match ctx.lookup(&after[..close]) {
                Some(value) => {
                    out.push_str(&value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }

    /// Get the template string.
    pub fn template(&self) -> &str {
        &self.template
    }
}

/// Placeholder values for a single render.
#[derive(Debug, Clone, Default)]
pub struct FormatContext {
    values: Vec<(String, String)>,
}

impl FormatContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a placeholder value, replacing an earlier one with the same name.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
        self
    }

    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| Cow::Borrowed(v.as_str()))
            .or_else(|| (name == "time").then(|| Cow::Owned(get_time())))
    }
}

/// Get the current time as HH:MM:SS string.
fn get_time() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_format() {
        let formatter = MessageFormatter::new("{player}: {message}");
        let ctx = FormatContext::new()
            .with("player", "Alex")
            .with("message", "Hello world!");

        assert_eq!(formatter.format(&ctx), "Alex: Hello world!");
    }

    #[test]
    fn test_repeated_placeholder() {
        let formatter = MessageFormatter::new("{player} says {message}, {player} out");
        let ctx = FormatContext::new().with("player", "Alex").with("message", "hi");

        assert_eq!(formatter.format(&ctx), "Alex says hi, Alex out");
    }

    #[test]
    fn test_values_are_not_expanded() {
        let formatter = MessageFormatter::new("{player}: {message} [{server}]");
        let ctx = FormatContext::new()
            .with("player", "Alex")
            .with("message", "my {server} is {player}")
            .with("server", "lobby");

        assert_eq!(formatter.format(&ctx), "Alex: my {server} is {player} [lobby]");
    }

    #[test]
    fn test_unknown_placeholders_kept() {
        let formatter = MessageFormatter::new("{{player}} {rank} {message");
        let ctx = FormatContext::new().with("player", "Alex");

        assert_eq!(formatter.format(&ctx), "{Alex} {rank} {message");
    }

    #[test]
    fn test_later_value_wins() {
        let formatter = MessageFormatter::new("{target}");
        let ctx = FormatContext::new().with("target", "a").with("target", "b");

        assert_eq!(formatter.format(&ctx), "b");
    }

    #[test]
    fn test_format_with_time() {
        let formatter = MessageFormatter::new("[{time}] {player}");
        let ctx = FormatContext::new().with("player", "Alex");
        let result = formatter.format(&ctx);

        // [HH:MM:SS] Alex
        assert!(result.ends_with("] Alex"));
        assert_eq!(result.len(), "[00:00:00] Alex".len());
    }

    #[test]
    fn test_template_accessor() {
        assert_eq!(MessageFormatter::new("{message}").template(), "{message}");
    }
}
