//! Built-in script definitions.
//!
//! The built-in set is re-derived from this fixed definition on every
//! startup and is never persisted. User scripts cannot take over a
//! built-in id: the store drops duplicate ids on insert.

use super::store::Script;

/// Icon used for scripts that don't declare one.
pub(crate) const DEFAULT_ICON: &str = "📜";

/// Emoji set behind the `emoji` action and the emoji panel built-in.
pub(crate) static EMOJI_PANEL: &[&str] = &[
    "😀", "😂", "😍", "🤔", "👍", "👎", "❤️", "🔥", "💯", "🎉",
];

/// The fixed built-in script set.
pub(crate) fn default_scripts() -> Vec<Script> {
    vec![
        Script::builtin(
            "voice_input",
            "Voice input",
            "🎤",
            "Start speech recognition",
            "voice",
        ),
        Script::builtin(
            "emoji_panel",
            "Emoji panel",
            "😀",
            "Insert a random emoji",
            "emoji",
        ),
        Script::builtin(
            "current_time",
            "Current time",
            "🕐",
            "Insert the current time",
            "time",
        ),
        Script::builtin(
            "password_generator",
            "Password generator",
            "🔐",
            "Generate a random password",
            "password 12",
        ),
        Script::builtin(
            "calculator",
            "Calculator",
            "🧮",
            "Evaluate a typed expression",
            "calc $arg",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_ids_are_distinct() {
        let scripts = default_scripts();
        let ids: HashSet<_> = scripts.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), scripts.len());
    }

    #[test]
    fn test_builtins_are_not_user_created() {
        assert!(default_scripts().iter().all(|s| !s.user_created));
    }

    #[test]
    fn test_builtin_codes_parse() {
        for script in default_scripts() {
            crate::script::lang::parse(&script.code, "1+1")
                .unwrap_or_else(|e| panic!("builtin '{}' failed to parse: {e}", script.id));
        }
    }
}
