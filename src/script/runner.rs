//! Script execution.
//!
//! The runner resolves an id through the store, parses the code, and
//! interprets the actions with exactly two injected capabilities: the
//! [`Keyboard`] text-input surface and the store itself (for `run`).
//! A failing script is contained here — the failure is logged with the
//! script's name, surfaced as a single notification, and reported in the
//! returned [`RunReport`]. It never propagates to the caller.

use chrono::format::{Item, StrftimeItems};
use chrono::Local;
use rand::Rng;

use super::builtins::EMOJI_PANEL;
use super::lang::{self, Action};
use super::store::ScriptStore;
use crate::error::{ScriptError, ScriptResult};
use crate::keyboard::Keyboard;

const DEFAULT_MAX_RUN_DEPTH: usize = 4;

const PASSWORD_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

/// Outcome of one script run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Whether the script ran to completion.
    pub success: bool,
    /// Number of actions performed, including nested `run` actions.
    pub steps: usize,
    /// Failure message when `success` is false.
    pub error: Option<String>,
}

/// Executes scripts against a store and a keyboard capability.
pub struct Runner {
    max_run_depth: usize,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    pub fn new() -> Self {
        Self {
            max_run_depth: DEFAULT_MAX_RUN_DEPTH,
        }
    }

    /// Runner with an explicit `run` nesting limit.
    pub fn with_max_run_depth(max_run_depth: usize) -> Self {
        Self { max_run_depth }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::with_max_run_depth(config.scripts.max_run_depth)
    }

    /// Execute a script by id with no invocation argument.
    pub fn execute(
        &self,
        store: &ScriptStore,
        keyboard: &mut dyn Keyboard,
        id: &str,
    ) -> ScriptResult<RunReport> {
        self.execute_with_argument(store, keyboard, id, None)
    }

    /// Execute a script by id, substituting `argument` for `$arg`.
    ///
    /// Unknown ids report [`ScriptError::NotFound`]. A script failure does
    /// not: it is logged, notified once, and returned inside the report.
    pub fn execute_with_argument(
        &self,
        store: &ScriptStore,
        keyboard: &mut dyn Keyboard,
        id: &str,
        argument: Option<&str>,
    ) -> ScriptResult<RunReport> {
        let script = store
            .get(id)
            .ok_or_else(|| ScriptError::NotFound(id.to_string()))?;

        log::info!("running script: {} ({id})", script.name);
        let mut steps = 0;
        match self.run_code(store, keyboard, &script.code, argument.unwrap_or(""), 0, &mut steps) {
            Ok(()) => Ok(RunReport {
                success: true,
                steps,
                error: None,
            }),
            Err(message) => {
                let failure = ScriptError::ExecutionFailure {
                    name: script.name.clone(),
                    message: message.clone(),
                };
                log::error!("{failure}");
                keyboard.show_notification(&format!("Script error: {}", script.name));
                Ok(RunReport {
                    success: false,
                    steps,
                    error: Some(message),
                })
            }
        }
    }

    fn run_code(
        &self,
        store: &ScriptStore,
        keyboard: &mut dyn Keyboard,
        code: &str,
        argument: &str,
        depth: usize,
        steps: &mut usize,
    ) -> Result<(), String> {
        if depth > self.max_run_depth {
            return Err(format!("run depth limit ({}) exceeded", self.max_run_depth));
        }

        let actions = lang::parse(code, argument).map_err(|e| e.to_string())?;
        for action in actions {
            self.perform(store, keyboard, action, depth, steps)?;
            *steps += 1;
        }
        Ok(())
    }

    fn perform(
        &self,
        store: &ScriptStore,
        keyboard: &mut dyn Keyboard,
        action: Action,
        depth: usize,
        steps: &mut usize,
    ) -> Result<(), String> {
        match action {
            Action::Type { text } => keyboard.type_text(&text),
            Action::InsertDate { format } | Action::InsertTime { format } => {
                keyboard.type_text(&format_now(&format)?);
            }
            Action::InsertEmoji => {
                let idx = rand::thread_rng().gen_range(0..EMOJI_PANEL.len());
                keyboard.type_text(EMOJI_PANEL[idx]);
            }
            Action::InsertRandom { min, max } => {
                let value = rand::thread_rng().gen_range(min..=max);
                keyboard.type_text(&value.to_string());
            }
            Action::GeneratePassword { length } => {
                let password = generate_password(length);
                keyboard.type_text(&password);
                keyboard.show_notification("Password generated");
            }
            Action::Calculate { expression } => match meval::eval_str(&expression) {
                Ok(value) if value.is_finite() => keyboard.type_text(&format_number(value)),
                _ => return Err(format!("could not evaluate '{expression}'")),
            },
            Action::Backspace { count } => {
                for _ in 0..count {
                    keyboard.send_backspace();
                }
            }
            Action::Enter => keyboard.send_enter(),
            Action::Notify { text } => keyboard.show_notification(&text),
            Action::Run { script_id } => {
                let script = store
                    .get(&script_id)
                    .ok_or_else(|| format!("script '{script_id}' not found"))?;
                // Nested runs don't inherit the invocation argument
                self.run_code(store, keyboard, &script.code, "", depth + 1, steps)?;
            }
            Action::VoiceInput => {
                if !keyboard.start_voice_input() {
                    keyboard.show_notification("Voice input is not available");
                }
            }
        }
        Ok(())
    }
}

/// Format the current local time, rejecting invalid strftime input instead
/// of panicking inside the formatter.
fn format_now(format: &str) -> Result<String, String> {
    let items: Vec<Item> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(format!("invalid time format '{format}'"));
    }
    Ok(Local::now().format_with_items(items.into_iter()).to_string())
}

fn generate_password(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| PASSWORD_CHARS[rng.gen_range(0..PASSWORD_CHARS.len())] as char)
        .collect()
}

/// Trim a whole-valued float to its integer form ("4" instead of "4.0").
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
