//! The action language scripts are written in.
//!
//! A script is a line-oriented program: one action per line, blank lines
//! and `#` comments ignored. The first word names the action, the rest of
//! the line is its argument text. Surrounding double quotes on an argument
//! are stripped, and `$arg` in text-bearing arguments substitutes the
//! invocation argument.
//!
//! The language replaces the dynamic code evaluation a scriptable keyboard
//! would otherwise need: actions are parsed into [`Action`] values and
//! interpreted by a fixed dispatcher that can only reach the injected
//! capabilities.

use thiserror::Error;

/// Default strftime format for the `date` action (DD.MM.YYYY).
pub const DEFAULT_DATE_FORMAT: &str = "%d.%m.%Y";

/// Default strftime format for the `time` action.
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";

const DEFAULT_PASSWORD_LENGTH: usize = 12;
const MAX_PASSWORD_LENGTH: usize = 128;
const DEFAULT_RANDOM_MIN: i64 = 1;
const DEFAULT_RANDOM_MAX: i64 = 100;

/// A single parsed script action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Type literal text.
    Type { text: String },
    /// Type the current date, strftime-formatted.
    InsertDate { format: String },
    /// Type the current time, strftime-formatted.
    InsertTime { format: String },
    /// Type a random emoji from the panel set.
    InsertEmoji,
    /// Type a random integer from the inclusive range.
    InsertRandom { min: i64, max: i64 },
    /// Generate a random password, type it, and notify.
    GeneratePassword { length: usize },
    /// Evaluate a math expression and type the result.
    Calculate { expression: String },
    /// Send one or more backspace key events.
    Backspace { count: u32 },
    /// Send an enter key event.
    Enter,
    /// Show a transient notification.
    Notify { text: String },
    /// Execute another stored script by id.
    Run { script_id: String },
    /// Start native voice input, or notify that it is unavailable.
    VoiceInput,
}

/// Parse failure with the offending 1-based line number.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Parse script code into its action sequence.
///
/// `argument` is the invocation argument substituted for `$arg`; pass an
/// empty string when the script was invoked without one.
pub fn parse(code: &str, argument: &str) -> Result<Vec<Action>, ParseError> {
    let mut actions = Vec::new();

    for (idx, raw_line) in code.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };

        let action = match word.to_ascii_lowercase().as_str() {
            "type" => Action::Type {
                text: text_argument(rest, argument, line_no, "type")?,
            },
            "date" => Action::InsertDate {
                format: format_argument(rest, DEFAULT_DATE_FORMAT),
            },
            "time" => Action::InsertTime {
                format: format_argument(rest, DEFAULT_TIME_FORMAT),
            },
            "emoji" => bare(rest, line_no, "emoji", Action::InsertEmoji)?,
            "random" => parse_random(rest, line_no)?,
            "password" => parse_password(rest, line_no)?,
            "calc" => Action::Calculate {
                expression: text_argument(rest, argument, line_no, "calc")?,
            },
            "backspace" => parse_backspace(rest, line_no)?,
            "enter" => bare(rest, line_no, "enter", Action::Enter)?,
            "notify" => Action::Notify {
                text: text_argument(rest, argument, line_no, "notify")?,
            },
            "run" => parse_run(rest, line_no)?,
            "voice" => bare(rest, line_no, "voice", Action::VoiceInput)?,
            other => {
                return Err(ParseError::new(
                    line_no,
                    format!("unknown action '{other}'"),
                ))
            }
        };
        actions.push(action);
    }

    Ok(actions)
}

/// Strip one pair of surrounding double quotes, if present.
fn unquote(text: &str) -> &str {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

fn text_argument(
    rest: &str,
    argument: &str,
    line: usize,
    action: &str,
) -> Result<String, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::new(line, format!("{action} requires text")));
    }
    Ok(unquote(rest).replace("$arg", argument))
}

fn format_argument(rest: &str, default: &str) -> String {
    if rest.is_empty() {
        default.to_string()
    } else {
        unquote(rest).to_string()
    }
}

fn bare(rest: &str, line: usize, action: &str, parsed: Action) -> Result<Action, ParseError> {
    if rest.is_empty() {
        Ok(parsed)
    } else {
        Err(ParseError::new(
            line,
            format!("{action} takes no argument"),
        ))
    }
}

fn parse_random(rest: &str, line: usize) -> Result<Action, ParseError> {
    if rest.is_empty() {
        return Ok(Action::InsertRandom {
            min: DEFAULT_RANDOM_MIN,
            max: DEFAULT_RANDOM_MAX,
        });
    }
    let parts: Vec<&str> = rest.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(ParseError::new(line, "random takes 'min max'"));
    }
    let min: i64 = parts[0]
        .parse()
        .map_err(|_| ParseError::new(line, format!("bad number '{}'", parts[0])))?;
    let max: i64 = parts[1]
        .parse()
        .map_err(|_| ParseError::new(line, format!("bad number '{}'", parts[1])))?;
    if min > max {
        return Err(ParseError::new(line, "random range is empty"));
    }
    Ok(Action::InsertRandom { min, max })
}

fn parse_password(rest: &str, line: usize) -> Result<Action, ParseError> {
    if rest.is_empty() {
        return Ok(Action::GeneratePassword {
            length: DEFAULT_PASSWORD_LENGTH,
        });
    }
    let length: usize = rest
        .parse()
        .map_err(|_| ParseError::new(line, format!("bad password length '{rest}'")))?;
    if length == 0 || length > MAX_PASSWORD_LENGTH {
        return Err(ParseError::new(
            line,
            format!("password length must be 1..={MAX_PASSWORD_LENGTH}"),
        ));
    }
    Ok(Action::GeneratePassword { length })
}

fn parse_backspace(rest: &str, line: usize) -> Result<Action, ParseError> {
    if rest.is_empty() {
        return Ok(Action::Backspace { count: 1 });
    }
    let count: u32 = rest
        .parse()
        .map_err(|_| ParseError::new(line, format!("bad backspace count '{rest}'")))?;
    if count == 0 {
        return Err(ParseError::new(line, "backspace count must be positive"));
    }
    Ok(Action::Backspace { count })
}

fn parse_run(rest: &str, line: usize) -> Result<Action, ParseError> {
    if rest.is_empty() || rest.split_whitespace().count() != 1 {
        return Err(ParseError::new(line, "run takes a single script id"));
    }
    Ok(Action::Run {
        script_id: rest.to_string(),
    })
}
