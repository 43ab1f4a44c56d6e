//! Runtime error type.
//!
//! Every error is fatal: the interpreter moves to
//! [`State::Failed`](super::interp::State::Failed) and stops.  Each variant
//! names the 1-indexed line of the statement that caused it.

use std::fmt;

use super::stmt::ParseError;

/// Why a Wudge program stopped abnormally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// The line at the program counter is not a valid statement.
    Parse(ParseError),
    /// A `jump` or skipped `if` block sent control outside `1..=len + 1`.
    ControlFlow { line: usize, target: usize },
    /// `ask` found no more input.
    InputClosed { line: usize },
    /// The I/O boundary failed while reading or writing.
    Io { line: usize, message: String },
}

impl ScriptError {
    /// The line that caused the error.
    pub fn line(&self) -> usize {
        match self {
            ScriptError::Parse(e) => e.line,
            ScriptError::ControlFlow { line, .. }
            | ScriptError::InputClosed { line }
            | ScriptError::Io { line, .. } => *line,
        }
    }

    pub(crate) fn io(line: usize, err: std::io::Error) -> Self {
        ScriptError::Io {
            line,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Parse(e) => write!(f, "{e}"),
            ScriptError::ControlFlow { line, target } => {
                write!(f, "line {line}: control transferred to line {target}, outside the program")
            }
            ScriptError::InputClosed { line } => {
                write!(f, "line {line}: input closed while waiting for `ask`")
            }
            ScriptError::Io { line, message } => write!(f, "line {line}: I/O error: {message}"),
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScriptError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for ScriptError {
    fn from(e: ParseError) -> Self {
        ScriptError::Parse(e)
    }
}
