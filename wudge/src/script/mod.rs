//! Wudge scripting language.
//!
//! A Wudge program is one statement per line over string variables:
//!
//! - `set`, `ask` and `print` move text between literals, the console and
//!   variables
//! - `replace` rewrites a variable with simultaneous find/replace pairs
//! - `jump` and `if … found … do` are the only control flow
//!
//! # Quick start
//!
//! ```rust
//! use wudge::script::{Interpreter, ScriptedIo, State};
//!
//! let mut interp = Interpreter::from_source("set x {Hello, world!}\nprint x");
//! let mut io = ScriptedIo::new();
//! interp.run(&mut io).unwrap();
//! assert_eq!(io.output, vec!["Hello, world!"]);
//! assert_eq!(interp.state(), &State::Terminated);
//! ```

pub mod error;
pub mod interp;
pub mod io;
pub mod program;
pub mod stmt;

// Re-exports for convenience.
pub use error::ScriptError;
pub use interp::{Interpreter, Options, ReplaceMode, State};
pub use io::{Console, LineIo, ScriptedIo};
pub use program::Program;
pub use stmt::{parse_line, ParseError, Stmt};
