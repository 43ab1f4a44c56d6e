//! Wudge statement model and line parser.
//!
//! A Wudge program is one statement per line.  Each line is parsed on its
//! own, independent of its neighbours; there are no continuation lines and
//! no block terminators.  The six statement shapes are:
//!
//! | Shape | Statement |
//! |-------|-----------|
//! | `set <name> {<literal>}` | [`Stmt::Set`] |
//! | `ask <name> <name>` | [`Stmt::Ask`] |
//! | `print <name>` | [`Stmt::Print`] |
//! | `jump <int>` | [`Stmt::Jump`] |
//! | `replace <name> [<find>/<replace>],… to <name>` | [`Stmt::Replace`] |
//! | `if <name> found [<pattern>] do <int>` | [`Stmt::If`] |

use std::sync::OnceLock;

use regex::Regex;

use crate::pattern::Substitution;

/// A parsed Wudge statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `set var {literal}`
    Set { var: String, literal: String },
    /// `ask prompt target` — show `prompt`'s value, read a line into `target`.
    Ask { prompt: String, target: String },
    /// `print var`
    Print { var: String },
    /// `jump line` — absolute, 1-indexed.
    Jump { target: usize },
    /// `replace src [find/replace],… to dest`
    Replace {
        src: String,
        subst: Substitution,
        dest: String,
    },
    /// `if var found [pattern] do count`
    If {
        var: String,
        pattern: String,
        count: usize,
    },
}

impl Stmt {
    /// The command keyword that introduces this statement.
    pub fn keyword(&self) -> &'static str {
        match self {
            Stmt::Set { .. } => "set",
            Stmt::Ask { .. } => "ask",
            Stmt::Print { .. } => "print",
            Stmt::Jump { .. } => "jump",
            Stmt::Replace { .. } => "replace",
            Stmt::If { .. } => "if",
        }
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// Why a line failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Blank line.
    Empty,
    /// First word is not one of the six commands.
    UnknownCommand(String),
    /// Known command, wrong shape.
    Malformed { command: &'static str },
    /// Jump target or block length that is not a valid decimal integer.
    BadInteger(String),
    /// `replace` pair list that is not `[find/replace],…`.
    BadPairList(String),
}

/// A parse failure on a specific (1-indexed) line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: ", self.line)?;
        match &self.kind {
            ParseErrorKind::Empty => write!(f, "empty line"),
            ParseErrorKind::UnknownCommand(cmd) => write!(f, "unknown command `{cmd}`"),
            ParseErrorKind::Malformed { command } => {
                write!(f, "malformed `{command}`, expected `{}`", usage(command))
            }
            ParseErrorKind::BadInteger(s) => write!(f, "`{s}` is not a positive integer"),
            ParseErrorKind::BadPairList(s) => write!(f, "bad replacement list: {s}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Usage string for a command keyword.
pub fn usage(command: &str) -> &'static str {
    match command {
        "set" => "set <name> {<literal>}",
        "ask" => "ask <name> <name>",
        "print" => "print <name>",
        "jump" => "jump <line>",
        "replace" => "replace <name> [<find>/<replace>],... to <name>",
        "if" => "if <name> found [<pattern>] do <count>",
        _ => "",
    }
}

// ── Parser ────────────────────────────────────────────────────────────────────

struct Shapes {
    set: Regex,
    ask: Regex,
    print: Regex,
    jump: Regex,
    replace: Regex,
    if_found: Regex,
}

fn shapes() -> &'static Shapes {
    static SHAPES: OnceLock<Shapes> = OnceLock::new();
    SHAPES.get_or_init(|| {
        // The patterns are literals; a failure here is a programming error.
        let re = |src: &str| Regex::new(src).unwrap_or_else(|e| panic!("bad shape {src}: {e}"));
        Shapes {
            // Greedy `.*` anchored on `\}$` spans first `{` to last `}`.
            set: re(r"^set\s+(\w+)\s+\{(.*)\}$"),
            ask: re(r"^ask\s+(\w+)\s+(\w+)$"),
            print: re(r"^print\s+(\w+)$"),
            jump: re(r"^jump\s+(\S+)$"),
            replace: re(r"^replace\s+(\w+)\s+(?:(.*?)\s+)?to\s+(\w+)$"),
            if_found: re(r"^if\s+(\w+)\s+found\s+\[([^\]]*)\]\s+do\s+(\S+)$"),
        }
    })
}

/// Parse one source line.  `lineno` is only used for error reporting.
///
/// Leading and trailing whitespace is ignored; whitespace inside a `set`
/// literal or a bracketed pattern is kept as written.
pub fn parse_line(raw: &str, lineno: usize) -> Result<Stmt, ParseError> {
    let err = |kind| ParseError { line: lineno, kind };
    let line = raw.trim();
    let keyword = line.split_whitespace().next().ok_or(err(ParseErrorKind::Empty))?;
    let shapes = shapes();

    let malformed = |command: &'static str| err(ParseErrorKind::Malformed { command });

    match keyword {
        "set" => {
            let caps = shapes.set.captures(line).ok_or_else(|| malformed("set"))?;
            Ok(Stmt::Set {
                var: caps[1].to_owned(),
                literal: caps[2].to_owned(),
            })
        }
        "ask" => {
            let caps = shapes.ask.captures(line).ok_or_else(|| malformed("ask"))?;
            Ok(Stmt::Ask {
                prompt: caps[1].to_owned(),
                target: caps[2].to_owned(),
            })
        }
        "print" => {
            let caps = shapes.print.captures(line).ok_or_else(|| malformed("print"))?;
            Ok(Stmt::Print {
                var: caps[1].to_owned(),
            })
        }
        "jump" => {
            let caps = shapes.jump.captures(line).ok_or_else(|| malformed("jump"))?;
            // Range is checked when the jump runs, so `jump 0` parses.
            let target = parse_number(&caps[1]).map_err(err)?;
            Ok(Stmt::Jump { target })
        }
        "replace" => {
            let caps = shapes
                .replace
                .captures(line)
                .ok_or_else(|| malformed("replace"))?;
            let list = caps.get(2).map_or("", |m| m.as_str());
            let pairs = parse_pairs(list).map_err(|msg| err(ParseErrorKind::BadPairList(msg)))?;
            Ok(Stmt::Replace {
                src: caps[1].to_owned(),
                subst: Substitution::new(pairs),
                dest: caps[3].to_owned(),
            })
        }
        "if" => {
            let caps = shapes.if_found.captures(line).ok_or_else(|| malformed("if"))?;
            let count = parse_positive(&caps[3]).map_err(err)?;
            Ok(Stmt::If {
                var: caps[1].to_owned(),
                pattern: caps[2].to_owned(),
                count,
            })
        }
        other => Err(err(ParseErrorKind::UnknownCommand(other.to_owned()))),
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Parse a plain decimal integer: digits only, no sign.
fn parse_number(s: &str) -> Result<usize, ParseErrorKind> {
    match s.parse::<usize>() {
        Ok(n) if s.bytes().all(|b| b.is_ascii_digit()) => Ok(n),
        _ => Err(ParseErrorKind::BadInteger(s.to_owned())),
    }
}

/// Parse a decimal integer ≥ 1.
fn parse_positive(s: &str) -> Result<usize, ParseErrorKind> {
    match parse_number(s)? {
        0 => Err(ParseErrorKind::BadInteger(s.to_owned())),
        n => Ok(n),
    }
}

/// Parse `[f1/r1],[f2/r2],…` into pairs.
///
/// `find` runs to the first `/` inside the bracket and `replace` to the next
/// `]`, so `find` cannot contain `/` and `replace` cannot contain `]`.
/// Whitespace is allowed around the separating commas.  An empty list is
/// valid and yields no pairs.
fn parse_pairs(list: &str) -> Result<Vec<(String, String)>, String> {
    let mut pairs = Vec::new();
    let mut rest = list.trim();
    if rest.is_empty() {
        return Ok(pairs);
    }

    loop {
        let body = rest
            .strip_prefix('[')
            .ok_or_else(|| format!("expected `[` at `{rest}`"))?;
        let slash = body
            .find('/')
            .ok_or_else(|| format!("missing `/` in `[{body}`"))?;
        let (find, after) = (&body[..slash], &body[slash + 1..]);
        let close = after
            .find(']')
            .ok_or_else(|| format!("missing `]` after `{find}/`"))?;
        pairs.push((find.to_owned(), after[..close].to_owned()));

        rest = after[close + 1..].trim_start();
        if rest.is_empty() {
            return Ok(pairs);
        }
        rest = rest
            .strip_prefix(',')
            .ok_or_else(|| format!("expected `,` at `{rest}`"))?
            .trim_start();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
