//! Loaded program text.
//!
//! A [`Program`] is the immutable, 1-indexed list of source lines.  Lines are
//! parsed lazily the first time execution reaches them (a line inside a
//! skipped block is never parsed at all) and the result is cached per line.
//! The cache is built from [`OnceLock`]s, so one `Arc<Program>` can back any
//! number of interpreters, on any number of threads.

use std::path::Path;
use std::sync::OnceLock;

use super::stmt::{parse_line, ParseError, ParseErrorKind, Stmt};

/// What a source line means once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Stmt(Stmt),
    /// Blank or `#` comment line in lenient mode.
    Nop,
}

/// An immutable Wudge program.
#[derive(Debug)]
pub struct Program {
    lines: Vec<String>,
    lenient: bool,
    parsed: Vec<OnceLock<Result<Line, ParseError>>>,
}

impl Program {
    /// Split `src` into lines.
    ///
    /// A single final newline does not start another line; every other line,
    /// blank or not, keeps its number and counts toward the length.  With
    /// `lenient` set, blank lines and lines starting with `#` are accepted as
    /// no-ops.
    pub fn from_source(src: &str, lenient: bool) -> Self {
        let lines: Vec<String> = src.lines().map(str::to_owned).collect();
        let parsed = lines.iter().map(|_| OnceLock::new()).collect();
        Self {
            lines,
            lenient,
            parsed,
        }
    }

    /// Read and split a source file.
    pub fn load(path: &Path, lenient: bool) -> std::io::Result<Self> {
        let src = std::fs::read_to_string(path)?;
        Ok(Self::from_source(&src, lenient))
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    /// Raw text of line `n` (1-indexed).
    pub fn source(&self, n: usize) -> Option<&str> {
        self.lines.get(n.checked_sub(1)?).map(String::as_str)
    }

    /// Parsed form of line `n` (1-indexed), or `None` if out of range.
    pub fn line(&self, n: usize) -> Option<Result<&Line, &ParseError>> {
        let idx = n.checked_sub(1)?;
        let raw = self.lines.get(idx)?;
        let cached = self.parsed[idx].get_or_init(|| self.parse(raw, n));
        Some(cached.as_ref())
    }

    /// Parse every line and collect all failures, without running anything.
    pub fn check(&self) -> Vec<ParseError> {
        (1..=self.len())
            .filter_map(|n| match self.line(n) {
                Some(Err(e)) => Some(e.clone()),
                _ => None,
            })
            .collect()
    }

    fn parse(&self, raw: &str, n: usize) -> Result<Line, ParseError> {
        let trimmed = raw.trim();
        if self.lenient && (trimmed.is_empty() || trimmed.starts_with('#')) {
            return Ok(Line::Nop);
        }
        parse_line(trimmed, n).map(Line::Stmt)
    }
}

/// `true` if the error is one lenient mode would have accepted.
pub fn is_blank_error(e: &ParseError) -> bool {
    matches!(e.kind, ParseErrorKind::Empty)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
