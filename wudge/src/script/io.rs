//! Line I/O boundary.
//!
//! The interpreter never touches stdin/stdout directly; `ask` and `print`
//! go through a [`LineIo`].  [`Console`] wraps any `BufRead`/`Write` pair
//! (stdin/stdout in the binary), [`ScriptedIo`] feeds canned input and
//! collects output for tests and harnesses.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// The two capabilities the interpreter needs from its environment.
pub trait LineIo {
    /// Block until one line of input is available.  `Ok(None)` means the
    /// input is exhausted.  The line terminator is not included.
    fn read_line(&mut self) -> io::Result<Option<String>>;

    /// Emit one line of output.
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

impl<T: LineIo + ?Sized> LineIo for &mut T {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        (**self).read_line()
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }
}

// ── Console ───────────────────────────────────────────────────────────────────

/// Line I/O over a reader/writer pair.
#[derive(Debug)]
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    /// Console bound to the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> LineIo for Console<R, W> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        // Prompts are written without waiting for a newline from us, so make
        // sure they are visible before blocking.
        self.output.flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        let trimmed = buf.strip_suffix('\n').unwrap_or(&buf);
        let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
        Ok(Some(trimmed.to_owned()))
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")?;
        self.output.flush()
    }
}

// ── ScriptedIo ────────────────────────────────────────────────────────────────

/// In-memory line I/O: input comes from a queue, output is recorded.
#[derive(Debug, Default, Clone)]
pub struct ScriptedIo {
    input: VecDeque<String>,
    /// Every line written so far, in order.
    pub output: Vec<String>,
}

impl ScriptedIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the given input lines.
    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            output: Vec::new(),
        }
    }

    /// Queue one more input line.
    pub fn push_input(&mut self, line: impl Into<String>) {
        self.input.push_back(line.into());
    }

    /// Number of input lines not yet consumed.
    pub fn pending_input(&self) -> usize {
        self.input.len()
    }
}

impl LineIo for ScriptedIo {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.input.pop_front())
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.output.push(line.to_owned());
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
