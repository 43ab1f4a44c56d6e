//! Wudge interpreter.
//!
//! The [`Interpreter`] owns the variable store and the program counter and
//! runs a fetch → parse → dispatch loop over a shared [`Program`].  Control
//! flow is a small state machine:
//!
//! ```text
//! Running(pc) ──step──▶ Running(next) | Terminated | Failed(err)
//! ```
//!
//! `Terminated` is reached exactly when control moves one line past the end
//! of the program.  Moving anywhere else outside the program is a
//! [`ScriptError::ControlFlow`].  Both terminal states are absorbing.
//!
//! `if var found [pattern] do n` is resolved in one step: on a hit control
//! falls through into the next `n` lines; on a miss it skips straight past
//! them.  Skipped lines are never parsed.

use std::str::FromStr;
use std::sync::Arc;

use log::{debug, trace, warn};

use crate::var::VarStore;
use super::{
    error::ScriptError,
    io::LineIo,
    program::{Line, Program},
    stmt::Stmt,
};

// ── Options ───────────────────────────────────────────────────────────────────

/// How `replace … to dest` stores its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplaceMode {
    /// `dest` is overwritten with the result.
    #[default]
    Overwrite,
    /// The result is appended to `dest`'s current value.
    Append,
}

impl FromStr for ReplaceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(ReplaceMode::Overwrite),
            "append" => Ok(ReplaceMode::Append),
            other => Err(format!("unknown replace mode `{other}` (expected overwrite or append)")),
        }
    }
}

/// Per-run interpreter options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub replace_mode: ReplaceMode,
}

// ── State ─────────────────────────────────────────────────────────────────────

/// Where execution stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    /// About to execute this (valid, 1-indexed) line.
    Running(usize),
    /// Control moved one line past the end of the program.
    Terminated,
    /// Stopped on an error.
    Failed(ScriptError),
}

impl State {
    pub fn is_running(&self) -> bool {
        matches!(self, State::Running(_))
    }
}

// ── Interpreter ───────────────────────────────────────────────────────────────

/// One run of a Wudge program.
#[derive(Debug)]
pub struct Interpreter {
    program: Arc<Program>,
    vars: VarStore,
    options: Options,
    state: State,
    steps: u64,
}

impl Interpreter {
    pub fn new(program: Arc<Program>) -> Self {
        Self::with_options(program, Options::default())
    }

    pub fn with_options(program: Arc<Program>, options: Options) -> Self {
        // An empty program is already one past its last line.
        let state = if program.is_empty() {
            State::Terminated
        } else {
            State::Running(1)
        };
        Self {
            program,
            vars: VarStore::new(),
            options,
            state,
            steps: 0,
        }
    }

    /// Build an interpreter straight from source text (strict dialect).
    pub fn from_source(src: &str) -> Self {
        Self::new(Arc::new(Program::from_source(src, false)))
    }

    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn vars(&self) -> &VarStore {
        &self.vars
    }

    /// Mutable access to the variables, e.g. to seed them before a run.
    pub fn vars_mut(&mut self) -> &mut VarStore {
        &mut self.vars
    }

    /// Number of statements executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Execute one statement.  Does nothing once execution has stopped.
    pub fn step<IO: LineIo + ?Sized>(&mut self, io: &mut IO) -> &State {
        let State::Running(pc) = self.state else {
            return &self.state;
        };
        self.steps += 1;
        self.state = match self.exec_line(pc, io) {
            Ok(next) => self.settle(pc, next),
            Err(e) => State::Failed(e),
        };
        if let State::Failed(e) = &self.state {
            warn!("{e}");
        }
        &self.state
    }

    /// Run until the program terminates or fails.
    pub fn run<IO: LineIo + ?Sized>(&mut self, io: &mut IO) -> Result<(), ScriptError> {
        while self.step(io).is_running() {}
        match &self.state {
            State::Failed(e) => Err(e.clone()),
            _ => Ok(()),
        }
    }

    /// Execute at most `max` statements; the result is still
    /// [`State::Running`] if the bound was hit first.
    pub fn run_steps<IO: LineIo + ?Sized>(&mut self, io: &mut IO, max: u64) -> &State {
        for _ in 0..max {
            if !self.step(io).is_running() {
                break;
            }
        }
        &self.state
    }

    /// Turn the next program counter chosen by line `from` into a state.
    fn settle(&self, from: usize, next: usize) -> State {
        let end = self.program.len() + 1;
        if next == end {
            debug!("line {from}: end of program");
            State::Terminated
        } else if next == 0 || next > end {
            State::Failed(ScriptError::ControlFlow { line: from, target: next })
        } else {
            State::Running(next)
        }
    }

    /// Fetch, parse and dispatch line `pc`; returns the next program counter.
    fn exec_line<IO: LineIo + ?Sized>(&mut self, pc: usize, io: &mut IO) -> Result<usize, ScriptError> {
        let program = Arc::clone(&self.program);
        let stmt = match program.line(pc) {
            Some(Ok(Line::Stmt(stmt))) => stmt,
            Some(Ok(Line::Nop)) => return Ok(pc + 1),
            Some(Err(e)) => return Err(e.clone().into()),
            // `settle` never leaves the counter outside the program.
            None => return Err(ScriptError::ControlFlow { line: pc, target: pc }),
        };
        trace!(
            "line {pc}: {} `{}`",
            stmt.keyword(),
            program.source(pc).unwrap_or_default()
        );
        self.dispatch(pc, stmt, io)
    }

    fn dispatch<IO: LineIo + ?Sized>(
        &mut self,
        pc: usize,
        stmt: &Stmt,
        io: &mut IO,
    ) -> Result<usize, ScriptError> {
        match stmt {
            Stmt::Set { var, literal } => {
                self.vars.set(var.as_str(), literal.as_str());
            }
            Stmt::Ask { prompt, target } => {
                io.write_line(self.vars.get(prompt))
                    .map_err(|e| ScriptError::io(pc, e))?;
                let input = io
                    .read_line()
                    .map_err(|e| ScriptError::io(pc, e))?
                    .ok_or(ScriptError::InputClosed { line: pc })?;
                debug!("line {pc}: read {} bytes into {target}", input.len());
                self.vars.set(target.as_str(), input);
            }
            Stmt::Print { var } => {
                io.write_line(self.vars.get(var))
                    .map_err(|e| ScriptError::io(pc, e))?;
            }
            Stmt::Jump { target } => {
                debug!("line {pc}: jump {target}");
                return Ok(*target);
            }
            Stmt::If { var, pattern, count } => {
                if self.vars.get(var).contains(pattern.as_str()) {
                    debug!("line {pc}: found [{pattern}] in {var}, running {count} line(s)");
                } else {
                    debug!("line {pc}: [{pattern}] not in {var}, skipping {count} line(s)");
                    return Ok(pc.saturating_add(1).saturating_add(*count));
                }
            }
            Stmt::Replace { src, subst, dest } => {
                let result = subst.apply(self.vars.get(src));
                match self.options.replace_mode {
                    ReplaceMode::Overwrite => self.vars.set(dest.as_str(), result),
                    ReplaceMode::Append => self.vars.append(dest, &result),
                }
            }
        }
        Ok(pc + 1)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::io::ScriptedIo;
    use crate::script::stmt::ParseErrorKind;

    /// Run `src` to completion with no input; return (state, output).
    fn run(src: &str) -> (State, Vec<String>) {
        run_with_input(src, &[])
    }

    fn run_with_input(src: &str, input: &[&str]) -> (State, Vec<String>) {
        let mut interp = Interpreter::from_source(src);
        let mut io = ScriptedIo::with_input(input.iter().copied());
        // Bounded so a looping test program cannot hang the suite.
        interp.run_steps(&mut io, 10_000);
        (interp.state().clone(), io.output)
    }

    #[test]
    fn hello_world() {
        let (state, out) = run("set x {Hello, world!}\nprint x");
        assert_eq!(state, State::Terminated);
        assert_eq!(out, ["Hello, world!"]);
    }

    #[test]
    fn set_print_pairs_in_order() {
        let (state, out) = run("set a {one}\nprint a\nset b {two}\nprint b\nset a {three}\nprint a");
        assert_eq!(state, State::Terminated);
        assert_eq!(out, ["one", "two", "three"]);
    }

    #[test]
    fn undefined_variable_prints_empty() {
        let (state, out) = run("print nothing");
        assert_eq!(state, State::Terminated);
        assert_eq!(out, [""]);
    }

    #[test]
    fn empty_program_terminates_immediately() {
        let interp = Interpreter::from_source("");
        assert_eq!(interp.state(), &State::Terminated);
    }

    #[test]
    fn cat_loops_until_bound() {
        let src = "set prompt {}\nask prompt input\nprint input\njump 1";
        let mut interp = Interpreter::from_source(src);
        let mut io = ScriptedIo::with_input(["hi", "there"]);
        let state = interp.run_steps(&mut io, 8).clone();
        assert_eq!(state, State::Running(1));
        assert_eq!(interp.steps(), 8);
        assert_eq!(io.output, ["", "hi", "", "there"]);
    }

    #[test]
    fn cat_fails_when_input_runs_out() {
        let (state, out) = run_with_input(
            "set prompt {>}\nask prompt input\nprint input\njump 1",
            &["only"],
        );
        assert_eq!(state, State::Failed(ScriptError::InputClosed { line: 2 }));
        assert_eq!(out, [">", "only", ">"]);
    }

    #[test]
    fn ask_uses_prompt_value_and_stores_raw_line() {
        let (state, out) = run_with_input(
            "set q {Name? }\nask q name\nprint name",
            &["  Ada Lovelace  "],
        );
        assert_eq!(state, State::Terminated);
        assert_eq!(out, ["Name? ", "  Ada Lovelace  "]);
    }

    #[test]
    fn jump_forward_skips_lines() {
        let (state, out) = run("set a {x}\njump 4\nprint a\nprint b");
        assert_eq!(state, State::Terminated);
        assert_eq!(out, [""]);
    }

    #[test]
    fn jump_always_resumes_at_target() {
        // Line 5 jumps back to the `ask` on line 2 until the input says stop.
        let src = "set p {}\nask p v\nif v found [stop] do 1\njump 6\njump 2\nprint v";
        let (state, out) = run_with_input(src, &["a", "b", "stop"]);
        assert_eq!(state, State::Terminated);
        assert_eq!(out, ["", "", "", "stop"]);
    }

    #[test]
    fn jump_one_past_end_terminates() {
        let (state, out) = run("jump 3\nprint a");
        assert_eq!(state, State::Terminated);
        assert!(out.is_empty());
    }

    #[test]
    fn jump_zero_fails_when_taken() {
        let (state, out) = run("print a\njump 0");
        assert_eq!(state, State::Failed(ScriptError::ControlFlow { line: 2, target: 0 }));
        assert_eq!(out, [""]);
    }

    #[test]
    fn jump_past_trailing_blank_line_terminates() {
        let (state, out) = run("jump 3\n\n");
        assert_eq!(state, State::Terminated);
        assert!(out.is_empty());
    }

    #[test]
    fn jump_beyond_end_fails() {
        let (state, _) = run("print a\njump 9\nprint b");
        assert_eq!(state, State::Failed(ScriptError::ControlFlow { line: 2, target: 9 }));
    }

    #[test]
    fn if_found_falls_through() {
        let src = "set a {yes please}\nif a found [yes] do 2\nprint a\nset b {ran}\nprint b";
        let (state, out) = run(src);
        assert_eq!(state, State::Terminated);
        assert_eq!(out, ["yes please", "ran"]);
    }

    #[test]
    fn if_not_found_skips_block() {
        let src = "set a {no}\nif a found [yes] do 2\nprint a\nset b {ran}\nprint b";
        let (state, out) = run(src);
        assert_eq!(state, State::Terminated);
        assert_eq!(out, [""]);
    }

    #[test]
    fn next_line_after_if() {
        for (value, expected) in [("xPx", 3), ("x", 5)] {
            let src = format!(
                "set a {{{value}}}\nif a found [P] do 2\nprint a\nprint a\nprint a"
            );
            let mut interp = Interpreter::from_source(&src);
            let mut io = ScriptedIo::new();
            interp.run_steps(&mut io, 2);
            assert_eq!(interp.state(), &State::Running(expected), "value {value}");
        }
    }

    #[test]
    fn skipped_lines_are_never_parsed() {
        let src = "if a found [x] do 2\nthis is not wudge\nif b found [y] do 99\nprint a";
        let (state, out) = run(src);
        assert_eq!(state, State::Terminated);
        assert_eq!(out, [""]);
    }

    #[test]
    fn skip_to_one_past_end_terminates() {
        let (state, _) = run("if a found [x] do 1\nprint a");
        assert_eq!(state, State::Terminated);
    }

    #[test]
    fn skip_over_trailing_blank_line_terminates() {
        let (state, out) = run("if a found [x] do 2\nprint a\n\n");
        assert_eq!(state, State::Terminated);
        assert!(out.is_empty());
    }

    #[test]
    fn trailing_blank_line_fails_only_when_reached() {
        let (state, out) = run("print a\n\n");
        assert_eq!(out, [""]);
        let State::Failed(ScriptError::Parse(e)) = &state else {
            panic!("expected parse failure, got {state:?}");
        };
        assert_eq!(e.line, 2);
        assert_eq!(e.kind, ParseErrorKind::Empty);
    }

    #[test]
    fn skip_beyond_end_fails() {
        let (state, _) = run("if a found [x] do 5\nprint a");
        assert_eq!(state, State::Failed(ScriptError::ControlFlow { line: 1, target: 7 }));
    }

    #[test]
    fn skip_count_overflow_fails_cleanly() {
        let src = format!("if a found [x] do {}\nprint a", usize::MAX);
        let (state, _) = run(&src);
        assert!(matches!(state, State::Failed(ScriptError::ControlFlow { line: 1, .. })));
    }

    #[test]
    fn empty_pattern_is_always_found() {
        let (_, out) = run("if a found [] do 1\nprint a");
        assert_eq!(out, [""]);
    }

    #[test]
    fn replace_overwrites_dest() {
        let src = "set s {cat and dog}\nset d {old}\nreplace s [cat/dog],[dog/cat] to d\nprint d";
        let (_, out) = run(src);
        assert_eq!(out, ["dog and cat"]);
    }

    #[test]
    fn replace_first_match_wins() {
        let (_, out) = run("set s {ab}\nreplace s [a/1],[ab/2] to s\nprint s");
        assert_eq!(out, ["1b"]);
    }

    #[test]
    fn replace_without_pairs_copies() {
        let (_, out) = run("set s {same}\nset d {x}\nreplace s to d\nprint d");
        assert_eq!(out, ["same"]);
    }

    #[test]
    fn replace_append_mode() {
        let program = Arc::new(Program::from_source(
            "set s {ab}\nset d {>}\nreplace s [a/b],[b/a] to d\nprint d",
            false,
        ));
        let options = Options { replace_mode: ReplaceMode::Append };
        let mut interp = Interpreter::with_options(program, options);
        let mut io = ScriptedIo::new();
        interp.run(&mut io).unwrap();
        assert_eq!(io.output, [">ba"]);
    }

    #[test]
    fn parse_error_halts_with_line() {
        let (state, out) = run("print a\nshout a\nprint a");
        assert_eq!(out, [""]);
        let State::Failed(ScriptError::Parse(e)) = &state else {
            panic!("expected parse failure, got {state:?}");
        };
        assert_eq!(e.line, 2);
        assert_eq!(e.kind, ParseErrorKind::UnknownCommand("shout".into()));
    }

    #[test]
    fn failed_and_terminated_are_absorbing() {
        let mut interp = Interpreter::from_source("bogus");
        let mut io = ScriptedIo::new();
        assert!(interp.run(&mut io).is_err());
        let before = interp.steps();
        interp.step(&mut io);
        assert_eq!(interp.steps(), before);

        let mut interp = Interpreter::from_source("print a");
        interp.run(&mut io).unwrap();
        assert_eq!(interp.step(&mut io), &State::Terminated);
        assert_eq!(interp.steps(), 1);
    }

    #[test]
    fn lenient_program_skips_blank_and_comment_lines() {
        let program = Arc::new(Program::from_source(
            "# hello\nset x {hi}\n\nprint x\njump 6\n# end",
            true,
        ));
        let mut interp = Interpreter::new(program);
        let mut io = ScriptedIo::new();
        interp.run(&mut io).unwrap();
        assert_eq!(io.output, ["hi"]);
        assert_eq!(interp.steps(), 6);
    }

    #[test]
    fn instances_sharing_a_program_are_independent() {
        let program = Arc::new(Program::from_source(
            "set p {}\nask p v\nprint v",
            false,
        ));
        let mut a = Interpreter::new(Arc::clone(&program));
        let mut b = Interpreter::new(program);
        let mut io_a = ScriptedIo::with_input(["left"]);
        let mut io_b = ScriptedIo::with_input(["right"]);
        a.run(&mut io_a).unwrap();
        b.run(&mut io_b).unwrap();
        assert_eq!(a.vars().get("v"), "left");
        assert_eq!(b.vars().get("v"), "right");
    }

    #[test]
    fn seeded_variables() {
        let mut interp = Interpreter::from_source("print greeting");
        interp.vars_mut().set("greeting", "preset");
        let mut io = ScriptedIo::new();
        interp.run(&mut io).unwrap();
        assert_eq!(io.output, ["preset"]);
    }

    #[test]
    fn replace_mode_from_str() {
        assert_eq!("append".parse::<ReplaceMode>(), Ok(ReplaceMode::Append));
        assert_eq!(" Overwrite ".parse::<ReplaceMode>(), Ok(ReplaceMode::Overwrite));
        assert!("concat".parse::<ReplaceMode>().is_err());
    }
}
