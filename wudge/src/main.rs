use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crossterm::style::Stylize;
use log::{debug, warn};

use wudge::cli::{self, ConfigFile};
use wudge::config::Config;
use wudge::script::program::is_blank_error;
use wudge::script::{Console, Interpreter, Program, State};

const RULE: &str = "----------------------------------------";

fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("wudge: {e}");
            eprintln!("{}", cli::USAGE);
            return ExitCode::from(1);
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.debug { "debug" } else { "warn" }),
    )
    .init();

    // ── Settings: defaults → rc file → flags ─────────────────────────────────
    let mut config = Config::new();
    let rc = match &args.config {
        ConfigFile::Skip => None,
        ConfigFile::Explicit(path) => Some(path.clone()),
        ConfigFile::Search => cli::find_user_config(),
    };
    if let Some(path) = rc {
        load_rc(&mut config, &path);
    }
    args.apply_to(&mut config);
    debug!("settings: {config:?}");

    let is_tty = unsafe {
        libc::isatty(libc::STDIN_FILENO) != 0 && libc::isatty(libc::STDOUT_FILENO) != 0
    };
    let styled = unsafe { libc::isatty(libc::STDERR_FILENO) != 0 };
    let show_frame = is_tty && config.banner;

    if show_frame {
        println!("{}", "Wudge Programming Language Interpreter".bold());
        println!("=====================================");
    }

    // ── Program file (prompt when not given) ─────────────────────────────────
    let path = match args.program {
        Some(p) => p,
        None => match prompt_for_file() {
            Ok(Some(p)) => p,
            Ok(None) => {
                report("No filename provided. Exiting.", styled);
                return ExitCode::from(1);
            }
            Err(e) => {
                report(&format!("wudge: {e}"), styled);
                return ExitCode::from(1);
            }
        },
    };

    let program = match Program::load(&path, config.lenient) {
        Ok(p) => Arc::new(p),
        Err(e) => {
            report(&format!("wudge: {}: {e}", path.display()), styled);
            return ExitCode::from(1);
        }
    };
    debug!("{}: {} line(s)", path.display(), program.len());

    if args.check {
        return check(&program, &path, styled);
    }

    // ── Run ──────────────────────────────────────────────────────────────────
    if show_frame {
        println!("Executing Wudge program from '{}'...", path.display());
        println!("{RULE}");
    }

    let mut interp = Interpreter::with_options(Arc::clone(&program), config.options());
    let mut console = Console::stdio();
    let state = match config.max_steps {
        Some(max) => interp.run_steps(&mut console, max).clone(),
        None => match interp.run(&mut console) {
            Ok(()) => State::Terminated,
            Err(e) => State::Failed(e),
        },
    };

    for (name, value) in interp.vars().iter() {
        debug!("var {name} = {value:?}");
    }
    debug!("{} statement(s) executed", interp.steps());

    match state {
        State::Terminated => {
            if show_frame {
                println!("{RULE}");
                println!("Program '{}' finished.", path.display());
            }
            ExitCode::SUCCESS
        }
        State::Failed(e) => {
            report(&format!("wudge: {}: {e}", path.display()), styled);
            if let wudge::script::ScriptError::Parse(pe) = &e {
                if is_blank_error(pe) && !program.is_lenient() {
                    report("wudge: use -l to allow blank and # comment lines", styled);
                }
            }
            ExitCode::from(1)
        }
        State::Running(line) => {
            report(
                &format!(
                    "wudge: {}: step limit of {} reached at line {line}",
                    path.display(),
                    interp.steps()
                ),
                styled,
            );
            ExitCode::from(2)
        }
    }
}

/// Apply an rc file; problems are warnings, never fatal.
fn load_rc(config: &mut Config, path: &Path) {
    match std::fs::read_to_string(path) {
        Ok(src) => {
            debug!("loading settings from {}", path.display());
            for e in config.apply_str(&src) {
                warn!("{}: {e}", path.display());
            }
        }
        Err(e) => warn!("{}: {e}", path.display()),
    }
}

/// Ask for the program path on stdin.  `Ok(None)` for an empty answer.
fn prompt_for_file() -> io::Result<Option<PathBuf>> {
    print!("I need valid Wudge code file: ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim();
    Ok((!answer.is_empty()).then(|| PathBuf::from(answer)))
}

/// `-c`: parse every line and report all failures.
fn check(program: &Program, path: &Path, styled: bool) -> ExitCode {
    let errors = program.check();
    if errors.is_empty() {
        println!("{}: {} line(s) OK", path.display(), program.len());
        return ExitCode::SUCCESS;
    }
    for e in &errors {
        report(&format!("wudge: {}: {e}", path.display()), styled);
        if let Some(text) = program.source(e.line) {
            report(&format!("    {text}"), styled);
        }
    }
    ExitCode::from(1)
}

fn report(msg: &str, styled: bool) {
    if styled {
        eprintln!("{}", msg.red());
    } else {
        eprintln!("{msg}");
    }
}
