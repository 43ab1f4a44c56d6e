//! Command-line argument parsing.
//!
//! Usage:
//!   wudge [-dqcla] [-s<steps>] [-f[<file>]] [<program>]

use std::path::PathBuf;

use crate::config::Config;

pub const USAGE: &str = "Usage: wudge [-dqcla] [-s<steps>] [-f[<file>]] [<program>]";

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Program file; prompted for when absent.
    pub program: Option<PathBuf>,
    /// Which rc file to load.
    pub config: ConfigFile,
    /// Debug logging (`-d`).
    pub debug: bool,
    /// Suppress the banner (`-q`).
    pub quiet: bool,
    /// Parse only, do not run (`-c`).
    pub check: bool,
    /// Blank and `#` lines are no-ops (`-l`).
    pub lenient: bool,
    /// `replace` appends instead of overwriting (`-a`).
    pub append: bool,
    /// Statement limit (`-s<n>`).
    pub max_steps: Option<u64>,
}

/// How to choose the rc file.
#[derive(Debug, Default)]
pub enum ConfigFile {
    /// Search the standard locations (default).
    #[default]
    Search,
    /// `-f` with no file argument: skip the rc file.
    Skip,
    /// `-f<file>`: load this specific file.
    Explicit(PathBuf),
}

impl CliArgs {
    /// Layer the command-line overrides onto `config`.
    ///
    /// Flags can only switch behaviour on; a flag that was not given leaves
    /// the rc file's choice alone.
    pub fn apply_to(&self, config: &mut Config) {
        if self.quiet {
            config.banner = false;
        }
        if self.lenient {
            config.lenient = true;
        }
        if self.append {
            config.replace_mode = crate::script::ReplaceMode::Append;
        }
        if let Some(n) = self.max_steps {
            config.max_steps = (n > 0).then_some(n);
        }
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()` and return [`CliArgs`] or an error message.
pub fn parse_args() -> Result<CliArgs, String> {
    let raw: Vec<String> = std::env::args().collect();
    parse_argv(raw.get(1..).unwrap_or_default())
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, String> {
    let mut args = CliArgs::default();
    let mut positional: Vec<String> = Vec::new();
    let mut i = 0;

    while i < argv.len() {
        let arg = argv[i].as_str();

        // `--` ends flag processing.
        if arg == "--" {
            i += 1;
            positional.extend(argv[i..].iter().cloned());
            break;
        }

        // Non-flag argument.
        if !arg.starts_with('-') || arg == "-" {
            positional.push(arg.to_owned());
            i += 1;
            continue;
        }

        // Flag argument: iterate over characters after the leading `-`.
        let chars: Vec<char> = arg[1..].chars().collect();
        let mut j = 0;
        while j < chars.len() {
            match chars[j] {
                'd' => args.debug = true,
                'q' => args.quiet = true,
                'c' => args.check = true,
                'l' => args.lenient = true,
                'a' => args.append = true,

                // -f[<file>]
                'f' => {
                    if j + 1 < chars.len() {
                        let file: String = chars[j + 1..].iter().collect();
                        args.config = ConfigFile::Explicit(PathBuf::from(file));
                        j = chars.len();
                    } else {
                        // -f alone → skip the rc file.  A following word is
                        // the program, not the rc file.
                        args.config = ConfigFile::Skip;
                    }
                }

                // -s<steps>
                's' => {
                    let n = if j + 1 < chars.len() {
                        let s: String = chars[j + 1..].iter().collect();
                        j = chars.len();
                        s
                    } else if i + 1 < argv.len() {
                        i += 1;
                        argv[i].clone()
                    } else {
                        return Err("-s requires a step count".to_owned());
                    };
                    let steps = n
                        .parse::<u64>()
                        .map_err(|_| format!("invalid step count: {n}"))?;
                    args.max_steps = Some(steps);
                }

                c => return Err(format!("unknown option: -{c}")),
            }
            j += 1;
        }
        i += 1;
    }

    match positional.len() {
        0 => {}
        1 => args.program = Some(PathBuf::from(positional.remove(0))),
        n => return Err(format!("too many arguments ({n})")),
    }

    Ok(args)
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// Candidate rc file locations, in search order.
pub fn user_config_candidates() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(base) = directories::BaseDirs::new() {
        paths.push(base.home_dir().join(".wudgerc"));
    }
    if let Some(proj) = directories::ProjectDirs::from("", "", "wudge") {
        paths.push(proj.config_dir().join("wudgerc"));
    }
    paths.push(PathBuf::from("./.wudgerc"));
    paths
}

/// Search for the rc file in the standard locations.
/// Returns the first path that exists, or `None`.
pub fn find_user_config() -> Option<PathBuf> {
    user_config_candidates().into_iter().find(|p| p.exists())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
