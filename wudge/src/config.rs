//! `wudgerc` configuration file parser.
//!
//! The file is a list of `/set` directives:
//!
//! | Directive | Action |
//! |-----------|--------|
//! | `/set <name>=<value>` or `/set <name> <value>` | change a setting |
//! | Lines starting with `;` | comment, ignored |
//! | Blank lines | ignored |
//!
//! Recognised settings:
//!
//! | Name | Values | Default |
//! |------|--------|---------|
//! | `replace` | `overwrite`, `append` | `overwrite` |
//! | `lenient` | boolean | off |
//! | `max_steps` | integer, `0` = unbounded | `0` |
//! | `banner` | boolean | on |
//!
//! Booleans accept `on`/`off`, `yes`/`no`, `true`/`false` and `1`/`0`.

use std::path::Path;

use crate::script::{Options, ReplaceMode};

// ── Public API ────────────────────────────────────────────────────────────────

/// A non-fatal error encountered while loading a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Interpreter settings, from defaults, an rc file and the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub replace_mode: ReplaceMode,
    /// Treat blank and `#` lines as no-ops.
    pub lenient: bool,
    /// Stop after this many statements.
    pub max_steps: Option<u64>,
    /// Print the banner and run frame in interactive sessions.
    pub banner: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            replace_mode: ReplaceMode::default(),
            lenient: false,
            max_steps: None,
            banner: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config string on top of the defaults.
    ///
    /// Bad lines do not stop loading; they are returned alongside the
    /// config and the previous value of the setting is kept.
    pub fn load_str(s: &str) -> (Self, Vec<ConfigError>) {
        let mut config = Config::new();
        let errors = config.apply_str(s);
        (config, errors)
    }

    /// Read and parse a config file from disk.
    pub fn load_file(path: &Path) -> std::io::Result<(Self, Vec<ConfigError>)> {
        let s = std::fs::read_to_string(path)?;
        Ok(Self::load_str(&s))
    }

    /// Apply every `/set` in `s` to this config.
    pub fn apply_str(&mut self, s: &str) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for (i, raw) in s.lines().enumerate() {
            let lineno = i + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with(';') {
                continue;
            }

            let result = match line.strip_prefix("/set") {
                Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
                    split_set(rest.trim()).and_then(|(name, value)| self.set(name, value))
                }
                _ => Err(format!("expected `/set <name>=<value>`, got `{line}`")),
            };
            if let Err(message) = result {
                errors.push(ConfigError { line: lineno, message });
            }
        }

        errors
    }

    /// Change one setting by name.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), String> {
        match name {
            "replace" => self.replace_mode = value.parse()?,
            "lenient" => self.lenient = parse_bool(name, value)?,
            "banner" => self.banner = parse_bool(name, value)?,
            "max_steps" => {
                let n: u64 = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("max_steps: `{value}` is not a number"))?;
                self.max_steps = (n > 0).then_some(n);
            }
            other => return Err(format!("unknown setting `{other}`")),
        }
        Ok(())
    }

    /// The subset of settings the interpreter itself consumes.
    pub fn options(&self) -> Options {
        Options {
            replace_mode: self.replace_mode,
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Split the argument of `/set` into `(name, value)`.
fn split_set(args: &str) -> Result<(&str, &str), String> {
    if args.is_empty() {
        return Err("/set: requires an argument".into());
    }

    let (name, value) = if let Some((name, value)) = args.split_once('=') {
        (name.trim(), value.trim())
    } else if let Some((name, value)) = args.split_once(char::is_whitespace) {
        (name, value.trim())
    } else {
        return Err(format!("/set: missing value for '{args}'"));
    };

    if name.is_empty() {
        return Err("/set: setting name cannot be empty".into());
    }
    Ok((name, value))
}

fn parse_bool(name: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" | "1" => Ok(true),
        "off" | "no" | "false" | "0" => Ok(false),
        _ => Err(format!("{name}: `{value}` is not on/off")),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::new();
        assert_eq!(cfg.replace_mode, ReplaceMode::Overwrite);
        assert!(!cfg.lenient);
        assert!(cfg.banner);
        assert_eq!(cfg.max_steps, None);
    }

    #[test]
    fn set_eq_and_space_forms() {
        let (cfg, errs) = Config::load_str("/set replace=append\n/set lenient on\n/set max_steps = 500");
        assert!(errs.is_empty(), "{errs:?}");
        assert_eq!(cfg.replace_mode, ReplaceMode::Append);
        assert!(cfg.lenient);
        assert_eq!(cfg.max_steps, Some(500));
        assert_eq!(cfg.options().replace_mode, ReplaceMode::Append);
    }

    #[test]
    fn comments_and_blank_lines_skipped() {
        let (cfg, errs) = Config::load_str("; my settings\n\n  ;; more\n/set banner off\n");
        assert!(errs.is_empty(), "{errs:?}");
        assert!(!cfg.banner);
    }

    #[test]
    fn zero_steps_means_unbounded() {
        let (cfg, errs) = Config::load_str("/set max_steps=10\n/set max_steps=0");
        assert!(errs.is_empty());
        assert_eq!(cfg.max_steps, None);
    }

    #[test]
    fn errors_carry_line_numbers_and_keep_going() {
        let src = "/set replace=concat\n/set lenient=maybe\n/set colour=red\n/set banner=no\nbogus\n/setbanner 1";
        let (cfg, errs) = Config::load_str(src);
        assert_eq!(errs.iter().map(|e| e.line).collect::<Vec<_>>(), [1, 2, 3, 5, 6]);
        assert!(!cfg.banner);
        assert_eq!(cfg.replace_mode, ReplaceMode::Overwrite);
        assert_eq!(errs[2].to_string(), "line 3: unknown setting `colour`");
    }

    #[test]
    fn set_without_value() {
        let (_, errs) = Config::load_str("/set lenient");
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("missing value"));
        let (_, errs) = Config::load_str("/set");
        assert!(errs[0].message.contains("requires an argument"));
        let (_, errs) = Config::load_str("/set =1");
        assert!(errs[0].message.contains("cannot be empty"));
    }

    #[test]
    fn apply_layers_over_existing_values() {
        let mut cfg = Config::new();
        cfg.lenient = true;
        let errs = cfg.apply_str("/set replace=append");
        assert!(errs.is_empty());
        assert!(cfg.lenient);
        assert_eq!(cfg.replace_mode, ReplaceMode::Append);
    }

    #[test]
    fn load_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wudgerc");
        std::fs::write(&path, "/set lenient=yes\n").unwrap();
        let (cfg, errs) = Config::load_file(&path).unwrap();
        assert!(errs.is_empty());
        assert!(cfg.lenient);
        assert!(Config::load_file(&dir.path().join("missing")).is_err());
    }
}
