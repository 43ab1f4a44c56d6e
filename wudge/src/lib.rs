//! Interpreter for Wudge, a line-oriented scripting language over string
//! variables.
//!
//! The execution core lives in [`script`], [`var`] and [`pattern`]; [`cli`]
//! and [`config`] serve the `wudge` binary.

pub mod cli;
pub mod config;
pub mod pattern;
pub mod script;
pub mod var;
