//! Variable store.
//!
//! Wudge has no declarations and exactly one value kind, so the store is a
//! plain string-to-string table.  Reading a name that was never assigned
//! yields the empty string rather than an error.

use std::collections::HashMap;

/// Name → value table owned by one interpreter run.
#[derive(Debug, Default, Clone)]
pub struct VarStore {
    vars: HashMap<String, String>,
}

impl VarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or overwrite) a variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Get the value of a variable; unknown names read as `""`.
    pub fn get(&self, name: &str) -> &str {
        self.vars.get(name).map(String::as_str).unwrap_or("")
    }

    /// Append to a variable, treating an unset one as empty.
    pub fn append(&mut self, name: &str, value: &str) {
        self.vars.entry(name.to_owned()).or_default().push_str(value);
    }

    /// Returns `true` if the variable has been assigned.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Iterate over all variables, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.vars.iter()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
