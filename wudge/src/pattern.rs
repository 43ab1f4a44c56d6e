//! Simultaneous multi-pattern substitution.
//!
//! A [`Substitution`] applies an ordered list of `(find, replace)` pairs to a
//! string in a single left-to-right pass:
//!
//! - At each position the pairs are tried in list order and the first one
//!   whose `find` text starts there wins (first-match, not longest-match).
//! - The winning pair's `replace` text is emitted and scanning resumes after
//!   the matched `find` text.  Emitted text is never rescanned, so
//!   `[a/b],[b/a]` swaps `"ab"` into `"ba"` instead of cascading.
//! - Where no pair matches, the character is copied through unchanged.
//!
//! Those are exactly the leftmost-first semantics of an Aho-Corasick
//! automaton built with [`MatchKind::LeftmostFirst`], so the pairs are
//! compiled once into one and the scan costs O(source + output).
//!
//! Empty `find` strings never match; they are dropped at compile time.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};

// ── Public types ─────────────────────────────────────────────────────────────

/// A compiled list of `(find, replace)` pairs.
#[derive(Clone)]
pub struct Substitution {
    pairs: Vec<(String, String)>,
    /// `None` when no pair has a non-empty `find`; the substitution is then
    /// the identity.
    automaton: Option<AhoCorasick>,
    /// Replacement text per automaton pattern, in pattern-id order.
    replacements: Vec<String>,
}

impl std::fmt::Debug for Substitution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Substitution")
            .field("pairs", &self.pairs)
            .finish()
    }
}

impl PartialEq for Substitution {
    fn eq(&self, other: &Self) -> bool {
        self.pairs == other.pairs
    }
}

impl Eq for Substitution {}

impl Substitution {
    /// Compile `pairs`, keeping their order as the tie-break priority.
    pub fn new<I, F, R>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (F, R)>,
        F: Into<String>,
        R: Into<String>,
    {
        let pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(f, r)| (f.into(), r.into()))
            .collect();

        let (finds, replacements): (Vec<&str>, Vec<String>) = pairs
            .iter()
            .filter(|(find, _)| !find.is_empty())
            .map(|(find, replace)| (find.as_str(), replace.clone()))
            .unzip();

        let automaton = if finds.is_empty() {
            None
        } else {
            Some(
                AhoCorasickBuilder::new()
                    .match_kind(MatchKind::LeftmostFirst)
                    .build(&finds),
            )
        };

        Self {
            pairs,
            automaton,
            replacements,
        }
    }

    /// The pairs as written, including any with an empty `find`.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Apply every pair to `src` in one simultaneous pass.
    pub fn apply(&self, src: &str) -> String {
        match &self.automaton {
            Some(ac) => ac.replace_all(src, &self.replacements),
            None => src.to_owned(),
        }
    }
}

/// Convenience wrapper: compile `pairs` and apply them to `src`.
pub fn substitute(src: &str, pairs: &[(&str, &str)]) -> String {
    Substitution::new(pairs.iter().copied()).apply(src)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
