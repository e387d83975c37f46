//! # Entity Resolution
//!
//! Turns free text into exactly one catalog entry or sub-item.
//!
//! ## Rules
//!
//! 1. All-digit input is a 1-based index: into the *visible* entries of a
//!    [`Catalog`], or into an entry's sub-items. Out of range (including `0`)
//!    yields [`Resolution::IndexOutOfRange`].
//! 2. Input equal to a candidate's key returns that candidate immediately.
//! 3. Otherwise a three-stage cascade runs over the candidate keys:
//!
//! | Stage | Scorer | Keeps |
//! |-------|--------|-------|
//! | 1 | [`fuzz::partial_ratio`] | top `partial_limit` (10) |
//! | 2 | [`fuzz::wratio`] | top `weighted_limit` (10) |
//! | 3 | [`fuzz::ratio`] | best 1 |
//!
//! A final score below `threshold` (45) is a miss, never a guess. Ties keep
//! the candidate that came first in catalog order.

pub mod fuzz;

use tracing::debug;

use crate::catalog::{Catalog, CatalogEntry, SubItem};

/// Outcome of a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<T> {
    Found(T),
    IndexOutOfRange,
    /// No entry scored high enough.
    NoConfidentMatch,
    /// No sub-item scored high enough.
    AmbiguousBelowThreshold,
}

impl<T> Resolution<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Resolution::Found(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }
}

/// Cascade limits and confidence threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeLimits {
    pub partial_limit: usize,
    pub weighted_limit: usize,
    /// Minimum final score (0-100) for a match.
    pub threshold: u32,
}

impl Default for CascadeLimits {
    fn default() -> Self {
        Self {
            partial_limit: 10,
            weighted_limit: 10,
            threshold: 45,
        }
    }
}

/// A cascade winner: index into the candidate slice plus its final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scored {
    pub index: usize,
    pub score: u32,
}

/// Stateless resolver over catalog snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    limits: CascadeLimits,
}

enum Lookup {
    Index(usize),
    OutOfRange,
    Text,
}

/// Classify input as a 1-based index or free text.
fn lookup(input: &str, len: usize) -> Lookup {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Lookup::Text;
    }
    match input.parse::<usize>() {
        Ok(n) if n >= 1 && n <= len => Lookup::Index(n - 1),
        _ => Lookup::OutOfRange,
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: CascadeLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> CascadeLimits {
        self.limits
    }

    /// Resolve `input` against the visible entries of `catalog`.
    pub fn resolve_entry<'c>(&self, input: &str, catalog: &'c Catalog) -> Resolution<&'c CatalogEntry> {
        let input = input.trim();
        let visible: Vec<&CatalogEntry> = catalog.visible().collect();

        match lookup(input, visible.len()) {
            Lookup::Index(i) => return Resolution::Found(visible[i]),
            Lookup::OutOfRange => return Resolution::IndexOutOfRange,
            Lookup::Text => {}
        }

        let keys: Vec<&str> = visible.iter().map(|e| e.name()).collect();
        match self.match_key(input, &keys) {
            Some(i) => Resolution::Found(visible[i]),
            None => Resolution::NoConfidentMatch,
        }
    }

    /// Resolve `input` against an entry's sub-items by label.
    pub fn resolve_sub_item<'i>(&self, input: &str, items: &'i [SubItem]) -> Resolution<&'i SubItem> {
        let input = input.trim();

        match lookup(input, items.len()) {
            Lookup::Index(i) => return Resolution::Found(&items[i]),
            Lookup::OutOfRange => return Resolution::IndexOutOfRange,
            Lookup::Text => {}
        }

        let keys: Vec<&str> = items.iter().map(|i| i.label()).collect();
        match self.match_key(input, &keys) {
            Some(i) => Resolution::Found(&items[i]),
            None => Resolution::AmbiguousBelowThreshold,
        }
    }

    /// Exact key match, else a confident cascade winner.
    fn match_key(&self, input: &str, keys: &[&str]) -> Option<usize> {
        if let Some(i) = keys.iter().position(|k| *k == input) {
            debug!(input, key = keys[i], "exact match");
            return Some(i);
        }
        let best = self.cascade(input, keys)?;
        debug!(input, key = keys[best.index], score = best.score, "fuzzy match");
        (best.score >= self.limits.threshold).then_some(best.index)
    }

    /// Run the three-stage cascade and return the winner, whatever its score.
    ///
    /// Returns `None` when `keys` is empty or `input` has nothing left to
    /// compare after normalisation (only punctuation or symbols).
    pub fn cascade(&self, input: &str, keys: &[&str]) -> Option<Scored> {
        let query = fuzz::full_process(input);
        if query.is_empty() {
            return None;
        }
        let processed: Vec<String> = keys.iter().map(|k| fuzz::full_process(k)).collect();

        let stage1 = top(
            (0..keys.len()).map(|i| Scored {
                index: i,
                score: fuzz::partial_ratio(&query, &processed[i]),
            }),
            self.limits.partial_limit,
        );
        let stage2 = top(
            stage1.iter().map(|s| Scored {
                index: s.index,
                score: fuzz::wratio(&query, &processed[s.index]),
            }),
            self.limits.weighted_limit,
        );
        top(
            stage2.iter().map(|s| Scored {
                index: s.index,
                score: fuzz::ratio(&query, &processed[s.index]),
            }),
            1,
        )
        .into_iter()
        .next()
    }
}

/// Highest `limit` scores, descending; equal scores keep input order.
fn top(scored: impl Iterator<Item = Scored>, limit: usize) -> Vec<Scored> {
    let mut all: Vec<Scored> = scored.collect();
    all.sort_by(|a, b| b.score.cmp(&a.score));
    all.truncate(limit.max(1));
    all
}
