//! Textual signals the lock-reuse heuristic is built from.
//!
//! Everything here is literal pattern matching over source text. Comments,
//! string literals and formatting are not understood, so each function has a
//! known false-positive/negative surface documented on it.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use vyper_guard::classifier::CandidateCallSite;
use vyper_guard::extract::extract_balanced;

/// Decorator marking a function that accepts value
pub const PAYABLE_MARKER: &str = "@payable";

/// Low-level call builtin
pub const RAW_CALL_MARKER: &str = "raw_call";

/// `raw_call` argument fragments known not to trigger the lock defect.
pub const SAFE_CALL_MARKERS: &[&str] = &[
    // ERC-20 signatures and their selectors
    "transfer(address,uint256)",
    "transferFrom(address,address,uint256)",
    "approve(address,uint256)",
    "0xa9059cbb",
    "0x23b872dd",
    "0x095ea7b3",
    // vault / pool entry points
    "deposit(uint256,address)",
    "withdraw(uint256,address,uint256)",
    "exchange(int128,int128,uint256,uint256)",
    // explicitly encoded selector
    "method_id(",
];

static LOCK_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"nonreentrant\([^)]*\)").expect("lock annotation regex"));

static RAW_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"raw_call\s*\(").expect("raw_call regex"));

/// Occurrence count per full lock annotation text.
///
/// Keys are the whole matched annotation, so `nonreentrant("lock")` and
/// `nonreentrant( "lock" )` count as two different locks even though the
/// compiler treats them as one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReentrancyLockUsage {
    counts: BTreeMap<String, usize>,
}

impl ReentrancyLockUsage {
    pub fn count(&self, annotation: &str) -> usize {
        self.counts.get(annotation).copied().unwrap_or(0)
    }

    /// Occurrences of the most frequent annotation
    pub fn max_count(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// True iff some lock annotation appears more than once
    pub fn has_reused_lock(&self) -> bool {
        self.max_count() > 1
    }

    /// Annotations appearing more than once, in key order
    pub fn reused(&self) -> Vec<(String, usize)> {
        self.counts
            .iter()
            .filter(|(_, n)| **n > 1)
            .map(|(k, n)| (k.clone(), *n))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Count `nonreentrant(...)` annotations by exact text.
pub fn lock_usage(source: &str) -> ReentrancyLockUsage {
    let mut counts = BTreeMap::new();
    for m in LOCK_ANNOTATION.find_iter(source) {
        *counts.entry(m.as_str().to_string()).or_insert(0) += 1;
    }
    ReentrancyLockUsage { counts }
}

/// Also matches the marker inside comments and strings.
pub fn has_payable_marker(source: &str) -> bool {
    source.contains(PAYABLE_MARKER)
}

pub fn has_raw_call(source: &str) -> bool {
    source.contains(RAW_CALL_MARKER)
}

/// Every `raw_call(` with its balanced argument span.
///
/// A call whose parentheses never close keeps the rest of the source as its
/// argument text; the caller decides what that means.
pub fn raw_call_sites(source: &str) -> Vec<CandidateCallSite> {
    RAW_CALL
        .find_iter(source)
        .map(|m| {
            // the match ends on the opening paren
            let open = m.end() - 1;
            let argument_text = extract_balanced(source, open).unwrap_or(&source[open..]);
            CandidateCallSite {
                match_offset: m.start(),
                argument_text: argument_text.to_string(),
            }
        })
        .collect()
}

/// True if `argument_text` contains any of `markers`.
pub fn is_allowlisted<S: AsRef<str>>(argument_text: &str, markers: &[S]) -> bool {
    markers
        .iter()
        .any(|marker| argument_text.contains(marker.as_ref()))
}
