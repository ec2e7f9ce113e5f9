use vyper_guard::classifier::{Assessment, Classifier};

use crate::signals::{
    has_payable_marker, has_raw_call, is_allowlisted, lock_usage, raw_call_sites,
    SAFE_CALL_MARKERS,
};

/// Flags contracts where a nonreentrant lock key is shared by several
/// functions and an external call can re-enter them: either a payable entry
/// point, or a `raw_call` not matching a known-safe signature.
///
/// Affected compilers allocated a separate storage slot per annotation, so a
/// reused key does not actually guard its sibling functions.
#[derive(Debug, Clone)]
pub struct LockReuseClassifier {
    safe_calls: Vec<String>,
}

impl Default for LockReuseClassifier {
    fn default() -> Self {
        Self {
            safe_calls: SAFE_CALL_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl LockReuseClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the built-in safe-call allowlist.
    pub fn with_extra_safe_calls<I>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.safe_calls
            .extend(extra.into_iter().filter(|m| !m.trim().is_empty()));
        self
    }

    pub fn safe_calls(&self) -> &[String] {
        &self.safe_calls
    }
}

impl Classifier for LockReuseClassifier {
    fn name(&self) -> &str {
        "nonreentrant-lock-reuse"
    }

    fn description(&self) -> &str {
        "Reused nonreentrant lock combined with a payable entry point or an unvetted raw_call"
    }

    fn assess(&self, source: &str) -> Assessment {
        let usage = lock_usage(source);
        let multi_key = usage.has_reused_lock();
        let payable = has_payable_marker(source);
        let reused_locks = usage.reused();

        if payable && multi_key {
            return Assessment {
                vulnerable: true,
                payable,
                reused_locks,
                unsafe_calls: Vec::new(),
            };
        }

        if !has_raw_call(source) {
            return Assessment {
                vulnerable: false,
                payable,
                reused_locks,
                unsafe_calls: Vec::new(),
            };
        }

        let unsafe_calls: Vec<_> = raw_call_sites(source)
            .into_iter()
            .filter(|site| !is_allowlisted(&site.argument_text, &self.safe_calls))
            .collect();

        Assessment {
            vulnerable: multi_key && !unsafe_calls.is_empty(),
            payable,
            reused_locks,
            unsafe_calls,
        }
    }
}
