use serde::Serialize;

/// A low-level call and its balanced argument text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateCallSite {
    /// Byte offset of the call in the source
    pub match_offset: usize,
    /// `(...)` span following the call, or the remaining text if unbalanced
    pub argument_text: String,
}

/// Verdict plus the signals that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub vulnerable: bool,
    pub payable: bool,
    /// Lock annotations seen more than once, with their counts
    pub reused_locks: Vec<(String, usize)>,
    pub unsafe_calls: Vec<CandidateCallSite>,
}

impl Assessment {
    pub fn safe() -> Self {
        Self::default()
    }

    /// One-line explanation of the verdict
    pub fn summary(&self) -> String {
        if !self.vulnerable {
            return "looks safe".to_string();
        }
        let locks = self
            .reused_locks
            .iter()
            .map(|(lock, n)| format!("{lock} x{n}"))
            .collect::<Vec<_>>()
            .join(", ");
        if self.payable && self.unsafe_calls.is_empty() {
            format!("payable entry point with reused lock ({locks})")
        } else {
            format!(
                "{} unsafe raw_call site(s) with reused lock ({locks})",
                self.unsafe_calls.len()
            )
        }
    }
}
