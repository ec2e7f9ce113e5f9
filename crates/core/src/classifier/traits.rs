use super::types::Assessment;

/// A source-level heuristic producing a vulnerable/safe verdict.
/// Implementations must be pure: the same text always yields the same verdict.
pub trait Classifier {
    /// Unique identifier (e.g., "nonreentrant-lock-reuse")
    fn name(&self) -> &str;

    /// Human-readable description of what this classifier checks
    fn description(&self) -> &str;

    /// Classify `source` and report the signals behind the verdict
    fn assess(&self, source: &str) -> Assessment;

    fn classify(&self, source: &str) -> bool {
        self.assess(source).vulnerable
    }
}
