/// Failures surfaced by the analysis engine.
///
/// Structurally invalid input fails fast; semantically incomplete input
/// (unknown items, unmatched sales, zero-cost purchases) degrades to a
/// well-defined placeholder instead and is never an error.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// A required collection is malformed or missing, e.g. a ledger snapshot
    /// with no purchases collection at all.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
