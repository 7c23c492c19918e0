/// A clock-format time string that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeError {
    /// The text is not `H:MM:SS` or `H:MM:SS.fff`, a field is not a
    /// decimal number, or the value does not fit in milliseconds.
    #[error("malformed time '{input}': {reason}")]
    Malformed { input: String, reason: String },
}

/// Errors that abort a table build.
///
/// The pipeline is fail-fast: the first undecodable time anywhere in the
/// document stops the build and no partial table is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A personal-best split string is malformed.
    #[error("personal best split #{index}: {source}")]
    PersonalBest {
        index: usize,
        #[source]
        source: TimeError,
    },

    /// A segment history entry of a run is malformed.
    #[error("attempt {attempt_id}, segment '{segment}': {source}")]
    RunSplit {
        attempt_id: i64,
        segment: String,
        #[source]
        source: TimeError,
    },
}

impl CoreError {
    /// The underlying decode failure.
    pub fn time_error(&self) -> &TimeError {
        match self {
            CoreError::PersonalBest { source, .. } | CoreError::RunSplit { source, .. } => source,
        }
    }
}
