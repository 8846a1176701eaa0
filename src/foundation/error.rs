/// Result alias used by every fallible pipeline stage.
pub type CodegenResult<T> = Result<T, CodegenError>;

/// Errors surfaced by the code generation pipeline.
///
/// There are no transient failures: either a complete decision set is produced or generation
/// aborts with a diagnostic naming the offending node.
#[derive(thiserror::Error, Debug)]
pub enum CodegenError {
    /// The input graph has a shape the pipeline does not accept.
    #[error("precondition violation: {0}")]
    Precondition(String),

    /// An internal invariant of the call resolver failed.
    #[error("cache consistency violation: {0}")]
    CacheConsistency(String),

    /// The JSON boundary rejected the input.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, usually I/O at the edges.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CodegenError {
    /// Build a [`CodegenError::Precondition`].
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Build a [`CodegenError::CacheConsistency`].
    pub fn cache_consistency(msg: impl Into<String>) -> Self {
        Self::CacheConsistency(msg.into())
    }

    /// Build a [`CodegenError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
