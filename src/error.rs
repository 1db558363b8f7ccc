use thiserror::Error;

/// Top-level error type for the Overlis overlay engine.
#[derive(Debug, Error)]
pub enum OverlisError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl OverlisError {
    /// Returns `true` if this failure may be retried under a degraded
    /// precision strategy. Only the robustness controller consults this;
    /// inner pipeline stages never catch their own errors.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, OverlisError::Topology(_))
    }
}

/// Topology construction failures.
///
/// These signal that floating-point geometry construction violated a
/// robustness assumption; the overlay controller catches them and retries
/// the pipeline under a degraded precision strategy.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("found non-noded intersection at ({x}, {y})")]
    InvalidNoding { x: f64, y: f64 },

    #[error("side location conflict at ({x}, {y})")]
    SideLocationConflict { x: f64, y: f64 },

    #[error("no outgoing result edge found at ({x}, {y})")]
    RingLinking { x: f64, y: f64 },

    #[error("unable to assign hole to a shell at ({x}, {y})")]
    HoleNesting { x: f64, y: f64 },

    #[error("result area inconsistent with overlay operation")]
    AreaInconsistent,

    #[error("invalid topology: {0}")]
    Failed(String),
}

/// Errors related to overlay operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Programming-error invariant violations. Always fatal; the robustness
/// retry loop never catches these, since retrying cannot fix a logic defect.
#[derive(Debug, Error)]
pub enum InternalError {
    #[error("edge label location still unknown after labelling at ({x}, {y})")]
    UnresolvedLabel { x: f64, y: f64 },

    #[error("invariant violated: {0}")]
    Invariant(String),
}

/// Convenience type alias for results using [`OverlisError`].
pub type Result<T> = std::result::Result<T, OverlisError>;
