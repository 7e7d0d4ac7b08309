//! Error types for the engine.

/// Errors that can occur while planning or committing a weight change.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The weight computation itself failed.
    #[error("planning error: {0}")]
    Solver(#[from] ringweight_solver::SolverError),

    /// Applying or persisting the result failed.
    #[error("ring error: {0}")]
    Ring(#[from] ringweight_ring::RingError),

    /// No node addresses were given.
    #[error("no nodes to add")]
    NoNodes,

    /// No device paths are configured for new nodes.
    #[error("no device paths configured for new nodes")]
    NoDevicePaths,

    /// A configured device path is empty.
    #[error("empty device path at position {0}")]
    EmptyDevicePath(usize),
}
