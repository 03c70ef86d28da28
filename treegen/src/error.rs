//! Error types for tree generation

/// Failure of a generation call
///
/// `InsufficientSpineLength` is recovered locally when it comes from guide
/// placement (the branch simply bears no children); every other variant aborts
/// the whole `generate()` call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeGenError {
    /// Non-positive or inconsistent length, segment, radius or side-count input
    #[error("invalid morph parameters: {0}")]
    InvalidMorphParams(String),

    /// A spine too short for the requested operation
    #[error("spine has {points} usable points, at least {required} required")]
    InsufficientSpineLength { points: usize, required: usize },

    /// Geometry that cannot be given a direction (e.g. all points coincident)
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Out-of-range shape, sampling or output parameters
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}

pub type Result<T> = std::result::Result<T, TreeGenError>;
