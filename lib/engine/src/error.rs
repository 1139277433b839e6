//! Error types for the tour engine.

/// Errors that can occur around a tour search.
///
/// Running out of moves is not an error: an exhausted search is reported as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum TourError {
    /// Start square outside the board
    #[error("square ({row}, {col}) is outside the {size}x{size} board")]
    OutOfBoard { row: i32, col: i32, size: i32 },

    /// Square text that is neither `a5` nor `row,col`
    #[error("cannot read square {input:?}")]
    BadSquare { input: String },

    /// Board dimension the knight bitmaps cannot hold
    #[error("board size {size} is not supported (expected {min}..={max})")]
    BadSize { size: i32, min: i32, max: i32 },

    /// Step budget spent before the search finished
    #[error("search gave up after {steps} steps")]
    StepLimit { steps: u64 },

    /// OS randomness unavailable
    #[error("random source failed: {0}")]
    Random(getrandom::Error),
}

/// Result type alias for engine operations
pub type TourResult<T> = Result<T, TourError>;
