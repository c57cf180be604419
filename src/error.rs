use core::fmt;

/// Result alias for `minimax`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the clustering engine and its helpers.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was empty.
    EmptyInput,

    /// Feature dimension mismatch between rows.
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// Shape mismatch (string description).
    ShapeMismatch {
        /// Expected shape description.
        expected: String,
        /// Actual shape description.
        actual: String,
    },

    /// Distance matrix is not symmetric at `(i, j)`.
    AsymmetricDistance {
        /// Row index.
        i: usize,
        /// Column index.
        j: usize,
    },

    /// Distance is NaN, infinite, negative, or a non-zero self-distance.
    InvalidDistance {
        /// Row index.
        i: usize,
        /// Column index.
        j: usize,
        /// Offending value.
        value: f64,
    },

    /// Point or cluster index outside its valid range.
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Exclusive upper bound.
        bound: usize,
    },

    /// Distances can no longer change once merging has started.
    DistancesFrozen,

    /// Merge steps must run in order, each exactly once.
    StepOutOfOrder {
        /// Next step the engine can run.
        expected: usize,
        /// Step that was requested.
        found: usize,
    },

    /// Merge step beyond the `n - 1` steps a clustering has.
    StepOutOfRange {
        /// Step that was requested.
        step: usize,
        /// Total number of merge steps.
        n_steps: usize,
    },

    /// Result requested before every merge step ran.
    Incomplete {
        /// Steps completed so far.
        done: usize,
        /// Steps required.
        total: usize,
    },

    /// Chain growth found no neighbor for `index`.
    ///
    /// Signals a corrupted distance relation or a logic defect; never
    /// recoverable by the caller.
    NoNeighborFound {
        /// Extended id whose neighbor search came back empty.
        index: usize,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::ShapeMismatch { expected, actual } => {
                write!(f, "shape mismatch: expected {expected}, actual {actual}")
            }
            Error::AsymmetricDistance { i, j } => {
                write!(f, "distance matrix is not symmetric at ({i}, {j})")
            }
            Error::InvalidDistance { i, j, value } => {
                write!(f, "invalid distance {value} at ({i}, {j})")
            }
            Error::IndexOutOfRange { index, bound } => {
                write!(f, "index {index} out of range (bound {bound})")
            }
            Error::DistancesFrozen => {
                write!(f, "distances cannot change after merging has started")
            }
            Error::StepOutOfOrder { expected, found } => {
                write!(f, "merge step {found} requested, next step is {expected}")
            }
            Error::StepOutOfRange { step, n_steps } => {
                write!(f, "merge step {step} out of range ({n_steps} steps total)")
            }
            Error::Incomplete { done, total } => {
                write!(f, "clustering incomplete: {done} of {total} merges done")
            }
            Error::NoNeighborFound { index } => {
                write!(f, "no nearest neighbor found for cluster {index}")
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
        }
    }
}

impl std::error::Error for Error {}
