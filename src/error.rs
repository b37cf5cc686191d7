use thiserror::Error;

/// Errors raised by the reducers, the sign aligner and the vector store.
///
/// All of these are deterministic contract violations on static input and are
/// returned to the caller as-is.
#[derive(Debug, Error)]
pub enum ReduceError {
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    #[error("requested {requested} components but only {available} are available")]
    Dimension { requested: usize, available: usize },

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("category {0:?} cannot be written to the vector format")]
    InvalidCategory(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReduceError>;

impl ReduceError {
    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        ReduceError::Parse {
            line,
            reason: reason.into(),
        }
    }
}
