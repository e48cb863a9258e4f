//! Error types for the text engine.

use std::fmt;

/// Result type alias for text engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for text engine operations.
///
/// Most out-of-range input (offsets, rows, columns, wrap widths) is clamped
/// rather than rejected; these two variants are the only failure modes the
/// engine surfaces to a caller.
#[derive(Debug)]
pub enum Error {
    /// Allocation failed while growing a buffer-owned collection.
    AllocationFailure {
        /// Name of the component that attempted the allocation.
        component: &'static str,
    },
    /// Operation attempted on a buffer or view after `destroy()`.
    Destroyed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailure { component } => {
                write!(f, "allocation failed in {component}")
            }
            Self::Destroyed => write!(f, "operation attempted on a destroyed buffer or view"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::AllocationFailure { component: "TextBuffer" };
        assert!(err.to_string().contains("TextBuffer"));

        let err = Error::Destroyed;
        assert!(err.to_string().contains("destroyed"));
    }
}
