use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TwoDTreeError {
    /// A point, rectangle or radius passed to a public operation was unusable: a NaN or
    /// infinite coordinate, an inverted rectangle, or a point outside the tree's bounds.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, TwoDTreeError>;
