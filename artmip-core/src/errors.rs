use thiserror::Error;

/// Error type for vertical integration operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArtmipError {
    /// Inputs or settings that cannot be used as given
    #[error("{0}")]
    Configuration(String),
    #[error("Vertical integration for model `{0}` has not been implemented.")]
    UnsupportedModel(String),
    #[error("Required variable `{0}` is missing from the dataset")]
    MissingVariable(String),
    #[error("Shape mismatch for `{variable}`: expected {expected}, found {found}")]
    ShapeMismatch {
        variable: String,
        expected: String,
        found: String,
    },
    #[error("Coordinate values of dimension `{dim}` differ between the operands. Use `safe_multiply` for fields from files known to share a vertical grid.")]
    CoordinateMismatch { dim: String },
}

impl ArtmipError {
    pub(crate) fn shape_mismatch(
        variable: impl Into<String>,
        expected: impl std::fmt::Debug,
        found: impl std::fmt::Debug,
    ) -> Self {
        ArtmipError::ShapeMismatch {
            variable: variable.into(),
            expected: format!("{:?}", expected),
            found: format!("{:?}", found),
        }
    }
}

/// Convenience type for `Result<T, ArtmipError>`.
pub type ArtmipResult<T> = Result<T, ArtmipError>;
