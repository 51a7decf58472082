use thiserror::Error;

/// Errors raised while building transformations or editing a pipeline.
///
/// Applying transformations never fails; per-row problems are counted in
/// [`crate::TransformReport`] instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransformError {
    #[error("transformation id must not be empty")]
    EmptyId,
    #[error("{kind} transformation requires {field}")]
    MissingConfig {
        kind: &'static str,
        field: &'static str,
    },
    #[error("duplicate transformation id: {0}")]
    DuplicateId(String),
    #[error("transformation not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, TransformError>;
