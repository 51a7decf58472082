use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid field id: {0:?}")]
    InvalidFieldId(String),
    #[error("invalid area range: min {min} is greater than max {max}")]
    InvalidAreaRange { min: f64, max: f64 },
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
