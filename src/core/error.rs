use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Contract violations. Out-of-range business inputs are clamped or
/// flagged instead and never reach this type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("allocation index {index} out of bounds for {len} entries")]
    IndexOutOfBounds { index: usize, len: usize },
}
