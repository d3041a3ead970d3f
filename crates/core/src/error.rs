/// Domain-level failure raised by the pure helpers in this crate and by
/// request-body validation in the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
}
