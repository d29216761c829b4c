use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),
    #[error("model load failed: {0}")]
    ModelLoad(String),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("operation failed: {0}")]
    OperationFailed(String),
}

impl DomainError {
    /// Setup failures end the session; nothing is retried after them.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DomainError::CameraUnavailable(_) | DomainError::ModelLoad(_)
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_failures_are_fatal() {
        assert!(DomainError::CameraUnavailable("denied".into()).is_fatal());
        assert!(DomainError::ModelLoad("corrupt".into()).is_fatal());
        assert!(!DomainError::Inference("timeout".into()).is_fatal());
    }
}
