use thiserror::Error;

use crate::capture::CaptureError;
use crate::config::ConfigError;
use crate::flow::FlowError;
use crate::store::StoreError;

/// Error surface of [`TaggingService`](crate::service::TaggingService).
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl CoreError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound { kind, id: id.to_string() }
    }

    /// Precondition failures the caller can fix by supplying input.
    pub fn is_precondition(&self) -> bool {
        matches!(self, CoreError::Capture(e) if e.is_precondition())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Precondition;

    #[test]
    fn test_conversions_keep_message() {
        let err: CoreError = StoreError::not_found("Game", "g-1").into();
        assert_eq!(err.to_string(), "Game not found: g-1");

        let err: CoreError = CaptureError::Precondition(Precondition::GameTimeNotSet).into();
        assert!(err.is_precondition());
        assert_eq!(err.to_string(), "Precondition failed: no game time set");
    }
}
