use alloc::string::String;

/// An items provider could not produce the requested items.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors produced by [`crate::Controller`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ControllerError {
    #[error("item size must be a positive, finite number of pixels, got {0}")]
    InvalidItemSize(f64),

    #[error("max item count must be at least 1")]
    ZeroMaxItemCount,

    #[error("controller is already handling a request")]
    Busy,

    #[error("controller has been disposed")]
    Disposed,

    #[error("items provider failed: {0}")]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Tracker(#[from] virtualize::TrackerError),
}
