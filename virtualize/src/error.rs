/// Errors returned when starting a tracking session.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TrackerError {
    #[error("spacer_before and spacer_after must be distinct elements")]
    SameSpacer,

    #[error("root margin must be a finite number of pixels, got {0}")]
    InvalidRootMargin(f64),
}

/// Errors a [`crate::BoundaryListener`] reports back to the tracker.
///
/// The tracker never retries: notifications are fire-and-forget, and failures are only logged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    /// The listener (or the host side behind it) has already been torn down.
    #[error("listener is no longer reachable")]
    Disconnected,

    /// The listener was already handling a notification.
    #[error("listener is busy handling another notification")]
    Reentrant,
}
