use alloc::rc::{Rc, Weak};
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::{BoundaryEvent, NotifyError, SpacerSide};

static NEXT_LISTENER_ID: AtomicUsize = AtomicUsize::new(1);

/// Receives boundary notifications for one list.
///
/// Calls are fire-and-forget: the tracker logs errors and keeps observing. Implementations
/// must not call back into the [`crate::Tracker`] that is notifying them; spacer resizes are
/// picked up on the next [`crate::Tracker::run`].
pub trait BoundaryListener {
    fn on_spacer_before_visible(
        &self,
        offset: f64,
        spacer_separation: f64,
        container_size: Option<f64>,
    ) -> Result<(), NotifyError>;

    fn on_spacer_after_visible(
        &self,
        offset: f64,
        spacer_separation: f64,
        container_size: Option<f64>,
    ) -> Result<(), NotifyError>;

    /// Called once when the session is disposed and the tracker drops its handle.
    fn release(&self) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Identity of a controller; sessions are keyed by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListenerId(usize);

impl ListenerId {
    /// Allocates a process-unique id. Ids can only be obtained this way.
    pub fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

/// A non-owning reference from a session back to its controller.
///
/// The controller owns the session (through its id); the session only holds a `Weak`, so no
/// reference cycle is formed.
#[derive(Clone)]
pub struct ListenerHandle {
    id: ListenerId,
    target: Weak<dyn BoundaryListener>,
}

impl ListenerHandle {
    pub fn new<L: BoundaryListener + 'static>(id: ListenerId, listener: &Rc<L>) -> Self {
        let weak: Weak<L> = Rc::downgrade(listener);
        let target: Weak<dyn BoundaryListener> = weak;
        Self { id, target }
    }

    pub fn from_weak(id: ListenerId, target: Weak<dyn BoundaryListener>) -> Self {
        Self { id, target }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }

    pub(crate) fn deliver(&self, event: &BoundaryEvent) -> Result<(), NotifyError> {
        let listener = self.target.upgrade().ok_or(NotifyError::Disconnected)?;
        event.deliver(&*listener)
    }

    pub(crate) fn release(&self) -> Result<(), NotifyError> {
        let listener = self.target.upgrade().ok_or(NotifyError::Disconnected)?;
        listener.release()
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("id", &self.id)
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl BoundaryEvent {
    /// Invokes the listener method matching `self.spacer`.
    pub fn deliver(&self, listener: &dyn BoundaryListener) -> Result<(), NotifyError> {
        match self.spacer {
            SpacerSide::Before => listener.on_spacer_before_visible(
                self.offset,
                self.spacer_separation,
                self.container_size,
            ),
            SpacerSide::After => listener.on_spacer_after_visible(
                self.offset,
                self.spacer_separation,
                self.container_size,
            ),
        }
    }
}
