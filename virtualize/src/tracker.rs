use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::key::SessionMap;
use crate::session::Session;
use crate::{Host, ListenerHandle, ListenerId, MutationRecord, TrackerError, TrackerOptions};

/// Outcome of [`Tracker::init`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    /// No session existed for this listener.
    Created,
    /// A live session existed; its observers were disconnected before it was replaced.
    Replaced,
}

/// The session registry: one tracking session per listener identity.
///
/// This is the only place sessions live. Create one per UI thread (or per document) and drive
/// it from the host's event loop:
///
/// 1. `init` when a list's spacers are mounted, `dispose` when the list goes away.
/// 2. `record_mutation` whenever a spacer's attributes (e.g. its style) change.
/// 3. `run` after layout, to process mutations and dispatch boundary notifications.
///
/// Everything happens on one thread, so no locking is involved.
pub struct Tracker<E> {
    sessions: SessionMap<ListenerId, Session<E>>,
}

impl<E> Default for Tracker<E> {
    fn default() -> Self {
        Self {
            sessions: SessionMap::default(),
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for Tracker<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}

impl<E: Copy + Eq + fmt::Debug> Tracker<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking a spacer pair on behalf of `handle`'s listener.
    ///
    /// Resolves the scroll container, disables scroll anchoring on it, gives the spacers a
    /// table display mode when they live inside a table, and starts observing. Calling `init`
    /// again for the same listener id without `dispose` disconnects the previous session
    /// first; observers are never leaked.
    pub fn init<H: Host<Element = E> + ?Sized>(
        &mut self,
        host: &mut H,
        handle: ListenerHandle,
        spacer_before: E,
        spacer_after: E,
        options: TrackerOptions,
    ) -> Result<Registration, TrackerError> {
        options.validate()?;
        if spacer_before == spacer_after {
            return Err(TrackerError::SameSpacer);
        }

        let id = handle.id();
        let registration = match self.sessions.remove(&id) {
            Some(mut previous) => {
                vwarn!(
                    id = id.get(),
                    "init called on a live session; disconnecting the previous observers"
                );
                previous.disconnect();
                Registration::Replaced
            }
            None => Registration::Created,
        };

        let session = Session::start(host, handle, spacer_before, spacer_after, options);
        self.sessions.insert(id, session);
        Ok(registration)
    }

    /// Stops tracking for `id`.
    ///
    /// Disconnects all observers, releases the listener handle and forgets the session.
    /// Failing to reach the listener while releasing is expected when the host is already
    /// torn down and is ignored. Returns `false` (and does nothing) for unknown ids.
    pub fn dispose(&mut self, id: ListenerId) -> bool {
        let Some(mut session) = self.sessions.remove(&id) else {
            vtrace!(id = id.get(), "dispose: no session");
            return false;
        };
        session.disconnect();
        if let Err(_err) = session.handle().release() {
            vdebug!(id = id.get(), error = %_err, "dispose: listener already gone");
        }
        vdebug!(id = id.get(), "tracking session disposed");
        true
    }

    pub fn is_tracking(&self, id: ListenerId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Number of connected observers across all sessions (three per live session).
    pub fn live_observer_count(&self) -> usize {
        self.sessions.values().map(Session::live_observers).sum()
    }

    /// The resolved scroll container of a session: `Some(None)` means the top-level viewport.
    pub fn container(&self, id: ListenerId) -> Option<Option<E>> {
        self.sessions.get(&id).map(Session::container)
    }

    /// The `(before, after)` spacers of a session.
    pub fn spacers(&self, id: ListenerId) -> Option<(E, E)> {
        self.sessions.get(&id).map(Session::spacers)
    }

    /// Whether a session currently has `spacer` under visibility observation.
    pub fn is_observing(&self, id: ListenerId, spacer: E) -> bool {
        self.sessions
            .get(&id)
            .is_some_and(|session| session.is_observing(spacer))
    }

    /// Reports an attribute change on a host element.
    ///
    /// The record is queued on every connected spacer observer watching `target` and handled
    /// by the next [`Tracker::deliver_mutations`] / [`Tracker::run`]. Returns how many
    /// observers queued it; mutations of unrelated elements are ignored.
    pub fn record_mutation(&mut self, target: E, attribute_name: impl Into<String>) -> usize {
        let record = MutationRecord {
            target,
            attribute_name: attribute_name.into(),
        };
        self.sessions
            .values_mut()
            .map(|session| session.enqueue_mutation(&record))
            .filter(|queued| *queued)
            .count()
    }

    /// Handles queued spacer mutations: reapplies table display modes and forces the
    /// mutated spacers to be re-evaluated by the visibility observer.
    ///
    /// Returns how many spacers were re-observed.
    pub fn deliver_mutations<H: Host<Element = E> + ?Sized>(&mut self, host: &mut H) -> usize {
        let mut retriggered = 0;
        for session in self.sessions.values_mut() {
            retriggered += session.deliver_mutations(&mut *host);
        }
        retriggered
    }

    /// Evaluates spacer visibility and notifies listeners of spacers entering the trigger
    /// zone.
    ///
    /// Notifications are fire-and-forget: a listener error is logged and does not stop the
    /// remaining deliveries. Sessions whose listener has been dropped are disconnected and
    /// forgotten instead of being evaluated. Returns how many notifications were delivered
    /// successfully.
    pub fn check_visibility<H: Host<Element = E> + ?Sized>(&mut self, host: &H) -> usize {
        self.remove_orphaned();
        let mut delivered = 0;
        let mut events = Vec::new();
        for session in self.sessions.values_mut() {
            events.clear();
            session.collect_events(host, &mut events);
            for event in &events {
                match session.handle().deliver(event) {
                    Ok(()) => {
                        vtrace!(
                            id = session.handle().id().get(),
                            spacer = ?event.spacer,
                            offset = event.offset,
                            separation = event.spacer_separation,
                            container_size = ?event.container_size,
                            "boundary event delivered"
                        );
                        delivered += 1;
                    }
                    Err(_) if !session.handle().is_alive() => break,
                    Err(_err) => {
                        vwarn!(
                            id = session.handle().id().get(),
                            spacer = ?event.spacer,
                            error = %_err,
                            "boundary event not delivered"
                        );
                    }
                }
            }
        }
        // A listener may have dropped its last owner while handling a notification.
        self.remove_orphaned();
        delivered
    }

    /// Disconnects and removes sessions whose listener no longer exists.
    fn remove_orphaned(&mut self) {
        self.sessions.retain(|_id, session| {
            if session.handle().is_alive() {
                return true;
            }
            session.disconnect();
            vdebug!(id = _id.get(), "listener dropped, tracking session removed");
            false
        });
    }

    /// One observer checkpoint: [`Tracker::deliver_mutations`], then
    /// [`Tracker::check_visibility`]. Returns the number of notifications delivered.
    pub fn run<H: Host<Element = E> + ?Sized>(&mut self, host: &mut H) -> usize {
        self.deliver_mutations(&mut *host);
        self.check_visibility(&*host)
    }
}
