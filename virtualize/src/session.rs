use alloc::vec::Vec;
use core::fmt;

use crate::table::apply_table_display;
use crate::{
    Axis, BoundaryEvent, Host, IntersectionEntry, ListenerHandle, MutationRecord,
    SpacerMutationObserver, SpacerRange, SpacerSide, TrackerOptions, VisibilityObserver,
    resolve_scroll_container,
};

/// Everything observing one spacer pair.
#[derive(Debug)]
pub(crate) struct Session<E> {
    handle: ListenerHandle,
    spacer_before: E,
    spacer_after: E,
    container: Option<E>,
    axis: Axis,
    visibility: VisibilityObserver<E>,
    mutation_before: SpacerMutationObserver<E>,
    mutation_after: SpacerMutationObserver<E>,
    range: SpacerRange<E>,
}

impl<E: Copy + Eq + fmt::Debug> Session<E> {
    pub(crate) fn start<H: Host<Element = E> + ?Sized>(
        host: &mut H,
        handle: ListenerHandle,
        spacer_before: E,
        spacer_after: E,
        options: TrackerOptions,
    ) -> Self {
        let axis = options.axis;
        let container = resolve_scroll_container(host, spacer_before, axis);

        // Resizing a spacer must not make the host shift the scroll position to compensate:
        // the spacer would stay visible and be resized again, indefinitely.
        host.disable_overflow_anchor(container);

        apply_table_display(host, spacer_before, axis);
        apply_table_display(host, spacer_after, axis);

        let mut visibility = VisibilityObserver::new(container, axis, options.root_margin);
        visibility.observe(spacer_before);
        visibility.observe(spacer_after);

        vdebug!(
            id = handle.id().get(),
            ?container,
            ?axis,
            root_margin = options.root_margin,
            "tracking session started"
        );

        Self {
            handle,
            spacer_before,
            spacer_after,
            container,
            axis,
            visibility,
            mutation_before: SpacerMutationObserver::new(spacer_before),
            mutation_after: SpacerMutationObserver::new(spacer_after),
            range: SpacerRange::new(),
        }
    }

    pub(crate) fn handle(&self) -> &ListenerHandle {
        &self.handle
    }

    pub(crate) fn container(&self) -> Option<E> {
        self.container
    }

    pub(crate) fn spacers(&self) -> (E, E) {
        (self.spacer_before, self.spacer_after)
    }

    pub(crate) fn disconnect(&mut self) {
        self.visibility.disconnect();
        self.mutation_before.disconnect();
        self.mutation_after.disconnect();
    }

    /// Observers that are still connected (visibility observer counted while it has targets).
    pub(crate) fn live_observers(&self) -> usize {
        usize::from(self.visibility.observed_count() > 0)
            + usize::from(self.mutation_before.is_connected())
            + usize::from(self.mutation_after.is_connected())
    }

    pub(crate) fn is_observing(&self, spacer: E) -> bool {
        self.visibility.is_observing(spacer)
    }

    pub(crate) fn enqueue_mutation(&mut self, record: &MutationRecord<E>) -> bool {
        // Evaluate both: a record only ever matches one of them.
        let before = self.mutation_before.enqueue(record);
        let after = self.mutation_after.enqueue(record);
        before || after
    }

    /// Handles queued spacer mutations. Returns how many spacers were re-observed.
    pub(crate) fn deliver_mutations<H: Host<Element = E> + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> usize {
        let mut retriggered = 0;
        for side in [SpacerSide::Before, SpacerSide::After] {
            let observer = match side {
                SpacerSide::Before => &mut self.mutation_before,
                SpacerSide::After => &mut self.mutation_after,
            };
            if observer.take_records().is_empty() {
                continue;
            }
            let spacer = observer.target();

            // The host may have restyled the spacer out of its table role. If the host reports
            // our own restyle back, the next pass finds the display already set and writes
            // nothing, so the cycle ends there.
            apply_table_display(host, spacer, self.axis);

            // Visibility is only reported on transitions; a spacer that was resized but is
            // still visible would otherwise never be reported again.
            self.visibility.unobserve(spacer);
            self.visibility.observe(spacer);
            vtrace!(?spacer, ?side, "spacer mutated, re-observing");
            retriggered += 1;
        }
        retriggered
    }

    /// Evaluates visibility and appends the qualifying boundary events to `out`.
    pub(crate) fn collect_events<H: Host<Element = E> + ?Sized>(
        &mut self,
        host: &H,
        out: &mut Vec<BoundaryEvent>,
    ) {
        for entry in self.visibility.take_records(host) {
            if let Some(event) = self.boundary_event(host, &entry) {
                out.push(event);
            }
        }
    }

    fn boundary_event<H: Host<Element = E> + ?Sized>(
        &mut self,
        host: &H,
        entry: &IntersectionEntry<E>,
    ) -> Option<BoundaryEvent> {
        if !entry.is_intersecting {
            return None;
        }
        let axis = self.axis;
        let bounding = entry.bounding_client_rect;
        let intersection = entry.intersection_rect;

        let (spacer, offset) = if entry.target == self.spacer_before {
            (
                SpacerSide::Before,
                intersection.near_edge(axis) - bounding.near_edge(axis),
            )
        } else if entry.target == self.spacer_after {
            // At startup both spacers are visible at once. Only the before spacer matters
            // then; an after spacer that has no extent yet says nothing about overlap.
            if bounding.size(axis) <= 0.0 {
                vtrace!(spacer = ?entry.target, "after spacer has no extent, skipping");
                return None;
            }
            (
                SpacerSide::After,
                bounding.far_edge(axis) - intersection.far_edge(axis),
            )
        } else {
            return None;
        };

        let spacer_separation = self
            .range
            .separation(host, self.spacer_before, self.spacer_after, axis);
        let container_size = entry.root_bounds.map(|root| root.size(axis));

        Some(BoundaryEvent {
            spacer,
            offset,
            spacer_separation,
            container_size,
        })
    }
}
