use core::fmt;

use crate::{Axis, Display, DomRect, ElementKind, Overflow};

/// The layout environment the tracker observes.
///
/// Implement this for your DOM bridge (or a test double). All reads are expected to reflect
/// the most recent layout; the tracker never caches them across [`crate::Tracker::run`] calls.
pub trait Host {
    /// A cheap handle to a host element.
    type Element: Copy + Eq + fmt::Debug;

    fn parent(&self, element: Self::Element) -> Option<Self::Element>;

    fn kind(&self, element: Self::Element) -> ElementKind;

    /// Computed overflow along `axis` (`overflow-x` / `overflow-y`).
    fn overflow(&self, element: Self::Element, axis: Axis) -> Overflow;

    /// The explicit (inline) display override, if any.
    fn display(&self, element: Self::Element) -> Option<Display>;

    fn set_display(&mut self, element: Self::Element, display: Display);

    /// Turns off scroll anchoring (`overflow-anchor: none`) on `container`, or on the document
    /// element when `container` is `None`.
    fn disable_overflow_anchor(&mut self, container: Option<Self::Element>);

    fn bounding_client_rect(&self, element: Self::Element) -> DomRect;

    /// Bounding rect of a range starting right after `start_after` and ending right before
    /// `end_before`.
    fn range_bounding_rect(
        &self,
        start_after: Self::Element,
        end_before: Self::Element,
    ) -> DomRect;

    /// The visible (client) region of a scroll container.
    fn scrollport_rect(&self, container: Self::Element) -> DomRect;

    /// The visible region of the top-level viewport.
    fn viewport_rect(&self) -> DomRect;

    /// Whether root bounds are reported when observing against the top-level viewport.
    ///
    /// Some engines do not expose them; return `false` to propagate an unknown container size.
    fn exposes_viewport_bounds(&self) -> bool {
        true
    }
}
