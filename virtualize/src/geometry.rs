use crate::{Axis, Host};

/// A persistent range spanning the content between the two spacers.
///
/// The separation is read from the range's single bounding rect. Subtracting the edges of
/// two independently measured fractional rects accumulates rounding error and shows up as
/// scroll jitter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpacerRange<E> {
    start_after: Option<E>,
    end_before: Option<E>,
}

impl<E> Default for SpacerRange<E> {
    fn default() -> Self {
        Self {
            start_after: None,
            end_before: None,
        }
    }
}

impl<E: Copy + Eq> SpacerRange<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-anchors the range between `before` and `after` and returns its size along `axis`.
    ///
    /// Always measured fresh; layout may have changed since the previous call.
    pub fn separation<H: Host<Element = E> + ?Sized>(
        &mut self,
        host: &H,
        before: E,
        after: E,
        axis: Axis,
    ) -> f64 {
        let start = *self.start_after.insert(before);
        let end = *self.end_before.insert(after);
        host.range_bounding_rect(start, end).size(axis)
    }
}
