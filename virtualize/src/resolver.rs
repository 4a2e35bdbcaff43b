use crate::{Axis, ElementKind, Host};

/// Upper bound on ancestor hops; guards against cyclic host trees.
const MAX_ANCESTOR_DEPTH: usize = 4096;

/// Finds the element whose overflow clips `element` along `axis`.
///
/// The walk starts at `element` itself and moves up through its parents. Returns `None` when
/// it reaches `<body>`/`<html>` (or runs out of parents) without finding one, meaning the
/// top-level viewport is the effective scroll container. The body and document element are
/// never returned: they can be arbitrarily tall, so observing against them is useless.
pub fn resolve_scroll_container<H: Host + ?Sized>(
    host: &H,
    element: H::Element,
    axis: Axis,
) -> Option<H::Element> {
    let mut current = Some(element);
    for _ in 0..MAX_ANCESTOR_DEPTH {
        let el = current?;
        if matches!(host.kind(el), ElementKind::Body | ElementKind::DocumentRoot) {
            return None;
        }
        if !host.overflow(el, axis).is_visible() {
            vtrace!(container = ?el, ?axis, "resolved scroll container");
            return Some(el);
        }
        current = host.parent(el);
    }
    vwarn!(
        start = ?element,
        depth = MAX_ANCESTOR_DEPTH,
        "resolve_scroll_container: ancestor chain too deep, falling back to viewport"
    );
    None
}
