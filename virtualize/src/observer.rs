use alloc::vec::Vec;

use crate::{Axis, DomRect, Host};

/// One visibility report for an observed target.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntersectionEntry<E> {
    pub target: E,
    pub bounding_client_rect: DomRect,
    /// The part of the target inside the trigger zone; zero-sized when not intersecting.
    pub intersection_rect: DomRect,
    /// Visible region of the root (without the margin); `None` when the host hides it.
    pub root_bounds: Option<DomRect>,
    pub is_intersecting: bool,
}

#[derive(Clone, Copy, Debug)]
struct Observation<E> {
    target: E,
    /// `None` until the first evaluation after (re-)observing.
    last_intersecting: Option<bool>,
}

/// Watches targets for intersection with a root's visible region.
///
/// Like a browser intersection observer without thresholds, it only reports transitions: a
/// target produces an entry on its first evaluation after being observed and afterwards only
/// when it enters or leaves the trigger zone. A target that is resized while staying visible
/// produces nothing, which is why the tracker re-observes spacers after they mutate.
#[derive(Clone, Debug)]
pub struct VisibilityObserver<E> {
    root: Option<E>,
    axis: Axis,
    root_margin: f64,
    targets: Vec<Observation<E>>,
}

impl<E: Copy + Eq> VisibilityObserver<E> {
    /// `root = None` observes against the top-level viewport.
    pub fn new(root: Option<E>, axis: Axis, root_margin: f64) -> Self {
        Self {
            root,
            axis,
            root_margin,
            targets: Vec::new(),
        }
    }

    pub fn root(&self) -> Option<E> {
        self.root
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn root_margin(&self) -> f64 {
        self.root_margin
    }

    /// Starts observing `target`. Observing an already observed target is a no-op.
    pub fn observe(&mut self, target: E) {
        if self.is_observing(target) {
            return;
        }
        self.targets.push(Observation {
            target,
            last_intersecting: None,
        });
    }

    /// Returns `true` if `target` was being observed.
    pub fn unobserve(&mut self, target: E) -> bool {
        let before = self.targets.len();
        self.targets.retain(|o| o.target != target);
        self.targets.len() != before
    }

    pub fn disconnect(&mut self) {
        self.targets.clear();
    }

    pub fn is_observing(&self, target: E) -> bool {
        self.targets.iter().any(|o| o.target == target)
    }

    pub fn observed_count(&self) -> usize {
        self.targets.len()
    }

    /// Evaluates every target against the current layout and returns the pending entries, in
    /// observation order.
    pub fn take_records<H: Host<Element = E> + ?Sized>(
        &mut self,
        host: &H,
    ) -> Vec<IntersectionEntry<E>> {
        let mut records = Vec::new();
        if self.targets.is_empty() {
            return records;
        }

        let root_rect = match self.root {
            Some(container) => host.scrollport_rect(container),
            None => host.viewport_rect(),
        };
        let root_bounds = if self.root.is_some() || host.exposes_viewport_bounds() {
            Some(root_rect)
        } else {
            None
        };
        let zone = root_rect.expand(self.axis, self.root_margin);

        for observation in &mut self.targets {
            let bounding_client_rect = host.bounding_client_rect(observation.target);
            let intersection = bounding_client_rect.intersection(&zone);
            let is_intersecting = intersection.is_some();
            if observation.last_intersecting == Some(is_intersecting) {
                continue;
            }
            observation.last_intersecting = Some(is_intersecting);
            records.push(IntersectionEntry {
                target: observation.target,
                bounding_client_rect,
                intersection_rect: intersection.unwrap_or_default(),
                root_bounds,
                is_intersecting,
            });
        }
        records
    }
}
