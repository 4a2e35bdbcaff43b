use crate::*;

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct NodeId(usize);

#[derive(Clone, Debug)]
struct Node {
    parent: Option<NodeId>,
    kind: ElementKind,
    overflow_x: Overflow,
    overflow_y: Overflow,
    display: Option<Display>,
    rect: DomRect,
}

/// A tiny layout tree: `<html>` → `<body>` → whatever the test adds.
struct FakeDom {
    nodes: Vec<Node>,
    viewport: DomRect,
    viewport_bounds: bool,
    /// What a range between two spacers measures to; tests set it alongside spacer rects.
    range_rect: DomRect,
    anchoring_disabled: Vec<Option<NodeId>>,
    display_writes: usize,
}

impl FakeDom {
    const ROOT: NodeId = NodeId(0);
    const BODY: NodeId = NodeId(1);

    fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            viewport: DomRect::new(0.0, 0.0, 1024.0, 768.0),
            viewport_bounds: true,
            range_rect: DomRect::default(),
            anchoring_disabled: Vec::new(),
            display_writes: 0,
        };
        dom.push(None, ElementKind::DocumentRoot);
        dom.push(Some(Self::ROOT), ElementKind::Body);
        dom
    }

    fn push(&mut self, parent: Option<NodeId>, kind: ElementKind) -> NodeId {
        self.nodes.push(Node {
            parent,
            kind,
            overflow_x: Overflow::Visible,
            overflow_y: Overflow::Visible,
            display: None,
            rect: DomRect::default(),
        });
        NodeId(self.nodes.len() - 1)
    }

    fn add(&mut self, parent: NodeId, kind: ElementKind) -> NodeId {
        self.push(Some(parent), kind)
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn set_rect(&mut self, id: NodeId, rect: DomRect) {
        self.node_mut(id).rect = rect;
    }

    fn set_overflow(&mut self, id: NodeId, axis: Axis, overflow: Overflow) {
        let node = self.node_mut(id);
        match axis {
            Axis::Horizontal => node.overflow_x = overflow,
            Axis::Vertical => node.overflow_y = overflow,
        }
    }

    /// A vertically scrolling `div` under `<body>` with an 800px tall scrollport.
    fn with_scroller() -> (Self, NodeId) {
        let mut dom = Self::new();
        let scroller = dom.add(Self::BODY, ElementKind::Other);
        dom.set_overflow(scroller, Axis::Vertical, Overflow::Auto);
        dom.set_rect(scroller, DomRect::new(0.0, 0.0, 300.0, 800.0));
        (dom, scroller)
    }
}

impl Host for FakeDom {
    type Element = NodeId;

    fn parent(&self, element: NodeId) -> Option<NodeId> {
        self.nodes[element.0].parent
    }

    fn kind(&self, element: NodeId) -> ElementKind {
        self.nodes[element.0].kind
    }

    fn overflow(&self, element: NodeId, axis: Axis) -> Overflow {
        let node = &self.nodes[element.0];
        match axis {
            Axis::Horizontal => node.overflow_x,
            Axis::Vertical => node.overflow_y,
        }
    }

    fn display(&self, element: NodeId) -> Option<Display> {
        self.nodes[element.0].display
    }

    fn set_display(&mut self, element: NodeId, display: Display) {
        self.display_writes += 1;
        self.node_mut(element).display = Some(display);
    }

    fn disable_overflow_anchor(&mut self, container: Option<NodeId>) {
        self.anchoring_disabled.push(container);
    }

    fn bounding_client_rect(&self, element: NodeId) -> DomRect {
        self.nodes[element.0].rect
    }

    fn range_bounding_rect(&self, _start_after: NodeId, _end_before: NodeId) -> DomRect {
        self.range_rect
    }

    fn scrollport_rect(&self, container: NodeId) -> DomRect {
        self.nodes[container.0].rect
    }

    fn viewport_rect(&self) -> DomRect {
        self.viewport
    }

    fn exposes_viewport_bounds(&self) -> bool {
        self.viewport_bounds
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Seen {
    side: SpacerSide,
    offset: f64,
    separation: f64,
    container_size: Option<f64>,
}

#[derive(Default)]
struct Recorder {
    seen: RefCell<Vec<Seen>>,
    released: Cell<usize>,
    fail: bool,
}

impl Recorder {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn push(&self, side: SpacerSide, offset: f64, separation: f64, container_size: Option<f64>) {
        self.seen.borrow_mut().push(Seen {
            side,
            offset,
            separation,
            container_size,
        });
    }

    fn take(&self) -> Vec<Seen> {
        core::mem::take(&mut *self.seen.borrow_mut())
    }
}

impl BoundaryListener for Recorder {
    fn on_spacer_before_visible(
        &self,
        offset: f64,
        spacer_separation: f64,
        container_size: Option<f64>,
    ) -> Result<(), NotifyError> {
        self.push(SpacerSide::Before, offset, spacer_separation, container_size);
        if self.fail {
            return Err(NotifyError::Disconnected);
        }
        Ok(())
    }

    fn on_spacer_after_visible(
        &self,
        offset: f64,
        spacer_separation: f64,
        container_size: Option<f64>,
    ) -> Result<(), NotifyError> {
        self.push(SpacerSide::After, offset, spacer_separation, container_size);
        if self.fail {
            return Err(NotifyError::Disconnected);
        }
        Ok(())
    }

    fn release(&self) -> Result<(), NotifyError> {
        self.released.set(self.released.get() + 1);
        if self.fail {
            return Err(NotifyError::Disconnected);
        }
        Ok(())
    }
}

fn handle_for(listener: &Rc<Recorder>) -> ListenerHandle {
    ListenerHandle::new(ListenerId::next(), listener)
}

/// Two spacers inside `parent`, with an empty window between them at the top of the scroller.
fn spacer_pair(dom: &mut FakeDom, parent: NodeId) -> (NodeId, NodeId) {
    let before = dom.add(parent, ElementKind::Other);
    let after = dom.add(parent, ElementKind::Other);
    dom.set_rect(before, DomRect::new(0.0, 0.0, 300.0, 0.0));
    dom.set_rect(after, DomRect::new(0.0, 0.0, 300.0, 0.0));
    (before, after)
}

#[test]
fn resolver_finds_nearest_constrained_ancestor() {
    let (mut dom, scroller) = FakeDom::with_scroller();
    let list = dom.add(scroller, ElementKind::Other);
    let item = dom.add(list, ElementKind::Other);

    assert_eq!(
        resolve_scroll_container(&dom, item, Axis::Vertical),
        Some(scroller)
    );
    // Only overflow-y was constrained.
    assert_eq!(resolve_scroll_container(&dom, item, Axis::Horizontal), None);

    dom.set_overflow(list, Axis::Vertical, Overflow::Hidden);
    assert_eq!(
        resolve_scroll_container(&dom, item, Axis::Vertical),
        Some(list)
    );
}

#[test]
fn resolver_starts_with_the_element_itself() {
    let (mut dom, scroller) = FakeDom::with_scroller();
    let el = dom.add(scroller, ElementKind::Other);
    dom.set_overflow(el, Axis::Horizontal, Overflow::Scroll);
    assert_eq!(resolve_scroll_container(&dom, el, Axis::Horizontal), Some(el));
}

#[test]
fn resolver_stops_at_body_and_document_root() {
    let mut dom = FakeDom::new();
    dom.set_overflow(FakeDom::BODY, Axis::Vertical, Overflow::Auto);
    dom.set_overflow(FakeDom::ROOT, Axis::Vertical, Overflow::Auto);
    let list = dom.add(FakeDom::BODY, ElementKind::Other);

    assert_eq!(resolve_scroll_container(&dom, list, Axis::Vertical), None);
    assert_eq!(
        resolve_scroll_container(&dom, FakeDom::BODY, Axis::Vertical),
        None
    );
}

#[test]
fn resolver_survives_detached_and_cyclic_trees() {
    let mut dom = FakeDom::new();
    let detached = dom.push(None, ElementKind::Other);
    assert_eq!(resolve_scroll_container(&dom, detached, Axis::Vertical), None);

    let a = dom.push(None, ElementKind::Other);
    let b = dom.add(a, ElementKind::Other);
    dom.node_mut(a).parent = Some(b);
    assert_eq!(resolve_scroll_container(&dom, b, Axis::Vertical), None);
}

#[test]
fn rect_intersection_is_edge_inclusive() {
    let zone = DomRect::new(0.0, 0.0, 100.0, 100.0);
    let empty_inside = DomRect::new(10.0, 40.0, 100.0, 0.0);
    let hit = empty_inside.intersection(&zone).unwrap();
    assert_eq!(hit.height, 0.0);
    assert_eq!(hit.width, 90.0);

    let touching = DomRect::new(0.0, 100.0, 10.0, 10.0);
    assert!(touching.intersection(&zone).is_some());

    let outside = DomRect::new(0.0, 100.5, 10.0, 10.0);
    assert!(outside.intersection(&zone).is_none());
}

#[test]
fn rect_expand_only_grows_the_active_axis() {
    let r = DomRect::new(10.0, 20.0, 100.0, 200.0);
    assert_eq!(
        r.expand(Axis::Vertical, 50.0),
        DomRect::new(10.0, -30.0, 100.0, 300.0)
    );
    assert_eq!(
        r.expand(Axis::Horizontal, 50.0),
        DomRect::new(-40.0, 20.0, 200.0, 200.0)
    );
    assert_eq!(r.expand(Axis::Vertical, -150.0).height, 0.0);
}

#[test]
fn init_then_dispose_leaves_nothing_registered() {
    for horizontal in [false, true] {
        let (mut dom, scroller) = FakeDom::with_scroller();
        let (before, after) = spacer_pair(&mut dom, scroller);
        let listener = Rc::new(Recorder::default());
        let handle = handle_for(&listener);
        let id = handle.id();

        let mut tracker = Tracker::new();
        let registration = tracker
            .init(
                &mut dom,
                handle,
                before,
                after,
                TrackerOptions::new(horizontal),
            )
            .unwrap();
        assert_eq!(registration, Registration::Created);
        assert!(tracker.is_tracking(id));
        assert_eq!(tracker.live_observer_count(), 3);
        assert_eq!(tracker.spacers(id), Some((before, after)));

        assert!(tracker.dispose(id));
        assert!(!tracker.is_tracking(id));
        assert_eq!(tracker.session_count(), 0);
        assert_eq!(tracker.live_observer_count(), 0);
        assert_eq!(listener.released.get(), 1);

        // Disposing again (or something never initialized) is a no-op.
        assert!(!tracker.dispose(id));
        assert!(!tracker.dispose(ListenerId::next()));
        assert_eq!(listener.released.get(), 1);
    }
}

#[test]
fn init_disables_overflow_anchoring_on_the_container() {
    let (mut dom, scroller) = FakeDom::with_scroller();
    let (before, after) = spacer_pair(&mut dom, scroller);
    let listener = Rc::new(Recorder::default());
    let handle = handle_for(&listener);
    let id = handle.id();
    let mut tracker = Tracker::new();
    tracker
        .init(&mut dom, handle, before, after, TrackerOptions::default())
        .unwrap();
    assert_eq!(dom.anchoring_disabled, [Some(scroller)]);
    assert_eq!(tracker.container(id), Some(Some(scroller)));

    // Window scrolling: the document element gets it instead.
    let mut dom = FakeDom::new();
    let list = dom.add(FakeDom::BODY, ElementKind::Other);
    let (before, after) = spacer_pair(&mut dom, list);
    let handle = handle_for(&listener);
    let id = handle.id();
    tracker
        .init(&mut dom, handle, before, after, TrackerOptions::default())
        .unwrap();
    assert_eq!(dom.anchoring_disabled, [None]);
    assert_eq!(tracker.container(id), Some(None));
}

#[test]
fn repeated_init_replaces_without_leaking_observers() {
    let (mut dom, scroller) = FakeDom::with_scroller();
    let (before, after) = spacer_pair(&mut dom, scroller);
    let listener = Rc::new(Recorder::default());
    let id = ListenerId::next();
    let mut tracker = Tracker::new();

    let first = tracker
        .init(
            &mut dom,
            ListenerHandle::new(id, &listener),
            before,
            after,
            TrackerOptions::default(),
        )
        .unwrap();
    let second = tracker
        .init(
            &mut dom,
            ListenerHandle::new(id, &listener),
            before,
            after,
            TrackerOptions::default(),
        )
        .unwrap();

    assert_eq!(first, Registration::Created);
    assert_eq!(second, Registration::Replaced);
    assert_eq!(tracker.session_count(), 1);
    assert_eq!(tracker.live_observer_count(), 3);
    // Replacing is not disposal: the listener keeps its handle.
    assert_eq!(listener.released.get(), 0);

    // Only the new session reports.
    dom.range_rect = DomRect::new(0.0, 0.0, 300.0, 0.0);
    assert_eq!(tracker.run(&mut dom), 1);
}

#[test]
fn init_rejects_invalid_input() {
    let (mut dom, scroller) = FakeDom::with_scroller();
    let (before, _) = spacer_pair(&mut dom, scroller);
    let listener = Rc::new(Recorder::default());
    let mut tracker = Tracker::new();

    assert_eq!(
        tracker.init(
            &mut dom,
            handle_for(&listener),
            before,
            before,
            TrackerOptions::default()
        ),
        Err(TrackerError::SameSpacer)
    );
    let err = tracker
        .init(
            &mut dom,
            handle_for(&listener),
            before,
            NodeId(0),
            TrackerOptions::default().with_root_margin(f64::NAN),
        )
        .unwrap_err();
    assert!(matches!(err, TrackerError::InvalidRootMargin(m) if m.is_nan()));
    assert_eq!(tracker.session_count(), 0);
    assert!(dom.anchoring_disabled.is_empty());
}

#[test]
fn startup_reports_only_the_before_spacer() {
    let (mut dom, scroller) = FakeDom::with_scroller();
    let (before, after) = spacer_pair(&mut dom, scroller);
    let listener = Rc::new(Recorder::default());
    let mut tracker = Tracker::new();
    tracker
        .init(
            &mut dom,
            handle_for(&listener),
            before,
            after,
            TrackerOptions::default(),
        )
        .unwrap();

    assert_eq!(tracker.run(&mut dom), 1);
    assert_eq!(
        listener.take(),
        [Seen {
            side: SpacerSide::Before,
            offset: 0.0,
            separation: 0.0,
            container_size: Some(800.0),
        }]
    );

    // Nothing changed: no transitions, no events.
    assert_eq!(tracker.run(&mut dom), 0);
    assert!(listener.take().is_empty());
}

#[test]
fn before_offset_measures_penetration_into_the_spacer() {
    let (mut dom, scroller) = FakeDom::with_scroller();
    let (before, after) = spacer_pair(&mut dom, scroller);
    // The before spacer starts 200px above the scrollport; the trigger zone starts at -50.
    dom.set_rect(before, DomRect::new(0.0, -200.0, 300.0, 300.0));
    dom.set_rect(after, DomRect::new(0.0, 2000.0, 300.0, 500.0));
    dom.range_rect = DomRect::new(0.0, 100.0, 300.0, 1900.0);

    let listener = Rc::new(Recorder::default());
    let mut tracker = Tracker::new();
    tracker
        .init(
            &mut dom,
            handle_for(&listener),
            before,
            after,
            TrackerOptions::default(),
        )
        .unwrap();
    tracker.run(&mut dom);

    let seen = listener.take();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].side, SpacerSide::Before);
    assert_eq!(seen[0].offset, 150.0);
    assert_eq!(seen[0].separation, 1900.0);
}

#[test]
fn after_spacer_scrolled_into_the_trigger_zone() {
    let (mut dom, scroller) = FakeDom::with_scroller();
    let (before, after) = spacer_pair(&mut dom, scroller);
    let listener = Rc::new(Recorder::default());
    let mut tracker = Tracker::new();
    tracker
        .init(
            &mut dom,
            handle_for(&listener),
            before,
            after,
            TrackerOptions::default().with_root_margin(50.0),
        )
        .unwrap();
    tracker.run(&mut dom);
    listener.take();

    // The controller rendered 400px of items and sized both spacers.
    dom.set_rect(before, DomRect::new(0.0, -560.0, 300.0, 1000.0));
    dom.set_rect(after, DomRect::new(0.0, 840.0, 300.0, 20.0));
    dom.range_rect = DomRect::new(0.0, 440.0, 300.0, 400.0);
    // Only the after spacer's style changed; the before spacer stayed visible throughout.
    tracker.record_mutation(after, "style");
    assert_eq!(tracker.run(&mut dom), 1);

    assert_eq!(
        listener.take(),
        [Seen {
            side: SpacerSide::After,
            // The zone ends at 850, the spacer at 860.
            offset: 10.0,
            separation: 400.0,
            container_size: Some(800.0),
        }]
    );
}

#[test]
fn zero_sized_after_spacer_is_never_reported() {
    let (mut dom, scroller) = FakeDom::with_scroller();
    let (before, after) = spacer_pair(&mut dom, scroller);
    dom.set_rect(before, DomRect::new(0.0, -2000.0, 300.0, 10.0));
    dom.set_rect(after, DomRect::new(0.0, 400.0, 300.0, 0.0));

    let listener = Rc::new(Recorder::default());
    let mut tracker = Tracker::new();
    tracker
        .init(
            &mut dom,
            handle_for(&listener),
            before,
            after,
            TrackerOptions::default(),
        )
        .unwrap();
    assert_eq!(tracker.run(&mut dom), 0);

    tracker.record_mutation(after, "style");
    assert_eq!(tracker.run(&mut dom), 0);
    assert!(listener.take().is_empty());
}

#[test]
fn resizing_a_visible_spacer_retriggers_evaluation() {
    let (mut dom, scroller) = FakeDom::with_scroller();
    let (before, after) = spacer_pair(&mut dom, scroller);
    dom.set_rect(before, DomRect::new(0.0, -5000.0, 300.0, 10.0));
    dom.set_rect(after, DomRect::new(0.0, 600.0, 300.0, 1000.0));
    dom.range_rect = DomRect::new(0.0, -4990.0, 300.0, 5590.0);

    let listener = Rc::new(Recorder::default());
    let handle = handle_for(&listener);
    let id = handle.id();
    let mut tracker = Tracker::new();
    tracker
        .init(&mut dom, handle, before, after, TrackerOptions::default())
        .unwrap();
    assert_eq!(tracker.run(&mut dom), 1);
    assert_eq!(listener.take()[0].side, SpacerSide::After);

    // Shrink it while it stays visible: without a mutation nothing is reported.
    dom.set_rect(after, DomRect::new(0.0, 600.0, 300.0, 900.0));
    assert_eq!(tracker.run(&mut dom), 0);

    assert_eq!(tracker.record_mutation(after, "style"), 1);
    assert_eq!(tracker.deliver_mutations(&mut dom), 1);
    assert!(tracker.is_observing(id, after));
    assert_eq!(tracker.check_visibility(&dom), 1);
    assert_eq!(listener.take()[0].side, SpacerSide::After);

    // Mutations of unrelated elements are ignored.
    assert_eq!(tracker.record_mutation(scroller, "style"), 0);
    assert_eq!(tracker.run(&mut dom), 0);
}

#[test]
fn root_margin_widens_the_trigger_zone() {
    for (margin, expected) in [(50.0, 1), (0.0, 0)] {
        let (mut dom, scroller) = FakeDom::with_scroller();
        let (before, after) = spacer_pair(&mut dom, scroller);
        dom.set_rect(before, DomRect::new(0.0, -3000.0, 300.0, 100.0));
        dom.set_rect(after, DomRect::new(0.0, 820.0, 300.0, 100.0));

        let listener = Rc::new(Recorder::default());
        let mut tracker = Tracker::new();
        tracker
            .init(
                &mut dom,
                handle_for(&listener),
                before,
                after,
                TrackerOptions::default().with_root_margin(margin),
            )
            .unwrap();
        assert_eq!(tracker.run(&mut dom), expected, "margin={margin}");
    }
}

#[test]
fn horizontal_lists_measure_along_x() {
    let mut dom = FakeDom::new();
    let scroller = dom.add(FakeDom::BODY, ElementKind::Other);
    dom.set_overflow(scroller, Axis::Horizontal, Overflow::Auto);
    dom.set_rect(scroller, DomRect::new(0.0, 0.0, 600.0, 100.0));
    let (before, after) = spacer_pair(&mut dom, scroller);
    dom.set_rect(before, DomRect::new(-300.0, 0.0, 400.0, 100.0));
    dom.set_rect(after, DomRect::new(5000.0, 0.0, 10.0, 100.0));
    dom.range_rect = DomRect::new(100.0, 0.0, 4900.0, 100.0);

    let listener = Rc::new(Recorder::default());
    let mut tracker = Tracker::new();
    tracker
        .init(
            &mut dom,
            handle_for(&listener),
            before,
            after,
            TrackerOptions::new(true),
        )
        .unwrap();
    tracker.run(&mut dom);

    assert_eq!(
        listener.take(),
        [Seen {
            side: SpacerSide::Before,
            offset: 250.0,
            separation: 4900.0,
            container_size: Some(600.0),
        }]
    );
}

#[test]
fn unknown_viewport_bounds_propagate_as_none() {
    let mut dom = FakeDom::new();
    dom.viewport_bounds = false;
    let list = dom.add(FakeDom::BODY, ElementKind::Other);
    let (before, after) = spacer_pair(&mut dom, list);

    let listener = Rc::new(Recorder::default());
    let mut tracker = Tracker::new();
    tracker
        .init(
            &mut dom,
            handle_for(&listener),
            before,
            after,
            TrackerOptions::default(),
        )
        .unwrap();
    tracker.run(&mut dom);

    let seen = listener.take();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].container_size, None);
}

#[test]
fn separation_is_measured_once_per_range_and_is_stable() {
    let (mut dom, scroller) = FakeDom::with_scroller();
    let (before, after) = spacer_pair(&mut dom, scroller);
    dom.range_rect = DomRect::new(0.0, 10.25, 300.0, 333.375);

    let mut range = SpacerRange::<NodeId>::new();
    let a = range.separation(&dom, before, after, Axis::Vertical);
    let b = range.separation(&dom, before, after, Axis::Vertical);
    assert_eq!(a, 333.375);
    assert_eq!(a.to_bits(), b.to_bits());
    assert_eq!(range.separation(&dom, before, after, Axis::Horizontal), 300.0);
}

#[test]
fn table_context_detection() {
    let mut dom = FakeDom::new();
    let table = dom.add(FakeDom::BODY, ElementKind::Table);
    let tbody = dom.add(table, ElementKind::TableRowGroup);
    let colgroup = dom.add(table, ElementKind::TableColumnGroup);
    let div = dom.add(FakeDom::BODY, ElementKind::Other);

    assert!(is_table_context(&dom, Some(tbody), Axis::Vertical));
    assert_eq!(table_display_mode(Axis::Vertical), Display::TableRow);

    assert!(is_table_context(&dom, Some(colgroup), Axis::Horizontal));
    assert!(!is_table_context(&dom, Some(colgroup), Axis::Vertical));
    assert_eq!(table_display_mode(Axis::Horizontal), Display::TableColumn);

    assert!(is_table_context(&dom, Some(table), Axis::Vertical));
    assert!(!is_table_context(&dom, Some(div), Axis::Vertical));
    assert!(!is_table_context(&dom, None, Axis::Vertical));

    // A restyled tbody is no longer a row group...
    dom.node_mut(tbody).display = Some(Display::Block);
    assert!(!is_table_context(&dom, Some(tbody), Axis::Vertical));
    // ...while a div styled as one is.
    dom.node_mut(div).display = Some(Display::TableRowGroup);
    assert!(is_table_context(&dom, Some(div), Axis::Vertical));
}

#[test]
fn spacers_in_a_row_group_become_table_rows() {
    let (mut dom, scroller) = FakeDom::with_scroller();
    let table = dom.add(scroller, ElementKind::Table);
    let tbody = dom.add(table, ElementKind::TableRowGroup);
    let (before, after) = spacer_pair(&mut dom, tbody);

    let listener = Rc::new(Recorder::default());
    let mut tracker = Tracker::new();
    tracker
        .init(
            &mut dom,
            handle_for(&listener),
            before,
            after,
            TrackerOptions::default(),
        )
        .unwrap();
    assert_eq!(dom.display(before), Some(Display::TableRow));
    assert_eq!(dom.display(after), Some(Display::TableRow));
    assert_eq!(dom.display_writes, 2);

    // The controller's styling clobbers the display; the next mutation restores it.
    dom.node_mut(after).display = Some(Display::Block);
    tracker.record_mutation(after, "style");
    tracker.run(&mut dom);
    assert_eq!(dom.display(after), Some(Display::TableRow));
    assert_eq!(dom.display_writes, 3);

    // The host reports our own write back: the display is already right, so the cycle stops.
    assert_eq!(tracker.record_mutation(after, "style"), 1);
    tracker.run(&mut dom);
    assert_eq!(dom.display_writes, 3);

    // Already correct: nothing is written.
    tracker.record_mutation(before, "style");
    tracker.run(&mut dom);
    assert_eq!(dom.display_writes, 3);
    assert_eq!(tracker.live_observer_count(), 3);
    assert_eq!(tracker.run(&mut dom), 0);
}

#[test]
fn spacers_in_a_plain_block_keep_their_display() {
    let (mut dom, scroller) = FakeDom::with_scroller();
    let (before, after) = spacer_pair(&mut dom, scroller);
    let listener = Rc::new(Recorder::default());
    let mut tracker = Tracker::new();
    tracker
        .init(
            &mut dom,
            handle_for(&listener),
            before,
            after,
            TrackerOptions::default(),
        )
        .unwrap();
    tracker.record_mutation(before, "style");
    tracker.run(&mut dom);

    assert_eq!(dom.display(before), None);
    assert_eq!(dom.display(after), None);
    assert_eq!(dom.display_writes, 0);
}

#[test]
fn sessions_of_dropped_listeners_are_removed_on_run() {
    let (mut dom, scroller) = FakeDom::with_scroller();
    let (before, after) = spacer_pair(&mut dom, scroller);
    let listener = Rc::new(Recorder::default());
    let handle = handle_for(&listener);
    let id = handle.id();
    let kept = Rc::new(Recorder::default());
    let kept_handle = handle_for(&kept);
    let kept_id = kept_handle.id();
    let (kept_before, kept_after) = spacer_pair(&mut dom, scroller);
    let mut tracker = Tracker::new();
    tracker
        .init(&mut dom, handle, before, after, TrackerOptions::default())
        .unwrap();
    tracker
        .init(
            &mut dom,
            kept_handle,
            kept_before,
            kept_after,
            TrackerOptions::default(),
        )
        .unwrap();
    assert_eq!(tracker.live_observer_count(), 6);

    drop(listener);
    assert_eq!(tracker.run(&mut dom), 1);
    assert!(!tracker.is_tracking(id));
    assert!(tracker.is_tracking(kept_id));
    assert_eq!(tracker.session_count(), 1);
    assert_eq!(tracker.live_observer_count(), 3);
    assert_eq!(kept.take().len(), 1);

    // Nothing left to dispose for the dropped listener.
    assert!(!tracker.dispose(id));
    assert!(tracker.dispose(kept_id));
    assert_eq!(tracker.live_observer_count(), 0);
}

#[test]
fn listener_dropped_after_startup_is_removed() {
    let (mut dom, scroller) = FakeDom::with_scroller();
    let (before, after) = spacer_pair(&mut dom, scroller);
    let listener = Rc::new(Recorder::default());
    let mut tracker = Tracker::new();
    tracker
        .init(
            &mut dom,
            handle_for(&listener),
            before,
            after,
            TrackerOptions::default(),
        )
        .unwrap();
    assert_eq!(tracker.run(&mut dom), 1);

    drop(listener);
    dom.set_rect(before, DomRect::new(0.0, -5000.0, 300.0, 10.0));
    assert_eq!(tracker.run(&mut dom), 0);
    assert_eq!(tracker.session_count(), 0);
    assert_eq!(tracker.live_observer_count(), 0);
}

#[test]
fn failing_listener_does_not_stop_observation_or_disposal() {
    let (mut dom, scroller) = FakeDom::with_scroller();
    let (before, after) = spacer_pair(&mut dom, scroller);
    let listener = Rc::new(Recorder::failing());
    let handle = handle_for(&listener);
    let id = handle.id();
    let mut tracker = Tracker::new();
    tracker
        .init(&mut dom, handle, before, after, TrackerOptions::default())
        .unwrap();

    assert_eq!(tracker.run(&mut dom), 0);
    assert_eq!(listener.take().len(), 1);

    assert!(tracker.dispose(id));
    assert_eq!(listener.released.get(), 1);
    assert!(!tracker.is_tracking(id));
}

#[test]
fn sessions_are_independent() {
    let (mut dom, scroller) = FakeDom::with_scroller();
    let (before_a, after_a) = spacer_pair(&mut dom, scroller);
    let (before_b, after_b) = spacer_pair(&mut dom, scroller);
    let a = Rc::new(Recorder::default());
    let b = Rc::new(Recorder::default());
    let handle_a = handle_for(&a);
    let id_a = handle_a.id();
    let mut tracker = Tracker::new();
    tracker
        .init(&mut dom, handle_a, before_a, after_a, TrackerOptions::default())
        .unwrap();
    tracker
        .init(
            &mut dom,
            handle_for(&b),
            before_b,
            after_b,
            TrackerOptions::default(),
        )
        .unwrap();

    assert_eq!(tracker.run(&mut dom), 2);
    assert_eq!(a.take().len(), 1);
    assert_eq!(b.take().len(), 1);

    tracker.dispose(id_a);
    assert_eq!(tracker.live_observer_count(), 3);
    tracker.record_mutation(before_a, "style");
    tracker.record_mutation(before_b, "style");
    assert_eq!(tracker.run(&mut dom), 1);
    assert!(a.take().is_empty());
    assert_eq!(b.take().len(), 1);
}

#[test]
fn visibility_observer_reports_transitions_only() {
    let (mut dom, scroller) = FakeDom::with_scroller();
    let (target, _) = spacer_pair(&mut dom, scroller);
    dom.set_rect(target, DomRect::new(0.0, 100.0, 300.0, 10.0));

    let mut observer = VisibilityObserver::new(Some(scroller), Axis::Vertical, 0.0);
    observer.observe(target);
    observer.observe(target);
    assert_eq!(observer.observed_count(), 1);

    let first = observer.take_records(&dom);
    assert_eq!(first.len(), 1);
    assert!(first[0].is_intersecting);
    assert_eq!(first[0].root_bounds, Some(DomRect::new(0.0, 0.0, 300.0, 800.0)));
    assert!(observer.take_records(&dom).is_empty());

    dom.set_rect(target, DomRect::new(0.0, 900.0, 300.0, 10.0));
    let left = observer.take_records(&dom);
    assert_eq!(left.len(), 1);
    assert!(!left[0].is_intersecting);
    assert_eq!(left[0].intersection_rect, DomRect::default());

    assert!(observer.unobserve(target));
    assert!(!observer.unobserve(target));
    assert!(observer.take_records(&dom).is_empty());
}

#[test]
fn mutation_observer_only_queues_while_connected() {
    let mut observer = SpacerMutationObserver::new(NodeId(7));
    let record = MutationRecord {
        target: NodeId(7),
        attribute_name: "style".into(),
    };
    let other = MutationRecord {
        target: NodeId(8),
        attribute_name: "style".into(),
    };

    assert!(observer.enqueue(&record));
    assert!(!observer.enqueue(&other));
    assert!(observer.has_pending());

    observer.disconnect();
    assert!(!observer.has_pending());
    assert!(!observer.enqueue(&record));

    observer.observe();
    assert!(observer.enqueue(&record));
    assert_eq!(observer.take_records(), [record]);
    assert!(!observer.has_pending());
}

#[test]
fn error_messages() {
    assert_eq!(
        TrackerError::InvalidRootMargin(f64::INFINITY).to_string(),
        "root margin must be a finite number of pixels, got inf"
    );
    assert_eq!(
        NotifyError::Disconnected.to_string(),
        "listener is no longer reachable"
    );
}

#[test]
fn listener_ids_are_allocated_uniquely() {
    let a = ListenerId::next();
    let b = ListenerId::next();
    assert_ne!(a, b);
    assert!(b.get() > a.get());
}
