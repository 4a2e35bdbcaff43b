// Example: a controller over 100k rows, driven by a simulated scroll container.
use std::rc::Rc;

use virtualize::{
    Axis, Display, DomRect, ElementKind, Host, Overflow, SpacerSide, Tracker, TrackerOptions,
};
use virtualize_adapter::{Controller, ControllerOptions, RenderedSlot, VecProvider, WindowLayout};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum El {
    Root,
    Body,
    List,
    Before,
    After,
}

/// Rows render 32px tall, while the controller starts from a 50px estimate.
struct List {
    scroll_top: f64,
    before: f64,
    after: f64,
    rows: usize,
}

impl List {
    const ROW: f64 = 32.0;

    fn window(&self) -> f64 {
        self.rows as f64 * Self::ROW
    }

    fn apply(&mut self, layout: &WindowLayout, tracker: &mut Tracker<El>) {
        // The host renders rows at their real size; spacer sizes come from the controller.
        if layout.spacer_before_size != self.before {
            self.before = layout.spacer_before_size;
            tracker.record_mutation(El::Before, "style");
        }
        if layout.spacer_after_size != self.after {
            self.after = layout.spacer_after_size;
            tracker.record_mutation(El::After, "style");
        }
        self.rows = layout.rendered_item_count + layout.placeholder_count;
    }
}

impl Host for List {
    type Element = El;

    fn parent(&self, element: El) -> Option<El> {
        match element {
            El::Root => None,
            El::Body => Some(El::Root),
            El::List => Some(El::Body),
            El::Before | El::After => Some(El::List),
        }
    }

    fn kind(&self, element: El) -> ElementKind {
        match element {
            El::Root => ElementKind::DocumentRoot,
            El::Body => ElementKind::Body,
            _ => ElementKind::Other,
        }
    }

    fn overflow(&self, element: El, axis: Axis) -> Overflow {
        match (element, axis) {
            (El::List, Axis::Vertical) => Overflow::Auto,
            _ => Overflow::Visible,
        }
    }

    fn display(&self, _element: El) -> Option<Display> {
        None
    }

    fn set_display(&mut self, _element: El, _display: Display) {}

    fn disable_overflow_anchor(&mut self, _container: Option<El>) {}

    fn bounding_client_rect(&self, element: El) -> DomRect {
        let top = -self.scroll_top;
        match element {
            El::Before => DomRect::new(0.0, top, 320.0, self.before),
            El::After => DomRect::new(0.0, top + self.before + self.window(), 320.0, self.after),
            _ => self.viewport_rect(),
        }
    }

    fn range_bounding_rect(&self, _start_after: El, _end_before: El) -> DomRect {
        DomRect::new(0.0, self.before - self.scroll_top, 320.0, self.window())
    }

    fn scrollport_rect(&self, _container: El) -> DomRect {
        DomRect::new(0.0, 0.0, 320.0, 640.0)
    }

    fn viewport_rect(&self) -> DomRect {
        DomRect::new(0.0, 0.0, 1280.0, 720.0)
    }
}

/// Runs observer checkpoints and re-renders until the window settles.
fn settle(c: &Controller<String, VecProvider<String>>, tracker: &mut Tracker<El>, list: &mut List) {
    for _ in 0..16 {
        if tracker.run(list) == 0 {
            return;
        }
        let mut first = None;
        let layout = c
            .render(|slot| {
                if first.is_none() {
                    first = Some(match slot {
                        RenderedSlot::Item { item, .. } => item.clone(),
                        RenderedSlot::Placeholder { index } => format!("<loading {index}>"),
                    });
                }
            })
            .expect("not re-entered");
        list.apply(&layout, tracker);
        println!(
            "  window={}..{} item_size={:.1} first={:?} after_style={:?}",
            layout.start_index,
            layout.end_index,
            layout.item_size,
            first,
            layout.spacer_style(SpacerSide::After, Axis::Vertical),
        );
    }
}

fn main() {
    let rows: Vec<String> = (0..100_000).map(|i| format!("row #{i}")).collect();
    let c = Rc::new(
        Controller::new(VecProvider::new(rows), ControllerOptions::default()).expect("valid options"),
    );

    let mut tracker = Tracker::new();
    let mut list = List {
        scroll_top: 0.0,
        before: 0.0,
        after: 0.0,
        rows: 0,
    };
    Controller::attach(
        &c,
        &mut tracker,
        &mut list,
        El::Before,
        El::After,
        TrackerOptions::default(),
    )
    .expect("distinct spacers");

    println!("startup");
    settle(&c, &mut tracker, &mut list);

    for scroll_top in [2_000.0, 40_000.0, 1_500_000.0, 100.0] {
        list.scroll_top = scroll_top;
        println!("scroll_top={scroll_top}");
        settle(&c, &mut tracker, &mut list);
    }

    c.dispose(&mut tracker);
    println!("disposed, live_observers={}", tracker.live_observer_count());
}
