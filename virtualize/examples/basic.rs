// Example: observe a spacer pair inside a scrolling container and print boundary events.
use std::cell::RefCell;
use std::rc::Rc;

use virtualize::{
    Axis, BoundaryListener, Display, DomRect, ElementKind, Host, ListenerHandle, ListenerId,
    NotifyError, Overflow, SpacerSide, Tracker, TrackerOptions,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum El {
    Root,
    Body,
    List,
    Before,
    After,
}

/// A 600px tall list with 40 rendered rows of 30px and large spacers around them.
struct Page {
    scroll_top: f64,
}

impl Page {
    const BEFORE: f64 = 3000.0;
    const WINDOW: f64 = 1200.0;
    const AFTER: f64 = 9000.0;
}

impl Host for Page {
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
            (El::List, Axis::Vertical) => Overflow::Scroll,
            _ => Overflow::Visible,
        }
    }

    fn display(&self, _element: El) -> Option<Display> {
        None
    }

    fn set_display(&mut self, _element: El, _display: Display) {}

    fn disable_overflow_anchor(&mut self, container: Option<El>) {
        println!("overflow-anchor: none on {container:?}");
    }

    fn bounding_client_rect(&self, element: El) -> DomRect {
        let top = -self.scroll_top;
        match element {
            El::Before => DomRect::new(0.0, top, 400.0, Self::BEFORE),
            El::After => DomRect::new(0.0, top + Self::BEFORE + Self::WINDOW, 400.0, Self::AFTER),
            _ => self.viewport_rect(),
        }
    }

    fn range_bounding_rect(&self, _start_after: El, _end_before: El) -> DomRect {
        DomRect::new(0.0, Self::BEFORE - self.scroll_top, 400.0, Self::WINDOW)
    }

    fn scrollport_rect(&self, _container: El) -> DomRect {
        DomRect::new(0.0, 0.0, 400.0, 600.0)
    }

    fn viewport_rect(&self) -> DomRect {
        DomRect::new(0.0, 0.0, 1280.0, 720.0)
    }
}

#[derive(Default)]
struct Printer {
    events: RefCell<Vec<(SpacerSide, f64)>>,
}

impl Printer {
    fn print(&self, side: SpacerSide, offset: f64, separation: f64, container: Option<f64>) {
        println!("{side:?} visible: offset={offset} separation={separation} container={container:?}");
        self.events.borrow_mut().push((side, offset));
    }
}

impl BoundaryListener for Printer {
    fn on_spacer_before_visible(
        &self,
        offset: f64,
        spacer_separation: f64,
        container_size: Option<f64>,
    ) -> Result<(), NotifyError> {
        self.print(SpacerSide::Before, offset, spacer_separation, container_size);
        Ok(())
    }

    fn on_spacer_after_visible(
        &self,
        offset: f64,
        spacer_separation: f64,
        container_size: Option<f64>,
    ) -> Result<(), NotifyError> {
        self.print(SpacerSide::After, offset, spacer_separation, container_size);
        Ok(())
    }
}

fn main() {
    let mut page = Page { scroll_top: 3300.0 };
    let printer = Rc::new(Printer::default());
    let id = ListenerId::next();

    let mut tracker = Tracker::new();
    tracker
        .init(
            &mut page,
            ListenerHandle::new(id, &printer),
            El::Before,
            El::After,
            TrackerOptions::default(),
        )
        .expect("distinct spacers");
    println!("container={:?}", tracker.container(id));

    for scroll_top in [3300.0, 2800.0, 2400.0, 3700.0, 4000.0] {
        page.scroll_top = scroll_top;
        let delivered = tracker.run(&mut page);
        println!("scroll_top={scroll_top} delivered={delivered}");
    }

    tracker.dispose(id);
    println!(
        "events={} live_observers={}",
        printer.events.borrow().len(),
        tracker.live_observer_count()
    );
}
