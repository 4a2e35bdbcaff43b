use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use virtualize::{
    BoundaryListener, Host, ListenerHandle, ListenerId, NotifyError, Registration, SpacerSide,
    Tracker, TrackerOptions,
};

use crate::{
    ControllerError, ControllerOptions, ItemsProvider, ItemsRequest, RenderedSlot, WindowLayout,
};

// `f64::floor`/`f64::ceil` need `std`. Float-to-int casts truncate toward zero and saturate,
// so NaN and negative quotients land on 0.
fn floor_count(quotient: f64) -> usize {
    quotient as usize
}

fn ceil_count(quotient: f64) -> usize {
    let whole = quotient as usize;
    if (whole as f64) < quotient {
        whole.saturating_add(1)
    } else {
        whole
    }
}

#[derive(Clone, Debug)]
struct LoadedItems<T> {
    start_index: usize,
    items: Vec<T>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Distribution {
    items_in_spacer: usize,
    visible_item_capacity: usize,
    unused_item_capacity: usize,
}

#[derive(Debug)]
struct WindowState<T> {
    options: ControllerOptions,
    item_size: f64,
    item_count: usize,
    items_before: usize,
    visible_item_capacity: usize,
    unused_item_capacity: usize,
    last_rendered_item_count: usize,
    last_rendered_placeholder_count: usize,
    viewport_size: Option<f64>,
    loaded: Option<LoadedItems<T>>,
}

impl<T> WindowState<T> {
    fn new(options: ControllerOptions) -> Self {
        Self {
            options,
            item_size: options.item_size,
            item_count: 0,
            items_before: 0,
            visible_item_capacity: 0,
            unused_item_capacity: 0,
            last_rendered_item_count: 0,
            last_rendered_placeholder_count: 0,
            viewport_size: None,
            loaded: None,
        }
    }

    fn distribution(
        &mut self,
        spacer_offset: f64,
        spacer_separation: f64,
        container_size: Option<f64>,
    ) -> Distribution {
        // Re-measure from what was actually rendered last time. Placeholders are assumed to
        // keep the previous size.
        if self.last_rendered_item_count > 0 {
            let placeholders = self.last_rendered_placeholder_count as f64 * self.item_size;
            self.item_size =
                (spacer_separation - placeholders) / self.last_rendered_item_count as f64;
        }
        if !(self.item_size.is_finite() && self.item_size > 0.0) {
            vdebug!(
                measured = self.item_size,
                "unusable item size measurement, falling back to the estimate"
            );
            self.item_size = self.options.item_size;
        }

        let overscan = self.options.overscan_count;
        let container = container_size.or(self.viewport_size).unwrap_or(0.0).max(0.0);

        let items_in_spacer = floor_count(spacer_offset / self.item_size).saturating_sub(overscan);
        let capacity =
            ceil_count(container / self.item_size).saturating_add(overscan.saturating_mul(2));
        let unused_item_capacity = capacity.saturating_sub(self.options.max_item_count);

        Distribution {
            items_in_spacer,
            visible_item_capacity: capacity - unused_item_capacity,
            unused_item_capacity,
        }
    }

    fn before_visible(
        &mut self,
        offset: f64,
        spacer_separation: f64,
        container_size: Option<f64>,
    ) -> bool {
        let d = self.distribution(offset, spacer_separation, container_size);
        let mut items_before = d.items_in_spacer;
        // The before spacer is visible, so the window has to move up by at least one item.
        // If it would not, the size estimate was off; step anyway to re-measure.
        if items_before == self.items_before && items_before > 0 {
            items_before -= 1;
        }
        self.update_distribution(items_before, d)
    }

    fn after_visible(
        &mut self,
        offset: f64,
        spacer_separation: f64,
        container_size: Option<f64>,
    ) -> bool {
        let d = self.distribution(offset, spacer_separation, container_size);
        let mut items_before = self
            .item_count
            .saturating_sub(d.items_in_spacer.saturating_add(d.visible_item_capacity));
        if items_before == self.items_before
            && items_before < self.item_count.saturating_sub(d.visible_item_capacity)
        {
            items_before += 1;
        }
        self.update_distribution(items_before, d)
    }

    /// Returns `true` when the window changed and data must be reloaded.
    fn update_distribution(&mut self, mut items_before: usize, d: Distribution) -> bool {
        // The item count may have shrunk below the current window.
        if items_before.saturating_add(d.visible_item_capacity) > self.item_count {
            items_before = self.item_count.saturating_sub(d.visible_item_capacity);
        }

        if items_before == self.items_before
            && d.visible_item_capacity == self.visible_item_capacity
            && d.unused_item_capacity == self.unused_item_capacity
        {
            return false;
        }

        vtrace!(
            items_before,
            visible_item_capacity = d.visible_item_capacity,
            unused_item_capacity = d.unused_item_capacity,
            item_size = self.item_size,
            "item distribution changed"
        );
        self.items_before = items_before;
        self.visible_item_capacity = d.visible_item_capacity;
        self.unused_item_capacity = d.unused_item_capacity;
        true
    }

    fn request(&self) -> ItemsRequest {
        ItemsRequest {
            start_index: self.items_before,
            count: self.visible_item_capacity,
        }
    }

    fn render(&mut self, f: &mut dyn FnMut(RenderedSlot<'_, T>)) -> WindowLayout {
        let start = self.items_before;
        let end = self
            .items_before
            .saturating_add(self.visible_item_capacity)
            .min(self.item_count)
            .max(start);

        let mut index = start;
        let mut rendered = 0usize;
        if let Some(loaded) = &self.loaded {
            let loaded_end = loaded.start_index.saturating_add(loaded.items.len());
            while index < end && index < loaded.start_index {
                f(RenderedSlot::Placeholder { index });
                index += 1;
            }
            while index < end && index < loaded_end {
                f(RenderedSlot::Item {
                    index,
                    item: &loaded.items[index - loaded.start_index],
                });
                rendered += 1;
                index += 1;
            }
        }
        let placeholders = (end - start) - rendered;
        while index < end {
            f(RenderedSlot::Placeholder { index });
            index += 1;
        }

        self.last_rendered_item_count = rendered;
        self.last_rendered_placeholder_count = placeholders;

        let items_after = self
            .item_count
            .saturating_sub(self.visible_item_capacity.saturating_add(self.items_before));
        WindowLayout {
            start_index: start,
            end_index: end,
            rendered_item_count: rendered,
            placeholder_count: placeholders,
            item_size: self.item_size,
            spacer_before_size: start as f64 * self.item_size,
            spacer_after_size: items_after as f64 * self.item_size,
            spacer_after_shift: self.unused_item_capacity as f64 * self.item_size,
        }
    }
}

/// The consumer of boundary notifications: owns the item window and loads data for it.
///
/// A controller is shared as `Rc<Controller<_, _>>`; the tracker only keeps a weak handle to
/// it (see [`Controller::attach`]). Adapters drive it by:
/// - rendering with [`Controller::render`] and applying the returned spacer sizes
/// - reporting the spacer mutations to the tracker and calling `Tracker::run`
/// - calling [`Controller::dispose`] when the list goes away
///
/// Notifications arriving after `dispose` are ignored.
pub struct Controller<T, P> {
    id: ListenerId,
    provider: RefCell<P>,
    state: RefCell<WindowState<T>>,
    attached: Cell<bool>,
    disposed: Cell<bool>,
}

impl<T, P> fmt::Debug for Controller<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("id", &self.id)
            .field("attached", &self.attached.get())
            .field("disposed", &self.disposed.get())
            .finish_non_exhaustive()
    }
}

impl<T, P: ItemsProvider<T>> Controller<T, P> {
    pub fn new(provider: P, options: ControllerOptions) -> Result<Self, ControllerError> {
        options.validate()?;
        Ok(Self {
            id: ListenerId::next(),
            provider: RefCell::new(provider),
            state: RefCell::new(WindowState::new(options)),
            attached: Cell::new(false),
            disposed: Cell::new(false),
        })
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    fn read<R>(&self, f: impl FnOnce(&WindowState<T>) -> R) -> Result<R, ControllerError> {
        let state = self.state.try_borrow().map_err(|_| ControllerError::Busy)?;
        Ok(f(&state))
    }

    pub fn options(&self) -> Result<ControllerOptions, ControllerError> {
        self.read(|s| s.options)
    }

    /// Current (measured) item size.
    pub fn item_size(&self) -> Result<f64, ControllerError> {
        self.read(|s| s.item_size)
    }

    /// The provider's latest total item count estimate.
    pub fn item_count(&self) -> Result<usize, ControllerError> {
        self.read(|s| s.item_count)
    }

    /// The items currently represented by the before spacer.
    pub fn items_before(&self) -> Result<usize, ControllerError> {
        self.read(|s| s.items_before)
    }

    pub fn visible_item_capacity(&self) -> Result<usize, ControllerError> {
        self.read(|s| s.visible_item_capacity)
    }

    pub fn unused_item_capacity(&self) -> Result<usize, ControllerError> {
        self.read(|s| s.unused_item_capacity)
    }

    /// The window requested from the provider on the next refresh.
    pub fn pending_request(&self) -> Result<ItemsRequest, ControllerError> {
        self.read(WindowState::request)
    }

    /// Fallback container size, see [`Controller::set_viewport_size`].
    pub fn viewport_size(&self) -> Result<Option<f64>, ControllerError> {
        self.read(|s| s.viewport_size)
    }

    /// Sets the top-level viewport size along the axis.
    ///
    /// Used instead of the container size when a notification cannot report one (the list
    /// scrolls with the page and the host hides the viewport bounds).
    pub fn set_viewport_size(&self, viewport_size: Option<f64>) -> Result<(), ControllerError> {
        let mut state = self
            .state
            .try_borrow_mut()
            .map_err(|_| ControllerError::Busy)?;
        state.viewport_size = viewport_size;
        Ok(())
    }

    /// Runs `f` with the provider, e.g. to swap its data before [`Controller::refresh_data`].
    pub fn with_provider<R>(&self, f: impl FnOnce(&mut P) -> R) -> Result<R, ControllerError> {
        let mut provider = self
            .provider
            .try_borrow_mut()
            .map_err(|_| ControllerError::Busy)?;
        Ok(f(&mut provider))
    }

    /// Reloads the current window from the provider.
    ///
    /// On failure the previously loaded items stay in place.
    pub fn refresh_data(&self) -> Result<(), ControllerError> {
        if self.disposed.get() {
            return Err(ControllerError::Disposed);
        }
        let request = self.read(WindowState::request)?;
        let result = self.with_provider(|provider| provider.load(request))??;

        let mut state = self
            .state
            .try_borrow_mut()
            .map_err(|_| ControllerError::Busy)?;
        vdebug!(
            start_index = request.start_index,
            count = request.count,
            loaded = result.items.len(),
            total_item_count = result.total_item_count,
            "items loaded"
        );
        state.item_count = result.total_item_count;
        state.loaded = Some(LoadedItems {
            start_index: request.start_index,
            items: result.items,
        });
        Ok(())
    }

    /// Visits the slots of the current window in index order and returns its geometry.
    ///
    /// The rendered item and placeholder counts are remembered: the next notification uses
    /// them to turn the measured spacer separation into an item size.
    pub fn render(
        &self,
        mut f: impl FnMut(RenderedSlot<'_, T>),
    ) -> Result<WindowLayout, ControllerError> {
        let mut state = self
            .state
            .try_borrow_mut()
            .map_err(|_| ControllerError::Busy)?;
        Ok(state.render(&mut f))
    }

    fn handle_boundary(
        &self,
        side: SpacerSide,
        offset: f64,
        spacer_separation: f64,
        container_size: Option<f64>,
    ) -> Result<(), NotifyError> {
        if self.disposed.get() {
            vtrace!(id = self.id.get(), ?side, "notification after dispose ignored");
            return Ok(());
        }
        let changed = {
            let mut state = self
                .state
                .try_borrow_mut()
                .map_err(|_| NotifyError::Reentrant)?;
            match side {
                SpacerSide::Before => {
                    state.before_visible(offset, spacer_separation, container_size)
                }
                SpacerSide::After => state.after_visible(offset, spacer_separation, container_size),
            }
        };
        if changed {
            match self.refresh_data() {
                Ok(()) => {}
                Err(ControllerError::Busy) => return Err(NotifyError::Reentrant),
                Err(_err) => {
                    vwarn!(id = self.id.get(), error = %_err, "refreshing items failed");
                }
            }
        }
        Ok(())
    }
}

impl<T: 'static, P: ItemsProvider<T> + 'static> Controller<T, P> {
    /// Starts tracking `spacer_before`/`spacer_after` with this controller as the listener.
    ///
    /// The tracker only holds a weak handle; dropping the last `Rc` ends delivery and the
    /// tracker forgets the session on its next run.
    ///
    /// Unless [`Controller::set_viewport_size`] was called, the host's current viewport size
    /// is taken as the fallback for notifications without a container size.
    pub fn attach<H: Host + ?Sized>(
        this: &Rc<Self>,
        tracker: &mut Tracker<H::Element>,
        host: &mut H,
        spacer_before: H::Element,
        spacer_after: H::Element,
        options: TrackerOptions,
    ) -> Result<Registration, ControllerError> {
        if this.disposed.get() {
            return Err(ControllerError::Disposed);
        }
        let handle = ListenerHandle::new(this.id, this);
        let registration = tracker.init(host, handle, spacer_before, spacer_after, options)?;
        if this.viewport_size()?.is_none() {
            this.set_viewport_size(Some(host.viewport_rect().size(options.axis)))?;
        }
        this.attached.set(true);
        Ok(registration)
    }
}

impl<T, P> Controller<T, P> {
    /// Ends tracking and ignores any notification still in flight.
    ///
    /// Returns `false` if the tracker had no session for this controller.
    pub fn dispose<E: Copy + Eq + fmt::Debug>(&self, tracker: &mut Tracker<E>) -> bool {
        self.disposed.set(true);
        let disposed = tracker.dispose(self.id);
        self.attached.set(false);
        disposed
    }
}

impl<T, P: ItemsProvider<T>> BoundaryListener for Controller<T, P> {
    fn on_spacer_before_visible(
        &self,
        offset: f64,
        spacer_separation: f64,
        container_size: Option<f64>,
    ) -> Result<(), NotifyError> {
        self.handle_boundary(SpacerSide::Before, offset, spacer_separation, container_size)
    }

    fn on_spacer_after_visible(
        &self,
        offset: f64,
        spacer_separation: f64,
        container_size: Option<f64>,
    ) -> Result<(), NotifyError> {
        self.handle_boundary(SpacerSide::After, offset, spacer_separation, container_size)
    }

    fn release(&self) -> Result<(), NotifyError> {
        self.attached.set(false);
        Ok(())
    }
}
