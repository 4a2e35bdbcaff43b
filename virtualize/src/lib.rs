//! A headless spacer-visibility engine for lazily loaded, virtualized lists.
//!
//! For the item-window controller and the data-loading contract, see the `virtualize-adapter`
//! crate.
//!
//! A virtualized list renders only a window of items, framed by two spacer elements: one
//! standing in for everything before the window and one for everything after it. This crate
//! watches those spacers and tells the owner of the list when one of them enters the
//! (slightly expanded) visible region of its scroll container, together with:
//! - how far the visible region has penetrated into the spacer
//! - the separation between the spacers (the size of the rendered window)
//! - the size of the scroll container, when known
//!
//! It is UI-agnostic. A DOM/GUI layer is expected to provide a [`Host`] implementation that
//! answers layout queries, report spacer attribute changes via [`Tracker::record_mutation`],
//! and call [`Tracker::run`] once layout has settled.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod geometry;
mod host;
mod key;
mod listener;
mod mutation;
mod observer;
mod options;
mod resolver;
mod session;
mod table;
mod tracker;
mod types;

#[cfg(test)]
mod tests;

pub use error::{NotifyError, TrackerError};
pub use geometry::SpacerRange;
pub use host::Host;
pub use listener::{BoundaryListener, ListenerHandle, ListenerId};
pub use mutation::{MutationRecord, SpacerMutationObserver};
pub use observer::{IntersectionEntry, VisibilityObserver};
pub use options::{DEFAULT_ROOT_MARGIN, TrackerOptions};
pub use resolver::resolve_scroll_container;
pub use table::{is_table_context, table_display_mode};
pub use tracker::{Registration, Tracker};
pub use types::{Axis, BoundaryEvent, Display, DomRect, ElementKind, Overflow, SpacerSide};
