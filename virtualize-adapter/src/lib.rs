//! Item-window controller for the `virtualize` crate.
//!
//! `virtualize` only reports that a spacer became visible. This crate turns those reports into
//! a window of items:
//!
//! - [`Controller`] re-measures the item size, decides which items to render and asks its
//!   [`ItemsProvider`] for them
//! - [`WindowLayout`] carries the resulting spacer sizes back to the adapter
//!
//! Like `virtualize`, this crate is framework-agnostic: rendering goes through a callback
//! ([`Controller::render`]) and the adapter applies the spacer sizes itself.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod error;
mod layout;
mod options;
mod provider;


pub use controller::Controller;
pub use error::{ControllerError, ProviderError};
pub use layout::{RenderedSlot, WindowLayout};
pub use options::ControllerOptions;
pub use provider::{ItemsProvider, ItemsRequest, ItemsResult, VecProvider};
