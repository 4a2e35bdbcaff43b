use alloc::vec::Vec;

use crate::ProviderError;

/// A request for a contiguous run of items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemsRequest {
    pub start_index: usize,
    pub count: usize,
}

/// The answer to an [`ItemsRequest`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemsResult<T> {
    /// Items starting at the requested index. May be shorter than requested; the missing
    /// slots render as placeholders.
    pub items: Vec<T>,
    /// Best current estimate of the total number of items.
    pub total_item_count: usize,
}

/// The data-loading collaborator of a [`crate::Controller`].
///
/// Closures `FnMut(ItemsRequest) -> Result<ItemsResult<T>, ProviderError>` are providers too.
/// Retries, caching and cancellation are the provider's business.
pub trait ItemsProvider<T> {
    fn load(&mut self, request: ItemsRequest) -> Result<ItemsResult<T>, ProviderError>;
}

impl<T, F> ItemsProvider<T> for F
where
    F: FnMut(ItemsRequest) -> Result<ItemsResult<T>, ProviderError>,
{
    fn load(&mut self, request: ItemsRequest) -> Result<ItemsResult<T>, ProviderError> {
        self(request)
    }
}

/// An in-memory provider over a fully materialized list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VecProvider<T> {
    items: Vec<T>,
}

impl<T> VecProvider<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Replaces the backing list. Call [`crate::Controller::refresh_data`] afterwards.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Clone> ItemsProvider<T> for VecProvider<T> {
    fn load(&mut self, request: ItemsRequest) -> Result<ItemsResult<T>, ProviderError> {
        let len = self.items.len();
        let start = request.start_index.min(len);
        let end = request.start_index.saturating_add(request.count).min(len);
        Ok(ItemsResult {
            items: self.items[start..end].to_vec(),
            total_item_count: len,
        })
    }
}
