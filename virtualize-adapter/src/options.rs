use crate::ControllerError;

/// Configuration for [`crate::Controller`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerOptions {
    /// Estimated item size along the axis, used until real items have been rendered and
    /// measured (and whenever a measurement comes out unusable).
    pub item_size: f64,
    /// Extra items kept rendered on each side of the visible range.
    pub overscan_count: usize,
    /// Upper bound on items rendered at once, regardless of container size.
    pub max_item_count: usize,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            item_size: 50.0,
            overscan_count: 3,
            max_item_count: 1000,
        }
    }
}

impl ControllerOptions {
    pub fn new(item_size: f64) -> Self {
        Self::default().with_item_size(item_size)
    }

    pub fn with_item_size(mut self, item_size: f64) -> Self {
        self.item_size = item_size;
        self
    }

    pub fn with_overscan_count(mut self, overscan_count: usize) -> Self {
        self.overscan_count = overscan_count;
        self
    }

    pub fn with_max_item_count(mut self, max_item_count: usize) -> Self {
        self.max_item_count = max_item_count;
        self
    }

    pub fn validate(&self) -> Result<(), ControllerError> {
        if !(self.item_size.is_finite() && self.item_size > 0.0) {
            return Err(ControllerError::InvalidItemSize(self.item_size));
        }
        if self.max_item_count == 0 {
            return Err(ControllerError::ZeroMaxItemCount);
        }
        Ok(())
    }
}
