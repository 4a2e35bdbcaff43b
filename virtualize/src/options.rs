use crate::{Axis, TrackerError};

/// Default trigger-zone expansion, in pixels.
pub const DEFAULT_ROOT_MARGIN: f64 = 50.0;

/// Configuration for a tracking session (see [`crate::Tracker::init`]).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackerOptions {
    pub axis: Axis,
    /// How far the trigger zone extends past both ends of the container along the axis.
    ///
    /// Spacers are reported slightly before they are actually on screen, so loading can start
    /// ahead of the user.
    pub root_margin: f64,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            axis: Axis::Vertical,
            root_margin: DEFAULT_ROOT_MARGIN,
        }
    }
}

impl TrackerOptions {
    pub fn new(horizontal: bool) -> Self {
        Self::default().with_horizontal(horizontal)
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_horizontal(mut self, horizontal: bool) -> Self {
        self.axis = Axis::from_horizontal(horizontal);
        self
    }

    pub fn with_root_margin(mut self, root_margin: f64) -> Self {
        self.root_margin = root_margin;
        self
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        if !self.root_margin.is_finite() {
            return Err(TrackerError::InvalidRootMargin(self.root_margin));
        }
        Ok(())
    }
}
