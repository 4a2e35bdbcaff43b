use alloc::format;
use alloc::string::String;

use virtualize::{Axis, SpacerSide};

/// One slot of the rendered window, in index order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderedSlot<'a, T> {
    Item { index: usize, item: &'a T },
    /// The provider has not (yet) supplied this index.
    Placeholder { index: usize },
}

impl<T> RenderedSlot<'_, T> {
    pub fn index(&self) -> usize {
        match self {
            Self::Item { index, .. } | Self::Placeholder { index } => *index,
        }
    }
}

/// Geometry of the rendered window, produced by [`crate::Controller::render`].
///
/// The host applies the spacer sizes to its spacer elements (and reports the resulting
/// attribute mutations to the tracker).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowLayout {
    pub start_index: usize,
    pub end_index: usize, // exclusive
    pub rendered_item_count: usize,
    pub placeholder_count: usize,
    /// Item size the spacer sizes were computed with.
    pub item_size: f64,
    pub spacer_before_size: f64,
    pub spacer_after_size: f64,
    /// Offset pushing the after spacer past capacity the window could not fill.
    pub spacer_after_shift: f64,
}

impl WindowLayout {
    pub fn spacer_size(&self, side: SpacerSide) -> f64 {
        match side {
            SpacerSide::Before => self.spacer_before_size,
            SpacerSide::After => self.spacer_after_size,
        }
    }

    /// Inline CSS for a spacer element.
    pub fn spacer_style(&self, side: SpacerSide, axis: Axis) -> String {
        let (dimension, translate) = match axis {
            Axis::Horizontal => ("width", "translateX"),
            Axis::Vertical => ("height", "translateY"),
        };
        let size = self.spacer_size(side);
        let shift = match side {
            SpacerSide::Before => 0.0,
            SpacerSide::After => self.spacer_after_shift,
        };
        if shift > 0.0 {
            format!("{dimension}: {size}px; flex-shrink: 0; transform: {translate}({shift}px);")
        } else {
            format!("{dimension}: {size}px; flex-shrink: 0;")
        }
    }
}
