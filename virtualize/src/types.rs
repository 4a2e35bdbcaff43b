/// The scroll axis a list is virtualized along.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    Horizontal,
    #[default]
    Vertical,
}

impl Axis {
    pub fn from_horizontal(horizontal: bool) -> Self {
        if horizontal {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Horizontal)
    }
}

/// A client-space rectangle, in (possibly fractional) pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DomRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DomRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// The edge where the axis starts (`left` or `top`).
    pub fn near_edge(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.left(),
            Axis::Vertical => self.top(),
        }
    }

    /// The edge where the axis ends (`right` or `bottom`).
    pub fn far_edge(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.right(),
            Axis::Vertical => self.bottom(),
        }
    }

    /// Size along the axis (`width` or `height`).
    pub fn size(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Edge-inclusive intersection.
    ///
    /// Rectangles that merely touch, or a zero-sized rectangle lying inside `other`, still
    /// intersect (with a zero-sized result), matching how intersection observers treat
    /// empty targets.
    pub fn intersection(&self, other: &DomRect) -> Option<DomRect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right >= left && bottom >= top {
            Some(DomRect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    /// Grows the rectangle by `margin` on both ends of `axis` (shrinks it for negative values).
    pub fn expand(&self, axis: Axis, margin: f64) -> DomRect {
        match axis {
            Axis::Horizontal => DomRect::new(
                self.x - margin,
                self.y,
                (self.width + 2.0 * margin).max(0.0),
                self.height,
            ),
            Axis::Vertical => DomRect::new(
                self.x,
                self.y - margin,
                self.width,
                (self.height + 2.0 * margin).max(0.0),
            ),
        }
    }
}

/// Computed overflow of an element along one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Clip,
    Scroll,
    Auto,
}

impl Overflow {
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// An explicit `display` style value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Display {
    Block,
    Inline,
    InlineBlock,
    Flex,
    Grid,
    Contents,
    None,
    Table,
    TableRowGroup,
    TableColumnGroup,
    TableRow,
    TableColumn,
}

impl Display {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Inline => "inline",
            Self::InlineBlock => "inline-block",
            Self::Flex => "flex",
            Self::Grid => "grid",
            Self::Contents => "contents",
            Self::None => "none",
            Self::Table => "table",
            Self::TableRowGroup => "table-row-group",
            Self::TableColumnGroup => "table-column-group",
            Self::TableRow => "table-row",
            Self::TableColumn => "table-column",
        }
    }
}

/// The structural role of a host element, as far as this crate cares.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementKind {
    /// The document element (`<html>`).
    DocumentRoot,
    Body,
    Table,
    /// `<tbody>`, `<thead>` or `<tfoot>`.
    TableRowGroup,
    /// `<colgroup>`.
    TableColumnGroup,
    #[default]
    Other,
}

/// Which edge of the rendered window a spacer stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpacerSide {
    Before,
    After,
}

/// A spacer crossed into the trigger zone.
///
/// Produced once per qualifying intersection entry and handed to the session's listener.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundaryEvent {
    pub spacer: SpacerSide,
    /// How far the trigger zone reaches into the spacer from its outer edge (`>= 0`).
    pub offset: f64,
    /// Size of the rendered window between the two spacers, along the axis.
    pub spacer_separation: f64,
    /// Size of the scroll container along the axis; `None` when the host cannot report it.
    pub container_size: Option<f64>,
}
