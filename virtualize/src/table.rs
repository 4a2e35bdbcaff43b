use crate::{Axis, Display, ElementKind, Host};

/// The display mode a spacer must use to stay a valid table descendant.
pub fn table_display_mode(axis: Axis) -> Display {
    match axis {
        Axis::Horizontal => Display::TableColumn,
        Axis::Vertical => Display::TableRow,
    }
}

/// Returns `true` when `parent` lays its children out as table structure.
///
/// That is a `<table>`, a row group, or (horizontal lists only) a `<colgroup>` without a
/// display override, or any element whose display override already is the matching
/// table-role value.
pub fn is_table_context<H: Host + ?Sized>(
    host: &H,
    parent: Option<H::Element>,
    axis: Axis,
) -> bool {
    let Some(parent) = parent else {
        return false;
    };
    let kind = host.kind(parent);
    let display = host.display(parent);
    let acts_as = |role_kind: ElementKind, role_display: Display| {
        (kind == role_kind && display.is_none()) || display == Some(role_display)
    };

    acts_as(ElementKind::Table, Display::Table)
        || acts_as(ElementKind::TableRowGroup, Display::TableRowGroup)
        || (axis.is_horizontal()
            && acts_as(ElementKind::TableColumnGroup, Display::TableColumnGroup))
}

/// Gives `spacer` the table display mode if its parent is a table context.
///
/// Idempotent: the host is only written when the current override differs. Returns `true`
/// when the spacer sits in a table context.
pub(crate) fn apply_table_display<H: Host + ?Sized>(
    host: &mut H,
    spacer: H::Element,
    axis: Axis,
) -> bool {
    if !is_table_context(host, host.parent(spacer), axis) {
        return false;
    }
    let mode = table_display_mode(axis);
    if host.display(spacer) != Some(mode) {
        vtrace!(?spacer, mode = mode.as_css(), "apply table display");
        host.set_display(spacer, mode);
    }
    true
}
