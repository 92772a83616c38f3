use ratatui::layout::{Constraint, Layout, Rect};

/// Panes per grid row.
pub const COLUMNS: usize = 2;

/// Share of the screen height given to the header.
pub const HEADER_PERCENT: u16 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridLayout {
    pub header: Rect,
    /// One rect per pane, row-major, left to right.
    pub panes: Vec<Rect>,
    pub rows: usize,
}

/// Tile `pane_count` panes two to a row below a header strip.
///
/// Rows share the body height equally. A short last row keeps half-width
/// columns; the missing column is left out rather than drawn blank.
pub fn create_grid(area: Rect, pane_count: usize) -> GridLayout {
    let [header, body] = Layout::vertical([
        Constraint::Percentage(HEADER_PERCENT),
        Constraint::Percentage(100 - HEADER_PERCENT),
    ])
    .areas(area);

    let rows = pane_count.div_ceil(COLUMNS);
    if rows == 0 {
        return GridLayout {
            header,
            panes: Vec::new(),
            rows,
        };
    }

    let row_areas = Layout::vertical(vec![Constraint::Ratio(1, rows as u32); rows]).split(body);

    let mut panes = Vec::with_capacity(pane_count);
    for (r, row) in row_areas.iter().enumerate() {
        let columns =
            Layout::horizontal(vec![Constraint::Ratio(1, COLUMNS as u32); COLUMNS]).split(*row);
        for (c, column) in columns.iter().enumerate() {
            if r * COLUMNS + c >= pane_count {
                break;
            }
            panes.push(*column);
        }
    }

    GridLayout {
        header,
        panes,
        rows,
    }
}
