use crate::buffer::SharedBuffer;
use crate::ui::layout::{GridLayout, create_grid};
use chrono::{DateTime, Local};
use ratatui::layout::Rect;

/// Presentation state for one session: header text, one pane per pod and
/// the grid they are drawn into.
pub struct App {
    pub controller: String,
    pub namespace: String,
    pub panes: Vec<SharedBuffer>,
    pub grid: GridLayout,
    pub area: Rect,
    pub last_activity: Option<DateTime<Local>>,
}

impl App {
    pub fn new(controller: String, namespace: String, panes: Vec<SharedBuffer>) -> Self {
        let grid = create_grid(Rect::default(), panes.len());
        Self {
            controller,
            namespace,
            panes,
            grid,
            area: Rect::default(),
            last_activity: None,
        }
    }

    /// Recompute the whole grid for a new screen size.
    pub fn resize(&mut self, area: Rect) {
        self.area = area;
        self.grid = create_grid(area, self.panes.len());
    }

    pub fn mark_activity(&mut self) {
        self.last_activity = Some(Local::now());
    }

    pub fn last_activity_label(&self) -> Option<String> {
        self.last_activity
            .map(|t| t.format("%H:%M:%S").to_string())
    }
}
