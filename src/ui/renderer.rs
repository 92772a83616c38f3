use crate::ui::app::App;
use crate::ui::widgets::{HeaderBar, LogPane};
use ratatui::{Frame, Terminal, backend::Backend};

pub fn render<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> std::io::Result<()> {
    terminal.draw(|f| render_frame(f, app))?;
    Ok(())
}

fn render_frame(f: &mut Frame, app: &mut App) {
    // Catches the first frame and any resize the event loop has not seen yet.
    if f.area() != app.area {
        app.resize(f.area());
    }

    let last_activity = app.last_activity_label();
    let header = HeaderBar::new(
        &app.controller,
        &app.namespace,
        app.panes.len(),
        last_activity.as_deref(),
    );
    f.render_widget(header, app.grid.header);

    for (buffer, area) in app.panes.iter().zip(&app.grid.panes) {
        let snapshot = buffer.snapshot(LogPane::visible_lines(*area));
        f.render_widget(LogPane::new(&snapshot), *area);
    }
}
