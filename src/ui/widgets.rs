use crate::buffer::{PaneSnapshot, StreamStatus};
use crate::utils::pane_color;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub struct HeaderBar<'a> {
    controller: &'a str,
    namespace: &'a str,
    pod_count: usize,
    last_activity: Option<&'a str>,
}

impl<'a> HeaderBar<'a> {
    pub fn new(
        controller: &'a str,
        namespace: &'a str,
        pod_count: usize,
        last_activity: Option<&'a str>,
    ) -> Self {
        Self {
            controller,
            namespace,
            pod_count,
            last_activity,
        }
    }
}

impl<'a> Widget for HeaderBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = Line::from(vec![
            Span::styled(
                "Found controller: ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(self.controller, Style::default().fg(Color::Cyan)),
        ]);

        let status_parts = [
            format!("Namespace: {}", self.namespace),
            format!("Pods: {}", self.pod_count),
            format!("Last update: {}", self.last_activity.unwrap_or("-")),
            "q to quit".to_string(),
        ];
        let status = Line::styled(
            status_parts.join(" | "),
            Style::default().fg(Color::DarkGray),
        );

        Paragraph::new(vec![title, status])
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

/// One pod's log pane: a bordered box showing the newest lines that fit.
pub struct LogPane<'a> {
    snapshot: &'a PaneSnapshot,
}

impl<'a> LogPane<'a> {
    pub fn new(snapshot: &'a PaneSnapshot) -> Self {
        Self { snapshot }
    }

    /// Most log lines a pane of this size can show inside its border; fewer
    /// fit once long lines wrap.
    pub fn visible_lines(area: Rect) -> usize {
        area.height.saturating_sub(2) as usize
    }

    fn title(&self) -> String {
        match self.snapshot.status {
            StreamStatus::Connecting | StreamStatus::Streaming => self.snapshot.title.clone(),
            StreamStatus::Closed => format!("{} (closed)", self.snapshot.title),
            StreamStatus::Failed => format!("{} (error)", self.snapshot.title),
        }
    }
}

impl<'a> Widget for LogPane<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = match self.snapshot.status {
            StreamStatus::Failed => Color::Red,
            _ => pane_color(&self.snapshot.title),
        };
        let block = Block::default()
            .title(self.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        let lines: Vec<Line> = if self.snapshot.lines.is_empty()
            && self.snapshot.status == StreamStatus::Connecting
        {
            vec![Line::styled(
                format!("Loading logs for {}...", self.snapshot.title),
                Style::default().fg(Color::DarkGray),
            )]
        } else {
            let style = match self.snapshot.status {
                StreamStatus::Failed => Style::default().fg(Color::Red),
                _ => Style::default(),
            };
            self.snapshot
                .lines
                .iter()
                .map(|line| Line::styled(line.as_str(), style))
                .collect()
        };

        // Wrapped rows, not log lines, decide what fits; scroll so the newest
        // row sits on the bottom border.
        let inner = block.inner(area);
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        let overflow = paragraph
            .line_count(inner.width)
            .saturating_sub(inner.height as usize);
        paragraph
            .block(block)
            .scroll((u16::try_from(overflow).unwrap_or(u16::MAX), 0))
            .render(area, buf);
    }
}
