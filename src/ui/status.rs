// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Status bar widget.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::UiState;

/// Song title, layout settings and the latest status message
pub struct StatusWidget<'a> {
    state: &'a UiState,
}

impl<'a> StatusWidget<'a> {
    /// Create a new status widget
    pub fn new(state: &'a UiState) -> Self {
        Self { state }
    }

    fn settings(&self) -> Line<'a> {
        let template = &self.state.template;
        let title = self
            .state
            .song
            .metadata
            .title
            .as_deref()
            .unwrap_or("Untitled");
        let separator = || Span::styled(" | ", Style::default().fg(Color::DarkGray));

        let mut spans = vec![
            Span::styled(
                format!(" {}", title),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            separator(),
            Span::styled(
                format!("{} col", template.column_count),
                Style::default().fg(Color::Cyan),
            ),
            separator(),
            Span::raw(template.column_balancing_strategy.name()),
            separator(),
            Span::raw(template.chord_positioning_style.name()),
        ];
        if template.transpose != 0 {
            spans.push(separator());
            spans.push(Span::styled(
                format!("{:+}", template.transpose),
                Style::default().fg(Color::Magenta),
            ));
        }
        Line::from(spans)
    }
}

impl Widget for StatusWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        Paragraph::new(self.settings()).render(chunks[0], buf);

        let message = match &self.state.status_message {
            Some(message) => Span::styled(message.clone(), Style::default().fg(Color::Yellow)),
            None => Span::styled("h: Help | q: Quit", Style::default().fg(Color::DarkGray)),
        };
        Paragraph::new(message).render(chunks[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song::ParsedSong;
    use crate::template::Template;

    fn text(buf: &Buffer) -> String {
        buf.content.iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_status_shows_settings() {
        let mut song = ParsedSong::default();
        song.metadata.title = Some("Amazing Grace".to_string());
        let template = Template {
            column_count: 2,
            transpose: -2,
            ..Template::default()
        };
        let state = UiState::new(song, template);

        let area = Rect::new(0, 0, 120, 1);
        let mut buf = Buffer::empty(area);
        StatusWidget::new(&state).render(area, &mut buf);

        let line = text(&buf);
        assert!(line.contains("Amazing Grace"));
        assert!(line.contains("2 col"));
        assert!(line.contains("-2"));
        assert!(line.contains("h: Help"));
    }

    #[test]
    fn test_status_message_replaces_hint() {
        let mut state = UiState::new(ParsedSong::default(), Template::default());
        state.set_status("Columns: 3");

        let area = Rect::new(0, 0, 100, 1);
        let mut buf = Buffer::empty(area);
        StatusWidget::new(&state).render(area, &mut buf);

        let line = text(&buf);
        assert!(line.contains("Untitled"));
        assert!(line.contains("Columns: 3"));
        assert!(!line.contains("h: Help"));
    }
}
