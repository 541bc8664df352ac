// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Column display widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::layout::ColumnContent;
use crate::render::{column_rows, gap_in_chars, widths_in_chars, RowKind};
use crate::template::Template;

/// Maps terminal cells to the template's pixel space.
///
/// One cell is one chord glyph wide, so chords and lyrics line up the
/// same way they do in the plain-text export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    cells: u16,
    cell_width: f32,
}

impl GridGeometry {
    /// Geometry for an area `cells` wide
    pub fn new(template: &Template, cells: u16) -> Self {
        Self {
            cells,
            cell_width: template.chord_char_width(),
        }
    }

    /// Width of the area in pixels
    pub fn pixel_width(&self) -> f32 {
        f32::from(self.cells) * self.cell_width
    }
}

fn row_style(kind: RowKind) -> Style {
    match kind {
        RowKind::Heading => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        RowKind::Chords => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        RowKind::Inline => Style::default().fg(Color::White),
        RowKind::Comment => Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        RowKind::Lyrics | RowKind::Blank => Style::default(),
    }
}

/// Song columns side by side
pub struct ColumnsWidget<'a> {
    columns: &'a [ColumnContent],
    template: &'a Template,
    geometry: GridGeometry,
    scroll: u16,
}

impl<'a> ColumnsWidget<'a> {
    /// Create a new columns widget
    pub fn new(columns: &'a [ColumnContent], template: &'a Template, geometry: GridGeometry) -> Self {
        Self {
            columns,
            template,
            geometry,
            scroll: 0,
        }
    }

    /// Skip the first `rows` rows of every column
    pub fn scroll(mut self, rows: u16) -> Self {
        self.scroll = rows;
        self
    }
}

impl Widget for ColumnsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.columns.iter().all(ColumnContent::is_empty) {
            Paragraph::new("No sections to show")
                .style(Style::default().fg(Color::DarkGray))
                .render(area, buf);
            return;
        }

        let widths = widths_in_chars(
            &self.template.effective_column_widths(self.geometry.pixel_width()),
            self.template,
        );
        let gap = u16::try_from(gap_in_chars(self.template)).unwrap_or(u16::MAX);

        let mut x = area.x;
        for (column, width) in self.columns.iter().zip(widths) {
            if x >= area.right() {
                break;
            }
            let cells = u16::try_from(width).unwrap_or(u16::MAX).min(area.right() - x);
            let lines: Vec<Line> = column_rows(column, self.template, width)
                .into_iter()
                .map(|row| Line::from(Span::styled(row.text, row_style(row.kind))))
                .collect();

            Paragraph::new(lines)
                .scroll((self.scroll, 0))
                .render(Rect::new(x, area.y, cells, area.height), buf);
            x = x.saturating_add(cells).saturating_add(gap);
        }
    }
}
