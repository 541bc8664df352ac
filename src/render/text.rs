// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Monospaced plain-text export.
//!
//! Every glyph is one grid cell of `chord_char_width` pixels, so a column
//! `w` pixels wide holds `w / chord_char_width` characters. Chord rows put
//! each chord at its character position; when a chord would run into the
//! previous one it is pushed right to leave a single space, since a text
//! grid cannot overlap glyphs.

use crate::layout::ColumnContent;
use crate::song::{LineKind, SongLine, SongSection};
use crate::template::{ChordPositioningStyle, SectionBreakBehavior, Template};

use super::{alignment_offset, inline_text, place_chords, PlacedChord};

/// What a text row shows; used for styling in the terminal preview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Heading,
    Chords,
    Lyrics,
    Inline,
    Comment,
    Blank,
}

/// One row of monospaced output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRow {
    pub kind: RowKind,
    pub text: String,
}

impl TextRow {
    fn new(kind: RowKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Width of the row in characters
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }
}

/// Lay chords out on a single text row
pub fn chord_row(chords: &[PlacedChord]) -> String {
    let mut row = String::new();
    let mut used = 0;

    for chord in chords {
        let start = if used == 0 {
            chord.position
        } else {
            chord.position.max(used + 1)
        };
        row.extend(std::iter::repeat(' ').take(start - used));
        row.push_str(&chord.chord);
        used = start + chord.chord.chars().count();
    }
    row
}

/// Text rows for a single line, before alignment
pub fn line_rows(line: &SongLine, template: &Template) -> Vec<TextRow> {
    match line.kind {
        LineKind::Directive => Vec::new(),
        LineKind::Blank => vec![TextRow::new(RowKind::Blank, "")],
        LineKind::Comment => vec![TextRow::new(RowKind::Comment, format!("({})", line.text))],
        LineKind::ChordsOnly => {
            vec![TextRow::new(RowKind::Chords, chord_row(&place_chords(line, template)))]
        }
        LineKind::Lyrics => match template.chord_positioning_style {
            ChordPositioningStyle::Inline => {
                vec![TextRow::new(RowKind::Inline, inline_text(line, template.transpose))]
            }
            ChordPositioningStyle::ChordsOverLyrics | ChordPositioningStyle::SeparateLines => {
                let chords = place_chords(line, template);
                let mut rows = Vec::with_capacity(2);
                if !chords.is_empty() {
                    rows.push(TextRow::new(RowKind::Chords, chord_row(&chords)));
                }
                rows.push(TextRow::new(RowKind::Lyrics, line.text.clone()));
                rows
            }
        },
    }
}

fn fit(text: &str, indent: usize, width: usize) -> String {
    std::iter::repeat(' ')
        .take(indent)
        .chain(text.chars())
        .take(width)
        .collect::<String>()
        .trim_end()
        .to_string()
}

fn section_rows(section: &SongSection, template: &Template, width: usize, rows: &mut Vec<TextRow>) {
    if section.has_heading() {
        rows.push(TextRow::new(RowKind::Heading, fit(&section.label, 0, width)));
    }

    for line in &section.lines {
        let line_rows = line_rows(line, template);
        // Rows of one line move together so chords stay above their syllables
        let block = line_rows.iter().map(TextRow::width).max().unwrap_or(0);
        let indent =
            alignment_offset(block as f32, width as f32, template.chord_alignment).floor() as usize;
        rows.extend(
            line_rows
                .into_iter()
                .map(|row| TextRow::new(row.kind, fit(&row.text, indent, width))),
        );
    }
}

/// Text rows for a whole column, `width` characters wide
pub fn column_rows(column: &ColumnContent, template: &Template, width: usize) -> Vec<TextRow> {
    let mut rows = Vec::new();
    for (i, section) in column.sections.iter().enumerate() {
        if i > 0 && template.section_break_behavior == SectionBreakBehavior::SpaceBefore {
            rows.push(TextRow::new(RowKind::Blank, ""));
        }
        section_rows(section, template, width, &mut rows);
    }
    rows
}

/// Convert pixel widths to character counts on the chord grid
pub fn widths_in_chars(widths: &[f32], template: &Template) -> Vec<usize> {
    let unit = template.chord_char_width();
    widths
        .iter()
        // epsilon absorbs float error so 20 cells' worth of pixels stays 20
        .map(|w| if unit > 0.0 { (w / unit + 1e-3).floor() as usize } else { 0 })
        .collect()
}

/// Column gap rounded to whole grid cells
pub fn gap_in_chars(template: &Template) -> usize {
    let unit = template.chord_char_width();
    if unit > 0.0 {
        (template.column_gap / unit).round() as usize
    } else {
        0
    }
}

/// Render distributed columns side by side as plain text
pub fn render_columns_text(
    columns: &[ColumnContent],
    template: &Template,
    available_width: f32,
) -> String {
    let widths = widths_in_chars(&template.effective_column_widths(available_width), template);
    let gap = gap_in_chars(template);

    let rendered: Vec<Vec<TextRow>> = columns
        .iter()
        .zip(&widths)
        .map(|(column, &width)| column_rows(column, template, width))
        .collect();
    let height = rendered.iter().map(Vec::len).max().unwrap_or(0);

    let mut out = String::new();
    for r in 0..height {
        let mut line = String::new();
        for (c, rows) in rendered.iter().enumerate() {
            if c > 0 {
                line.extend(std::iter::repeat(' ').take(gap));
            }
            let text = rows.get(r).map(|row| row.text.as_str()).unwrap_or("");
            let pad = widths[c].saturating_sub(text.chars().count());
            line.push_str(text);
            line.extend(std::iter::repeat(' ').take(pad));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song::Segment;
    use crate::template::ChordAlignment;

    fn placed(position: usize, chord: &str) -> PlacedChord {
        PlacedChord {
            chord: chord.to_string(),
            position,
            offset: 0.0,
        }
    }

    fn verse() -> SongSection {
        SongSection::new(
            "Verse 1",
            vec![
                SongLine::with_chords(
                    "Amazing grace",
                    vec![Segment::new(0, "C", "Amazing "), Segment::new(8, "F", "grace")],
                ),
                SongLine::lyrics("how sweet"),
            ],
        )
    }

    #[test]
    fn test_chord_row_positions() {
        assert_eq!(chord_row(&[placed(0, "C"), placed(8, "F")]), "C       F");
        assert_eq!(chord_row(&[placed(2, "G")]), "  G");
    }

    #[test]
    fn test_chord_row_pushes_colliding_chords() {
        assert_eq!(chord_row(&[placed(0, "Cmaj7"), placed(3, "G")]), "Cmaj7 G");
        assert_eq!(chord_row(&[placed(0, "G"), placed(0, "C")]), "G C");
    }

    #[test]
    fn test_line_rows_over_lyrics() {
        let rows = line_rows(&verse().lines[0], &Template::default());
        assert_eq!(
            rows,
            vec![
                TextRow::new(RowKind::Chords, "C       F"),
                TextRow::new(RowKind::Lyrics, "Amazing grace"),
            ]
        );
    }

    #[test]
    fn test_line_rows_inline_and_special_lines() {
        let template = Template {
            chord_positioning_style: ChordPositioningStyle::Inline,
            ..Template::default()
        };
        let rows = line_rows(&verse().lines[0], &template);
        assert_eq!(rows, vec![TextRow::new(RowKind::Inline, "[C]Amazing [F]grace")]);

        assert!(line_rows(&SongLine::directive("new_page"), &template).is_empty());
        assert_eq!(
            line_rows(&SongLine::comment("Repeat"), &template),
            vec![TextRow::new(RowKind::Comment, "(Repeat)")]
        );
    }

    #[test]
    fn test_column_rows_section_breaks() {
        let column = ColumnContent::new(0, vec![verse(), verse()]);

        let spaced = column_rows(&column, &Template::default(), 40);
        let compact = column_rows(
            &column,
            &Template {
                section_break_behavior: SectionBreakBehavior::Compact,
                ..Template::default()
            },
            40,
        );

        assert_eq!(spaced.len(), compact.len() + 1);
        assert_eq!(spaced[0], TextRow::new(RowKind::Heading, "Verse 1"));
        assert_eq!(spaced[4].kind, RowKind::Blank);
    }

    #[test]
    fn test_alignment_moves_both_layers() {
        let template = Template {
            chord_alignment: ChordAlignment::RightAligned,
            ..Template::default()
        };
        let column = ColumnContent::new(0, vec![verse()]);
        let rows = column_rows(&column, &template, 20);
        // block is 13 wide in a 20 wide column
        assert_eq!(rows[1].text, "       C       F");
        assert_eq!(rows[2].text, "       Amazing grace");
    }

    #[test]
    fn test_rows_truncated_to_column() {
        let column = ColumnContent::new(0, vec![verse()]);
        let rows = column_rows(&column, &Template::default(), 7);
        assert_eq!(rows[2].text, "Amazing");
    }

    #[test]
    fn test_render_columns_side_by_side() {
        // chord grid unit is 14 * 0.6 = 8.4px; 20 chars per column
        let template = Template {
            column_count: 2,
            column_gap: 8.4 * 2.0,
            ..Template::default()
        };
        let columns = vec![
            ColumnContent::new(0, vec![SongSection::new("A", vec![SongLine::lyrics("left")])]),
            ColumnContent::new(1, vec![SongSection::new("B", vec![SongLine::lyrics("right")])]),
        ];

        let text = render_columns_text(&columns, &template, 8.4 * 42.0);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("A{}B", " ".repeat(21)));
        assert_eq!(lines[1], format!("left{}right", " ".repeat(18)));
    }

    #[test]
    fn test_render_empty_columns() {
        let template = Template {
            column_count: 3,
            ..Template::default()
        };
        let columns: Vec<ColumnContent> = (0..3).map(|i| ColumnContent::new(i, Vec::new())).collect();
        assert_eq!(render_columns_text(&columns, &template, 600.0), "");
    }
}
