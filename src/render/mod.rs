// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Line rendering.
//!
//! Turns a `SongLine` into a geometric description for the active chord
//! positioning style. Chord glyphs sit at `position * chord_char_width`
//! from the line's left edge, so a chord stays above the character it
//! annotates under the monospaced assumption. Alignment only moves the
//! whole block inside its column; it never changes chord offsets.
//!
//! Segments are expected to be ordered and non-overlapping (see
//! `ParsedSong::validate`); nothing here repairs bad input.

pub mod text;

pub use text::{column_rows, gap_in_chars, render_columns_text, widths_in_chars, RowKind, TextRow};

use crate::music::Semitones;
use crate::song::{LineKind, SongLine};
use crate::template::{ChordAlignment, ChordPositioningStyle, Template, CHAR_WIDTH_RATIO};

/// Comment text size relative to the body font
pub const COMMENT_SCALE: f32 = 0.85;

/// A chord placed on the chord layer
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedChord {
    /// Chord as displayed (after transposition)
    pub chord: String,
    /// Character position within the line
    pub position: usize,
    /// Horizontal offset from the line's left edge, in pixels
    pub offset: f32,
}

impl PlacedChord {
    /// One past the last character column the chord occupies
    pub fn end(&self) -> usize {
        self.position + self.chord.chars().count()
    }
}

/// Rendered form of a single line
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedLine {
    /// Chord layer over a verbatim lyric layer
    TwoLayer {
        lyrics: String,
        chords: Vec<PlacedChord>,
        chord_height: f32,
        lyric_height: f32,
        width: f32,
    },
    /// Lyrics with `[chord]` markers flattened into one run
    Inline { text: String, width: f32, height: f32 },
    /// Chord layer only
    ChordsOnly {
        chords: Vec<PlacedChord>,
        width: f32,
        height: f32,
    },
    /// Vertical space of one body line
    Blank { height: f32 },
    /// De-emphasized comment at reduced size
    Comment {
        text: String,
        font_size: f32,
        width: f32,
        height: f32,
    },
    /// Directives: nothing drawn, no space taken
    Empty,
}

impl RenderedLine {
    /// Width of the line's content before alignment
    pub fn intrinsic_width(&self) -> f32 {
        match self {
            RenderedLine::TwoLayer { width, .. }
            | RenderedLine::Inline { width, .. }
            | RenderedLine::ChordsOnly { width, .. }
            | RenderedLine::Comment { width, .. } => *width,
            RenderedLine::Blank { .. } | RenderedLine::Empty => 0.0,
        }
    }

    /// Vertical space taken by the line
    pub fn height(&self) -> f32 {
        match self {
            RenderedLine::TwoLayer {
                chord_height,
                lyric_height,
                ..
            } => chord_height + lyric_height,
            RenderedLine::Inline { height, .. }
            | RenderedLine::ChordsOnly { height, .. }
            | RenderedLine::Blank { height }
            | RenderedLine::Comment { height, .. } => *height,
            RenderedLine::Empty => 0.0,
        }
    }

    /// Chords on the chord layer, if the line has one
    pub fn chords(&self) -> &[PlacedChord] {
        match self {
            RenderedLine::TwoLayer { chords, .. } | RenderedLine::ChordsOnly { chords, .. } => {
                chords
            }
            _ => &[],
        }
    }
}

/// A rendered line positioned inside a column
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    /// Left offset of the block within the column
    pub x: f32,
    pub line: RenderedLine,
}

/// Horizontal offset of a chord at a character position
pub fn chord_offset(position: usize, template: &Template) -> f32 {
    position as f32 * template.chord_char_width()
}

/// Chord layer for a line: display chords at their exact offsets
pub fn place_chords(line: &SongLine, template: &Template) -> Vec<PlacedChord> {
    line.segments
        .iter()
        .filter_map(|segment| {
            segment.display_chord(template.transpose).map(|chord| PlacedChord {
                chord,
                position: segment.position,
                offset: chord_offset(segment.position, template),
            })
        })
        .collect()
}

/// Characters needed to show every chord without clipping
pub fn chord_extent(chords: &[PlacedChord]) -> usize {
    chords.iter().map(PlacedChord::end).max().unwrap_or(0)
}

/// Flatten a line into ChordPro bracket form.
///
/// Each chord is written as `[chord]` immediately before the character at
/// its position, in position order. Chords positioned past the end of the
/// text are appended.
pub fn inline_text(line: &SongLine, transpose: Semitones) -> String {
    let chars: Vec<char> = line.visible_text().chars().collect();
    let mut out = String::with_capacity(line.text.len() + line.segments.len() * 4);
    let mut cursor = 0;

    for segment in &line.segments {
        let Some(chord) = segment.display_chord(transpose) else {
            continue;
        };
        let until = segment.position.min(chars.len());
        if until > cursor {
            out.extend(&chars[cursor..until]);
            cursor = until;
        }
        out.push('[');
        out.push_str(&chord);
        out.push(']');
    }
    if cursor < chars.len() {
        out.extend(&chars[cursor..]);
    }
    out
}

fn row_height(font_size: f32, template: &Template) -> f32 {
    font_size * template.line_spacing
}

fn text_width(text: &str, char_width: f32) -> f32 {
    text.chars().count() as f32 * char_width
}

/// Render a line for the template's chord positioning style
pub fn render_line(line: &SongLine, template: &Template) -> RenderedLine {
    let body_height = row_height(template.body_font_size, template);

    match line.kind {
        LineKind::Directive => RenderedLine::Empty,
        LineKind::Blank => RenderedLine::Blank {
            height: body_height,
        },
        LineKind::Comment => {
            let font_size = template.body_font_size * COMMENT_SCALE;
            RenderedLine::Comment {
                text: line.text.clone(),
                font_size,
                width: text_width(&line.text, font_size * CHAR_WIDTH_RATIO),
                height: row_height(font_size, template),
            }
        }
        LineKind::ChordsOnly => {
            let chords = place_chords(line, template);
            RenderedLine::ChordsOnly {
                width: chord_extent(&chords) as f32 * template.chord_char_width(),
                height: chord_row_height(template),
                chords,
            }
        }
        LineKind::Lyrics => match template.chord_positioning_style {
            ChordPositioningStyle::Inline => {
                let text = inline_text(line, template.transpose);
                RenderedLine::Inline {
                    width: text_width(&text, template.body_char_width()),
                    height: body_height,
                    text,
                }
            }
            ChordPositioningStyle::ChordsOverLyrics | ChordPositioningStyle::SeparateLines => {
                let chords = place_chords(line, template);
                let chord_width = chord_extent(&chords) as f32 * template.chord_char_width();
                let lyric_width = text_width(&line.text, template.body_char_width());
                RenderedLine::TwoLayer {
                    chord_height: if chords.is_empty() {
                        0.0
                    } else {
                        chord_row_height(template)
                    },
                    lyric_height: body_height,
                    width: chord_width.max(lyric_width),
                    lyrics: line.text.clone(),
                    chords,
                }
            }
        },
    }
}

/// Height of a chord layer row.
///
/// Separate-lines mode gives chords a full body line; chords-over-lyrics
/// packs them into a row sized by the chord font.
pub fn chord_row_height(template: &Template) -> f32 {
    match template.chord_positioning_style {
        ChordPositioningStyle::SeparateLines => row_height(template.body_font_size, template),
        _ => row_height(template.chord_font_size, template),
    }
}

/// Vertical space a line takes, without building the rendered line
pub fn line_height(line: &SongLine, template: &Template) -> f32 {
    render_line(line, template).height()
}

/// Left offset of a block of `content_width` inside `column_width`.
///
/// Content wider than the column is pinned to the left edge.
pub fn alignment_offset(content_width: f32, column_width: f32, alignment: ChordAlignment) -> f32 {
    let extra = (column_width - content_width).max(0.0);
    match alignment {
        ChordAlignment::LeftAligned => 0.0,
        ChordAlignment::Centered => extra / 2.0,
        ChordAlignment::RightAligned => extra,
    }
}

/// Render a line and place it within a column of the given width
pub fn place_line(line: &SongLine, template: &Template, column_width: f32) -> PlacedLine {
    let rendered = render_line(line, template);
    PlacedLine {
        x: alignment_offset(
            rendered.intrinsic_width(),
            column_width,
            template.chord_alignment,
        ),
        line: rendered,
    }
}
