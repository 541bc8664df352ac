// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Parsed song model.
//!
//! A `ParsedSong` is an immutable snapshot produced by the ChordPro parser:
//! an ordered list of sections, each an ordered list of lines, each line
//! optionally annotated with chord segments. Re-parsing yields a new value;
//! nothing in the layout engine mutates a song in place.

mod validate;

pub use validate::SongError;

use serde::{Deserialize, Serialize};

use crate::music::{transpose_chord, Semitones};

/// A run of a line's text, optionally preceded by a chord
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    /// Lyric text covered by this segment
    pub text: String,
    /// Character offset of the segment within the line's text
    pub position: usize,
    /// Chord annotation, as written in the source
    #[serde(default)]
    pub chord: Option<String>,
}

impl Segment {
    /// Create a segment with a chord
    pub fn new(position: usize, chord: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            position,
            chord: Some(chord.into()),
        }
    }

    /// Create a segment without a chord
    pub fn plain(position: usize, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            position,
            chord: None,
        }
    }

    /// The chord as it should be displayed after transposition
    pub fn display_chord(&self, transpose: Semitones) -> Option<String> {
        self.chord
            .as_deref()
            .map(|chord| transpose_chord(chord, transpose))
    }

    /// Length of the segment text in characters
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    /// One past the last character covered by this segment
    pub fn end(&self) -> usize {
        self.position + self.text_len()
    }
}

/// Kind of a song line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Lyrics, with or without chords
    Lyrics,
    /// Chords with no lyric text
    ChordsOnly,
    /// Empty line
    Blank,
    /// Performer comment (rendered de-emphasized)
    Comment,
    /// Structural directive (never visible)
    Directive,
}

/// A single line of a song
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SongLine {
    /// Line kind
    pub kind: LineKind,
    /// Lyric text with chord annotations removed
    pub text: String,
    /// Chord segments in ascending position order
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl SongLine {
    /// A lyric line without chords
    pub fn lyrics(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Lyrics,
            text: text.into(),
            segments: Vec::new(),
        }
    }

    /// A lyric line annotated with chord segments
    pub fn with_chords(text: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            kind: LineKind::Lyrics,
            text: text.into(),
            segments,
        }
    }

    /// A line holding only chords
    pub fn chords_only(text: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            kind: LineKind::ChordsOnly,
            text: text.into(),
            segments,
        }
    }

    /// An empty line
    pub fn blank() -> Self {
        Self {
            kind: LineKind::Blank,
            text: String::new(),
            segments: Vec::new(),
        }
    }

    /// A comment line
    pub fn comment(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Comment,
            text: text.into(),
            segments: Vec::new(),
        }
    }

    /// A structural directive.
    ///
    /// The directive name is kept for diagnostics only; `visible_text`
    /// is always empty for directives.
    pub fn directive(name: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Directive,
            text: name.into(),
            segments: Vec::new(),
        }
    }

    /// Whether this line carries chord annotations
    pub fn has_chords(&self) -> bool {
        !self.segments.is_empty()
    }

    /// Text shown for this line (empty for directives)
    pub fn visible_text(&self) -> &str {
        match self.kind {
            LineKind::Directive => "",
            _ => &self.text,
        }
    }

    /// Chords in position order, paired with their positions
    pub fn chords(&self) -> impl Iterator<Item = (usize, &str)> {
        self.segments
            .iter()
            .filter_map(|s| s.chord.as_deref().map(|c| (s.position, c)))
    }
}

/// A named group of lines (verse, chorus, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SongSection {
    /// Section label ("Verse 1", "Chorus"); may be empty
    pub label: String,
    /// Lines in display order
    pub lines: Vec<SongLine>,
}

impl SongSection {
    /// Create a section
    pub fn new(label: impl Into<String>, lines: Vec<SongLine>) -> Self {
        Self {
            label: label.into(),
            lines,
        }
    }

    /// Whether the section has a visible heading
    pub fn has_heading(&self) -> bool {
        !self.label.trim().is_empty()
    }
}

/// Song metadata passed through from the source file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SongMetadata {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub artist: Option<String>,
    pub key: Option<String>,
    pub capo: Option<u8>,
    pub tempo: Option<u16>,
}

/// A parsed song
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ParsedSong {
    /// Title, key, capo and friends
    #[serde(default)]
    pub metadata: SongMetadata,
    /// Sections in song order
    pub sections: Vec<SongSection>,
}

impl ParsedSong {
    /// Create a song from sections
    pub fn new(sections: Vec<SongSection>) -> Self {
        Self {
            metadata: SongMetadata::default(),
            sections,
        }
    }

    /// Total number of lines across all sections
    pub fn line_count(&self) -> usize {
        self.sections.iter().map(|s| s.lines.len()).sum()
    }

    /// Check segment ordering and overlap for every line
    pub fn validate(&self) -> Result<(), SongError> {
        for (section_index, section) in self.sections.iter().enumerate() {
            for (line_index, line) in section.lines.iter().enumerate() {
                validate::check_line(line).map_err(|e| e.at(section_index, line_index))?;
            }
        }
        Ok(())
    }
}
