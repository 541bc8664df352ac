// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord symbol parsing and transposition.
//!
//! A chord symbol is split into root, quality and optional slash bass
//! ("D/F#"). The quality is carried through untouched, so extensions the
//! parser does not understand ("7#9b13", "add9") survive transposition.

use std::fmt;

use super::note::{Note, Semitones, Spelling};

/// A parsed chord symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    root: Note,
    quality: String,
    bass: Option<Note>,
    spelling: Option<Spelling>,
}

impl Chord {
    /// Parse a chord symbol such as "C", "F#m7", "Bbmaj7", "D/F#"
    pub fn parse(symbol: &str) -> Option<Self> {
        let symbol = symbol.trim();
        let (root, root_spelling, consumed) = Note::parse_prefix(symbol)?;
        let rest = &symbol[consumed..];

        let (quality, bass, bass_spelling) = match rest.rfind('/') {
            Some(slash) => match Note::parse_prefix(&rest[slash + 1..]) {
                Some((bass, spelling, len)) if len == rest.len() - slash - 1 => {
                    (&rest[..slash], Some(bass), spelling)
                }
                // "C/9" and similar: the slash belongs to the quality
                _ => (rest, None, None),
            },
            None => (rest, None, None),
        };

        if quality.chars().any(char::is_whitespace) {
            return None;
        }

        Some(Self {
            root,
            quality: quality.to_string(),
            bass,
            spelling: root_spelling.or(bass_spelling),
        })
    }

    /// Get the root note
    pub fn root(&self) -> Note {
        self.root
    }

    /// Get the quality suffix (e.g., "m7", "sus4")
    pub fn quality(&self) -> &str {
        &self.quality
    }

    /// Get the slash bass note, if any
    pub fn bass(&self) -> Option<Note> {
        self.bass
    }

    /// Transpose root and bass by semitones
    pub fn transpose(&self, semitones: Semitones) -> Self {
        if semitones.rem_euclid(12) == 0 {
            return self.clone();
        }
        let root = self.root.transpose(semitones);
        Self {
            root,
            quality: self.quality.clone(),
            bass: self.bass.map(|b| b.transpose(semitones)),
            // A flat-spelled chord keeps flats; otherwise the new root decides.
            spelling: match self.spelling {
                Some(Spelling::Flats) => Some(Spelling::Flats),
                _ => Some(root.conventional_spelling()),
            },
        }
    }

    fn effective_spelling(&self) -> Spelling {
        self.spelling.unwrap_or_default()
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spelling = self.effective_spelling();
        write!(f, "{}{}", self.root.name(spelling), self.quality)?;
        if let Some(bass) = self.bass {
            write!(f, "/{}", bass.name(spelling))?;
        }
        Ok(())
    }
}

/// Transpose a chord symbol for display.
///
/// Symbols that do not parse as chords ("N.C.", "x2", "%") are returned
/// unchanged, as is every symbol when `semitones` is a multiple of 12.
pub fn transpose_chord(symbol: &str, semitones: Semitones) -> String {
    if semitones.rem_euclid(12) == 0 {
        return symbol.to_string();
    }
    match Chord::parse(symbol) {
        Some(chord) => chord.transpose(semitones).to_string(),
        None => symbol.to_string(),
    }
}
