// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch classes with sharp/flat spelling.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semitone offset type
pub type Semitones = i8;

/// Note names (pitch classes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Note {
    C,
    Cs, // C# / Db
    D,
    Ds, // D# / Eb
    E,
    F,
    Fs, // F# / Gb
    G,
    Gs, // G# / Ab
    A,
    As, // A# / Bb
    B,
}

/// How accidentals are written when a note is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Spelling {
    /// Use sharps (C#, F#)
    #[default]
    Sharps,
    /// Use flats (Db, Gb)
    Flats,
}

impl Note {
    /// All notes in chromatic order
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::Cs,
        Note::D,
        Note::Ds,
        Note::E,
        Note::F,
        Note::Fs,
        Note::G,
        Note::Gs,
        Note::A,
        Note::As,
        Note::B,
    ];

    /// Get the pitch class (0-11) for this note
    pub fn pitch_class(self) -> u8 {
        self as u8
    }

    /// Get note from pitch class
    pub fn from_pitch_class(pc: u8) -> Self {
        Note::ALL[(pc % 12) as usize]
    }

    /// Parse a note name at the start of a chord symbol.
    ///
    /// Returns the note, the spelling that was used, and the number of bytes
    /// consumed. Only upper-case letters are accepted so that text such as
    /// "N.C." or "x" is never mistaken for a root.
    pub fn parse_prefix(s: &str) -> Option<(Self, Option<Spelling>, usize)> {
        let mut chars = s.chars();
        let letter = chars.next()?;
        let natural = match letter {
            'C' => Note::C,
            'D' => Note::D,
            'E' => Note::E,
            'F' => Note::F,
            'G' => Note::G,
            'A' => Note::A,
            'B' => Note::B,
            _ => return None,
        };

        match chars.next() {
            Some('#') | Some('♯') => {
                let width = 1 + s[1..].chars().next().map(char::len_utf8).unwrap_or(1);
                Some((natural.transpose(1), Some(Spelling::Sharps), width))
            }
            Some('b') | Some('♭') => {
                let width = 1 + s[1..].chars().next().map(char::len_utf8).unwrap_or(1);
                Some((natural.transpose(-1), Some(Spelling::Flats), width))
            }
            _ => Some((natural, None, 1)),
        }
    }

    /// Parse a complete note name (e.g., "C", "C#", "Db")
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match Note::parse_prefix(s) {
            Some((note, _, len)) if len == s.len() => Some(note),
            _ => None,
        }
    }

    /// Transpose by semitones
    pub fn transpose(self, semitones: Semitones) -> Self {
        let new_pc = (self.pitch_class() as i16 + semitones as i16).rem_euclid(12) as u8;
        Note::from_pitch_class(new_pc)
    }

    /// Whether this pitch class needs an accidental
    pub fn is_accidental(self) -> bool {
        matches!(self, Note::Cs | Note::Ds | Note::Fs | Note::Gs | Note::As)
    }

    /// Name of the note with the requested spelling
    pub fn name(self, spelling: Spelling) -> &'static str {
        match (self, spelling) {
            (Note::C, _) => "C",
            (Note::Cs, Spelling::Sharps) => "C#",
            (Note::Cs, Spelling::Flats) => "Db",
            (Note::D, _) => "D",
            (Note::Ds, Spelling::Sharps) => "D#",
            (Note::Ds, Spelling::Flats) => "Eb",
            (Note::E, _) => "E",
            (Note::F, _) => "F",
            (Note::Fs, Spelling::Sharps) => "F#",
            (Note::Fs, Spelling::Flats) => "Gb",
            (Note::G, _) => "G",
            (Note::Gs, Spelling::Sharps) => "G#",
            (Note::Gs, Spelling::Flats) => "Ab",
            (Note::A, _) => "A",
            (Note::As, Spelling::Sharps) => "A#",
            (Note::As, Spelling::Flats) => "Bb",
            (Note::B, _) => "B",
        }
    }

    /// Conventional spelling for a root reached by transposition.
    ///
    /// Db, Eb, Ab and Bb read as flats; F# stays sharp.
    pub fn conventional_spelling(self) -> Spelling {
        match self {
            Note::Cs | Note::Ds | Note::Gs | Note::As => Spelling::Flats,
            _ => Spelling::Sharps,
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name(Spelling::Sharps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_class_round_trip() {
        for (i, note) in Note::ALL.iter().enumerate() {
            assert_eq!(note.pitch_class(), i as u8);
            assert_eq!(Note::from_pitch_class(i as u8), *note);
        }
    }

    #[test]
    fn test_parse_prefix() {
        assert_eq!(Note::parse_prefix("C"), Some((Note::C, None, 1)));
        assert_eq!(
            Note::parse_prefix("F#m7"),
            Some((Note::Fs, Some(Spelling::Sharps), 2))
        );
        assert_eq!(
            Note::parse_prefix("Bbmaj7"),
            Some((Note::As, Some(Spelling::Flats), 2))
        );
        assert_eq!(Note::parse_prefix("N.C."), None);
        assert_eq!(Note::parse_prefix("c"), None);
        assert_eq!(Note::parse_prefix(""), None);
    }

    #[test]
    fn test_parse_full_name() {
        assert_eq!(Note::parse("Eb"), Some(Note::Ds));
        assert_eq!(Note::parse(" G "), Some(Note::G));
        assert_eq!(Note::parse("Gm"), None);
    }

    #[test]
    fn test_transpose_wraps() {
        assert_eq!(Note::B.transpose(1), Note::C);
        assert_eq!(Note::C.transpose(-1), Note::B);
        assert_eq!(Note::A.transpose(14), Note::B);
        assert_eq!(Note::D.transpose(-26), Note::C);
    }

    #[test]
    fn test_names() {
        assert_eq!(Note::As.name(Spelling::Flats), "Bb");
        assert_eq!(Note::As.name(Spelling::Sharps), "A#");
        assert_eq!(Note::E.name(Spelling::Flats), "E");
        assert_eq!(Note::Fs.conventional_spelling(), Spelling::Sharps);
        assert_eq!(Note::As.conventional_spelling(), Spelling::Flats);
    }
}
