// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! ChordPro parsing.
//!
//! Produces the `ParsedSong` snapshot the layout engine consumes. Chords
//! written as `[G]` are stripped from the lyric text and kept as segments
//! whose position is the character offset of the chord in the stripped
//! text. Sections come from `{start_of_*}` environments or from label lines
//! such as `Verse 1:`; outside an environment a blank line ends the
//! current section.

mod directive;

pub use directive::{parse_directive, Directive, DirectiveError, Environment};

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::song::{LineKind, ParsedSong, Segment, SongLine, SongMetadata, SongSection};

/// Words that start a section when written as `Word:` or `Word N:`
const SECTION_KEYWORDS: &[&str] = &[
    "verse",
    "chorus",
    "bridge",
    "intro",
    "outro",
    "pre-chorus",
    "tag",
    "interlude",
];

/// Structural errors in ChordPro source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: directive is missing its closing brace")]
    UnterminatedDirective { line: usize },
    #[error("line {line}: text after the closing brace of a directive")]
    TrailingText { line: usize },
    #[error("line {line}: {{end_of_{name}}} without a matching start")]
    UnmatchedEnd { line: usize, name: &'static str },
}

/// Section being filled
struct OpenSection {
    label: String,
    lines: Vec<SongLine>,
    environment: Option<Environment>,
}

impl OpenSection {
    fn new(label: impl Into<String>, environment: Option<Environment>) -> Self {
        Self {
            label: label.into(),
            lines: Vec::new(),
            environment,
        }
    }
}

#[derive(Default)]
struct Parser {
    metadata: SongMetadata,
    sections: Vec<SongSection>,
    current: Option<OpenSection>,
}

impl Parser {
    /// Sections with no label and nothing printable are dropped
    fn close(&mut self) {
        if let Some(open) = self.current.take() {
            let printable = open
                .lines
                .iter()
                .any(|line| line.kind != LineKind::Directive);
            if printable || !open.label.trim().is_empty() {
                self.sections.push(SongSection::new(open.label, open.lines));
            }
        }
    }

    fn open(&mut self, label: impl Into<String>, environment: Option<Environment>) {
        self.close();
        self.current = Some(OpenSection::new(label, environment));
    }

    fn push(&mut self, line: SongLine) {
        self.current
            .get_or_insert_with(|| OpenSection::new("", None))
            .lines
            .push(line);
    }

    fn in_environment(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|open| open.environment.is_some())
    }

    fn directive(&mut self, directive: Directive, line_number: usize) -> Result<(), ParseError> {
        match directive {
            Directive::Title(value) => self.metadata.title = Some(value),
            Directive::Subtitle(value) => self.metadata.subtitle = Some(value),
            Directive::Artist(value) => self.metadata.artist = Some(value),
            Directive::Key(value) => self.metadata.key = Some(value),
            Directive::Capo(value) => match value.parse() {
                Ok(capo) => self.metadata.capo = Some(capo),
                Err(_) => warn!(line = line_number, value = %value, "ignoring invalid capo"),
            },
            Directive::Tempo(value) => match value.parse() {
                Ok(tempo) => self.metadata.tempo = Some(tempo),
                Err(_) => warn!(line = line_number, value = %value, "ignoring invalid tempo"),
            },
            Directive::Comment(text) => self.push(SongLine::comment(text)),
            Directive::StartOf(environment, label) => {
                let label = label.unwrap_or_else(|| environment.default_label().to_string());
                self.open(label, Some(environment));
            }
            Directive::EndOf(environment) => {
                let matches = self
                    .current
                    .as_ref()
                    .is_some_and(|open| open.environment == Some(environment));
                if !matches {
                    return Err(ParseError::UnmatchedEnd {
                        line: line_number,
                        name: environment.name(),
                    });
                }
                self.close();
            }
            Directive::Other(name) => match self.current.as_mut() {
                Some(open) => open.lines.push(SongLine::directive(name)),
                None => trace!(line = line_number, directive = %name, "directive outside a section"),
            },
        }
        Ok(())
    }

    fn finish(mut self) -> ParsedSong {
        if let Some(environment) = self.current.as_ref().and_then(|open| open.environment) {
            warn!(environment = environment.name(), "environment left open at end of file");
        }
        self.close();
        ParsedSong {
            metadata: self.metadata,
            sections: self.sections,
        }
    }
}

/// Parse ChordPro source into a song.
///
/// The result always passes `ParsedSong::validate`.
pub fn parse(source: &str) -> Result<ParsedSong, ParseError> {
    let mut parser = Parser::default();

    for (index, raw) in source.lines().enumerate() {
        let line_number = index + 1;
        let line = raw.trim_end_matches('\r');
        let trimmed = line.trim();

        if trimmed.starts_with('#') {
            continue;
        }

        if let Some(directive) = parse_directive(line) {
            let directive = directive.map_err(|error| match error {
                DirectiveError::Unterminated => {
                    ParseError::UnterminatedDirective { line: line_number }
                }
                DirectiveError::TrailingText => ParseError::TrailingText { line: line_number },
            })?;
            parser.directive(directive, line_number)?;
            continue;
        }

        if trimmed.is_empty() {
            if parser.in_environment() {
                parser.push(SongLine::blank());
            } else {
                parser.close();
            }
            continue;
        }

        if !parser.in_environment() {
            if let Some(label) = section_label(trimmed) {
                parser.open(label, None);
                continue;
            }
        }

        parser.push(parse_line(line));
    }

    let song = parser.finish();
    debug!(
        sections = song.sections.len(),
        lines = song.line_count(),
        "parsed chordpro"
    );
    Ok(song)
}

/// Read and parse a ChordPro file
pub fn load<P: AsRef<Path>>(path: P) -> Result<ParsedSong> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read song file: {}", path.display()))?;
    parse(&source).with_context(|| format!("Failed to parse song file: {}", path.display()))
}

/// Label of a `Verse 1:` style heading line
fn section_label(trimmed: &str) -> Option<&str> {
    let label = trimmed.strip_suffix(':')?.trim_end();
    if label.contains('[') {
        return None;
    }
    let lower = label.to_ascii_lowercase();
    let keyword = SECTION_KEYWORDS
        .iter()
        .find(|keyword| lower.starts_with(*keyword))?;
    let rest = &label[keyword.len()..];
    let numbered = rest.is_empty()
        || (rest.starts_with(' ')
            && rest.len() <= 8
            && rest.trim().chars().all(|c| c.is_ascii_alphanumeric()));
    numbered.then_some(label)
}

/// Split a lyric line into text and chord segments.
///
/// An unclosed `[` is kept as literal text.
pub fn parse_line(line: &str) -> SongLine {
    let mut text = String::with_capacity(line.len());
    let mut chords: Vec<(usize, String)> = Vec::new();
    let mut length = 0;
    let mut rest = line;

    while let Some(open) = rest.find('[') {
        let Some(close) = rest[open + 1..].find(']') else {
            break;
        };
        let before = &rest[..open];
        text.push_str(before);
        length += before.chars().count();

        let chord = rest[open + 1..open + 1 + close].trim();
        if !chord.is_empty() {
            chords.push((length, chord.to_string()));
        }
        rest = &rest[open + close + 2..];
    }
    text.push_str(rest);

    if chords.is_empty() {
        return if text.trim().is_empty() {
            SongLine::blank()
        } else {
            SongLine::lyrics(text)
        };
    }

    let segments = segments(&text, &chords);
    if text.trim().is_empty() {
        SongLine::chords_only(text, segments)
    } else {
        SongLine::with_chords(text, segments)
    }
}

fn segments(text: &str, chords: &[(usize, String)]) -> Vec<Segment> {
    let chars: Vec<char> = text.chars().collect();
    let slice = |from: usize, to: usize| chars[from..to].iter().collect::<String>();

    let mut segments = Vec::with_capacity(chords.len() + 1);
    if let Some(&(first, _)) = chords.first() {
        if first > 0 {
            segments.push(Segment::plain(0, slice(0, first)));
        }
    }
    for (i, (position, chord)) in chords.iter().enumerate() {
        let end = chords.get(i + 1).map_or(chars.len(), |(next, _)| *next);
        segments.push(Segment::new(*position, chord.clone(), slice(*position, end)));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_segments() {
        let line = parse_line("[C]Amazing [F]grace");
        assert_eq!(line.kind, LineKind::Lyrics);
        assert_eq!(line.text, "Amazing grace");
        assert_eq!(
            line.segments,
            vec![Segment::new(0, "C", "Amazing "), Segment::new(8, "F", "grace")]
        );
    }

    #[test]
    fn test_parse_line_leading_text_and_trailing_chord() {
        let line = parse_line("Oh [G]say[D7]");
        assert_eq!(line.text, "Oh say");
        assert_eq!(
            line.segments,
            vec![
                Segment::plain(0, "Oh "),
                Segment::new(3, "G", "say"),
                Segment::new(6, "D7", ""),
            ]
        );
    }

    #[test]
    fn test_parse_line_kinds() {
        assert_eq!(parse_line("no chords here"), SongLine::lyrics("no chords here"));
        assert_eq!(parse_line("[G]  [C]").kind, LineKind::ChordsOnly);
        assert_eq!(parse_line("[ ]").kind, LineKind::Blank);
    }

    #[test]
    fn test_parse_line_positions_count_chars() {
        let line = parse_line("café [D]au lait");
        assert_eq!(line.segments[1].position, 5);
    }

    #[test]
    fn test_parse_line_unclosed_bracket_is_text() {
        let line = parse_line("[G]one [two");
        assert_eq!(line.text, "one [two");
        assert_eq!(line.segments.len(), 1);
    }

    #[test]
    fn test_environments_and_metadata() {
        let source = "\
{title: Amazing Grace}
{key: G}
{capo: 2}
{start_of_verse: Verse 1}
[G]Amazing grace how [C]sweet the [G]sound

That saved a wretch like me
{end_of_verse}
{soc}
{c: All together}
[G]Praise
{eoc}
";
        let song = parse(source).unwrap();
        assert_eq!(song.metadata.title.as_deref(), Some("Amazing Grace"));
        assert_eq!(song.metadata.key.as_deref(), Some("G"));
        assert_eq!(song.metadata.capo, Some(2));

        assert_eq!(song.sections.len(), 2);
        assert_eq!(song.sections[0].label, "Verse 1");
        let kinds: Vec<LineKind> = song.sections[0].lines.iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![LineKind::Lyrics, LineKind::Blank, LineKind::Lyrics]);

        assert_eq!(song.sections[1].label, "Chorus");
        assert_eq!(song.sections[1].lines[0], SongLine::comment("All together"));
        assert!(song.validate().is_ok());
    }

    #[test]
    fn test_label_lines_and_blank_breaks() {
        let source = "\
Verse 1:
[C]Line one
Line two

Chorus:
[F]Sing

no label here
# a remark
";
        let song = parse(source).unwrap();
        let labels: Vec<&str> = song.sections.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Verse 1", "Chorus", ""]);
        assert_eq!(song.sections[0].lines.len(), 2);
        assert_eq!(song.sections[2].lines, vec![SongLine::lyrics("no label here")]);
    }

    #[test]
    fn test_label_detection() {
        assert_eq!(section_label("Verse 1:"), Some("Verse 1"));
        assert_eq!(section_label("Pre-Chorus:"), Some("Pre-Chorus"));
        assert_eq!(section_label("chorus 2b:"), Some("chorus 2b"));
        assert_eq!(section_label("Verse"), None);
        assert_eq!(section_label("Versed in the art:"), None);
        assert_eq!(section_label("Tag along with me and sing:"), None);
    }

    #[test]
    fn test_other_directives_become_directive_lines() {
        let song = parse("{sov}\n[G]a\n{new_page}\n{eov}\n").unwrap();
        assert_eq!(song.sections[0].lines[1], SongLine::directive("new_page"));
    }

    #[test]
    fn test_header_directives_do_not_make_sections() {
        let source = "\
{title: Amazing Grace}
{album: Hymns}
{year: 1779}

Verse 1:
[G]Amazing grace

Verse 2:
[G]Twas grace

{new_page}

Verse 3:
[G]Through many dangers
";
        let song = parse(source).unwrap();
        let labels: Vec<&str> = song.sections.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Verse 1", "Verse 2", "Verse 3"]);
    }

    #[test]
    fn test_directive_only_section_is_dropped() {
        let song = parse("Verse 1:\n[G]a\n\nno label\n\n{c: x}\n").unwrap();
        assert_eq!(song.sections.len(), 3);

        let mut parser = Parser::default();
        parser.current = Some(OpenSection::new("", None));
        parser.directive(Directive::Other("new_page".to_string()), 1).unwrap();
        parser.close();
        assert!(parser.sections.is_empty());
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(
            parse("[G]ok\n{title: oops\n"),
            Err(ParseError::UnterminatedDirective { line: 2 })
        );
        assert_eq!(
            parse("{c: Softly} [G]la\n"),
            Err(ParseError::TrailingText { line: 1 })
        );
        assert_eq!(
            parse("{sov}\na\n{end_of_chorus}\n"),
            Err(ParseError::UnmatchedEnd { line: 3, name: "chorus" })
        );
    }

    #[test]
    fn test_open_environment_closes_at_end() {
        let song = parse("{start_of_bridge}\n[Am]Hold on").unwrap();
        assert_eq!(song.sections.len(), 1);
        assert_eq!(song.sections[0].label, "Bridge");
    }

    #[test]
    fn test_empty_source() {
        let song = parse("").unwrap();
        assert!(song.sections.is_empty());
        assert_eq!(song.metadata, SongMetadata::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.cho");
        fs::write(&path, "{t: Test}\n[C]Hi\n").unwrap();
        let song = load(&path).unwrap();
        assert_eq!(song.metadata.title.as_deref(), Some("Test"));
        assert!(load(dir.path().join("missing.cho")).is_err());
    }
}
