// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Segment precondition checks.
//!
//! The renderer assumes segments are ordered by position and never overlap.
//! Songs that break this are rejected here rather than rendered wrongly.

use thiserror::Error;

use super::SongLine;

/// Malformed segment data in a parsed song
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SongError {
    /// A segment starts before the one preceding it
    #[error("section {section}, line {line}: segment {segment} at position {position} precedes position {previous}")]
    UnorderedSegments {
        section: usize,
        line: usize,
        segment: usize,
        position: usize,
        previous: usize,
    },
    /// A segment starts inside the text of the one preceding it
    #[error("section {section}, line {line}: segment {segment} at position {position} overlaps text ending at {previous_end}")]
    OverlappingSegments {
        section: usize,
        line: usize,
        segment: usize,
        position: usize,
        previous_end: usize,
    },
}

impl SongError {
    /// Attach section and line indices to an error found by `check_line`
    pub(super) fn at(self, section_index: usize, line_index: usize) -> Self {
        match self {
            SongError::UnorderedSegments {
                segment,
                position,
                previous,
                ..
            } => SongError::UnorderedSegments {
                section: section_index,
                line: line_index,
                segment,
                position,
                previous,
            },
            SongError::OverlappingSegments {
                segment,
                position,
                previous_end,
                ..
            } => SongError::OverlappingSegments {
                section: section_index,
                line: line_index,
                segment,
                position,
                previous_end,
            },
        }
    }
}

/// Check one line's segments. Section and line indices are left at zero.
pub(super) fn check_line(line: &SongLine) -> Result<(), SongError> {
    for (index, pair) in line.segments.windows(2).enumerate() {
        let (previous, current) = (&pair[0], &pair[1]);
        if current.position < previous.position {
            return Err(SongError::UnorderedSegments {
                section: 0,
                line: 0,
                segment: index + 1,
                position: current.position,
                previous: previous.position,
            });
        }
        if current.position < previous.end() {
            return Err(SongError::OverlappingSegments {
                section: 0,
                line: 0,
                segment: index + 1,
                position: current.position,
                previous_end: previous.end(),
            });
        }
    }
    Ok(())
}

impl SongLine {
    /// Check this line's segments are ordered and non-overlapping
    pub fn validate(&self) -> Result<(), SongError> {
        check_line(self)
    }
}
