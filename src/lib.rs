// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Lyra song layout engine.
//!
//! Lays a parsed ChordPro song out across a configurable number of columns
//! and renders each line according to a chord-positioning style. The
//! pieces are:
//! - `song`: the parsed song model (sections, lines, chord segments)
//! - `chordpro`: a ChordPro parser producing that model
//! - `music`: chord symbol parsing and transposition
//! - `template`: layout configuration with hot reload
//! - `layout`: column distribution and the recompute session
//! - `render`: per-line rendering and plain-text export
//! - `ui`: terminal preview

pub mod chordpro;
pub mod layout;
pub mod music;
pub mod render;
pub mod song;
pub mod template;
pub mod ui;

pub use layout::{distribute_content, ColumnContent, LayoutError, LayoutSession};
pub use render::{render_line, RenderedLine};
pub use song::{LineKind, ParsedSong, Segment, SongLine, SongSection};
pub use template::Template;
