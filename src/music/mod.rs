// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory utilities for Lyra.
//!
//! Chord symbols shown above lyrics are transposed here before display.

pub mod chord;
pub mod note;

pub use chord::{transpose_chord, Chord};
pub use note::{Note, Semitones, Spelling};
