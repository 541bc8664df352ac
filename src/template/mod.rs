// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Layout templates.
//!
//! A template fixes column count, fonts, spacing and chord style for a
//! render pass. Templates load from YAML or TOML; any field may be omitted
//! and falls back to its default.

pub mod watcher;

pub use watcher::{validate_template, TemplateEvent, TemplateWatcher};

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of a monospaced glyph relative to its font size
pub const CHAR_WIDTH_RATIO: f32 = 0.6;

/// Most columns a template may ask for
pub const MAX_COLUMNS: usize = 6;

/// How sections are assigned to columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnBalancingStrategy {
    /// Fill each column with `ceil(sections / columns)` sections in order
    #[default]
    EqualCount,
    /// Place each section in the column with the least estimated height
    EqualHeight,
}

impl ColumnBalancingStrategy {
    /// The other strategy
    pub fn toggled(self) -> Self {
        match self {
            ColumnBalancingStrategy::EqualCount => ColumnBalancingStrategy::EqualHeight,
            ColumnBalancingStrategy::EqualHeight => ColumnBalancingStrategy::EqualCount,
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            ColumnBalancingStrategy::EqualCount => "equal count",
            ColumnBalancingStrategy::EqualHeight => "equal height",
        }
    }
}

/// Spacing between consecutive sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionBreakBehavior {
    /// One body line of space before each section
    #[default]
    SpaceBefore,
    /// No extra space
    Compact,
}

/// Where chords are drawn relative to lyrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordPositioningStyle {
    /// Chord layer directly above the lyric layer
    #[default]
    ChordsOverLyrics,
    /// Chords written as `[C]` inside the lyric text
    Inline,
    /// Chord layer on its own full-height line above the lyrics
    SeparateLines,
}

impl ChordPositioningStyle {
    /// Next style in display order
    pub fn next(self) -> Self {
        match self {
            ChordPositioningStyle::ChordsOverLyrics => ChordPositioningStyle::Inline,
            ChordPositioningStyle::Inline => ChordPositioningStyle::SeparateLines,
            ChordPositioningStyle::SeparateLines => ChordPositioningStyle::ChordsOverLyrics,
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            ChordPositioningStyle::ChordsOverLyrics => "chords over lyrics",
            ChordPositioningStyle::Inline => "inline",
            ChordPositioningStyle::SeparateLines => "separate lines",
        }
    }
}

/// Placement of a line block inside a wider column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordAlignment {
    #[default]
    LeftAligned,
    Centered,
    RightAligned,
}

impl ChordAlignment {
    /// Next alignment in display order
    pub fn next(self) -> Self {
        match self {
            ChordAlignment::LeftAligned => ChordAlignment::Centered,
            ChordAlignment::Centered => ChordAlignment::RightAligned,
            ChordAlignment::RightAligned => ChordAlignment::LeftAligned,
        }
    }
}

/// Invalid template values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    #[error("column count must be at least 1")]
    NoColumns,
    #[error("column count {count} exceeds the maximum of {max}")]
    TooManyColumns { count: usize, max: usize },
    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidMeasure { field: &'static str, value: f32 },
    #[error("{count} column width ratios given for {columns} columns")]
    RatioCountMismatch { count: usize, columns: usize },
    #[error("column width ratios must be non-negative and sum to more than zero")]
    InvalidRatios,
}

/// Layout configuration for one render pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Template name
    #[serde(default = "default_name")]
    pub name: String,
    /// Number of columns (1 to `MAX_COLUMNS`)
    #[serde(default = "default_column_count")]
    pub column_count: usize,
    /// Space between adjacent columns, in pixels
    #[serde(default = "default_column_gap")]
    pub column_gap: f32,
    /// Relative column widths; equal widths when absent
    #[serde(default)]
    pub column_width_ratios: Option<Vec<f32>>,
    /// Section-to-column assignment policy
    #[serde(default)]
    pub column_balancing_strategy: ColumnBalancingStrategy,
    #[serde(default = "default_heading_font_size")]
    pub heading_font_size: f32,
    #[serde(default = "default_body_font_size")]
    pub body_font_size: f32,
    #[serde(default = "default_chord_font_size")]
    pub chord_font_size: f32,
    /// Line height as a multiple of font size
    #[serde(default = "default_line_spacing")]
    pub line_spacing: f32,
    #[serde(default)]
    pub section_break_behavior: SectionBreakBehavior,
    #[serde(default)]
    pub chord_positioning_style: ChordPositioningStyle,
    #[serde(default)]
    pub chord_alignment: ChordAlignment,
    /// Semitones applied to every displayed chord
    #[serde(default)]
    pub transpose: i8,
}

fn default_name() -> String {
    "Default".to_string()
}
fn default_column_count() -> usize {
    1
}
fn default_column_gap() -> f32 {
    20.0
}
fn default_heading_font_size() -> f32 {
    18.0
}
fn default_body_font_size() -> f32 {
    16.0
}
fn default_chord_font_size() -> f32 {
    14.0
}
fn default_line_spacing() -> f32 {
    1.2
}

impl Default for Template {
    fn default() -> Self {
        Self {
            name: default_name(),
            column_count: default_column_count(),
            column_gap: default_column_gap(),
            column_width_ratios: None,
            column_balancing_strategy: ColumnBalancingStrategy::default(),
            heading_font_size: default_heading_font_size(),
            body_font_size: default_body_font_size(),
            chord_font_size: default_chord_font_size(),
            line_spacing: default_line_spacing(),
            section_break_behavior: SectionBreakBehavior::default(),
            chord_positioning_style: ChordPositioningStyle::default(),
            chord_alignment: ChordAlignment::default(),
            transpose: 0,
        }
    }
}

impl Template {
    /// Single column, chords over lyrics
    pub fn single_column() -> Self {
        Self {
            name: "Single Column".to_string(),
            ..Self::default()
        }
    }

    /// Two equal columns
    pub fn two_column() -> Self {
        Self {
            name: "Two Column".to_string(),
            column_count: 2,
            ..Self::default()
        }
    }

    /// Three columns balanced by height with compact section breaks
    pub fn three_column() -> Self {
        Self {
            name: "Three Column".to_string(),
            column_count: 3,
            column_gap: 16.0,
            column_balancing_strategy: ColumnBalancingStrategy::EqualHeight,
            heading_font_size: 16.0,
            body_font_size: 14.0,
            chord_font_size: 12.0,
            section_break_behavior: SectionBreakBehavior::Compact,
            ..Self::default()
        }
    }

    /// Load a template, choosing the format from the file extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read template file: {:?}", path))?;

        let template = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&contents)?,
            Some("yaml") | Some("yml") | None => Self::from_yaml(&contents)?,
            Some(other) => bail!("Unsupported template format '{}': {:?}", other, path),
        };

        template
            .validate()
            .with_context(|| format!("Invalid template: {:?}", path))?;
        Ok(template)
    }

    /// Parse a template from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML template")
    }

    /// Parse a template from a TOML string
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).context("Failed to parse TOML template")
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize template to YAML")
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize template to TOML")
    }

    /// Save the template; `.toml` files get TOML, anything else YAML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let contents = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => self.to_toml()?,
            _ => self.to_yaml()?,
        };
        fs::write(path, contents)
            .with_context(|| format!("Failed to write template file: {:?}", path))
    }

    /// Check column count, measures and ratios
    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.column_count < 1 {
            return Err(TemplateError::NoColumns);
        }
        if self.column_count > MAX_COLUMNS {
            return Err(TemplateError::TooManyColumns {
                count: self.column_count,
                max: MAX_COLUMNS,
            });
        }

        let measures = [
            ("column_gap", self.column_gap),
            ("heading_font_size", self.heading_font_size),
            ("body_font_size", self.body_font_size),
            ("chord_font_size", self.chord_font_size),
            ("line_spacing", self.line_spacing),
        ];
        for (field, value) in measures {
            if !value.is_finite() || value < 0.0 {
                return Err(TemplateError::InvalidMeasure { field, value });
            }
        }

        if let Some(ratios) = &self.column_width_ratios {
            if ratios.len() != self.column_count {
                return Err(TemplateError::RatioCountMismatch {
                    count: ratios.len(),
                    columns: self.column_count,
                });
            }
            let invalid = ratios.iter().any(|r| !r.is_finite() || *r < 0.0);
            if invalid || ratios.iter().sum::<f32>() <= 0.0 {
                return Err(TemplateError::InvalidRatios);
            }
        }

        Ok(())
    }

    /// Width of one monospaced chord glyph
    pub fn chord_char_width(&self) -> f32 {
        self.chord_font_size * CHAR_WIDTH_RATIO
    }

    /// Width of one monospaced body glyph
    pub fn body_char_width(&self) -> f32 {
        self.body_font_size * CHAR_WIDTH_RATIO
    }

    /// Total space taken by gaps between columns
    pub fn total_gap(&self) -> f32 {
        self.column_count.saturating_sub(1) as f32 * self.column_gap
    }

    /// Pixel width of each column for a given total width.
    ///
    /// Gaps are subtracted first; what remains is split by the configured
    /// ratios, or equally. Widths are never negative, so a total narrower
    /// than the gaps yields zero-width columns.
    pub fn effective_column_widths(&self, total_width: f32) -> Vec<f32> {
        let columns = self.column_count.max(1);
        let usable = if total_width.is_finite() {
            (total_width - self.total_gap()).max(0.0)
        } else {
            0.0
        };

        match &self.column_width_ratios {
            Some(ratios) if ratios.len() == columns => {
                let sum: f32 = ratios.iter().map(|r| r.max(0.0)).sum();
                if sum > 0.0 {
                    return ratios.iter().map(|r| usable * r.max(0.0) / sum).collect();
                }
                vec![usable / columns as f32; columns]
            }
            _ => vec![usable / columns as f32; columns],
        }
    }
}
